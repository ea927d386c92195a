//! Image acquisition backend for Stockly
//!
//! Turns a user prompt into a stable set of image references: the prompt is
//! enhanced by a language model, then a cascade of providers (AI image model,
//! free generation service, thematic stock photos, placeholders) is tried in
//! order until one produces images.

pub mod ai;
pub mod app;
pub mod cascade;
pub mod category;
pub mod enhancer;
pub mod error;
pub mod models;
pub mod probe;
pub mod prompts;
pub mod seed;

pub use error::{Error, Result};
