//! Reachability checks for externally hosted images
//!
//! The secondary tier accepts a generated URL only after a HEAD request to it
//! answers HTTP 200 within the configured timeout.

pub mod client;
pub mod mock;

pub use client::HttpProbe;
pub use mock::MockProbe;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// `Ok(true)` when `url` answers 200; errors cover transport failures and timeouts.
    async fn is_reachable(&self, url: &str) -> Result<bool>;
}
