//! Ordered image-provider fallback
//!
//! Each tier implements [`ImageTier`]; [`ProviderCascade`] tries them in
//! priority order and stops at the first one that yields a full set of
//! references.

pub mod placeholder;
pub mod primary;
pub mod secondary;
pub mod stock;

pub use placeholder::PlaceholderSource;
pub use primary::PrimaryTier;
pub use secondary::SecondaryTier;
pub use stock::StockTier;

use crate::models::ImageReference;
use crate::{Error, Result};
use async_trait::async_trait;
use tracing::{info, warn};

/// Edge length, in pixels, requested from the non-AI fallback services.
pub const FALLBACK_IMAGE_SIZE: u32 = 512;

/// One stage of the cascade.
#[async_trait]
pub trait ImageTier: Send + Sync {
    fn name(&self) -> &str;

    /// Produce `count` references for `prompt`, in index order.
    async fn attempt(&self, prompt: &str, count: usize) -> Result<Vec<ImageReference>>;
}

/// References chosen by the cascade and the tier that produced them.
/// May hold fewer than the requested count when the winning tier fell short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeOutcome {
    pub tier: String,
    pub references: Vec<ImageReference>,
}

pub struct ProviderCascade {
    tiers: Vec<Box<dyn ImageTier>>,
}

impl ProviderCascade {
    pub fn new(tiers: Vec<Box<dyn ImageTier>>) -> Self {
        Self { tiers }
    }

    pub fn tier_names(&self) -> Vec<&str> {
        self.tiers.iter().map(|t| t.name()).collect()
    }

    /// Run tiers in order until one returns a non-empty reference list.
    ///
    /// That tier's answer is final even when it holds fewer than `count`
    /// references; extras are truncated. Fails with
    /// [`Error::CascadeExhausted`] when every tier errors or comes back empty.
    pub async fn run(&self, prompt: &str, count: usize) -> Result<CascadeOutcome> {
        for tier in &self.tiers {
            match tier.attempt(prompt, count).await {
                Ok(mut references) if !references.is_empty() => {
                    references.truncate(count);
                    if references.len() < count {
                        warn!(
                            "[{}] produced {} of {} references, accepting partial result",
                            tier.name(),
                            references.len(),
                            count
                        );
                    } else {
                        info!("[{}] produced {} image reference(s)", tier.name(), count);
                    }
                    return Ok(CascadeOutcome {
                        tier: tier.name().to_string(),
                        references,
                    });
                }
                Ok(_) => {
                    warn!("[{}] returned no references, trying next tier", tier.name());
                }
                Err(e) => {
                    warn!("[{}] failed: {}. Trying next tier", tier.name(), e);
                }
            }
        }

        Err(Error::CascadeExhausted)
    }
}


#[cfg(test)]
mod tests {
    use super::test_tiers::{FailingTier, FixedTier};
    use super::*;

    #[tokio::test]
    async fn test_first_successful_tier_wins() {
        let first = FixedTier::new("first");
        let second = FixedTier::new("second");
        let second_probe = second.clone();

        let cascade = ProviderCascade::new(vec![Box::new(first), Box::new(second)]);
        let outcome = cascade.run("prompt", 2).await.unwrap();

        assert_eq!(outcome.tier, "first");
        assert_eq!(
            outcome.references,
            vec![ImageReference::new("first/0"), ImageReference::new("first/1")]
        );
        assert_eq!(*second_probe.attempts.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_tier_falls_through() {
        let failing = FailingTier::default();
        let failing_probe = failing.clone();

        let cascade =
            ProviderCascade::new(vec![Box::new(failing), Box::new(FixedTier::new("next"))]);
        let outcome = cascade.run("prompt", 3).await.unwrap();

        assert_eq!(outcome.tier, "next");
        assert_eq!(outcome.references.len(), 3);
        assert_eq!(*failing_probe.attempts.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_partial_result_stops_the_cascade() {
        let mut short = FixedTier::new("secondary");
        short.shortfall = 2;
        let lower = FixedTier::new("stock");
        let lower_attempts = lower.attempts.clone();

        let cascade = ProviderCascade::new(vec![Box::new(short), Box::new(lower)]);
        let outcome = cascade.run("prompt", 4).await.unwrap();

        assert_eq!(outcome.tier, "secondary");
        assert_eq!(
            outcome.references,
            vec![
                ImageReference::new("secondary/0"),
                ImageReference::new("secondary/1")
            ]
        );
        assert_eq!(*lower_attempts.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_result_falls_through() {
        let mut empty = FixedTier::new("empty");
        empty.shortfall = 4;

        let cascade = ProviderCascade::new(vec![Box::new(empty), Box::new(FixedTier::new("full"))]);
        let outcome = cascade.run("prompt", 2).await.unwrap();

        assert_eq!(outcome.tier, "full");
        assert_eq!(outcome.references.len(), 2);
    }

    #[tokio::test]
    async fn test_all_tiers_failing_exhausts_cascade() {
        let cascade = ProviderCascade::new(vec![
            Box::new(FailingTier::default()),
            Box::new(FailingTier::default()),
        ]);

        let err = cascade.run("prompt", 1).await.unwrap_err();
        assert!(matches!(err, Error::CascadeExhausted));
    }

    #[tokio::test]
    async fn test_empty_cascade_is_exhausted() {
        let cascade = ProviderCascade::new(Vec::new());
        assert!(matches!(
            cascade.run("prompt", 1).await,
            Err(Error::CascadeExhausted)
        ));
    }

    #[test]
    fn test_tier_names_preserve_order() {
        let cascade = ProviderCascade::new(vec![
            Box::new(FixedTier::new("a")),
            Box::new(FailingTier::default()),
            Box::new(FixedTier::new("b")),
        ]);
        assert_eq!(cascade.tier_names(), vec!["a", "failing", "b"]);
    }
}
