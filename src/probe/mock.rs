use super::ReachabilityProbe;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ProbeOutcome {
    Reachable,
    Unreachable,
    Fail,
}

/// Scripted probe: per-call outcomes in order, then the default.
#[derive(Clone)]
pub struct MockProbe {
    default: ProbeOutcome,
    script: Arc<Mutex<Vec<ProbeOutcome>>>,
    checked: Arc<Mutex<Vec<String>>>,
    by_url: Arc<Mutex<HashMap<String, ProbeOutcome>>>,
}

impl MockProbe {
    /// Every URL is reachable.
    pub fn new() -> Self {
        Self::with_default(ProbeOutcome::Reachable)
    }

    /// Every URL answers with a non-200 status.
    pub fn unreachable() -> Self {
        Self::with_default(ProbeOutcome::Unreachable)
    }

    /// Every check errors, as a transport failure would.
    pub fn failing() -> Self {
        Self::with_default(ProbeOutcome::Fail)
    }

    fn with_default(default: ProbeOutcome) -> Self {
        Self {
            default,
            script: Arc::new(Mutex::new(Vec::new())),
            checked: Arc::new(Mutex::new(Vec::new())),
            by_url: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Queue outcomes for the next calls: `true` reachable, `false` unreachable.
    pub fn with_sequence(self, outcomes: &[bool]) -> Self {
        self.script.lock().unwrap().extend(outcomes.iter().map(|ok| {
            if *ok {
                ProbeOutcome::Reachable
            } else {
                ProbeOutcome::Unreachable
            }
        }));
        self
    }

    /// Make one specific URL error regardless of the script.
    pub fn with_failing_url(self, url: &str) -> Self {
        self.by_url
            .lock()
            .unwrap()
            .insert(url.to_string(), ProbeOutcome::Fail);
        self
    }

    /// URLs checked so far, in call order.
    pub fn checked_urls(&self) -> Vec<String> {
        self.checked.lock().unwrap().clone()
    }

    pub fn get_call_count(&self) -> usize {
        self.checked.lock().unwrap().len()
    }
}

impl Default for MockProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReachabilityProbe for MockProbe {
    async fn is_reachable(&self, url: &str) -> Result<bool> {
        self.checked.lock().unwrap().push(url.to_string());

        let scripted = {
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                None
            } else {
                Some(script.remove(0))
            }
        };
        let outcome = self
            .by_url
            .lock()
            .unwrap()
            .get(url)
            .copied()
            .or(scripted)
            .unwrap_or(self.default);

        match outcome {
            ProbeOutcome::Reachable => Ok(true),
            ProbeOutcome::Unreachable => Ok(false),
            ProbeOutcome::Fail => Err(Error::Timeout(format!("mock probe failure for {}", url))),
        }
    }
}
