use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::error::EngineError;

use super::watchlist::Watchlist;

/// Identity data submitted for sanctions screening.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningProfile {
    pub user_id: String,

    pub full_name: String,

    /// ISO country code, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl ScreeningProfile {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.user_id.is_empty() {
            return Err(EngineError::InvalidInput("user_id is empty".to_string()));
        }
        if self.full_name.trim().is_empty() {
            return Err(EngineError::InvalidInput("full_name is empty".to_string()));
        }
        Ok(())
    }
}

/// Result of checking one list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListCheck {
    pub matched: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ListCheck {
    pub fn no_match() -> Self {
        ListCheck { matched: false, details: None }
    }

    pub fn matched(details: impl Into<String>) -> Self {
        ListCheck {
            matched: true,
            details: Some(details.into()),
        }
    }
}

/// An external compliance data source (OFAC, EU, UN, PEP database).
///
/// Injected capability: the engine never knows whether a list is a network
/// call or a local mirror.
#[async_trait]
pub trait SanctionsList: Send + Sync + Debug {
    /// List identifier used in hits and logs (e.g. "OFAC").
    fn name(&self) -> &str;

    async fn check(&self, profile: &ScreeningProfile) -> anyhow::Result<ListCheck>;
}

/// A confirmed hit against one list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningHit {
    pub list: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Summary report attached to a screening outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub generated_at: DateTime<Utc>,
    pub lists_checked: usize,
    pub lists_matched: usize,
    pub lists_degraded: usize,
    pub summary: String,
}

/// Outcome of screening a profile against every configured list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningResult {
    pub screened: bool,

    pub hits: Vec<ScreeningHit>,

    /// True iff any list reported a match
    pub requires_block: bool,

    /// Lists that failed or timed out and degraded to "no match"
    pub degraded: Vec<String>,

    pub report: ScreeningReport,
}

/// Parallel sanctions screener with per-call timeout and bounded retry.
///
/// Every list is checked concurrently. A list that errors or exceeds the
/// timeout after all retries degrades to "no match"; degraded lists are
/// named in the result and logged at warn level.
pub struct Screener {
    lists: Vec<Arc<dyn SanctionsList>>,
    timeout: Duration,
    retry_attempts: u32,
    retry_base_delay: Duration,
}

impl Screener {
    pub fn new(lists: Vec<Arc<dyn SanctionsList>>, timeout: Duration) -> Self {
        Screener {
            lists,
            timeout,
            retry_attempts: 3,
            retry_base_delay: Duration::from_millis(250),
        }
    }

    pub fn with_retry(mut self, attempts: u32, base_delay: Duration) -> Self {
        self.retry_attempts = attempts.max(1);
        self.retry_base_delay = base_delay;
        self
    }

    pub fn list_count(&self) -> usize {
        self.lists.len()
    }

    /// Screen a profile against all lists in parallel.
    pub async fn screen(&self, profile: &ScreeningProfile) -> Result<ScreeningResult, EngineError> {
        profile.validate()?;

        let checks = self
            .lists
            .iter()
            .map(|list| self.check_one(list.clone(), profile));
        let outcomes = join_all(checks).await;

        let mut hits = Vec::new();
        let mut degraded = Vec::new();

        for (list, outcome) in self.lists.iter().zip(outcomes) {
            match outcome {
                Ok(check) if check.matched => {
                    hits.push(ScreeningHit {
                        list: list.name().to_string(),
                        details: check.details,
                    });
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(
                        list = list.name(),
                        user_id = %profile.user_id,
                        error = %e,
                        "sanctions check degraded to no match"
                    );
                    degraded.push(list.name().to_string());
                }
            }
        }

        let requires_block = !hits.is_empty();
        let report = ScreeningReport {
            generated_at: Utc::now(),
            lists_checked: self.lists.len(),
            lists_matched: hits.len(),
            lists_degraded: degraded.len(),
            summary: if requires_block {
                format!(
                    "match on {}",
                    hits.iter().map(|h| h.list.as_str()).collect::<Vec<_>>().join(", ")
                )
            } else {
                "no matches".to_string()
            },
        };

        Ok(ScreeningResult {
            screened: true,
            hits,
            requires_block,
            degraded,
            report,
        })
    }

    /// One list with timeout and exponential backoff (attempts doubling
    /// the delay, carried over from the upstream retry convention).
    async fn check_one(
        &self,
        list: Arc<dyn SanctionsList>,
        profile: &ScreeningProfile,
    ) -> anyhow::Result<ListCheck> {
        let mut delay = self.retry_base_delay;

        for attempt in 1..=self.retry_attempts {
            let result = tokio::time::timeout(self.timeout, list.check(profile)).await;

            match result {
                Ok(Ok(check)) => return Ok(check),
                Ok(Err(e)) if attempt == self.retry_attempts => return Err(e),
                Err(_) if attempt == self.retry_attempts => {
                    anyhow::bail!("timed out after {:?}", self.timeout)
                }
                _ => {
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }

        unreachable!("retry loop always returns on the last attempt")
    }
}

/// List backed by the local name watchlist.
///
/// Default provider so the engine screens against something real without
/// vendor credentials; production wires actual compliance providers in.
#[derive(Debug)]
pub struct WatchlistSanctionsList {
    name: String,
    watchlist: Arc<Watchlist>,
}

impl WatchlistSanctionsList {
    pub fn new(name: impl Into<String>, watchlist: Arc<Watchlist>) -> Self {
        WatchlistSanctionsList {
            name: name.into(),
            watchlist,
        }
    }
}

#[async_trait]
impl SanctionsList for WatchlistSanctionsList {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self, profile: &ScreeningProfile) -> anyhow::Result<ListCheck> {
        if self.watchlist.contains(&profile.full_name) {
            Ok(ListCheck::matched(format!(
                "name {:?} on {} watchlist",
                profile.full_name, self.name
            )))
        } else {
            Ok(ListCheck::no_match())
        }
    }
}

/// Scriptable list for tests: fixed outcome, optional delay or failure.
#[derive(Debug)]
pub struct MockSanctionsList {
    name: String,
    matched: bool,
    fail: bool,
    delay: Duration,
}

impl MockSanctionsList {
    pub fn matching(name: impl Into<String>) -> Self {
        MockSanctionsList {
            name: name.into(),
            matched: true,
            fail: false,
            delay: Duration::ZERO,
        }
    }

    pub fn clean(name: impl Into<String>) -> Self {
        MockSanctionsList {
            name: name.into(),
            matched: false,
            fail: false,
            delay: Duration::ZERO,
        }
    }

    pub fn failing(name: impl Into<String>) -> Self {
        MockSanctionsList {
            name: name.into(),
            matched: false,
            fail: true,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl SanctionsList for MockSanctionsList {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self, _profile: &ScreeningProfile) -> anyhow::Result<ListCheck> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            anyhow::bail!("simulated provider failure");
        }
        if self.matched {
            Ok(ListCheck::matched("mock hit"))
        } else {
            Ok(ListCheck::no_match())
        }
    }
}
