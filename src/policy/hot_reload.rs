use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::interval;
use tracing::{info, warn};

use crate::observability::MetricsRegistry;
use crate::rules::RuleSet;

use super::loader::{PolicyError, PolicyLoader};

/// Watch for policy changes and broadcast recompiled rule sets.
///
/// The initial load happens before this watcher exists; startup fails fast
/// on a broken policy. From then on a bad reload keeps the last good rule
/// set and logs the error.
pub struct PolicyWatcher {
    loader: PolicyLoader,
    check_interval: Duration,
    last_version: String,
    metrics: Arc<MetricsRegistry>,
}

impl PolicyWatcher {
    /// Create a new policy watcher.
    pub fn new(loader: PolicyLoader, check_interval: Duration, metrics: Arc<MetricsRegistry>) -> Self {
        PolicyWatcher {
            loader,
            check_interval,
            last_version: String::new(),
            metrics,
        }
    }

    /// Start watching for policy changes, seeded with the rule set from the
    /// initial load.
    ///
    /// Returns a receiver that observes new RuleSet instances whenever the
    /// policy version changes on disk.
    pub fn start(
        mut self,
        initial: Arc<RuleSet>,
    ) -> (watch::Receiver<Arc<RuleSet>>, tokio::task::JoinHandle<()>) {
        self.last_version = initial.version().to_string();
        info!(version = %self.last_version, "policy watcher started");

        let (tx, rx) = watch::channel(initial);

        let handle = tokio::spawn(async move {
            let mut interval = interval(self.check_interval);

            loop {
                interval.tick().await;

                match self.check_for_updates(&tx) {
                    Ok(true) => {
                        self.metrics.record_policy_reload(true);
                        info!(version = %self.last_version, "policy reloaded");
                    }
                    Ok(false) => {} // No changes
                    Err(e) => {
                        self.metrics.record_policy_reload(false);
                        warn!(error = %e, "policy reload failed, keeping previous policy");
                    }
                }
            }
        });

        (rx, handle)
    }

    /// Check for policy updates and broadcast if the version changed.
    fn check_for_updates(
        &mut self,
        tx: &watch::Sender<Arc<RuleSet>>,
    ) -> Result<bool, PolicyError> {
        let policy = self.loader.load_policy()?;

        if self.last_version == policy.version {
            return Ok(false);
        }

        // Version changed: reload policy and watchlist together
        let (policy, ruleset) = self.loader.load()?;

        info!(
            from = %self.last_version,
            to = %policy.version,
            "policy version changed"
        );

        self.last_version = policy.version;
        let _ = tx.send(Arc::new(ruleset));

        Ok(true)
    }
}
