pub mod amount;
pub mod device;
pub mod frequency;
pub mod geo;
pub mod traits;

pub use amount::{RoundAmountRule, UnusualAmountRule};
pub use device::{NewDeviceRule, SuspiciousAgentRule};
pub use frequency::RapidSuccessionRule;
pub use geo::ImpossibleTravelRule;
pub use traits::FraudRule;

use chrono::Duration;
use std::sync::Arc;

use crate::aml::{AmlMonitor, Watchlist};
use crate::domain::RiskPolicy;

/// Everything derived from one policy version: the compiled fraud rules
/// and the AML monitor, plus the policy itself for scoring and decisions.
///
/// Rule declaration order is fixed so evaluation output is deterministic.
pub struct RuleSet {
    pub rules: Vec<Arc<dyn FraudRule>>,
    pub monitor: AmlMonitor,
    pub policy: Arc<RiskPolicy>,
}

impl RuleSet {
    /// Compile a rule set from a validated policy and watchlist.
    pub fn from_policy(policy: RiskPolicy, watchlist: Arc<Watchlist>) -> Self {
        let p = &policy.rules;

        let rules: Vec<Arc<dyn FraudRule>> = vec![
            Arc::new(UnusualAmountRule::new(p.unusual_amount_multiplier)),
            Arc::new(RoundAmountRule::new(p.round_amount_modulus, p.round_amount_min)),
            Arc::new(RapidSuccessionRule::new(p.rapid_succession_count)),
            Arc::new(ImpossibleTravelRule::new(
                p.impossible_travel_km,
                Duration::seconds(p.impossible_travel_window_secs),
            )),
            Arc::new(NewDeviceRule),
            Arc::new(SuspiciousAgentRule::new(p.suspicious_agents.clone())),
        ];

        let monitor = AmlMonitor::new(policy.aml.clone(), watchlist);

        RuleSet {
            rules,
            monitor,
            policy: Arc::new(policy),
        }
    }

    pub fn version(&self) -> &str {
        &self.policy.version
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}
