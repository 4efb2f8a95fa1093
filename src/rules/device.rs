use async_trait::async_trait;

use crate::domain::evidence::{RuleCategory, RuleViolation, ScoreDimension};
use crate::domain::{Transaction, UserContext};
use crate::rules::traits::FraudRule;

/// Risk contribution for an unrecognized device.
const NEW_DEVICE_RISK: f64 = 0.3;

/// Risk contribution for an automated user agent.
const SUSPICIOUS_AGENT_RISK: f64 = 0.6;

/// Flags transactions from devices the user has never verified.
#[derive(Debug)]
pub struct NewDeviceRule;

#[async_trait]
impl FraudRule for NewDeviceRule {
    fn name(&self) -> &str {
        "new_device"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Device
    }

    async fn evaluate(
        &self,
        tx: &Transaction,
        ctx: &UserContext,
    ) -> anyhow::Result<Option<RuleViolation>> {
        if ctx.is_trusted_device(&tx.device_id) {
            return Ok(None);
        }

        Ok(Some(RuleViolation::new(
            self.category(),
            self.name(),
            NEW_DEVICE_RISK,
            format!("device {} not in trusted set", tx.device_id.as_str()),
            ScoreDimension::Technical,
        )))
    }
}

/// Flags user agents that look like automation rather than a browser.
///
/// Matches case-insensitively on configured substrings (curl, headless
/// drivers, generic bots). An empty user agent is left alone; plenty of
/// legitimate native clients send none.
#[derive(Debug)]
pub struct SuspiciousAgentRule {
    patterns: Vec<String>,
}

impl SuspiciousAgentRule {
    pub fn new(patterns: Vec<String>) -> Self {
        let patterns = patterns.into_iter().map(|p| p.to_lowercase()).collect();
        SuspiciousAgentRule { patterns }
    }
}

#[async_trait]
impl FraudRule for SuspiciousAgentRule {
    fn name(&self) -> &str {
        "suspicious_user_agent"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Device
    }

    async fn evaluate(
        &self,
        tx: &Transaction,
        _ctx: &UserContext,
    ) -> anyhow::Result<Option<RuleViolation>> {
        if tx.user_agent.is_empty() {
            return Ok(None);
        }

        let agent = tx.user_agent.to_lowercase();
        if let Some(pattern) = self.patterns.iter().find(|p| agent.contains(p.as_str())) {
            return Ok(Some(RuleViolation::new(
                self.category(),
                self.name(),
                SUSPICIOUS_AGENT_RISK,
                format!("user agent matches suspicious pattern {pattern:?}"),
                ScoreDimension::Technical,
            )));
        }

        Ok(None)
    }
}
