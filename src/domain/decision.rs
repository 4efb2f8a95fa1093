use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::evidence::{RiskFlag, RuleViolation};
use super::transaction::TransactionId;

/// Action outcome with severity ordering.
///
/// Actions are ordered from least to most severe. When multiple signals
/// point to different actions, the most severe wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Action {
    /// Transaction approved
    Allow = 0,
    /// Approved but placed under heightened observation
    Monitor = 1,
    /// Routed to manual review
    Flag = 2,
    /// Rejected outright
    Block = 3,
}

impl Action {
    /// Returns the more severe of two actions.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        std::cmp::max(self, other)
    }

    /// Returns true if the transaction may proceed.
    #[inline]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Action::Allow | Action::Monitor)
    }

    /// Returns the severity rank (0-3).
    #[inline]
    pub fn severity(&self) -> u8 {
        *self as u8
    }
}

impl Default for Action {
    fn default() -> Self {
        Action::Allow
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Allow => write!(f, "allow"),
            Action::Monitor => write!(f, "monitor"),
            Action::Flag => write!(f, "flag"),
            Action::Block => write!(f, "block"),
        }
    }
}

/// Risk band derived from the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Critical => write!(f, "critical"),
        }
    }
}

/// The verdict for a single transaction evaluation.
///
/// Created once per evaluation and never mutated; re-evaluating a
/// transaction produces a new Decision with a new id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    /// Unique decision identifier
    pub decision_id: Uuid,

    /// The transaction this decision is about
    pub transaction_id: TransactionId,

    /// Composite risk score in [0,1]
    pub risk_score: f64,

    /// Band derived from the score via policy cut points
    pub risk_level: RiskLevel,

    /// Fraud rule violations, in rule declaration order
    pub violations: Vec<RuleViolation>,

    /// AML flags from the monitoring heuristics
    pub flags: Vec<RiskFlag>,

    /// Recommended action for the upstream service
    pub action: Action,

    /// Funds should be held pending review
    pub hold_funds: bool,

    /// A suspicious activity report must be filed
    pub reporting_required: bool,

    /// Confidence in this evaluation, in [0,1]; reduced when individual
    /// checks failed and were skipped
    pub confidence: f64,

    /// Policy version the decision was made under
    pub policy_version: String,

    /// When the decision was issued
    pub decided_at: DateTime<Utc>,
}

impl Decision {
    /// Returns true if any evidence (violation or flag) was collected.
    pub fn has_evidence(&self) -> bool {
        !self.violations.is_empty() || !self.flags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_ordering() {
        assert!(Action::Allow < Action::Monitor);
        assert!(Action::Monitor < Action::Flag);
        assert!(Action::Flag < Action::Block);
    }

    #[test]
    fn test_action_max() {
        assert_eq!(Action::Allow.max(Action::Flag), Action::Flag);
        assert_eq!(Action::Block.max(Action::Monitor), Action::Block);
    }

    #[test]
    fn test_action_is_allowed() {
        assert!(Action::Allow.is_allowed());
        assert!(Action::Monitor.is_allowed());
        assert!(!Action::Flag.is_allowed());
        assert!(!Action::Block.is_allowed());
    }

    #[test]
    fn test_action_serialization() {
        let json = serde_json::to_string(&Action::Block).unwrap();
        assert_eq!(json, "\"block\"");

        let parsed: Action = serde_json::from_str("\"monitor\"").unwrap();
        assert_eq!(parsed, Action::Monitor);
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }
}
