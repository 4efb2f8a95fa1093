use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule grouping used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    Amount,
    Frequency,
    Geographic,
    Device,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Amount => write!(f, "amount"),
            RuleCategory::Frequency => write!(f, "frequency"),
            RuleCategory::Geographic => write!(f, "geographic"),
            RuleCategory::Device => write!(f, "device"),
        }
    }
}

/// Which composite sub-score a violation contributes to.
///
/// Categories describe what a rule inspects; dimensions describe which
/// weighted sub-score the contribution lands in. History-relative amount
/// rules are behavioral, intrinsic amount patterns are transactional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreDimension {
    Behavioral,
    Transactional,
    Technical,
    Geographic,
}

/// A fraud rule that triggered during evaluation.
///
/// Transient evidence: violations exist only as part of a Decision and are
/// never persisted independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleViolation {
    pub category: RuleCategory,

    pub rule: String,

    /// Risk contribution in [0,1]
    pub risk: f64,

    pub message: String,

    /// Sub-score this contribution is attributed to
    pub dimension: ScoreDimension,
}

impl RuleViolation {
    /// Create a violation, clamping the contribution into [0,1].
    pub fn new(
        category: RuleCategory,
        rule: impl Into<String>,
        risk: f64,
        message: impl Into<String>,
        dimension: ScoreDimension,
    ) -> Self {
        RuleViolation {
            category,
            rule: rule.into(),
            risk: risk.clamp(0.0, 1.0),
            message: message.into(),
            dimension,
        }
    }
}

/// Kind of AML concern a flag represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagType {
    /// Multiple transactions just under the reporting threshold
    StructuredTransactions,
    /// Chains of transfers obscuring the origin of funds
    Layering,
    /// Name match against the PEP/sanctions watchlist
    PepOrSanctioned,
}

impl fmt::Display for FlagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagType::StructuredTransactions => write!(f, "structured_transactions"),
            FlagType::Layering => write!(f, "layering"),
            FlagType::PepOrSanctioned => write!(f, "pep_or_sanctioned"),
        }
    }
}

/// An AML concern raised by the monitoring heuristics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFlag {
    #[serde(rename = "type")]
    pub flag_type: FlagType,

    /// Risk weight in [0,1]
    pub risk: f64,

    pub message: String,
}

impl RiskFlag {
    /// Create a flag, clamping the risk into [0,1].
    pub fn new(flag_type: FlagType, risk: f64, message: impl Into<String>) -> Self {
        RiskFlag {
            flag_type,
            risk: risk.clamp(0.0, 1.0),
            message: message.into(),
        }
    }
}
