use serde::{Deserialize, Serialize};

use crate::domain::evidence::{RiskFlag, RuleViolation, ScoreDimension};
use crate::domain::policy::{LevelCuts, ScoreWeights};
use crate::domain::RiskLevel;

/// The four sub-scores feeding the composite.
///
/// Each is clamped to [0,1] on construction. Together with weights that
/// sum to 1.0 this guarantees the composite lands in [0,1] even when a
/// rule reports an adversarial contribution.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SubScores {
    pub behavioral: f64,
    pub transactional: f64,
    pub technical: f64,
    pub geographic: f64,
}

impl SubScores {
    /// Accumulate violations into sub-scores: contributions sum per
    /// dimension, then each dimension clamps.
    pub fn from_violations(violations: &[RuleViolation]) -> Self {
        let mut s = SubScores::default();

        for v in violations {
            match v.dimension {
                ScoreDimension::Behavioral => s.behavioral += v.risk,
                ScoreDimension::Transactional => s.transactional += v.risk,
                ScoreDimension::Technical => s.technical += v.risk,
                ScoreDimension::Geographic => s.geographic += v.risk,
            }
        }

        s.clamped()
    }

    /// Clamp every dimension to [0,1].
    pub fn clamped(self) -> Self {
        SubScores {
            behavioral: self.behavioral.clamp(0.0, 1.0),
            transactional: self.transactional.clamp(0.0, 1.0),
            technical: self.technical.clamp(0.0, 1.0),
            geographic: self.geographic.clamp(0.0, 1.0),
        }
    }
}

/// Weighted composite of the sub-scores.
///
/// Sub-scores are re-clamped before weighting; the source of a SubScores
/// value is not trusted to have done it.
pub fn composite_score(sub: &SubScores, weights: &ScoreWeights) -> f64 {
    let s = sub.clamped();

    let score = weights.behavioral * s.behavioral
        + weights.transactional * s.transactional
        + weights.technical * s.technical
        + weights.geographic * s.geographic;

    score.clamp(0.0, 1.0)
}

/// Map a composite score to its risk band via the configured cut points.
pub fn risk_level(score: f64, cuts: &LevelCuts) -> RiskLevel {
    if score > cuts.critical {
        RiskLevel::Critical
    } else if score > cuts.high {
        RiskLevel::High
    } else if score > cuts.medium {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// AML risk is the strongest single flag, clamped.
pub fn aml_risk(flags: &[RiskFlag]) -> f64 {
    flags
        .iter()
        .map(|f| f.risk)
        .fold(0.0_f64, f64::max)
        .clamp(0.0, 1.0)
}
