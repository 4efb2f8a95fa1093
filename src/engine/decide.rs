use crate::domain::evidence::RiskFlag;
use crate::domain::{Action, RiskLevel, RiskPolicy};
use crate::scoring;

/// Outcome of applying the decision policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub action: Action,
    pub hold_funds: bool,
    pub reporting_required: bool,
}

/// Map a composite score and AML flags to a verdict.
///
/// Pure function of its inputs and the policy thresholds: identical inputs
/// always yield identical verdicts, and no I/O happens here. The stricter
/// AML auto-block threshold applies to the AML risk alone, independent of
/// the composite score.
pub fn decide(score: f64, flags: &[RiskFlag], policy: &RiskPolicy) -> Verdict {
    let aml = scoring::aml_risk(flags);
    let level = scoring::risk_level(score, &policy.levels);

    let hold_funds = flags.iter().any(|f| f.risk >= policy.hold_threshold);
    let reporting_required = flags.iter().any(|f| f.risk >= policy.sar_threshold);

    let action = if score > policy.block_threshold || aml >= policy.aml_block_threshold {
        Action::Block
    } else if level >= RiskLevel::High || reporting_required || !flags.is_empty() {
        Action::Flag
    } else if level == RiskLevel::Medium {
        Action::Monitor
    } else {
        Action::Allow
    };

    Verdict {
        action,
        hold_funds,
        reporting_required,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::evidence::FlagType;

    fn policy() -> RiskPolicy {
        RiskPolicy::with_defaults("t")
    }

    fn flag(risk: f64) -> RiskFlag {
        RiskFlag::new(FlagType::StructuredTransactions, risk, "m")
    }

    #[test]
    fn test_low_score_allows() {
        let v = decide(0.1, &[], &policy());
        assert_eq!(v.action, Action::Allow);
        assert!(!v.hold_funds);
        assert!(!v.reporting_required);
    }

    #[test]
    fn test_medium_score_monitors() {
        let v = decide(0.45, &[], &policy());
        assert_eq!(v.action, Action::Monitor);
    }

    #[test]
    fn test_score_over_block_threshold_blocks() {
        let v = decide(0.61, &[], &policy());
        assert_eq!(v.action, Action::Block);
    }

    #[test]
    fn test_aml_auto_block_is_stricter() {
        // 0.85 flag: below the 0.9 auto-block, flags instead
        let v = decide(0.1, &[flag(0.85)], &policy());
        assert_eq!(v.action, Action::Flag);
        assert!(v.hold_funds); // >= 0.85 hold threshold
        assert!(v.reporting_required); // >= 0.8 SAR threshold

        // 0.95 flag: auto-block regardless of composite score
        let v = decide(0.1, &[flag(0.95)], &policy());
        assert_eq!(v.action, Action::Block);
    }

    #[test]
    fn test_low_risk_flag_still_flags() {
        let v = decide(0.1, &[flag(0.4)], &policy());
        assert_eq!(v.action, Action::Flag);
        assert!(!v.hold_funds);
        assert!(!v.reporting_required);
    }

    #[test]
    fn test_determinism() {
        let flags = vec![flag(0.8), flag(0.3)];
        let a = decide(0.5, &flags, &policy());
        let b = decide(0.5, &flags, &policy());
        assert_eq!(a, b);
    }

    #[test]
    fn test_sar_threshold_boundary() {
        let p = policy();

        let v = decide(0.1, &[flag(0.8)], &p);
        assert!(v.reporting_required); // >= is inclusive

        let v = decide(0.1, &[flag(0.79)], &p);
        assert!(!v.reporting_required);
    }
}
