use futures::future::join_all;
use std::sync::Arc;
use tracing::warn;

use crate::domain::evidence::RuleViolation;
use crate::domain::{Transaction, UserContext};
use crate::rules::FraudRule;

/// Outcome of running the full rule library once.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Violations in rule declaration order
    pub violations: Vec<RuleViolation>,
    pub rules_total: usize,
    pub rules_failed: usize,
}

/// Runs every rule against a transaction and collects violations.
///
/// No short-circuiting: all rules run so that simultaneous risk factors
/// all surface in the evidence trail. Rules run concurrently but output
/// order follows declaration order, so evaluation is deterministic.
pub struct Evaluator;

impl Evaluator {
    /// Evaluate all rules. A rule that errors is isolated: logged, counted
    /// as failed, and treated as "no violation" so one buggy rule cannot
    /// block assessment by the rest.
    pub async fn evaluate(
        rules: &[Arc<dyn FraudRule>],
        tx: &Transaction,
        ctx: &UserContext,
    ) -> Evaluation {
        let futures = rules.iter().map(|rule| rule.evaluate(tx, ctx));
        let results = join_all(futures).await;

        let mut violations = Vec::new();
        let mut rules_failed = 0;

        for (rule, result) in rules.iter().zip(results) {
            match result {
                Ok(Some(violation)) => violations.push(violation),
                Ok(None) => {}
                Err(e) => {
                    rules_failed += 1;
                    warn!(
                        rule = rule.name(),
                        transaction_id = tx.id.as_str(),
                        error = %e,
                        "rule evaluation failed, treating as no violation"
                    );
                }
            }
        }

        Evaluation {
            violations,
            rules_total: rules.len(),
            rules_failed,
        }
    }
}
