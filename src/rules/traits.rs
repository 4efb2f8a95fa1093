use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::evidence::{RuleCategory, RuleViolation};
use crate::domain::{Transaction, UserContext};

/// A fraud detection rule.
///
/// Rules are pure predicates over a transaction and its user context: no
/// side effects, no shared mutable state. All rules share one asynchronous
/// contract so the evaluator can run them concurrently without
/// special-casing, even though most are local computations.
///
/// A rule returns `Ok(None)` when it does not trigger, `Ok(Some(violation))`
/// when it does, and `Err` when it cannot evaluate at all. Errors are
/// isolated by the evaluator and treated as "no violation".
#[async_trait]
pub trait FraudRule: Send + Sync + Debug {
    /// Stable rule name, used in evidence and logs.
    fn name(&self) -> &str;

    /// Category the rule belongs to.
    fn category(&self) -> RuleCategory;

    /// Evaluate the rule against a transaction and its context.
    async fn evaluate(
        &self,
        tx: &Transaction,
        ctx: &UserContext,
    ) -> anyhow::Result<Option<RuleViolation>>;
}
