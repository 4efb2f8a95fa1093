use async_trait::async_trait;

use crate::domain::evidence::{RuleCategory, RuleViolation, ScoreDimension};
use crate::domain::{Transaction, UserContext};
use crate::rules::traits::FraudRule;

/// Risk contribution for rapid-succession activity.
const RAPID_SUCCESSION_RISK: f64 = 0.8;

/// Flags bursts of above-average spending.
///
/// Triggers when the user has made more than `max_per_hour` transactions in
/// the hour before this one and the current amount is above their rolling
/// average. Burst velocity alone is normal (subscriptions, shopping carts);
/// a burst of large transfers is not.
#[derive(Debug)]
pub struct RapidSuccessionRule {
    max_per_hour: usize,
}

impl RapidSuccessionRule {
    pub fn new(max_per_hour: usize) -> Self {
        RapidSuccessionRule { max_per_hour }
    }
}

#[async_trait]
impl FraudRule for RapidSuccessionRule {
    fn name(&self) -> &str {
        "rapid_succession"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Frequency
    }

    async fn evaluate(
        &self,
        tx: &Transaction,
        ctx: &UserContext,
    ) -> anyhow::Result<Option<RuleViolation>> {
        let recent = ctx.count_last_hour(tx.occurred_at);

        if recent > self.max_per_hour && tx.amount > ctx.avg_amount {
            return Ok(Some(RuleViolation::new(
                self.category(),
                self.name(),
                RAPID_SUCCESSION_RISK,
                format!(
                    "{recent} transactions in the last hour with above-average amount {}",
                    tx.amount
                ),
                ScoreDimension::Behavioral,
            )));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::context::{Direction, RecentTx};
    use crate::domain::transaction::{Currency, DeviceId, TransactionId};
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    fn test_tx(amount: i64) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            amount: Decimal::new(amount, 0),
            currency: Currency::new("USD"),
            occurred_at: Utc::now(),
            location: None,
            device_id: DeviceId::new("dev-1"),
            user_agent: String::new(),
            merchant: None,
        }
    }

    fn ctx_with_burst(count: usize, avg: i64) -> UserContext {
        let now = Utc::now();
        let mut ctx = UserContext::empty("U1");
        ctx.avg_amount = Decimal::new(avg, 0);
        ctx.recent_txs = (0..count)
            .map(|i| {
                RecentTx::new(
                    now - Duration::minutes(i as i64 * 5),
                    Decimal::new(avg, 0),
                    Direction::Outbound,
                )
            })
            .collect();
        ctx
    }

    #[tokio::test]
    async fn test_burst_of_large_amounts_triggers() {
        let rule = RapidSuccessionRule::new(5);
        let ctx = ctx_with_burst(6, 100);

        let result = rule.evaluate(&test_tx(500), &ctx).await.unwrap();
        let violation = result.expect("should trigger");
        assert_eq!(violation.risk, RAPID_SUCCESSION_RISK);
        assert_eq!(violation.category, RuleCategory::Frequency);
    }

    #[tokio::test]
    async fn test_burst_of_small_amounts_quiet() {
        let rule = RapidSuccessionRule::new(5);
        let ctx = ctx_with_burst(8, 100);

        // amount at or below average: velocity alone is fine
        let result = rule.evaluate(&test_tx(100), &ctx).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_few_transactions_quiet() {
        let rule = RapidSuccessionRule::new(5);
        let ctx = ctx_with_burst(3, 100);

        let result = rule.evaluate(&test_tx(500), &ctx).await.unwrap();
        assert!(result.is_none());
    }
}
