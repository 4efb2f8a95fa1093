use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::evidence::{RuleCategory, RuleViolation, ScoreDimension};
use crate::domain::{Transaction, UserContext};
use crate::rules::traits::FraudRule;

/// Base risk contribution when an amount is just past the unusual threshold.
const UNUSUAL_AMOUNT_RISK: f64 = 0.7;

/// Risk contribution for suspicious round amounts.
const ROUND_AMOUNT_RISK: f64 = 0.4;

/// Flags transactions well above the user's rolling average.
///
/// Triggers when `amount > avg * multiplier`. The contribution grows with
/// the overshoot ratio, so a 15x-average transaction scores higher than one
/// just past the line. Users with no history (zero average) never trigger.
#[derive(Debug)]
pub struct UnusualAmountRule {
    multiplier: Decimal,
}

impl UnusualAmountRule {
    pub fn new(multiplier: Decimal) -> Self {
        UnusualAmountRule { multiplier }
    }
}

#[async_trait]
impl FraudRule for UnusualAmountRule {
    fn name(&self) -> &str {
        "unusual_amount"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Amount
    }

    async fn evaluate(
        &self,
        tx: &Transaction,
        ctx: &UserContext,
    ) -> anyhow::Result<Option<RuleViolation>> {
        if ctx.avg_amount <= Decimal::ZERO {
            return Ok(None);
        }

        let threshold = ctx.avg_amount * self.multiplier;
        if tx.amount <= threshold {
            return Ok(None);
        }

        let overshoot = (tx.amount / threshold).to_f64().unwrap_or(1.0);

        Ok(Some(RuleViolation::new(
            self.category(),
            self.name(),
            UNUSUAL_AMOUNT_RISK * overshoot,
            format!(
                "amount {} exceeds {}x rolling average {}",
                tx.amount, self.multiplier, ctx.avg_amount
            ),
            ScoreDimension::Behavioral,
        )))
    }
}

/// Flags large round-number amounts.
///
/// Fraudulent transfers skew toward round figures; legitimate purchases
/// rarely land on exact multiples of 1000.
#[derive(Debug)]
pub struct RoundAmountRule {
    modulus: Decimal,
    min_amount: Decimal,
}

impl RoundAmountRule {
    pub fn new(modulus: Decimal, min_amount: Decimal) -> Self {
        RoundAmountRule { modulus, min_amount }
    }
}

#[async_trait]
impl FraudRule for RoundAmountRule {
    fn name(&self) -> &str {
        "round_amount"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Amount
    }

    async fn evaluate(
        &self,
        tx: &Transaction,
        _ctx: &UserContext,
    ) -> anyhow::Result<Option<RuleViolation>> {
        if tx.amount > self.min_amount && (tx.amount % self.modulus).is_zero() {
            return Ok(Some(RuleViolation::new(
                self.category(),
                self.name(),
                ROUND_AMOUNT_RISK,
                format!("round amount {} above {}", tx.amount, self.min_amount),
                ScoreDimension::Transactional,
            )));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::{Currency, DeviceId, TransactionId};
    use chrono::Utc;

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

    fn ctx_with_avg(avg: i64) -> UserContext {
        let mut ctx = UserContext::empty("U1");
        ctx.avg_amount = Decimal::new(avg, 0);
        ctx
    }

    #[tokio::test]
    async fn test_unusual_amount_triggers_over_threshold() {
        let rule = UnusualAmountRule::new(Decimal::new(3, 0));
        let result = rule
            .evaluate(&test_tx(3500), &ctx_with_avg(1000))
            .await
            .unwrap();

        let violation = result.expect("should trigger");
        assert_eq!(violation.rule, "unusual_amount");
        assert_eq!(violation.dimension, ScoreDimension::Behavioral);
        assert!(violation.risk > 0.7);
    }

    #[tokio::test]
    async fn test_unusual_amount_quiet_at_threshold() {
        let rule = UnusualAmountRule::new(Decimal::new(3, 0));
        // exactly 3x average does not trigger
        let result = rule
            .evaluate(&test_tx(3000), &ctx_with_avg(1000))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_unusual_amount_scales_with_overshoot() {
        let rule = UnusualAmountRule::new(Decimal::new(3, 0));
        let big = rule
            .evaluate(&test_tx(15000), &ctx_with_avg(1000))
            .await
            .unwrap()
            .unwrap();

        // 5x past the threshold saturates the contribution
        assert_eq!(big.risk, 1.0);
    }

    #[tokio::test]
    async fn test_unusual_amount_no_history() {
        let rule = UnusualAmountRule::new(Decimal::new(3, 0));
        let result = rule
            .evaluate(&test_tx(50000), &ctx_with_avg(0))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_round_amount_triggers() {
        let rule = RoundAmountRule::new(Decimal::new(1000, 0), Decimal::new(5000, 0));
        let result = rule
            .evaluate(&test_tx(8000), &ctx_with_avg(1000))
            .await
            .unwrap();

        let violation = result.expect("should trigger");
        assert_eq!(violation.risk, ROUND_AMOUNT_RISK);
        assert_eq!(violation.dimension, ScoreDimension::Transactional);
    }

    #[tokio::test]
    async fn test_round_amount_small_or_uneven() {
        let rule = RoundAmountRule::new(Decimal::new(1000, 0), Decimal::new(5000, 0));

        // Round but small
        assert!(rule
            .evaluate(&test_tx(3000), &ctx_with_avg(1000))
            .await
            .unwrap()
            .is_none());

        // Large but not round
        assert!(rule
            .evaluate(&test_tx(8123), &ctx_with_avg(1000))
            .await
            .unwrap()
            .is_none());
    }
}
