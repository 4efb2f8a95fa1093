use async_trait::async_trait;
use chrono::Duration;

use crate::domain::evidence::{RuleCategory, RuleViolation, ScoreDimension};
use crate::domain::{Transaction, UserContext};
use crate::rules::traits::FraudRule;

/// Risk contribution for an impossible-travel hit.
const IMPOSSIBLE_TRAVEL_RISK: f64 = 0.9;

/// Flags transactions that would require impossible travel.
///
/// Triggers when the great-circle distance from the last known location
/// exceeds `min_distance_km` and the elapsed time since the previous
/// transaction is under `window`. Needs a current location, a last known
/// location, and a last transaction time; stays quiet when any is missing.
#[derive(Debug)]
pub struct ImpossibleTravelRule {
    min_distance_km: f64,
    window: Duration,
}

impl ImpossibleTravelRule {
    pub fn new(min_distance_km: f64, window: Duration) -> Self {
        ImpossibleTravelRule {
            min_distance_km,
            window,
        }
    }
}

#[async_trait]
impl FraudRule for ImpossibleTravelRule {
    fn name(&self) -> &str {
        "impossible_travel"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Geographic
    }

    async fn evaluate(
        &self,
        tx: &Transaction,
        ctx: &UserContext,
    ) -> anyhow::Result<Option<RuleViolation>> {
        let (Some(here), Some(there), Some(last_at)) = (
            tx.location.as_ref(),
            ctx.last_known_location.as_ref(),
            ctx.last_transaction_at,
        ) else {
            return Ok(None);
        };

        let distance_km = here.distance_km(there);
        let elapsed = tx.occurred_at - last_at;

        if distance_km > self.min_distance_km && elapsed < self.window {
            return Ok(Some(RuleViolation::new(
                self.category(),
                self.name(),
                IMPOSSIBLE_TRAVEL_RISK,
                format!(
                    "{:.0} km from last known location in {} minutes",
                    distance_km,
                    elapsed.num_minutes()
                ),
                ScoreDimension::Geographic,
            )));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::{Currency, DeviceId, GeoPoint, TransactionId};
    use chrono::Utc;
    use rust_decimal::Decimal;

    // Madrid and Paris are ~1050 km apart; Madrid and Toledo ~70 km.
    const MADRID: GeoPoint = GeoPoint { lat: 40.4168, lon: -3.7038 };
    const PARIS: GeoPoint = GeoPoint { lat: 48.8566, lon: 2.3522 };
    const TOLEDO: GeoPoint = GeoPoint { lat: 39.8628, lon: -4.0273 };

    fn test_tx(location: Option<GeoPoint>) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            amount: Decimal::new(100, 0),
            currency: Currency::new("EUR"),
            occurred_at: Utc::now(),
            location,
            device_id: DeviceId::new("dev-1"),
            user_agent: String::new(),
            merchant: None,
        }
    }

    fn ctx_at(location: GeoPoint, minutes_ago: i64) -> UserContext {
        let mut ctx = UserContext::empty("U1");
        ctx.last_known_location = Some(location);
        ctx.last_transaction_at = Some(Utc::now() - Duration::minutes(minutes_ago));
        ctx
    }

    fn rule() -> ImpossibleTravelRule {
        ImpossibleTravelRule::new(500.0, Duration::hours(1))
    }

    #[tokio::test]
    async fn test_far_and_fast_triggers() {
        let tx = test_tx(Some(PARIS));
        let ctx = ctx_at(MADRID, 30);

        let violation = rule().evaluate(&tx, &ctx).await.unwrap().expect("should trigger");
        assert_eq!(violation.rule, "impossible_travel");
        assert_eq!(violation.risk, IMPOSSIBLE_TRAVEL_RISK);
    }

    #[tokio::test]
    async fn test_far_but_slow_quiet() {
        let tx = test_tx(Some(PARIS));
        let ctx = ctx_at(MADRID, 120);

        assert!(rule().evaluate(&tx, &ctx).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_near_and_fast_quiet() {
        let tx = test_tx(Some(TOLEDO));
        let ctx = ctx_at(MADRID, 10);

        assert!(rule().evaluate(&tx, &ctx).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_location_quiet() {
        let tx = test_tx(None);
        let ctx = ctx_at(MADRID, 10);
        assert!(rule().evaluate(&tx, &ctx).await.unwrap().is_none());

        let tx = test_tx(Some(PARIS));
        let ctx = UserContext::empty("U1");
        assert!(rule().evaluate(&tx, &ctx).await.unwrap().is_none());
    }
}
