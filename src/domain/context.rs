use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::domain::transaction::{DeviceId, GeoPoint};
use crate::error::EngineError;

/// Unique user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Direction of a settled transfer from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

/// A settled transaction in the user's recent history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentTx {
    pub occurred_at: DateTime<Utc>,

    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,

    pub direction: Direction,
}

impl RecentTx {
    pub fn new(occurred_at: DateTime<Utc>, amount: Decimal, direction: Direction) -> Self {
        RecentTx {
            occurred_at,
            amount,
            direction,
        }
    }
}

/// Behavioral context for the user, supplied by the account subsystem.
///
/// Read-only input to the pipeline. The rolling aggregates are maintained
/// in the settlement path, which is outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: UserId,

    /// Legal name, used for watchlist screening when present
    #[serde(default)]
    pub full_name: Option<String>,

    /// Rolling average transaction amount
    #[serde(with = "rust_decimal::serde::str")]
    pub avg_amount: Decimal,

    /// Bounded recent-transaction window, newest last
    #[serde(default)]
    pub recent_txs: Vec<RecentTx>,

    /// Devices the user has previously verified
    /// SmallVec optimizes for the common case of 1-4 devices
    #[serde(default)]
    pub trusted_devices: SmallVec<[DeviceId; 4]>,

    /// Last location an accepted transaction originated from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_known_location: Option<GeoPoint>,

    /// When the user's previous transaction occurred
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transaction_at: Option<DateTime<Utc>>,
}

impl UserContext {
    /// Minimal empty context for a user with no history.
    pub fn empty(user_id: impl Into<String>) -> Self {
        UserContext {
            user_id: UserId::new(user_id),
            full_name: None,
            avg_amount: Decimal::ZERO,
            recent_txs: Vec::new(),
            trusted_devices: SmallVec::new(),
            last_known_location: None,
            last_transaction_at: None,
        }
    }

    /// Validate structural invariants before evaluation.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.user_id.as_str().is_empty() {
            return Err(EngineError::InvalidInput("user_id is empty".to_string()));
        }

        if self.avg_amount < Decimal::ZERO {
            return Err(EngineError::InvalidInput(format!(
                "avg_amount must be non-negative, got {}",
                self.avg_amount
            )));
        }

        if let Some(loc) = &self.last_known_location {
            if !loc.is_valid() {
                return Err(EngineError::InvalidInput(format!(
                    "last_known_location out of range: lat={} lon={}",
                    loc.lat, loc.lon
                )));
            }
        }

        Ok(())
    }

    /// Transactions within the window ending at `now`.
    pub fn txs_within(&self, now: DateTime<Utc>, window: Duration) -> impl Iterator<Item = &RecentTx> {
        let cutoff = now - window;
        self.recent_txs.iter().filter(move |t| t.occurred_at > cutoff)
    }

    /// Number of transactions in the hour preceding `now`.
    pub fn count_last_hour(&self, now: DateTime<Utc>) -> usize {
        self.txs_within(now, Duration::hours(1)).count()
    }

    /// Whether the given device has been verified by the user.
    pub fn is_trusted_device(&self, device: &DeviceId) -> bool {
        self.trusted_devices.iter().any(|d| d == device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_empty_context() {
        let ctx = UserContext::empty("U1");
        assert!(ctx.validate().is_ok());
        assert_eq!(ctx.count_last_hour(Utc::now()), 0);
        assert!(!ctx.is_trusted_device(&DeviceId::new("dev-1")));
    }

    #[test]
    fn test_validate_rejects_negative_average() {
        let mut ctx = UserContext::empty("U1");
        ctx.avg_amount = Decimal::new(-1, 0);
        assert!(ctx.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_user() {
        let ctx = UserContext::empty("");
        assert!(ctx.validate().is_err());
    }

    #[test]
    fn test_count_last_hour() {
        let now = Utc::now();
        let mut ctx = UserContext::empty("U1");
        ctx.recent_txs = vec![
            RecentTx::new(now - Duration::minutes(10), Decimal::new(100, 0), Direction::Outbound),
            RecentTx::new(now - Duration::minutes(50), Decimal::new(200, 0), Direction::Outbound),
            RecentTx::new(now - Duration::hours(2), Decimal::new(300, 0), Direction::Inbound),
        ];

        assert_eq!(ctx.count_last_hour(now), 2);
    }

    #[test]
    fn test_trusted_devices() {
        let mut ctx = UserContext::empty("U1");
        ctx.trusted_devices = smallvec![DeviceId::new("dev-1"), DeviceId::new("dev-2")];

        assert!(ctx.is_trusted_device(&DeviceId::new("dev-1")));
        assert!(!ctx.is_trusted_device(&DeviceId::new("dev-9")));
    }
}
