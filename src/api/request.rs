use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::str::FromStr;

use crate::aml::ScreeningProfile;
use crate::domain::context::RecentTx;
use crate::domain::transaction::{Currency, DeviceId, GeoPoint, Merchant, TransactionId};
use crate::domain::{Transaction, UserContext, UserId};
use crate::error::EngineError;

/// Request for a fraud evaluation.
#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluateRequest {
    /// The proposed transaction
    pub transaction: TxRequest,

    /// Behavioral context for the user
    pub context: ContextRequest,
}

/// Transaction portion of the request.
#[derive(Debug, Serialize, Deserialize)]
pub struct TxRequest {
    /// Transaction identifier (generated when omitted)
    #[serde(default)]
    pub id: Option<String>,

    /// Amount as a string for precision
    pub amount: String,

    /// ISO 4217 currency code
    pub currency: String,

    /// When the transaction was initiated (defaults to now)
    #[serde(default)]
    pub occurred_at: Option<DateTime<Utc>>,

    /// Originating geolocation, when available
    #[serde(default)]
    pub location: Option<GeoPoint>,

    /// Originating device fingerprint
    pub device_id: String,

    /// Raw client user agent
    #[serde(default)]
    pub user_agent: String,

    /// Merchant details for card transactions
    #[serde(default)]
    pub merchant: Option<Merchant>,
}

/// Context portion of the request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContextRequest {
    pub user_id: String,

    #[serde(default)]
    pub full_name: Option<String>,

    /// Rolling average transaction amount, as a string
    #[serde(default)]
    pub avg_amount: Option<String>,

    #[serde(default)]
    pub recent_txs: Vec<RecentTx>,

    #[serde(default)]
    pub trusted_devices: Vec<String>,

    #[serde(default)]
    pub last_known_location: Option<GeoPoint>,

    #[serde(default)]
    pub last_transaction_at: Option<DateTime<Utc>>,
}

fn parse_amount(field: &str, raw: &str) -> Result<Decimal, EngineError> {
    Decimal::from_str(raw)
        .map_err(|_| EngineError::InvalidInput(format!("{field} is not a valid amount: {raw:?}")))
}

impl EvaluateRequest {
    /// Convert to domain types for evaluation.
    ///
    /// Parsing failures reject the request; structural validation happens
    /// in the engine.
    pub fn to_domain(&self) -> Result<(Transaction, UserContext), EngineError> {
        let tx = Transaction {
            id: self
                .transaction
                .id
                .as_ref()
                .map(TransactionId::from_string)
                .unwrap_or_default(),
            amount: parse_amount("transaction.amount", &self.transaction.amount)?,
            currency: Currency::new(&self.transaction.currency),
            occurred_at: self.transaction.occurred_at.unwrap_or_else(Utc::now),
            location: self.transaction.location,
            device_id: DeviceId::new(&self.transaction.device_id),
            user_agent: self.transaction.user_agent.clone(),
            merchant: self.transaction.merchant.clone(),
        };

        let avg_amount = match &self.context.avg_amount {
            Some(raw) => parse_amount("context.avg_amount", raw)?,
            None => Decimal::ZERO,
        };

        let trusted_devices: SmallVec<[DeviceId; 4]> = self
            .context
            .trusted_devices
            .iter()
            .map(DeviceId::new)
            .collect();

        let ctx = UserContext {
            user_id: UserId::new(&self.context.user_id),
            full_name: self.context.full_name.clone(),
            avg_amount,
            recent_txs: self.context.recent_txs.clone(),
            trusted_devices,
            last_known_location: self.context.last_known_location,
            last_transaction_at: self.context.last_transaction_at,
        };

        Ok((tx, ctx))
    }
}

/// Request for a sanctions screening.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScreenRequest {
    pub user_id: String,
    pub full_name: String,

    #[serde(default)]
    pub country: Option<String>,
}

impl ScreenRequest {
    pub fn to_profile(&self) -> ScreeningProfile {
        ScreeningProfile {
            user_id: self.user_id.clone(),
            full_name: self.full_name.clone(),
            country: self.country.clone(),
        }
    }
}
