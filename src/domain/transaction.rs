use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;

/// Unique transaction identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub String);

impl TransactionId {
    pub fn new() -> Self {
        TransactionId(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        TransactionId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        TransactionId::new()
    }
}

/// Device fingerprint identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        DeviceId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// ISO 4217 currency code, normalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    pub fn new(code: impl Into<String>) -> Self {
        Currency(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A code is well-formed when it is exactly three ASCII letters.
    pub fn is_valid(&self) -> bool {
        self.0.len() == 3 && self.0.chars().all(|c| c.is_ascii_alphabetic())
    }
}

/// Mean radius of the Earth in kilometers, used by the haversine formula.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Geographic coordinate (WGS84 degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        GeoPoint { lat, lon }
    }

    /// Great-circle distance to another point in kilometers (haversine).
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }

    /// Coordinates must lie within valid WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Merchant information attached to a card/payment transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Merchant {
    pub name: String,

    /// Merchant category code, when the network supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_code: Option<String>,
}

/// A proposed transaction under evaluation.
///
/// Immutable once created; produced by the upstream payment-initiation
/// service and never modified by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction identifier
    pub id: TransactionId,

    /// Transaction amount (must be strictly positive)
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,

    /// ISO 4217 currency code
    pub currency: Currency,

    /// When the transaction was initiated
    pub occurred_at: DateTime<Utc>,

    /// Where the transaction was initiated, when geolocation is available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,

    /// Originating device fingerprint
    pub device_id: DeviceId,

    /// Raw user agent string from the originating client
    #[serde(default)]
    pub user_agent: String,

    /// Merchant details for card transactions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<Merchant>,
}

impl Transaction {
    /// Validate structural invariants before evaluation.
    ///
    /// Invalid input rejects the whole evaluation; nothing is coerced.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.amount <= Decimal::ZERO {
            return Err(EngineError::InvalidInput(format!(
                "transaction amount must be positive, got {}",
                self.amount
            )));
        }

        if !self.currency.is_valid() {
            return Err(EngineError::InvalidInput(format!(
                "invalid currency code: {:?}",
                self.currency.as_str()
            )));
        }

        if let Some(loc) = &self.location {
            if !loc.is_valid() {
                return Err(EngineError::InvalidInput(format!(
                    "location out of range: lat={} lon={}",
                    loc.lat, loc.lon
                )));
            }
        }

        if self.device_id.as_str().is_empty() {
            return Err(EngineError::InvalidInput("device_id is empty".to_string()));
        }

        Ok(())
    }
}
