use serde::Serialize;

use crate::aml::ScreeningResult;
use crate::domain::Decision;

/// Response from a fraud evaluation.
#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    #[serde(flatten)]
    pub decision: Decision,

    /// Server-side evaluation latency
    pub latency_ms: u32,
}

impl DecisionResponse {
    pub fn new(decision: Decision, latency_ms: u32) -> Self {
        DecisionResponse {
            decision,
            latency_ms,
        }
    }
}

/// Response from a sanctions screening.
#[derive(Debug, Serialize)]
pub struct ScreenResponse {
    #[serde(flatten)]
    pub result: ScreeningResult,

    pub latency_ms: u32,
}

impl ScreenResponse {
    pub fn new(result: ScreeningResult, latency_ms: u32) -> Self {
        ScreenResponse { result, latency_ms }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub policy_version: String,
    pub uptime_secs: u64,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub policy_version: String,
    pub rules_loaded: usize,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        ErrorResponse {
            error: error.into(),
            code: code.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ErrorResponse::new(message, "BAD_REQUEST")
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        ErrorResponse::new(message, "INTERNAL_ERROR")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Action, RiskLevel, TransactionId};
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_decision_response_serialization() {
        let decision = Decision {
            decision_id: Uuid::new_v4(),
            transaction_id: TransactionId::from_string("T1"),
            risk_score: 0.72,
            risk_level: RiskLevel::High,
            violations: vec![],
            flags: vec![],
            action: Action::Block,
            hold_funds: false,
            reporting_required: false,
            confidence: 1.0,
            policy_version: "v1".to_string(),
            decided_at: Utc::now(),
        };

        let json = serde_json::to_string(&DecisionResponse::new(decision, 3)).unwrap();

        assert!(json.contains("\"action\":\"block\""));
        assert!(json.contains("\"risk_level\":\"high\""));
        assert!(json.contains("\"latency_ms\":3"));
        assert!(json.contains("\"policy_version\":\"v1\""));
    }

    #[test]
    fn test_error_response() {
        let resp = ErrorResponse::bad_request("amount is not a valid amount");

        assert_eq!(resp.code, "BAD_REQUEST");
        assert!(resp.error.contains("amount"));
    }
}
