use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aml::ScreeningResult;
use crate::domain::evidence::RiskFlag;
use crate::domain::{Decision, TransactionId};

/// Audit record for a completed decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub decision: Decision,
    pub latency_ms: u32,
    pub recorded_at: DateTime<Utc>,
}

/// Audit record for a sanctions screening.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningRecord {
    pub user_id: String,
    pub result: ScreeningResult,
    pub recorded_at: DateTime<Utc>,
}

/// Suspicious activity report trigger.
///
/// Written whenever a decision requires reporting; downstream compliance
/// tooling files the actual SAR from these records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SarRecord {
    pub user_id: String,
    pub transaction_id: TransactionId,
    pub flags: Vec<RiskFlag>,
    pub risk_score: f64,
    pub created_at: DateTime<Utc>,
}

/// Persistence seam for the audit trail.
///
/// The engine records through this trait and never blocks a decision on a
/// failed write; persistence proper belongs to an external collaborator.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record_decision(&self, record: &DecisionRecord) -> anyhow::Result<Uuid>;
    async fn record_screening(&self, record: &ScreeningRecord) -> anyhow::Result<Uuid>;
    async fn record_sar(&self, record: &SarRecord) -> anyhow::Result<Uuid>;
}

/// In-memory audit sink, used in tests and as the default standalone sink.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    decisions: Mutex<Vec<DecisionRecord>>,
    screenings: Mutex<Vec<ScreeningRecord>>,
    sars: Mutex<Vec<SarRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded decisions (for assertions).
    pub fn decisions(&self) -> Vec<DecisionRecord> {
        self.decisions.lock().clone()
    }

    /// Recorded screenings (for assertions).
    pub fn screenings(&self) -> Vec<ScreeningRecord> {
        self.screenings.lock().clone()
    }

    /// Recorded SAR triggers (for assertions).
    pub fn sars(&self) -> Vec<SarRecord> {
        self.sars.lock().clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record_decision(&self, record: &DecisionRecord) -> anyhow::Result<Uuid> {
        self.decisions.lock().push(record.clone());
        Ok(Uuid::new_v4())
    }

    async fn record_screening(&self, record: &ScreeningRecord) -> anyhow::Result<Uuid> {
        self.screenings.lock().push(record.clone());
        Ok(Uuid::new_v4())
    }

    async fn record_sar(&self, record: &SarRecord) -> anyhow::Result<Uuid> {
        self.sars.lock().push(record.clone());
        Ok(Uuid::new_v4())
    }
}
