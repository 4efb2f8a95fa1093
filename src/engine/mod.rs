pub mod decide;
pub mod evaluator;

pub use decide::{decide, Verdict};
pub use evaluator::{Evaluation, Evaluator};

use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tracing::{info, warn};
use uuid::Uuid;

use crate::aml::{Screener, ScreeningProfile, ScreeningResult};
use crate::audit::{AuditSink, DecisionRecord, SarRecord, ScreeningRecord};
use crate::domain::{Decision, Transaction, UserContext};
use crate::error::EngineError;
use crate::observability::MetricsRegistry;
use crate::rules::RuleSet;
use crate::scoring::{self, SubScores};

/// Confidence floor; even a degraded evaluation keeps half confidence.
const MIN_CONFIDENCE: f64 = 0.5;

/// Confidence penalty per failed check.
const CONFIDENCE_PENALTY: f64 = 0.1;

/// The transaction risk decision pipeline.
///
/// Explicitly constructed by the composition root and shared by handle;
/// holds no global state. The rule set arrives through a watch channel so
/// policy reloads swap rules without touching in-flight evaluations.
pub struct RiskEngine {
    ruleset_rx: watch::Receiver<Arc<RuleSet>>,
    screener: Screener,
    audit: Arc<dyn AuditSink>,
    metrics: Arc<MetricsRegistry>,
}

impl RiskEngine {
    pub fn new(
        ruleset_rx: watch::Receiver<Arc<RuleSet>>,
        screener: Screener,
        audit: Arc<dyn AuditSink>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        RiskEngine {
            ruleset_rx,
            screener,
            audit,
            metrics,
        }
    }

    /// Current policy version.
    pub fn policy_version(&self) -> String {
        self.ruleset_rx.borrow().version().to_string()
    }

    /// Evaluate a proposed transaction and produce a Decision.
    ///
    /// One-shot, non-cancellable unit of work: validates inputs, runs the
    /// fraud rules concurrently, applies the AML monitoring heuristics,
    /// scores, decides, and records the audit trail. Audit failures are
    /// logged but never fail the evaluation.
    pub async fn evaluate(
        &self,
        tx: &Transaction,
        ctx: &UserContext,
    ) -> Result<Decision, EngineError> {
        let start = Instant::now();

        tx.validate()?;
        ctx.validate()?;

        let ruleset = self.ruleset_rx.borrow().clone();

        let evaluation = Evaluator::evaluate(&ruleset.rules, tx, ctx).await;
        let flags = ruleset.monitor.monitor(tx, ctx);

        let sub_scores = SubScores::from_violations(&evaluation.violations);
        let risk_score = scoring::composite_score(&sub_scores, &ruleset.policy.weights);
        let risk_level = scoring::risk_level(risk_score, &ruleset.policy.levels);

        let verdict = decide(risk_score, &flags, &ruleset.policy);

        let confidence = (1.0 - CONFIDENCE_PENALTY * evaluation.rules_failed as f64)
            .clamp(MIN_CONFIDENCE, 1.0);

        let decision = Decision {
            decision_id: Uuid::new_v4(),
            transaction_id: tx.id.clone(),
            risk_score,
            risk_level,
            violations: evaluation.violations,
            flags,
            action: verdict.action,
            hold_funds: verdict.hold_funds,
            reporting_required: verdict.reporting_required,
            confidence,
            policy_version: ruleset.version().to_string(),
            decided_at: Utc::now(),
        };

        self.metrics.record_decision(&decision.action);
        self.metrics.record_rules(
            evaluation.rules_total,
            decision.violations.len(),
            evaluation.rules_failed,
        );

        let latency_ms = start.elapsed().as_millis() as u32;

        if let Err(e) = self
            .audit
            .record_decision(&DecisionRecord {
                decision: decision.clone(),
                latency_ms,
                recorded_at: Utc::now(),
            })
            .await
        {
            warn!(
                transaction_id = tx.id.as_str(),
                error = %e,
                "failed to record decision audit entry"
            );
        }

        if decision.reporting_required {
            self.metrics.record_sar();
            if let Err(e) = self
                .audit
                .record_sar(&SarRecord {
                    user_id: ctx.user_id.as_str().to_string(),
                    transaction_id: tx.id.clone(),
                    flags: decision.flags.clone(),
                    risk_score: decision.risk_score,
                    created_at: Utc::now(),
                })
                .await
            {
                warn!(
                    transaction_id = tx.id.as_str(),
                    error = %e,
                    "failed to record SAR trigger"
                );
            }
        }

        self.metrics.record_latency(start);

        info!(
            transaction_id = tx.id.as_str(),
            user_id = ctx.user_id.as_str(),
            action = %decision.action,
            risk_score = decision.risk_score,
            latency_ms,
            "decision completed"
        );

        Ok(decision)
    }

    /// Screen an identity against all configured sanctions lists.
    pub async fn screen(&self, profile: &ScreeningProfile) -> Result<ScreeningResult, EngineError> {
        let result = self.screener.screen(profile).await?;

        self.metrics
            .record_screening(result.requires_block, result.degraded.len());

        if let Err(e) = self
            .audit
            .record_screening(&ScreeningRecord {
                user_id: profile.user_id.clone(),
                result: result.clone(),
                recorded_at: Utc::now(),
            })
            .await
        {
            warn!(user_id = %profile.user_id, error = %e, "failed to record screening audit entry");
        }

        Ok(result)
    }
}
