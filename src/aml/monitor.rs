use chrono::Duration;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::domain::evidence::{FlagType, RiskFlag};
use crate::domain::policy::AmlParams;
use crate::domain::{Transaction, UserContext};

use super::watchlist::Watchlist;

/// Flag weights for the monitoring heuristics.
const STRUCTURING_RISK: f64 = 0.8;
const LAYERING_RISK: f64 = 0.9;
const PEP_RISK: f64 = 0.95;

/// Local AML monitoring over a transaction and the user's recent history.
///
/// Pure and synchronous: every heuristic reads only its inputs. Network
/// screening against external sanctions lists lives in the screener, not
/// here.
#[derive(Debug)]
pub struct AmlMonitor {
    params: AmlParams,
    watchlist: Arc<Watchlist>,
}

impl AmlMonitor {
    pub fn new(params: AmlParams, watchlist: Arc<Watchlist>) -> Self {
        AmlMonitor { params, watchlist }
    }

    /// The watchlist this monitor screens names against.
    pub fn watchlist(&self) -> Arc<Watchlist> {
        self.watchlist.clone()
    }

    /// Run all heuristics, returning every flag raised.
    pub fn monitor(&self, tx: &Transaction, ctx: &UserContext) -> Vec<RiskFlag> {
        let mut flags = Vec::new();

        if self.detect_structuring(tx, ctx) {
            flags.push(RiskFlag::new(
                FlagType::StructuredTransactions,
                STRUCTURING_RISK,
                format!(
                    "repeated transactions just under the {} reporting threshold",
                    self.params.ctr_threshold
                ),
            ));
        }

        if self.detect_layering(tx, ctx) {
            flags.push(RiskFlag::new(
                FlagType::Layering,
                LAYERING_RISK,
                "chained near-equal transfers obscure origin of funds",
            ));
        }

        if self.matches_watchlist(ctx) {
            flags.push(RiskFlag::new(
                FlagType::PepOrSanctioned,
                PEP_RISK,
                "user matches PEP or sanctions watchlist",
            ));
        }

        flags
    }

    /// Whether an amount sits in the band just under the reporting threshold.
    fn in_structuring_band(&self, amount: Decimal) -> bool {
        let ctr = self.params.ctr_threshold;
        let band = Decimal::from_f64(1.0 - self.params.structuring_band_pct)
            .unwrap_or(Decimal::new(9, 1));
        let floor = ctr * band;

        amount >= floor && amount < ctr
    }

    /// Structuring: enough just-under-threshold transactions inside the
    /// lookback window, counting the current one when it qualifies.
    fn detect_structuring(&self, tx: &Transaction, ctx: &UserContext) -> bool {
        let window = Duration::hours(self.params.structuring_window_hours);

        let mut count = ctx
            .txs_within(tx.occurred_at, window)
            .filter(|t| self.in_structuring_band(t.amount))
            .count();

        if self.in_structuring_band(tx.amount) {
            count += 1;
        }

        count >= self.params.structuring_count
    }

    /// Layering: consecutive transfers within the last hour that flip
    /// direction while keeping near-equal amounts. Enough such hops looks
    /// like money moving through the account rather than being spent.
    fn detect_layering(&self, tx: &Transaction, ctx: &UserContext) -> bool {
        let recent: Vec<_> = ctx.txs_within(tx.occurred_at, Duration::hours(1)).collect();
        if recent.len() < 2 {
            return false;
        }

        let tolerance = self.params.layering_amount_tolerance_pct;

        let mut hops = 0;
        for pair in recent.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.direction == b.direction {
                continue;
            }

            let larger = a.amount.max(b.amount);
            if larger.is_zero() {
                continue;
            }

            let diff = ((a.amount - b.amount).abs() / larger)
                .to_f64()
                .unwrap_or(1.0);
            if diff <= tolerance {
                hops += 1;
            }
        }

        hops >= self.params.layering_min_hops
    }

    fn matches_watchlist(&self, ctx: &UserContext) -> bool {
        ctx.full_name
            .as_deref()
            .map(|name| self.watchlist.contains(name))
            .unwrap_or(false)
    }
}
