use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Weights for the four composite sub-scores.
///
/// Must sum to 1.0; each sub-score is clamped to [0,1] before weighting so
/// the composite is guaranteed to land in [0,1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub behavioral: f64,
    pub transactional: f64,
    pub technical: f64,
    pub geographic: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            behavioral: 0.4,
            transactional: 0.3,
            technical: 0.2,
            geographic: 0.1,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.behavioral + self.transactional + self.technical + self.geographic
    }
}

/// Cut points mapping the composite score to a risk band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LevelCuts {
    /// Score above this is at least medium
    pub medium: f64,
    /// Score above this is at least high
    pub high: f64,
    /// Score above this is critical
    pub critical: f64,
}

impl Default for LevelCuts {
    fn default() -> Self {
        LevelCuts {
            medium: 0.3,
            high: 0.6,
            critical: 0.8,
        }
    }
}

/// Tunable parameters for the fraud rule library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleParams {
    /// Amount must exceed the rolling average by this factor to be unusual
    #[serde(default = "default_unusual_multiplier")]
    pub unusual_amount_multiplier: Decimal,

    /// Round amounts are suspicious when divisible by this
    #[serde(default = "default_round_modulus")]
    pub round_amount_modulus: Decimal,

    /// ...and larger than this
    #[serde(default = "default_round_min")]
    pub round_amount_min: Decimal,

    /// Transactions in the last hour beyond this count indicate rapid succession
    #[serde(default = "default_rapid_count")]
    pub rapid_succession_count: usize,

    /// Minimum distance for the impossible-travel rule, in km
    #[serde(default = "default_travel_km")]
    pub impossible_travel_km: f64,

    /// Maximum elapsed time for the impossible-travel rule, in seconds
    #[serde(default = "default_travel_window_secs")]
    pub impossible_travel_window_secs: i64,

    /// Substrings that mark a user agent as automated/suspicious
    #[serde(default = "default_suspicious_agents")]
    pub suspicious_agents: Vec<String>,
}

fn default_unusual_multiplier() -> Decimal {
    Decimal::new(3, 0)
}

fn default_round_modulus() -> Decimal {
    Decimal::new(1000, 0)
}

fn default_round_min() -> Decimal {
    Decimal::new(5000, 0)
}

fn default_rapid_count() -> usize {
    5
}

fn default_travel_km() -> f64 {
    500.0
}

fn default_travel_window_secs() -> i64 {
    3600
}

fn default_suspicious_agents() -> Vec<String> {
    ["curl", "python-requests", "headless", "phantomjs", "selenium", "bot"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for RuleParams {
    fn default() -> Self {
        RuleParams {
            unusual_amount_multiplier: default_unusual_multiplier(),
            round_amount_modulus: default_round_modulus(),
            round_amount_min: default_round_min(),
            rapid_succession_count: default_rapid_count(),
            impossible_travel_km: default_travel_km(),
            impossible_travel_window_secs: default_travel_window_secs(),
            suspicious_agents: default_suspicious_agents(),
        }
    }
}

/// Tunable parameters for the AML monitoring heuristics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmlParams {
    /// Currency transaction report threshold (USD)
    #[serde(default = "default_ctr_threshold")]
    pub ctr_threshold: Decimal,

    /// Fraction under the CTR threshold that counts as "just under"
    #[serde(default = "default_structuring_band")]
    pub structuring_band_pct: f64,

    /// Transactions in the band required to flag structuring
    #[serde(default = "default_structuring_count")]
    pub structuring_count: usize,

    /// Lookback window for structuring, in hours
    #[serde(default = "default_structuring_window")]
    pub structuring_window_hours: i64,

    /// Direction alternations required to flag layering
    #[serde(default = "default_layering_hops")]
    pub layering_min_hops: usize,

    /// Amount tolerance between chained transfers, as a fraction
    #[serde(default = "default_layering_tolerance")]
    pub layering_amount_tolerance_pct: f64,
}

fn default_ctr_threshold() -> Decimal {
    Decimal::new(10000, 0)
}

fn default_structuring_band() -> f64 {
    0.1
}

fn default_structuring_count() -> usize {
    3
}

fn default_structuring_window() -> i64 {
    24
}

fn default_layering_hops() -> usize {
    4
}

fn default_layering_tolerance() -> f64 {
    0.05
}

impl Default for AmlParams {
    fn default() -> Self {
        AmlParams {
            ctr_threshold: default_ctr_threshold(),
            structuring_band_pct: default_structuring_band(),
            structuring_count: default_structuring_count(),
            structuring_window_hours: default_structuring_window(),
            layering_min_hops: default_layering_hops(),
            layering_amount_tolerance_pct: default_layering_tolerance(),
        }
    }
}

/// Risk policy: every threshold the decision pipeline depends on.
///
/// Loaded from YAML at startup and hot-reloaded on version change. Nothing
/// in here is compiled-in; tuning never requires a redeploy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskPolicy {
    /// Policy version identifier
    #[serde(rename = "policy_version")]
    pub version: String,

    #[serde(default)]
    pub weights: ScoreWeights,

    #[serde(default)]
    pub levels: LevelCuts,

    /// Composite score above this blocks the transaction
    #[serde(default = "default_block_threshold")]
    pub block_threshold: f64,

    /// AML risk at or above this triggers the stricter auto-block
    #[serde(default = "default_aml_block_threshold")]
    pub aml_block_threshold: f64,

    /// Any flag at or above this holds funds
    #[serde(default = "default_hold_threshold")]
    pub hold_threshold: f64,

    /// Any flag at or above this requires a suspicious activity report
    #[serde(default = "default_sar_threshold")]
    pub sar_threshold: f64,

    #[serde(default)]
    pub rules: RuleParams,

    #[serde(default)]
    pub aml: AmlParams,
}

fn default_block_threshold() -> f64 {
    0.6
}

fn default_aml_block_threshold() -> f64 {
    0.9
}

fn default_hold_threshold() -> f64 {
    0.85
}

fn default_sar_threshold() -> f64 {
    0.8
}

impl RiskPolicy {
    /// Policy with defaults and the given version.
    pub fn with_defaults(version: impl Into<String>) -> Self {
        RiskPolicy {
            version: version.into(),
            weights: ScoreWeights::default(),
            levels: LevelCuts::default(),
            block_threshold: default_block_threshold(),
            aml_block_threshold: default_aml_block_threshold(),
            hold_threshold: default_hold_threshold(),
            sar_threshold: default_sar_threshold(),
            rules: RuleParams::default(),
            aml: AmlParams::default(),
        }
    }

    /// Validate the policy. Called at load time so a broken policy fails
    /// at startup rather than per-request.
    pub fn validate(&self) -> Result<(), String> {
        if self.version.is_empty() {
            return Err("policy version cannot be empty".to_string());
        }

        let sum = self.weights.sum();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(format!("score weights must sum to 1.0, got {sum}"));
        }

        for (name, w) in [
            ("behavioral", self.weights.behavioral),
            ("transactional", self.weights.transactional),
            ("technical", self.weights.technical),
            ("geographic", self.weights.geographic),
        ] {
            if !(0.0..=1.0).contains(&w) {
                return Err(format!("weight {name} out of range: {w}"));
            }
        }

        let LevelCuts { medium, high, critical } = self.levels;
        if !(0.0 < medium && medium < high && high < critical && critical < 1.0) {
            return Err(format!(
                "level cuts must be ascending within (0,1): medium={medium} high={high} critical={critical}"
            ));
        }

        for (name, t) in [
            ("block_threshold", self.block_threshold),
            ("aml_block_threshold", self.aml_block_threshold),
            ("hold_threshold", self.hold_threshold),
            ("sar_threshold", self.sar_threshold),
        ] {
            if !(0.0..=1.0).contains(&t) {
                return Err(format!("{name} out of range: {t}"));
            }
        }

        if self.rules.unusual_amount_multiplier <= Decimal::ZERO {
            return Err("unusual_amount_multiplier must be positive".to_string());
        }

        if self.aml.ctr_threshold <= Decimal::ZERO {
            return Err("ctr_threshold must be positive".to_string());
        }

        if !(0.0..1.0).contains(&self.aml.structuring_band_pct) {
            return Err(format!(
                "structuring_band_pct out of range: {}",
                self.aml.structuring_band_pct
            ));
        }

        Ok(())
    }
}
