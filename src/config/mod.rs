use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Fraud engine configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "fraudr")]
#[command(about = "Transaction fraud and AML decision engine")]
pub struct Config {
    /// HTTP server listen address
    #[arg(long, default_value = "0.0.0.0:8080", env = "FRAUDR_LISTEN_ADDR")]
    pub listen_addr: String,

    /// Path to risk policy YAML file
    #[arg(long, default_value = "policy.yaml", env = "FRAUDR_POLICY_PATH")]
    pub policy_path: PathBuf,

    /// Path to sanctions/PEP watchlist file
    #[arg(long, default_value = "watchlist.txt", env = "FRAUDR_WATCHLIST_PATH")]
    pub watchlist_path: PathBuf,

    /// Policy reload check interval in seconds
    #[arg(long, default_value = "30", env = "FRAUDR_POLICY_RELOAD_SECS")]
    pub policy_reload_secs: u64,

    /// Per-list timeout for sanctions screening, in milliseconds
    #[arg(long, default_value = "2000", env = "FRAUDR_SANCTIONS_TIMEOUT_MS")]
    pub sanctions_timeout_ms: u64,

    /// Retry attempts per sanctions list
    #[arg(long, default_value = "3", env = "FRAUDR_SANCTIONS_RETRY_ATTEMPTS")]
    pub sanctions_retry_attempts: u32,

    /// Base retry delay for sanctions screening, in milliseconds
    #[arg(long, default_value = "250", env = "FRAUDR_SANCTIONS_RETRY_BASE_MS")]
    pub sanctions_retry_base_ms: u64,

    /// Latency budget in milliseconds for the decision endpoint
    #[arg(long, default_value = "100", env = "FRAUDR_LATENCY_BUDGET_MS")]
    pub latency_budget_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Enable graceful shutdown
    #[arg(long, default_value = "true", env = "FRAUDR_GRACEFUL_SHUTDOWN")]
    pub graceful_shutdown: bool,

    /// Graceful shutdown timeout in seconds
    #[arg(long, default_value = "30", env = "FRAUDR_SHUTDOWN_TIMEOUT_SECS")]
    pub shutdown_timeout_secs: u64,
}

impl Config {
    /// Get policy reload interval as Duration.
    pub fn policy_reload_interval(&self) -> Duration {
        Duration::from_secs(self.policy_reload_secs)
    }

    /// Get per-list sanctions timeout as Duration.
    pub fn sanctions_timeout(&self) -> Duration {
        Duration::from_millis(self.sanctions_timeout_ms)
    }

    /// Get base sanctions retry delay as Duration.
    pub fn sanctions_retry_base(&self) -> Duration {
        Duration::from_millis(self.sanctions_retry_base_ms)
    }

    /// Get shutdown timeout as Duration.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen_addr: "0.0.0.0:8080".to_string(),
            policy_path: PathBuf::from("policy.yaml"),
            watchlist_path: PathBuf::from("watchlist.txt"),
            policy_reload_secs: 30,
            sanctions_timeout_ms: 2000,
            sanctions_retry_attempts: 3,
            sanctions_retry_base_ms: 250,
            latency_budget_ms: 100,
            log_level: "info".to_string(),
            graceful_shutdown: true,
            shutdown_timeout_secs: 30,
        }
    }
}
