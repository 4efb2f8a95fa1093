//! Tracing setup and the Prometheus-exported metrics registry.

pub mod metrics;
pub mod tracing;

pub use metrics::MetricsRegistry;
pub use tracing::init_tracing;
