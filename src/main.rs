use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tokio::signal;
use tracing::info;

use fraudr::aml::{SanctionsList, Screener, WatchlistSanctionsList};
use fraudr::api::routes::{create_router, AppState};
use fraudr::audit::MemoryAuditSink;
use fraudr::config::Config;
use fraudr::engine::RiskEngine;
use fraudr::observability::{init_tracing, MetricsRegistry};
use fraudr::policy::{PolicyLoader, PolicyWatcher};
use fraudr::rules::RuleSet;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse configuration
    let config = Config::parse();

    // Initialize tracing
    init_tracing(&config.log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting fraudr decision engine"
    );

    // Load initial policy and watchlist; a broken policy fails startup
    let loader = PolicyLoader::new(
        config.policy_path.to_string_lossy(),
        config.watchlist_path.to_string_lossy(),
    );
    let (policy, ruleset) = loader.load()?;
    info!(
        version = %policy.version,
        rules = ruleset.rule_count(),
        "Loaded initial policy"
    );

    let metrics = Arc::new(MetricsRegistry::new());

    // Start policy watcher for hot reloads
    let watchlist = ruleset.monitor.watchlist();
    let initial_ruleset: Arc<RuleSet> = Arc::new(ruleset);
    let watcher = PolicyWatcher::new(loader, config.policy_reload_interval(), metrics.clone());
    let (ruleset_rx, policy_handle) = watcher.start(initial_ruleset);

    // All four lists screen against the consolidated watchlist file;
    // external providers plug in through the SanctionsList trait
    let lists: Vec<Arc<dyn SanctionsList>> = ["OFAC", "EU", "UN", "PEP"]
        .iter()
        .map(|name| {
            Arc::new(WatchlistSanctionsList::new(*name, watchlist.clone())) as Arc<dyn SanctionsList>
        })
        .collect();

    let screener = Screener::new(lists, config.sanctions_timeout())
        .with_retry(config.sanctions_retry_attempts, config.sanctions_retry_base());

    let audit = Arc::new(MemoryAuditSink::new());

    let engine = Arc::new(RiskEngine::new(
        ruleset_rx.clone(),
        screener,
        audit,
        metrics.clone(),
    ));

    // Create application state
    let state = Arc::new(AppState {
        engine,
        ruleset_rx,
        metrics,
        start_time: Instant::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        latency_budget_ms: config.latency_budget_ms,
    });

    // Create router
    let app = create_router(state);

    // Parse listen address
    let addr: SocketAddr = config.listen_addr.parse()?;

    info!(addr = %addr, "Starting HTTP server");

    // Create TCP listener
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run server with graceful shutdown
    if config.graceful_shutdown {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    } else {
        axum::serve(listener, app).await?;
    }

    // Cleanup
    info!("Shutting down...");
    policy_handle.abort();

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received shutdown signal");
}
