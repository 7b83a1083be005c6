//! Leadline lead intake service.
//!
//! Main entry point. Loads configuration, binds the store for the active
//! environment and serves the endpoint until shutdown.

use anyhow::{Context, Result};
use leadline_api::{AppState, Config, Pipeline, PipelineSettings, StoreBinding};
use leadline_core::PgLeadStore;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    init_tracing(&config.log_filter())?;

    let environment = config.active_environment();
    info!(
        environment = %environment,
        leads_table = %config.leads_table,
        store_timeout_ms = config.store_timeout_ms,
        "Configuration loaded"
    );

    let store = bind_store(&config);
    let settings = PipelineSettings {
        leads_table: config.leads_table.clone(),
        store_timeout: config.store_timeout(),
    };
    let state = AppState::new(Pipeline::new(store, settings));

    let addr = config.parse_server_addr()?;
    info!(addr = %addr, "Leadline is ready to receive leads");

    if let Err(e) = leadline_api::start_server(state, addr, config.request_timeout()).await {
        error!(error = %e, "Server failed");
        return Err(e).context("HTTP server terminated with an error");
    }

    info!("Leadline shutdown complete");
    Ok(())
}

/// Initializes tracing with the configured filter.
fn init_tracing(filter: &str) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_new(filter).context("Invalid log filter")?;

    let fmt_layer = fmt::layer().with_target(true).with_file(true).with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// Binds the PostgreSQL store for the active profile.
///
/// The pool connects lazily, so an unreachable database surfaces per
/// request as an insert error instead of blocking startup. Without a
/// profile the service still starts and answers lead requests with the
/// configuration error.
fn bind_store(config: &Config) -> StoreBinding {
    let environment = config.active_environment();

    let Some(profile) = config.active_profile() else {
        error!(environment = %environment, "No database profile for active environment");
        return StoreBinding::Unconfigured { environment };
    };

    info!(database = %profile.masked(), "Database profile selected");

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(config.store_timeout())
        .connect_lazy_with(profile.connect_options());

    StoreBinding::ready(PgLeadStore::new(pool))
}
