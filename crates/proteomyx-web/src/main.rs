//! Proteomyx Web Server
//!
//! Run with: cargo run -p proteomyx-web

use proteomyx_config::Config;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .init();

    info!("🧬 Proteomyx starting up...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let addr = config.bind_address();
    let state = proteomyx_web::state::AppState::new(config)?;
    info!(
        environment = ?state.config.environment,
        expansion_service = %state.expansion.service_url(),
        max_sessions = state.config.session.max_sessions,
        idle_ttl_secs = state.config.session.idle_ttl_secs,
        "Configuration loaded"
    );
    let _sweeper = state.sessions.spawn_sweeper();

    let app = proteomyx_web::router::build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Proteomyx stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
