//! escala-server: shift swap request API
//!
//! Long-running service that:
//! - Authenticates administrators and encarregados (JWT)
//! - Stores swap/substitution requests in SQLite
//! - Records an audit trail of every mutating action

use escala_server::{AppState, BoxError, Config, create_router, init_logger};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    init_logger(config.is_production());

    tracing::info!(
        environment = %config.environment,
        timezone = %config.business_tz,
        "Starting escala-server"
    );

    let port = config.port;
    let state = AppState::new(config).await?;
    let app = create_router(state.clone());

    // Periodic rate limiter cleanup (every 5 minutes)
    let rate_limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            rate_limiter.cleanup().await;
        }
    });

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("escala-server listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    state.pool.close().await;
    tracing::info!("escala-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
