//! People service — person records enriched with age, gender, and
//! nationality guesses.

use std::sync::Arc;

use people_core::ServiceConfig;
use people_server::{build_router, AppState};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--help" | "-h" | "help" => {
                println!("People service — enriched person records over HTTP");
                println!();
                println!("Usage: people");
                println!();
                println!("Environment:");
                println!("  PORT              HTTP port (default 8080)");
                println!("  LOG_LEVEL         Log filter when RUST_LOG is unset (default info)");
                println!("  DATABASE_PATH     SQLite file (default data/people.db)");
                println!("  AGIFY_URL         Age prediction endpoint");
                println!("  GENDERIZE_URL     Gender prediction endpoint");
                println!("  NATIONALIZE_URL   Nationality prediction endpoint");
                println!();
                println!("Variables may also be set in a .env file in the working directory.");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown argument: {}. Use 'people help' for usage.", arg);
                std::process::exit(1);
            }
        }
    }

    // A missing .env file is fine; real environment variables win.
    dotenv::dotenv().ok();
    let config = ServiceConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("Database: {}", config.database_path.display());

    // Build application state
    let state = Arc::new(AppState::from_config(config)?);
    let app = build_router(state.clone());

    // Start server
    let addr = format!("0.0.0.0:{}", state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("People service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state.shutdown_token()))
        .await?;

    info!("People service stopped");
    Ok(())
}

/// Wait for Ctrl-C or SIGTERM, then cancel every in-flight request context.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
    token.cancel();
}
