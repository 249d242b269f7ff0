//! Mafia game room server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin mafia-server
//! cargo run --bin mafia-server -- --port 5050 --stats-endpoint http://localhost:8000/games
//! ```

use clap::Parser;
use mafia::logging;
use mafia::prelude::*;

#[tokio::main]
async fn main() -> Result<(), MafiaError> {
    let config = ServerConfig::parse();
    config.validate()?;
    logging::init(&config.log_level)?;

    match config.stats_endpoint.clone() {
        Some(endpoint) => {
            let recorder = HttpRecorder::new(endpoint).map_err(|e| MafiaError::Config(e.to_string()))?;
            serve(&config, recorder).await
        }
        None => {
            tracing::warn!("no stats endpoint configured, game results are only logged");
            serve(&config, LogRecorder).await
        }
    }
}

async fn serve<R: ResultRecorder>(config: &ServerConfig, recorder: R) -> Result<(), MafiaError> {
    let server = MafiaServerBuilder::new()
        .bind(&config.bind_addr())
        .room_config(config.room_config())
        .handshake_timeout(config.handshake_timeout())
        .idle_timeout(config.idle_timeout())
        .send_timeout(config.send_timeout())
        .build(NicknameAuthenticator, recorder)
        .await?;

    tracing::info!(
        addr = %config.bind_addr(),
        stats_endpoint = config.stats_endpoint.as_deref().unwrap_or("-"),
        "server listening"
    );

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await
}
