//! Where finished games go.
//!
//! The room actor hands every [`GameResult`] to a [`ResultRecorder`] on a
//! spawned task, so a slow or failing stats service never holds up a room.

use std::future::Future;

use mafia_protocol::GameResult;
use tokio::sync::Mutex;

use crate::RecordError;

/// Delivers finished games to durable storage.
///
/// `Send + Sync + 'static` because one recorder is shared by every room
/// actor through an `Arc`.
pub trait ResultRecorder: Send + Sync + 'static {
    fn record(&self, result: GameResult) -> impl Future<Output = Result<(), RecordError>> + Send;
}

/// Writes each result to the log and keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogRecorder;

impl ResultRecorder for LogRecorder {
    async fn record(&self, result: GameResult) -> Result<(), RecordError> {
        let winners: Vec<&str> = result
            .winners()
            .map(|p| p.identity.nickname.as_str())
            .collect();
        tracing::info!(
            room_id = %result.id,
            duration_ms = result.duration / 1_000_000,
            players = result.players.len(),
            winners = ?winners,
            "game recorded"
        );
        Ok(())
    }
}

/// Keeps results in memory. Useful for tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    results: Mutex<Vec<GameResult>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All results recorded so far, oldest first.
    pub async fn results(&self) -> Vec<GameResult> {
        self.results.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.results.lock().await.len()
    }
}

impl ResultRecorder for MemoryRecorder {
    async fn record(&self, result: GameResult) -> Result<(), RecordError> {
        self.results.lock().await.push(result);
        Ok(())
    }
}
