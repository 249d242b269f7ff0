//! Server configuration from command-line flags and environment variables.

use std::time::Duration;

use clap::Parser;
use mafia_room::RoomConfig;

use crate::MafiaError;
use crate::logging;

/// Everything needed to start a server process.
///
/// Every flag can also be set through its `MAFIA_*` environment variable;
/// a flag on the command line wins over the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "mafia-server")]
#[command(about = "Four-player mafia game room server", long_about = None)]
pub struct ServerConfig {
    /// Port to listen on
    #[arg(short = 'p', long, env = "MAFIA_PORT", default_value_t = 5050)]
    pub port: u16,

    /// Host address to bind to
    #[arg(short = 'H', long, env = "MAFIA_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Stats service endpoint that receives finished games. Results are
    /// only logged when unset.
    #[arg(long, env = "MAFIA_STATS_ENDPOINT")]
    pub stats_endpoint: Option<String>,

    /// Log level: trace, debug, info, warning, or error
    #[arg(long, env = "MAFIA_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Seconds a new connection has to send its Connect frame
    #[arg(long, env = "MAFIA_HANDSHAKE_TIMEOUT_SECS", default_value_t = 5)]
    pub handshake_timeout_secs: u64,

    /// Seconds of silence before a player is dropped (0 disables)
    #[arg(long, env = "MAFIA_IDLE_TIMEOUT_SECS", default_value_t = 300)]
    pub idle_timeout_secs: u64,

    /// Milliseconds allowed for writing one frame to a player
    #[arg(long, env = "MAFIA_SEND_TIMEOUT_MILLIS", default_value_t = 2000)]
    pub send_timeout_millis: u64,

    /// Messages buffered per player before new ones are dropped
    #[arg(long, env = "MAFIA_OUTBOUND_CAPACITY", default_value_t = 64)]
    pub outbound_capacity: usize,
}

impl ServerConfig {
    /// Checks the values clap cannot check on its own.
    ///
    /// # Errors
    /// Returns [`MafiaError::Config`] for an unknown log level, a zero
    /// handshake or send timeout, a zero buffer, or an empty stats endpoint.
    pub fn validate(&self) -> Result<(), MafiaError> {
        logging::level_filter(&self.log_level)?;
        if self.handshake_timeout_secs == 0 {
            return Err(MafiaError::Config("handshake timeout must be positive".into()));
        }
        if self.send_timeout_millis == 0 {
            return Err(MafiaError::Config("send timeout must be positive".into()));
        }
        if self.outbound_capacity == 0 {
            return Err(MafiaError::Config("outbound capacity must be positive".into()));
        }
        if self.stats_endpoint.as_deref().is_some_and(|e| e.trim().is_empty()) {
            return Err(MafiaError::Config("stats endpoint is empty".into()));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.handshake_timeout_secs)
    }

    /// `None` when idle players are never dropped.
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_secs > 0).then(|| Duration::from_secs(self.idle_timeout_secs))
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_millis)
    }

    pub fn room_config(&self) -> RoomConfig {
        RoomConfig {
            outbound_capacity: self.outbound_capacity,
            ..RoomConfig::default()
        }
    }
}
