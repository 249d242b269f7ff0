//! `MafiaServer` builder and server loop.
//!
//! Ties the layers together: transport → protocol → session → room.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use mafia_protocol::{Codec, JsonCodec};
use mafia_room::{ResultRecorder, RoomConfig, RoomDirectory};
use mafia_session::{Authenticator, SessionManager};
use mafia_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::MafiaError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<A: Authenticator, R: ResultRecorder, C: Codec> {
    pub(crate) sessions: Mutex<SessionManager>,
    /// Held across a whole seat search, which serializes joins.
    pub(crate) directory: Mutex<RoomDirectory<R>>,
    pub(crate) auth: A,
    pub(crate) codec: C,
    pub(crate) outbound_capacity: usize,
    pub(crate) handshake_timeout: Duration,
    pub(crate) idle_timeout: Option<Duration>,
    pub(crate) send_timeout: Duration,
}

/// Builder for configuring and starting a mafia server.
///
/// # Example
///
/// ```rust,no_run
/// use mafia::prelude::*;
///
/// # async fn start() -> Result<(), MafiaError> {
/// let server = MafiaServerBuilder::new()
///     .bind("0.0.0.0:5050")
///     .build(NicknameAuthenticator, LogRecorder)
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct MafiaServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
    handshake_timeout: Duration,
    idle_timeout: Option<Duration>,
    send_timeout: Duration,
}

impl MafiaServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:5050".to_string(),
            room_config: RoomConfig::default(),
            handshake_timeout: Duration::from_secs(5),
            idle_timeout: Some(Duration::from_secs(300)),
            send_timeout: Duration::from_secs(2),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// How long a new connection may take to send its `Connect` frame.
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// How long a player may stay silent before being dropped. `None`
    /// keeps silent players forever.
    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// How long writing one frame to a player may take.
    pub fn send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    /// Binds the listener and assembles the server.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build<A: Authenticator, R: ResultRecorder>(
        self,
        auth: A,
        recorder: R,
    ) -> Result<MafiaServer<A, R, JsonCodec>, MafiaError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            sessions: Mutex::new(SessionManager::new()),
            directory: Mutex::new(RoomDirectory::new(Arc::new(recorder), self.room_config.clone())),
            auth,
            codec: JsonCodec,
            outbound_capacity: self.room_config.outbound_capacity.max(1),
            handshake_timeout: self.handshake_timeout,
            idle_timeout: self.idle_timeout,
            send_timeout: self.send_timeout,
        });

        Ok(MafiaServer { transport, state })
    }
}

impl Default for MafiaServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound mafia server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct MafiaServer<A: Authenticator, R: ResultRecorder, C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<A, R, C>>,
}

impl<A, R, C> MafiaServer<A, R, C>
where
    A: Authenticator,
    R: ResultRecorder,
    C: Codec,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop until the process is terminated.
    pub async fn run(self) -> Result<(), MafiaError> {
        self.run_until(std::future::pending()).await
    }

    /// Runs the accept loop until `shutdown` completes.
    ///
    /// Connections already accepted keep running on their own tasks.
    pub async fn run_until(mut self, shutdown: impl Future<Output = ()>) -> Result<(), MafiaError> {
        tracing::info!(addr = ?self.local_addr().ok(), "mafia server running");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = self.transport.accept() => match accepted {
                    Ok(conn) => {
                        let state = Arc::clone(&self.state);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(conn, state).await {
                                tracing::debug!(error = %e, "connection ended with error");
                            }
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "accept failed");
                    }
                },
                () = &mut shutdown => {
                    tracing::info!("mafia server stopping");
                    return Ok(());
                }
            }
        }
    }
}
