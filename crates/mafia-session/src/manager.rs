//! The session manager: tracks which identities are connected.
//!
//! `SessionManager` is not thread-safe by itself. The server keeps it
//! behind a mutex and holds the lock only for the map operation.

use std::collections::HashMap;

use mafia_protocol::{PlayerId, PlayerIdentity};
use mafia_transport::ConnectionId;

use crate::{Session, SessionError};

/// Registry of live sessions, one per player identity.
///
/// ```text
/// authenticate() ──→ create() ──→ [Connected] ──→ disconnect() ──→ (gone)
/// ```
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: HashMap<PlayerId, Session>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a live session for an accepted identity.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyConnected`] if the identity already
    /// has a live connection.
    pub fn create(
        &mut self,
        identity: PlayerIdentity,
        connection_id: ConnectionId,
    ) -> Result<&Session, SessionError> {
        let player_id = identity.id;
        if self.sessions.contains_key(&player_id) {
            tracing::debug!(%player_id, %connection_id, "duplicate connection rejected");
            return Err(SessionError::AlreadyConnected(player_id));
        }

        tracing::info!(%player_id, %connection_id, nickname = %identity.nickname, "session created");
        Ok(self
            .sessions
            .entry(player_id)
            .or_insert_with(|| Session::new(identity, connection_id)))
    }

    /// Ends the session held by `connection_id` and returns it.
    ///
    /// A stale connection cannot end a session that belongs to another
    /// connection of the same player.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if the player has no session
    /// bound to that connection.
    pub fn disconnect(
        &mut self,
        player_id: PlayerId,
        connection_id: ConnectionId,
    ) -> Result<Session, SessionError> {
        match self.sessions.get(&player_id) {
            Some(session) if session.connection_id == connection_id => {}
            _ => return Err(SessionError::NotFound(player_id)),
        }
        let session = self
            .sessions
            .remove(&player_id)
            .ok_or(SessionError::NotFound(player_id))?;

        tracing::info!(
            %player_id,
            %connection_id,
            uptime_ms = session.uptime().as_millis() as u64,
            "session ended"
        );
        Ok(session)
    }

    pub fn get(&self, player_id: &PlayerId) -> Option<&Session> {
        self.sessions.get(player_id)
    }

    pub fn is_connected(&self, player_id: &PlayerId) -> bool {
        self.sessions.contains_key(player_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
