//! Room directory: creates rooms and routes players into them.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use mafia_protocol::{PlayerId, PlayerIdentity, RoomId};

use crate::{GameRoom, PlayerSender, ResultRecorder, RoomConfig, RoomError, RoomHandle, RoomInfo};

/// Counter for generating unique room IDs.
static NEXT_ROOM_ID: AtomicU64 = AtomicU64::new(1);

/// Tracks every live room and which room each player sits in.
///
/// Not thread-safe by itself. The server keeps it behind one mutex and
/// holds that lock across a whole [`add_player`](Self::add_player), so two
/// players can never race for the same last seat: whoever comes second
/// simply finds the room full and moves on.
pub struct RoomDirectory<R: ResultRecorder> {
    /// Live rooms by id. Ordered so the oldest rooms fill first.
    rooms: BTreeMap<RoomId, RoomHandle>,

    /// A player sits in at most one room.
    player_rooms: HashMap<PlayerId, RoomId>,

    recorder: Arc<R>,
    config: RoomConfig,
}

impl<R: ResultRecorder> RoomDirectory<R> {
    pub fn new(recorder: Arc<R>, config: RoomConfig) -> Self {
        Self {
            rooms: BTreeMap::new(),
            player_rooms: HashMap::new(),
            recorder,
            config,
        }
    }

    /// Spawns a new, empty room and returns its ID.
    pub fn create_room(&mut self) -> RoomId {
        let room_id = RoomId(NEXT_ROOM_ID.fetch_add(1, Ordering::Relaxed));
        self.insert_room(GameRoom::new(room_id));
        room_id
    }

    /// Spawns an actor for an already built room, e.g. one with a seeded
    /// random source.
    pub fn insert_room(&mut self, game: GameRoom) -> RoomHandle {
        let room_id = game.id();
        let handle = RoomHandle::spawn(game, &self.config, Arc::clone(&self.recorder));
        self.rooms.insert(room_id, handle.clone());
        tracing::info!(%room_id, "room created");
        handle
    }

    /// Seats a player and returns the handle of its room.
    ///
    /// A player that is already seated gets its current room back. Otherwise
    /// existing rooms are tried oldest first, and a new room is created when
    /// none has a free seat.
    pub async fn add_player(
        &mut self,
        identity: PlayerIdentity,
        outbound: PlayerSender,
    ) -> Result<RoomHandle, RoomError> {
        let player_id = identity.id;
        if let Some(handle) = self
            .player_rooms
            .get(&player_id)
            .and_then(|room_id| self.rooms.get(room_id))
        {
            return Ok(handle.clone());
        }

        for handle in self.rooms.values() {
            match handle.try_add(identity.clone(), outbound.clone()).await {
                Ok(true) => {
                    let handle = handle.clone();
                    self.player_rooms.insert(player_id, handle.room_id());
                    tracing::info!(%player_id, room_id = %handle.room_id(), "player routed to room");
                    return Ok(handle);
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(%player_id, error = %e, "skipping unavailable room");
                }
            }
        }

        let room_id = self.create_room();
        let handle = self.rooms.get(&room_id).cloned().ok_or(RoomError::NotFound(room_id))?;
        if !handle.try_add(identity, outbound).await? {
            return Err(RoomError::Unavailable(room_id));
        }
        self.player_rooms.insert(player_id, room_id);
        tracing::info!(%player_id, %room_id, "player routed to new room");
        Ok(handle)
    }

    /// Takes a player out of its room. A room left empty is destroyed.
    pub async fn remove_player(&mut self, player_id: PlayerId) -> Result<(), RoomError> {
        let room_id = self
            .player_rooms
            .remove(&player_id)
            .ok_or(RoomError::NoRoom(player_id))?;
        let handle = self.rooms.get(&room_id).ok_or(RoomError::NotFound(room_id))?;

        let remaining = handle.leave(player_id).await?;
        if remaining == 0 {
            self.destroy_room(room_id).await?;
        }
        Ok(())
    }

    /// Returns the room ID a player is currently in, if any.
    pub fn room_of(&self, player_id: &PlayerId) -> Option<RoomId> {
        self.player_rooms.get(player_id).copied()
    }

    pub fn handle(&self, room_id: RoomId) -> Option<RoomHandle> {
        self.rooms.get(&room_id).cloned()
    }

    pub async fn get_room_info(&self, room_id: RoomId) -> Result<RoomInfo, RoomError> {
        let handle = self.rooms.get(&room_id).ok_or(RoomError::NotFound(room_id))?;
        handle.get_info().await
    }

    /// Lists all rooms that still have a free seat.
    ///
    /// Rooms that fail to respond are skipped.
    pub async fn list_rooms(&self) -> Vec<RoomInfo> {
        let mut infos = Vec::with_capacity(self.rooms.len());
        for handle in self.rooms.values() {
            if let Ok(info) = handle.get_info().await {
                if info.is_joinable() {
                    infos.push(info);
                }
            }
        }
        infos
    }

    /// Shuts a room down and forgets everyone seated in it.
    pub async fn destroy_room(&mut self, room_id: RoomId) -> Result<(), RoomError> {
        let handle = self.rooms.remove(&room_id).ok_or(RoomError::NotFound(room_id))?;
        let _ = handle.shutdown().await;
        self.player_rooms.retain(|_, rid| *rid != room_id);

        tracing::info!(%room_id, "room destroyed");
        Ok(())
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().copied().collect()
    }
}
