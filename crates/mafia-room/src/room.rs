//! Room actor: an isolated Tokio task that owns one [`GameRoom`].
//!
//! Each room runs in its own task and is reached only through its command
//! channel, so every operation on a room is applied in arrival order with
//! exclusive access. Different rooms run in parallel.

use std::sync::Arc;

use mafia_protocol::{Phase, PlayerId, PlayerIdentity, RoomId, RoomSnapshot};
use tokio::sync::{mpsc, oneshot};

use crate::config::SEATS;
use crate::{GameRoom, PlayerSender, ResultRecorder, RoomConfig, RoomError};

/// Commands sent to a room actor through its channel.
///
/// Every command carries a reply channel, so callers know when the room
/// has applied it.
pub(crate) enum RoomCommand {
    TryAdd {
        identity: PlayerIdentity,
        outbound: PlayerSender,
        reply: oneshot::Sender<bool>,
    },
    Join {
        player: PlayerId,
        reply: oneshot::Sender<bool>,
    },
    Leave {
        player: PlayerId,
        reply: oneshot::Sender<Result<usize, RoomError>>,
    },
    Vote {
        actor: PlayerId,
        target: PlayerId,
        reply: oneshot::Sender<()>,
    },
    Show {
        actor: PlayerId,
        target: PlayerId,
        reply: oneshot::Sender<()>,
    },
    GetInfo {
        reply: oneshot::Sender<RoomInfo>,
    },
    Snapshot {
        viewer: PlayerId,
        reply: oneshot::Sender<Option<RoomSnapshot>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Room metadata (not the game state itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub phase: Phase,
    pub player_count: usize,
    pub max_players: usize,
}

impl RoomInfo {
    /// Returns `true` if a player could be seated right now.
    pub fn is_joinable(&self) -> bool {
        self.phase.is_joinable() && self.player_count < self.max_players
    }
}

/// Handle to a running room actor.
///
/// Cheap to clone: it is an `mpsc::Sender` wrapper. The directory holds
/// one per room, and each connection caches one for its player's room.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Spawns an actor task for `game` and returns its handle.
    pub fn spawn<R: ResultRecorder>(game: GameRoom, config: &RoomConfig, recorder: Arc<R>) -> Self {
        let room_id = game.id();
        let (tx, rx) = mpsc::channel(config.command_capacity.max(1));

        let actor = RoomActor {
            game,
            recorder,
            receiver: rx,
        };
        tokio::spawn(actor.run());

        Self { room_id, sender: tx }
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> RoomCommand,
    ) -> Result<T, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx.await.map_err(|_| RoomError::Unavailable(self.room_id))
    }

    /// Tries to seat a player. `Ok(false)` means the room is full, already
    /// started, or already seats this identity.
    pub async fn try_add(
        &self,
        identity: PlayerIdentity,
        outbound: PlayerSender,
    ) -> Result<bool, RoomError> {
        self.request(|reply| RoomCommand::TryAdd {
            identity,
            outbound,
            reply,
        })
        .await
    }

    /// Announces a seated player to the room.
    pub async fn join(&self, player: PlayerId) -> Result<bool, RoomError> {
        self.request(|reply| RoomCommand::Join { player, reply }).await
    }

    /// Removes a player. Returns how many players remain seated.
    pub async fn leave(&self, player: PlayerId) -> Result<usize, RoomError> {
        self.request(|reply| RoomCommand::Leave { player, reply }).await?
    }

    pub async fn vote(&self, actor: PlayerId, target: PlayerId) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Vote {
            actor,
            target,
            reply,
        })
        .await
    }

    pub async fn show(&self, actor: PlayerId, target: PlayerId) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Show {
            actor,
            target,
            reply,
        })
        .await
    }

    pub async fn get_info(&self) -> Result<RoomInfo, RoomError> {
        self.request(|reply| RoomCommand::GetInfo { reply }).await
    }

    /// The room as `viewer` sees it, or `None` if `viewer` is not seated.
    pub async fn snapshot(&self, viewer: PlayerId) -> Result<Option<RoomSnapshot>, RoomError> {
        self.request(|reply| RoomCommand::Snapshot { viewer, reply }).await
    }

    /// Stops the actor. Seats are dropped with it.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Shutdown { reply }).await
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor<R: ResultRecorder> {
    game: GameRoom,
    recorder: Arc<R>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl<R: ResultRecorder> RoomActor<R> {
    async fn run(mut self) {
        let room_id = self.game.id();
        tracing::info!(%room_id, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::TryAdd {
                    identity,
                    outbound,
                    reply,
                } => {
                    let _ = reply.send(self.game.try_add_player(identity, outbound));
                }
                RoomCommand::Join { player, reply } => {
                    let _ = reply.send(self.game.join_room(player));
                }
                RoomCommand::Leave { player, reply } => {
                    let result = if self.game.leave_room(player) {
                        Ok(self.game.len())
                    } else {
                        Err(RoomError::NotInRoom(player, room_id))
                    };
                    let _ = reply.send(result);
                }
                RoomCommand::Vote {
                    actor,
                    target,
                    reply,
                } => {
                    self.game.vote_request(actor, target);
                    let _ = reply.send(());
                }
                RoomCommand::Show {
                    actor,
                    target,
                    reply,
                } => {
                    self.game.show_request(actor, target);
                    let _ = reply.send(());
                }
                RoomCommand::GetInfo { reply } => {
                    let _ = reply.send(self.info());
                }
                RoomCommand::Snapshot { viewer, reply } => {
                    let _ = reply.send(self.game.snapshot_for(viewer));
                }
                RoomCommand::Shutdown { reply } => {
                    tracing::info!(%room_id, "room shutting down");
                    let _ = reply.send(());
                    break;
                }
            }

            if let Some(result) = self.game.take_result() {
                let recorder = Arc::clone(&self.recorder);
                tokio::spawn(async move {
                    let room_id = result.id;
                    match recorder.record(result).await {
                        Ok(()) => tracing::debug!(%room_id, "game result delivered"),
                        Err(e) => tracing::error!(%room_id, error = %e, "failed to record game result"),
                    }
                });
            }
        }

        tracing::info!(%room_id, "room actor stopped");
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.game.id(),
            phase: self.game.phase(),
            player_count: self.game.len(),
            max_players: SEATS,
        }
    }
}
