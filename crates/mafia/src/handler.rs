//! Per-connection handler: handshake, seating, and action routing.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Receive `Connect` → validate the claimed identity
//!   2. Register the session → one live connection per identity
//!   3. Spawn the writer task and seat the player through the directory
//!   4. Loop: receive actions → forward votes and shows to the room
//!
//! The room never writes to the socket. It pushes into the player's
//! bounded outbound channel and the writer task drains that channel, so a
//! slow client only ever delays itself.

use std::sync::Arc;
use std::time::{Duration, Instant};

use mafia_protocol::{
    Codec, Envelope, PlayerAction, PlayerId, PlayerIdentity, ProtocolError, ServerMessage,
};
use mafia_room::{ResultRecorder, RoomHandle};
use mafia_session::Authenticator;
use mafia_transport::{
    Connection, ConnectionId, FrameSink, FrameStream, TransportError, WebSocketConnection,
    WebSocketReader, WebSocketWriter,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::MafiaError;
use crate::server::ServerState;

/// Drop guard that takes a player out of its room and ends its session
/// when the handler exits.
///
/// Cleanup happens even if the handler panics. Since `Drop` is
/// synchronous, the async work runs on a fire-and-forget task. The room
/// seat goes first, so a reconnecting player can never be seated while
/// the old seat still exists.
struct SessionGuard<A: Authenticator, R: ResultRecorder, C: Codec> {
    player_id: PlayerId,
    connection_id: ConnectionId,
    state: Arc<ServerState<A, R, C>>,
}

impl<A: Authenticator, R: ResultRecorder, C: Codec> Drop for SessionGuard<A, R, C> {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let connection_id = self.connection_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let removed = state.directory.lock().await.remove_player(player_id).await;
            if let Err(e) = removed {
                tracing::debug!(%player_id, error = %e, "no seat to release");
            }
            let _ = state.sessions.lock().await.disconnect(player_id, connection_id);
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<A, R, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<A, R, C>>,
) -> Result<(), MafiaError>
where
    A: Authenticator,
    R: ResultRecorder,
    C: Codec,
{
    let conn_id = conn.id();
    let start = Instant::now();
    let (mut sink, mut stream) = conn.split();
    tracing::debug!(%conn_id, "handling new connection");

    // --- Step 1: Connect ---
    let identity = match perform_handshake(&mut sink, &mut stream, &state, &start).await {
        Ok(identity) => identity,
        Err(e) => {
            let _ = sink.close().await;
            return Err(e);
        }
    };
    let player_id = identity.id;

    // --- Step 2: Session ---
    let created = state
        .sessions
        .lock()
        .await
        .create(identity.clone(), conn_id)
        .map(|_| ());
    if let Err(e) = created {
        send_error(&mut sink, &state.codec, 409, &e.to_string(), &start).await?;
        let _ = sink.close().await;
        return Err(e.into());
    }
    let _guard = SessionGuard {
        player_id,
        connection_id: conn_id,
        state: Arc::clone(&state),
    };
    tracing::info!(%conn_id, %player_id, nickname = %identity.nickname, "player connected");

    // --- Step 3: Writer and seat ---
    let (outbound, outbound_rx) = mpsc::channel(state.outbound_capacity);
    let mut writer = spawn_writer(sink, outbound_rx, Arc::clone(&state), player_id, start);

    let room = {
        let mut directory = state.directory.lock().await;
        directory.add_player(identity, outbound.clone()).await?
    };
    room.join(player_id).await?;
    let room_id = room.room_id();
    tracing::info!(%player_id, %room_id, "player joined room");

    // --- Step 4: Action loop ---
    loop {
        let received = tokio::select! {
            received = recv_within(&mut stream, state.idle_timeout) => received,
            _ = &mut writer => {
                tracing::info!(%player_id, "writer stopped, dropping player");
                break;
            }
        };

        let data = match received {
            Some(Ok(Some(data))) => data,
            Some(Ok(None)) => {
                tracing::info!(%player_id, "connection closed cleanly");
                break;
            }
            Some(Err(e)) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
            None => {
                tracing::info!(%player_id, "connection idle, dropping player");
                break;
            }
        };

        let envelope: Envelope<PlayerAction> = match state.codec.decode(&data) {
            Ok(env) => env,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "failed to decode action");
                continue;
            }
        };

        let keep_going = dispatch(&room, &outbound, player_id, envelope.payload, &start).await?;
        if !keep_going {
            break;
        }
    }

    // _guard drops here → seat released, session ended.
    Ok(())
}

/// Applies one action. Returns `false` if the connection should close.
async fn dispatch(
    room: &RoomHandle,
    outbound: &mpsc::Sender<ServerMessage>,
    player_id: PlayerId,
    action: PlayerAction,
    start: &Instant,
) -> Result<bool, MafiaError> {
    match action {
        PlayerAction::Vote { target } => room.vote(player_id, target).await?,
        PlayerAction::Show { target } => room.show(player_id, target).await?,
        PlayerAction::Heartbeat { client_time } => {
            let ack = ServerMessage::HeartbeatAck {
                client_time,
                server_time: millis_since(start),
            };
            if outbound.try_send(ack).is_err() {
                tracing::debug!(%player_id, "heartbeat ack dropped");
            }
        }
        PlayerAction::Disconnect { reason } => {
            tracing::info!(%player_id, %reason, "client disconnected");
            return Ok(false);
        }
        PlayerAction::Connect { .. } => {
            let _ = outbound.try_send(ServerMessage::error(400, "already connected"));
        }
    }
    Ok(true)
}

/// Waits for the first frame and validates the claimed identity.
///
/// Anything but a timely `Connect` is answered with `Error{400}`; a
/// rejected identity gets `Error{401}`.
async fn perform_handshake<A, R, C>(
    sink: &mut WebSocketWriter,
    stream: &mut WebSocketReader,
    state: &Arc<ServerState<A, R, C>>,
    start: &Instant,
) -> Result<PlayerIdentity, MafiaError>
where
    A: Authenticator,
    R: ResultRecorder,
    C: Codec,
{
    let data = match tokio::time::timeout(state.handshake_timeout, stream.recv()).await {
        Ok(Ok(Some(data))) => data,
        Ok(Ok(None)) => {
            return Err(ProtocolError::InvalidMessage("connection closed before Connect".into()).into());
        }
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => {
            send_error(sink, &state.codec, 400, "expected Connect", start).await?;
            return Err(ProtocolError::InvalidMessage("handshake timed out".into()).into());
        }
    };

    let claimed = match state.codec.decode::<Envelope<PlayerAction>>(&data) {
        Ok(Envelope {
            payload: PlayerAction::Connect { identity },
            ..
        }) => identity,
        _ => {
            send_error(sink, &state.codec, 400, "expected Connect", start).await?;
            return Err(ProtocolError::InvalidMessage("first message must be Connect".into()).into());
        }
    };

    match state.auth.authenticate(claimed).await {
        Ok(identity) => Ok(identity),
        Err(e) => {
            send_error(sink, &state.codec, 401, &e.to_string(), start).await?;
            Err(e.into())
        }
    }
}

/// `None` when `idle` elapses first.
async fn recv_within(
    stream: &mut WebSocketReader,
    idle: Option<Duration>,
) -> Option<Result<Option<Vec<u8>>, TransportError>> {
    match idle {
        Some(idle) => tokio::time::timeout(idle, stream.recv()).await.ok(),
        None => Some(stream.recv().await),
    }
}

/// Drains the player's outbound channel into the socket.
///
/// Ends when every sender is gone (the seat and the handler both dropped
/// theirs), or when a frame fails or takes longer than the send timeout.
fn spawn_writer<A, R, C>(
    mut sink: WebSocketWriter,
    mut rx: mpsc::Receiver<ServerMessage>,
    state: Arc<ServerState<A, R, C>>,
    player_id: PlayerId,
    start: Instant,
) -> JoinHandle<()>
where
    A: Authenticator,
    R: ResultRecorder,
    C: Codec,
{
    tokio::spawn(async move {
        let mut seq: u64 = 0;
        while let Some(payload) = rx.recv().await {
            let envelope = Envelope {
                seq: next_seq(&mut seq),
                timestamp: millis_since(&start),
                payload,
            };
            let bytes = match state.codec.encode(&envelope) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(%player_id, error = %e, "failed to encode message");
                    continue;
                }
            };
            match tokio::time::timeout(state.send_timeout, sink.send(&bytes)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::debug!(%player_id, error = %e, "send failed");
                    return;
                }
                Err(_) => {
                    tracing::warn!(%player_id, "send timed out");
                    return;
                }
            }
        }
        let _ = sink.close().await;
    })
}

/// Sends an `Error` envelope straight to the socket, before the writer
/// task exists.
async fn send_error(
    sink: &mut WebSocketWriter,
    codec: &impl Codec,
    code: u16,
    message: &str,
    start: &Instant,
) -> Result<(), MafiaError> {
    let envelope = Envelope {
        seq: 0,
        timestamp: millis_since(start),
        payload: ServerMessage::error(code, message),
    };
    let bytes = codec.encode(&envelope)?;
    sink.send(&bytes).await?;
    Ok(())
}

fn millis_since(start: &Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Increments and returns the next sequence number.
fn next_seq(seq: &mut u64) -> u64 {
    let current = *seq;
    *seq += 1;
    current
}
