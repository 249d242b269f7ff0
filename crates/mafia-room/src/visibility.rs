//! Per-viewer role visibility.
//!
//! The room keeps one true record of every seat. Whenever it talks to a
//! player it projects that record through [`displayed_role`], so what a
//! player learns is decided at the moment the message is built and never
//! stored.

use mafia_protocol::{Phase, PlayerId, PlayerView, Role, RoomId, RoomSnapshot, chat};

use crate::Seat;

/// The player a snapshot is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    pub id: PlayerId,
    pub role: Role,
}

/// What the projection needs to know about the seat being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subject {
    pub id: PlayerId,
    pub role: Role,
    pub revealed_by_investigation: bool,
    pub revealed_by_exposure: bool,
}

impl From<&Seat> for Viewer {
    fn from(seat: &Seat) -> Self {
        Self {
            id: seat.id(),
            role: seat.role,
        }
    }
}

impl From<&Seat> for Subject {
    fn from(seat: &Seat) -> Self {
        Self {
            id: seat.id(),
            role: seat.role,
            revealed_by_investigation: seat.revealed_by_investigation,
            revealed_by_exposure: seat.revealed_by_exposure,
        }
    }
}

/// The role `viewer` is allowed to see for `subject` during `phase`.
///
/// Outside a running game every role is public. During the game a role
/// shows when any of these hold:
/// 1. the viewer is looking at themselves;
/// 2. both share a night role (mafia see mafia);
/// 3. the subject was exposed by the sheriff;
/// 4. the subject was investigated and the viewer is a sheriff.
///
/// Otherwise the viewer sees [`Role::Unknown`].
pub fn displayed_role(viewer: Viewer, subject: Subject, phase: Phase) -> Role {
    if !phase.is_active() {
        return subject.role;
    }

    let visible = viewer.id == subject.id
        || (subject.role == viewer.role && viewer.role.acts_at_night())
        || subject.revealed_by_exposure
        || (subject.revealed_by_investigation && viewer.role == Role::Sheriff);

    if visible { subject.role } else { Role::Unknown }
}

/// Builds the room as `viewer` may see it.
///
/// Identity and liveness are never hidden. `chat_channels` lists the
/// channels the viewer belongs to given its true role.
pub fn project(room_id: RoomId, phase: Phase, seats: &[Seat], viewer: Viewer) -> RoomSnapshot {
    let players = seats
        .iter()
        .map(|seat| PlayerView {
            identity: seat.identity.clone(),
            role: displayed_role(viewer, Subject::from(seat), phase),
            alive: seat.alive,
        })
        .collect();

    RoomSnapshot {
        room_id,
        phase,
        players,
        chat_channels: chat::channels_for(room_id, viewer.role),
    }
}
