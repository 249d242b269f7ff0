//! The room state machine.
//!
//! `GameRoom` is plain synchronous state: it owns the seats, validates and
//! applies every action, and pushes the resulting messages into each
//! player's outbound channel. The room actor (see `room.rs`) gives it
//! exclusive access by running one command at a time.
//!
//! ```text
//! NotStarted ──(4th seat)──→ Night ──votes──→ Day ──votes──→ Night → …
//!                              └──────────(win)──────────────→ Ended
//! ```

use std::time::Instant;

use mafia_protocol::{
    GameResult, Phase, PlayerId, PlayerIdentity, PlayerResult, Role, RoomId, RoomSnapshot,
    ServerMessage,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::SEATS;
use crate::roles::assign_roles;
use crate::tally::{self, Ballot, Resolution};
use crate::visibility::{Viewer, project};
use crate::{PlayerSender, Seat};

const INCORRECT_COMMAND: &str = "Incorrect command";

/// Which side won a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Civilians,
    Mafia,
}

impl Winner {
    fn includes(self, role: Role) -> bool {
        match self {
            Self::Mafia => role == Role::Mafia,
            Self::Civilians => role != Role::Mafia,
        }
    }

    fn announcement(self) -> &'static str {
        match self {
            Self::Civilians => "Civilians won",
            Self::Mafia => "Mafia won",
        }
    }
}

/// One game session for up to [`SEATS`] players.
#[derive(Debug)]
pub struct GameRoom {
    id: RoomId,
    phase: Phase,
    /// Seat order is join order.
    seats: Vec<Seat>,
    started_at: Option<Instant>,
    start_announced: bool,
    winner: Option<Winner>,
    /// Set when the game ends, taken by whoever delivers it.
    result: Option<GameResult>,
    rng: StdRng,
}

impl GameRoom {
    pub fn new(id: RoomId) -> Self {
        Self::with_rng(id, StdRng::from_os_rng())
    }

    /// Creates a room with a fixed random source, for reproducible games.
    pub fn with_rng(id: RoomId, rng: StdRng) -> Self {
        Self {
            id,
            phase: Phase::NotStarted,
            seats: Vec::with_capacity(SEATS),
            started_at: None,
            start_announced: false,
            winner: None,
            result: None,
            rng,
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Returns `true` while a seat is free and the game has not started.
    pub fn is_joinable(&self) -> bool {
        self.phase.is_joinable() && self.seats.len() < SEATS
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.index_of(player).is_some()
    }

    pub fn seat(&self, player: PlayerId) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id() == player)
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    fn seat_mut(&mut self, player: PlayerId) -> Option<&mut Seat> {
        self.seats.iter_mut().find(|s| s.id() == player)
    }

    fn index_of(&self, player: PlayerId) -> Option<usize> {
        self.seats.iter().position(|s| s.id() == player)
    }

    /// The room as `player` may see it, or `None` if not seated.
    pub fn snapshot_for(&self, player: PlayerId) -> Option<RoomSnapshot> {
        let seat = self.seat(player)?;
        Some(project(self.id, self.phase, &self.seats, Viewer::from(seat)))
    }

    /// Hands out the result of a finished game. Returns `Some` exactly once.
    pub fn take_result(&mut self) -> Option<GameResult> {
        self.result.take()
    }

    // -----------------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------------

    /// Seats a player if the room is joinable and the player is not already
    /// seated. The new seat is greeted with `Welcome` before any other
    /// message. Filling the last seat starts the game before returning.
    pub fn try_add_player(&mut self, identity: PlayerIdentity, outbound: PlayerSender) -> bool {
        if !self.is_joinable() || self.contains(identity.id) {
            return false;
        }

        tracing::info!(
            room_id = %self.id,
            player_id = %identity.id,
            seats = self.seats.len() + 1,
            "player seated"
        );
        let seat = Seat::new(identity, outbound);
        seat.push(ServerMessage::Welcome {
            player_id: seat.id(),
            room_id: self.id,
        });
        self.seats.push(seat);

        if self.seats.len() == SEATS {
            self.start_game();
        }
        true
    }

    fn start_game(&mut self) {
        self.started_at = Some(Instant::now());
        let roles = assign_roles(&mut self.rng);
        for (seat, role) in self.seats.iter_mut().zip(roles) {
            seat.role = role;
        }
        self.change_phase(Phase::Night);
        tracing::info!(room_id = %self.id, "game started");
    }

    /// Announces a seated player to the room. The first announcement after
    /// the game has started is followed by "Game started!".
    pub fn join_room(&mut self, player: PlayerId) -> bool {
        let Some(seat) = self.seat(player) else {
            return false;
        };
        let text = format!("Player '{}' joined room '{}'", seat.identity.nickname, self.id);
        self.broadcast_event(&text);

        if self.started_at.is_some() && !self.start_announced {
            self.start_announced = true;
            self.broadcast_event("Game started!");
        }
        true
    }

    /// Removes a player and tells the others.
    ///
    /// Votes aimed at the player are withdrawn. The game carries on with
    /// the smaller roster: a departure neither ends the game nor resolves
    /// the current vote cycle.
    pub fn leave_room(&mut self, player: PlayerId) -> bool {
        let Some(index) = self.index_of(player) else {
            return false;
        };
        // Dropping the seat drops its outbound sender.
        let seat = self.seats.remove(index);
        for other in &mut self.seats {
            if other.vote == Some(player) {
                other.vote = None;
            }
        }

        tracing::info!(
            room_id = %self.id,
            player_id = %player,
            phase = %self.phase,
            seats = self.seats.len(),
            "player left"
        );
        let text = format!("Player '{}' left the room '{}'", seat.identity.nickname, self.id);
        self.broadcast_event(&text);
        true
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Records `actor`'s vote for `target` and resolves the cycle if it was
    /// the last vote needed. A later vote by the same actor replaces the
    /// earlier one.
    pub fn vote_request(&mut self, actor: PlayerId, target: PlayerId) {
        if !self.vote_allowed(actor, target) {
            tracing::debug!(room_id = %self.id, %actor, %target, phase = %self.phase, "vote rejected");
            self.incorrect_command(actor);
            return;
        }
        if let Some(seat) = self.seat_mut(actor) {
            seat.vote = Some(target);
        }
        tracing::debug!(room_id = %self.id, %actor, %target, phase = %self.phase, "vote recorded");
        self.resolve_votes();
    }

    fn vote_allowed(&self, actor: PlayerId, target: PlayerId) -> bool {
        let (Some(a), Some(t)) = (self.seat(actor), self.seat(target)) else {
            return false;
        };
        if !a.alive || !t.alive || !self.phase.is_active() {
            return false;
        }
        self.phase != Phase::Night || a.role.acts_at_night()
    }

    /// Lets a living sheriff publicly expose `target` during the day.
    pub fn show_request(&mut self, actor: PlayerId, target: PlayerId) {
        let sheriff = match (self.seat(actor), self.seat(target)) {
            (Some(a), Some(_)) if a.alive && a.role == Role::Sheriff && self.phase == Phase::Day => {
                a.identity.nickname.clone()
            }
            _ => {
                tracing::debug!(room_id = %self.id, %actor, %target, phase = %self.phase, "show rejected");
                self.incorrect_command(actor);
                return;
            }
        };

        let Some(exposed) = self.seat_mut(target) else {
            return;
        };
        exposed.revealed_by_exposure = true;
        let text = format!(
            "Sheriff '{}' exposes '{}' as {}",
            sheriff, exposed.identity.nickname, exposed.role
        );

        tracing::info!(room_id = %self.id, %actor, %target, "role exposed");
        self.broadcast_event(&text);
    }

    // -----------------------------------------------------------------------
    // Resolution
    // -----------------------------------------------------------------------

    fn resolve_votes(&mut self) {
        let ballots: Vec<Ballot> = self
            .seats
            .iter()
            .map(|s| Ballot {
                role: s.role,
                alive: s.alive,
                target: s.vote.and_then(|id| self.index_of(id)),
            })
            .collect();

        match tally::resolve(self.phase, &ballots, &mut self.rng) {
            Resolution::Pending => return,
            Resolution::Night { kill, investigate } => {
                if let Some(i) = investigate {
                    self.investigate(i);
                }
                if let Some(i) = kill {
                    let victim = &mut self.seats[i];
                    victim.alive = false;
                    let text = format!("Mafia killed '{}' that night", victim.identity.nickname);
                    tracing::info!(room_id = %self.id, player_id = %victim.id(), "killed at night");
                    self.broadcast_notice(&text);
                }
            }
            Resolution::Day { voted_out } => {
                if let Some(i) = voted_out {
                    let victim = &mut self.seats[i];
                    victim.alive = false;
                    let text = format!("The city voted out '{}'", victim.identity.nickname);
                    tracing::info!(room_id = %self.id, player_id = %victim.id(), "voted out");
                    self.broadcast_notice(&text);
                }
            }
        }

        self.change_state_after_votes();
    }

    /// Marks seat `i` as investigated and tells every living sheriff.
    fn investigate(&mut self, i: usize) {
        let subject = &mut self.seats[i];
        subject.revealed_by_investigation = true;
        let text = format!("'{}' is {}", subject.identity.nickname, subject.role);

        for sheriff in self.seats.iter().filter(|s| s.alive && s.role == Role::Sheriff) {
            sheriff.push(ServerMessage::notice(text.clone()));
        }
    }

    fn change_state_after_votes(&mut self) {
        let living = self.seats.iter().filter(|s| s.alive);
        let mafia = living.clone().filter(|s| s.role == Role::Mafia).count();
        let others = living.filter(|s| s.role != Role::Mafia).count();

        if mafia == 0 {
            self.finish(Winner::Civilians);
        } else if mafia == others {
            self.finish(Winner::Mafia);
        } else {
            let next = self.phase.after_votes();
            self.change_phase(next);
            tracing::info!(room_id = %self.id, phase = %next, mafia, others, "phase changed");
            let text = match next {
                Phase::Night => "Night started",
                _ => "Night ended",
            };
            self.broadcast_event(text);
        }
    }

    fn finish(&mut self, winner: Winner) {
        self.change_phase(Phase::Ended);
        self.winner = Some(winner);
        self.result = Some(self.build_result(winner));
        tracing::info!(room_id = %self.id, ?winner, "game over");
        self.broadcast_event(winner.announcement());
    }

    fn build_result(&self, winner: Winner) -> GameResult {
        let duration = self
            .started_at
            .map(|t| u64::try_from(t.elapsed().as_nanos()).unwrap_or(u64::MAX))
            .unwrap_or_default();

        GameResult {
            id: self.id,
            duration,
            players: self
                .seats
                .iter()
                .map(|s| PlayerResult {
                    identity: s.identity.clone(),
                    role: s.role,
                    is_winner: winner.includes(s.role),
                })
                .collect(),
            comments: Vec::new(),
        }
    }

    /// Every transition clears every vote.
    fn change_phase(&mut self, next: Phase) {
        self.phase = next;
        for seat in &mut self.seats {
            seat.vote = None;
        }
    }

    // -----------------------------------------------------------------------
    // Delivery
    // -----------------------------------------------------------------------

    /// Sends a room event to every seat, projected per viewer.
    fn broadcast_event(&self, text: &str) {
        for seat in &self.seats {
            seat.push(ServerMessage::RoomEvent {
                text: Some(text.to_string()),
                room: project(self.id, self.phase, &self.seats, Viewer::from(seat)),
            });
        }
    }

    fn broadcast_notice(&self, text: &str) {
        for seat in &self.seats {
            seat.push(ServerMessage::notice(text));
        }
    }

    fn incorrect_command(&self, actor: PlayerId) {
        if let Some(seat) = self.seat(actor) {
            seat.push(ServerMessage::notice(INCORRECT_COMMAND));
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    const NAMES: [&str; 4] = ["alice", "bobby", "carol", "david"];

    struct Table {
        room: GameRoom,
        inboxes: Vec<mpsc::Receiver<ServerMessage>>,
    }

    impl Table {
        /// Four seated and announced players.
        fn full(seed: u64) -> Self {
            let mut table = Self::empty(seed);
            for i in 0..4 {
                table.seat(i);
            }
            table.drain_all();
            table
        }

        fn empty(seed: u64) -> Self {
            Self {
                room: GameRoom::with_rng(RoomId(1), StdRng::seed_from_u64(seed)),
                inboxes: Vec::new(),
            }
        }

        fn seat(&mut self, i: u64) -> bool {
            let (tx, rx) = mpsc::channel(64);
            let added = self
                .room
                .try_add_player(PlayerIdentity::new(i + 1, NAMES[i as usize]), tx);
            if added {
                self.inboxes.push(rx);
                self.room.join_room(PlayerId(i + 1));
            }
            added
        }

        fn with_role(&self, role: Role) -> Vec<PlayerId> {
            self.room
                .seats()
                .iter()
                .filter(|s| s.role == role)
                .map(Seat::id)
                .collect()
        }

        fn inbox(&mut self, player: PlayerId) -> Vec<ServerMessage> {
            let i = (player.0 - 1) as usize;
            drain(&mut self.inboxes[i])
        }

        fn drain_all(&mut self) {
            for rx in &mut self.inboxes {
                drain(rx);
            }
        }

        fn alive(&self, player: PlayerId) -> bool {
            self.room.seat(player).is_some_and(|s| s.alive)
        }
    }

    fn drain(rx: &mut mpsc::Receiver<ServerMessage>) -> Vec<ServerMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg);
        }
        out
    }

    fn texts(msgs: &[ServerMessage]) -> Vec<String> {
        msgs.iter()
            .filter_map(|m| match m {
                ServerMessage::PlainNotice { text } => Some(text.clone()),
                ServerMessage::RoomEvent { text, .. } => text.clone(),
                _ => None,
            })
            .collect()
    }

    // ---- membership -------------------------------------------------------

    #[test]
    fn test_try_add_player_starts_game_on_fourth_seat() {
        let mut table = Table::empty(1);
        for i in 0..3 {
            assert!(table.seat(i));
            assert_eq!(table.room.phase(), Phase::NotStarted);
        }
        assert!(table.seat(3));
        assert_eq!(table.room.phase(), Phase::Night);

        let mut roles: Vec<Role> = table.room.seats().iter().map(|s| s.role).collect();
        roles.sort_by_key(|r| *r as u8);
        let mut expected = crate::ROLE_SET.to_vec();
        expected.sort_by_key(|r| *r as u8);
        assert_eq!(roles, expected);
    }

    #[test]
    fn test_try_add_player_rejects_fifth_and_duplicate() {
        let mut table = Table::empty(1);
        assert!(table.seat(0));
        let (tx, _rx) = mpsc::channel(1);
        assert!(!table.room.try_add_player(PlayerIdentity::new(1, "alice"), tx));

        for i in 1..4 {
            table.seat(i);
        }
        let (tx, _rx) = mpsc::channel(1);
        assert!(!table.room.try_add_player(PlayerIdentity::new(9, "erika"), tx));
        assert_eq!(table.room.len(), 4);
        assert!(!table.room.is_joinable());
    }

    #[test]
    fn test_new_seat_is_welcomed_first() {
        let mut table = Table::empty(1);
        table.seat(0);
        let msgs = table.inbox(PlayerId(1));
        assert_eq!(
            msgs.first(),
            Some(&ServerMessage::Welcome {
                player_id: PlayerId(1),
                room_id: RoomId(1)
            })
        );
    }

    #[test]
    fn test_join_room_announces_to_everyone_seated() {
        let mut table = Table::empty(1);
        table.seat(0);
        table.seat(1);

        assert_eq!(texts(&table.inbox(PlayerId(1))), [
            "Player 'alice' joined room '1'",
            "Player 'bobby' joined room '1'"
        ]);
        assert_eq!(texts(&table.inbox(PlayerId(2))), ["Player 'bobby' joined room '1'"]);
    }

    #[test]
    fn test_game_started_is_announced_once_with_projected_roles() {
        let mut table = Table::empty(1);
        for i in 0..4 {
            table.seat(i);
        }
        // Announcing an already seated player again must not repeat it.
        table.room.join_room(PlayerId(4));

        for id in 1..=4 {
            let msgs = table.inbox(PlayerId(id));
            let started: Vec<_> = msgs
                .iter()
                .filter_map(|m| match m {
                    ServerMessage::RoomEvent {
                        text: Some(t),
                        room,
                    } if t == "Game started!" => Some(room),
                    _ => None,
                })
                .collect();
            assert_eq!(started.len(), 1, "player {id}");

            let room = started[0];
            assert_eq!(room.phase, Phase::Night);
            let own = room.player(PlayerId(id)).unwrap();
            assert_ne!(own.role, Role::Unknown);
        }
    }

    #[test]
    fn test_leave_room_clears_votes_and_keeps_phase() {
        let mut table = Table::full(5);
        let mafia = table.with_role(Role::Mafia)[0];
        let civilians = table.with_role(Role::Civilian);

        table.room.vote_request(mafia, civilians[0]);
        assert_eq!(table.room.seat(mafia).unwrap().vote, Some(civilians[0]));

        assert!(table.room.leave_room(civilians[0]));
        assert_eq!(table.room.seat(mafia).unwrap().vote, None);
        assert_eq!(table.room.phase(), Phase::Night);
        assert_eq!(table.room.len(), 3);
        assert!(!table.room.leave_room(civilians[0]));

        let left = format!("Player '{}' left the room '1'", NAMES[(civilians[0].0 - 1) as usize]);
        assert!(texts(&table.inbox(mafia)).contains(&left));
    }

    #[test]
    fn test_started_game_never_takes_new_seats() {
        let mut table = Table::full(5);
        let civ = table.with_role(Role::Civilian)[0];
        assert!(table.room.leave_room(civ));
        assert_eq!(table.room.len(), 3);

        let (tx, _rx) = mpsc::channel(1);
        assert!(!table.room.try_add_player(PlayerIdentity::new(9, "erika"), tx));
        assert_eq!(table.room.len(), 3);
        assert!(!table.room.is_joinable());
    }

    #[test]
    fn test_leave_room_does_not_end_game() {
        let mut table = Table::full(5);
        let mafia = table.with_role(Role::Mafia)[0];
        table.room.leave_room(mafia);

        assert_eq!(table.room.phase(), Phase::Night);
        assert!(table.room.take_result().is_none());
    }

    // ---- voting -----------------------------------------------------------

    #[test]
    fn test_civilian_vote_at_night_is_incorrect() {
        let mut table = Table::full(2);
        let civ = table.with_role(Role::Civilian)[0];
        let mafia = table.with_role(Role::Mafia)[0];

        table.room.vote_request(civ, mafia);

        assert_eq!(texts(&table.inbox(civ)), ["Incorrect command"]);
        assert!(table.inbox(mafia).is_empty());
        assert_eq!(table.room.seat(civ).unwrap().vote, None);
    }

    #[test]
    fn test_vote_before_start_is_incorrect() {
        let mut table = Table::empty(1);
        table.seat(0);
        table.seat(1);
        table.drain_all();

        table.room.vote_request(PlayerId(1), PlayerId(2));
        assert_eq!(texts(&table.inbox(PlayerId(1))), ["Incorrect command"]);
    }

    #[test]
    fn test_vote_for_unseated_target_is_incorrect() {
        let mut table = Table::full(2);
        let mafia = table.with_role(Role::Mafia)[0];
        table.room.vote_request(mafia, PlayerId(77));
        assert_eq!(texts(&table.inbox(mafia)), ["Incorrect command"]);
    }

    #[test]
    fn test_sheriff_alone_does_not_resolve_night() {
        let mut table = Table::full(3);
        let sheriff = table.with_role(Role::Sheriff)[0];
        let mafia = table.with_role(Role::Mafia)[0];

        table.room.vote_request(sheriff, mafia);

        assert_eq!(table.room.phase(), Phase::Night);
        assert!((1..=4).all(|id| table.alive(PlayerId(id))));
        assert!(table.inbox(sheriff).is_empty());
    }

    #[test]
    fn test_revote_counts_only_final_target() {
        let mut table = Table::full(4);
        let mafia = table.with_role(Role::Mafia)[0];
        let sheriff = table.with_role(Role::Sheriff)[0];
        let civ = table.with_role(Role::Civilian);

        table.room.vote_request(mafia, civ[0]);
        table.room.vote_request(mafia, civ[1]);
        table.room.vote_request(sheriff, mafia);

        assert!(table.alive(civ[0]));
        assert!(!table.alive(civ[1]));
        assert_eq!(table.room.phase(), Phase::Day);
    }

    #[test]
    fn test_night_resolution_kills_and_informs_sheriff_privately() {
        let mut table = Table::full(6);
        let mafia = table.with_role(Role::Mafia)[0];
        let sheriff = table.with_role(Role::Sheriff)[0];
        let civ = table.with_role(Role::Civilian);

        table.room.vote_request(mafia, civ[0]);
        table.room.vote_request(sheriff, civ[1]);

        assert!(!table.alive(civ[0]));
        assert!(table.room.seat(civ[1]).unwrap().revealed_by_investigation);
        assert_eq!(table.room.phase(), Phase::Day);

        let victim = NAMES[(civ[0].0 - 1) as usize];
        let checked = NAMES[(civ[1].0 - 1) as usize];

        let sheriff_texts = texts(&table.inbox(sheriff));
        assert_eq!(sheriff_texts, [
            format!("'{checked}' is CIVILIAN"),
            format!("Mafia killed '{victim}' that night"),
            "Night ended".to_string(),
        ]);

        let mafia_texts = texts(&table.inbox(mafia));
        assert_eq!(mafia_texts, [
            format!("Mafia killed '{victim}' that night"),
            "Night ended".to_string(),
        ]);

        // The sheriff now sees the investigated role, the mafia does not.
        let seen = |viewer| table.room.snapshot_for(viewer).unwrap().player(civ[1]).unwrap().role;
        assert_eq!(seen(sheriff), Role::Civilian);
        assert_eq!(seen(mafia), Role::Unknown);
    }

    #[test]
    fn test_votes_reset_after_transition() {
        let mut table = Table::full(6);
        let mafia = table.with_role(Role::Mafia)[0];
        let sheriff = table.with_role(Role::Sheriff)[0];
        let civ = table.with_role(Role::Civilian);

        table.room.vote_request(mafia, civ[0]);
        table.room.vote_request(sheriff, civ[1]);

        assert!(table.room.seats().iter().all(|s| s.vote.is_none()));
    }

    #[test]
    fn test_day_vote_out_mafia_ends_with_civilians_winning() {
        let mut table = Table::full(8);
        let mafia = table.with_role(Role::Mafia)[0];
        let sheriff = table.with_role(Role::Sheriff)[0];
        let civ = table.with_role(Role::Civilian);

        table.room.vote_request(mafia, civ[0]);
        table.room.vote_request(sheriff, mafia);
        assert_eq!(table.room.phase(), Phase::Day);

        for voter in [mafia, sheriff, civ[1]] {
            table.room.vote_request(voter, mafia);
        }

        assert_eq!(table.room.phase(), Phase::Ended);
        assert_eq!(table.room.winner(), Some(Winner::Civilians));

        let result = table.room.take_result().expect("result once");
        assert!(table.room.take_result().is_none());
        assert_eq!(result.id, RoomId(1));
        for p in &result.players {
            assert_eq!(p.is_winner, p.role != Role::Mafia, "{}", p.identity.nickname);
        }

        let last = texts(&table.inbox(civ[1]));
        assert_eq!(last.last().map(String::as_str), Some("Civilians won"));
    }

    #[test]
    fn test_mafia_wins_at_parity() {
        let mut table = Table::full(8);
        let mafia = table.with_role(Role::Mafia)[0];
        let sheriff = table.with_role(Role::Sheriff)[0];
        let civ = table.with_role(Role::Civilian);

        // Night: civ[0] dies. Day: the city votes out civ[1].
        table.room.vote_request(mafia, civ[0]);
        table.room.vote_request(sheriff, civ[1]);
        for voter in [mafia, sheriff, civ[1]] {
            table.room.vote_request(voter, civ[1]);
        }

        assert_eq!(table.room.phase(), Phase::Ended);
        assert_eq!(table.room.winner(), Some(Winner::Mafia));
        let result = table.room.take_result().unwrap();
        let winners: Vec<_> = result.winners().map(|p| p.role).collect();
        assert_eq!(winners, [Role::Mafia]);
    }

    #[test]
    fn test_lone_mafia_without_parity_keeps_playing() {
        let mut table = Table::full(8);
        let mafia = table.with_role(Role::Mafia)[0];
        let sheriff = table.with_role(Role::Sheriff)[0];
        for civ in table.with_role(Role::Civilian) {
            table.room.leave_room(civ);
        }
        table.drain_all();

        // One mafia against nobody is not parity: the night just ends.
        table.room.vote_request(mafia, sheriff);
        table.room.vote_request(sheriff, mafia);

        assert!(!table.alive(sheriff));
        assert_eq!(table.room.phase(), Phase::Day);
        assert_eq!(table.room.winner(), None);
        assert!(table.room.take_result().is_none());
        assert!(texts(&table.inbox(mafia)).contains(&"Night ended".to_string()));
    }

    #[test]
    fn test_first_day_always_decides_a_full_table() {
        // One mafia against two others after the first night: whoever the
        // city votes out, the game ends.
        for seed in 0..20 {
            let mut table = Table::full(seed);
            let mafia = table.with_role(Role::Mafia)[0];
            let sheriff = table.with_role(Role::Sheriff)[0];
            let civ = table.with_role(Role::Civilian);

            table.room.vote_request(mafia, sheriff);
            table.room.vote_request(sheriff, mafia);
            assert_eq!(table.room.phase(), Phase::Day);

            for voter in [mafia, civ[0], civ[1]] {
                table.room.vote_request(voter, civ[(seed % 2) as usize]);
            }
            assert_eq!(table.room.phase(), Phase::Ended, "seed {seed}");
            assert_eq!(table.room.winner(), Some(Winner::Mafia));
        }
    }

    #[test]
    fn test_dead_player_cannot_vote() {
        let mut table = Table::full(8);
        let mafia = table.with_role(Role::Mafia)[0];
        let sheriff = table.with_role(Role::Sheriff)[0];
        let civ = table.with_role(Role::Civilian);

        table.room.vote_request(mafia, civ[0]);
        table.room.vote_request(sheriff, mafia);
        table.drain_all();

        table.room.vote_request(civ[0], mafia);
        assert_eq!(texts(&table.inbox(civ[0])), ["Incorrect command"]);
    }

    // ---- show -------------------------------------------------------------

    #[test]
    fn test_show_request_exposes_to_everyone() {
        let mut table = Table::full(8);
        let mafia = table.with_role(Role::Mafia)[0];
        let sheriff = table.with_role(Role::Sheriff)[0];
        let civ = table.with_role(Role::Civilian);

        table.room.vote_request(mafia, civ[0]);
        table.room.vote_request(sheriff, mafia);
        table.drain_all();

        table.room.show_request(sheriff, mafia);

        let sheriff_name = NAMES[(sheriff.0 - 1) as usize];
        let mafia_name = NAMES[(mafia.0 - 1) as usize];
        let expected = format!("Sheriff '{sheriff_name}' exposes '{mafia_name}' as MAFIA");
        for viewer in [civ[0], civ[1], mafia, sheriff] {
            assert_eq!(texts(&table.inbox(viewer)), [expected.clone()]);
            let snapshot = table.room.snapshot_for(viewer).unwrap();
            assert_eq!(snapshot.player(mafia).unwrap().role, Role::Mafia);
        }
    }

    #[test]
    fn test_show_request_at_night_or_by_non_sheriff_is_incorrect() {
        let mut table = Table::full(8);
        let mafia = table.with_role(Role::Mafia)[0];
        let sheriff = table.with_role(Role::Sheriff)[0];

        table.room.show_request(sheriff, mafia);
        assert_eq!(texts(&table.inbox(sheriff)), ["Incorrect command"]);

        table.room.show_request(mafia, sheriff);
        assert_eq!(texts(&table.inbox(mafia)), ["Incorrect command"]);
        assert!(!table.room.seat(sheriff).unwrap().revealed_by_exposure);
    }

    // ---- delivery ---------------------------------------------------------

    #[test]
    fn test_full_outbound_buffer_never_blocks_room() {
        let mut room = GameRoom::with_rng(RoomId(2), StdRng::seed_from_u64(1));
        let mut keep = Vec::new();
        for i in 0..4u64 {
            // Capacity 1 and never drained.
            let (tx, rx) = mpsc::channel(1);
            keep.push(rx);
            room.try_add_player(PlayerIdentity::new(i + 1, NAMES[i as usize]), tx);
            room.join_room(PlayerId(i + 1));
        }
        assert_eq!(room.phase(), Phase::Night);

        let mafia = room.seats().iter().find(|s| s.role == Role::Mafia).unwrap().id();
        let sheriff = room.seats().iter().find(|s| s.role == Role::Sheriff).unwrap().id();
        room.vote_request(mafia, sheriff);
        room.vote_request(sheriff, mafia);
        assert_eq!(room.phase(), Phase::Day);

        for rx in &mut keep {
            assert_eq!(drain(rx).len(), 1);
        }
    }
}
