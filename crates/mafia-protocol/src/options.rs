//! Client-side derivation of the actions a player may legally take.
//!
//! The server never calls this: it validates each action as it arrives.
//! Clients use it to offer choices and to pick a random move for
//! automated players.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::{Phase, PlayerAction, PlayerId, Role, RoomSnapshot};

/// Lists every action `me` may take given the room as `me` sees it.
///
/// - Night: a living mafia or sheriff may vote for any living player.
/// - Day: every living player may vote for any living player; a living
///   sheriff may also expose any living player it sees as mafia.
/// - Otherwise (dead, not started, ended, not seated): nothing.
pub fn legal_actions(snapshot: &RoomSnapshot, me: PlayerId) -> Vec<PlayerAction> {
    let Some(view) = snapshot.player(me) else {
        return Vec::new();
    };
    if !view.alive {
        return Vec::new();
    }

    let living = snapshot.players.iter().filter(|p| p.alive);

    match snapshot.phase {
        Phase::Night if view.role.acts_at_night() => living
            .map(|p| PlayerAction::Vote {
                target: p.identity.id,
            })
            .collect(),
        Phase::Day => {
            let mut actions = Vec::new();
            if view.role == Role::Sheriff {
                actions.extend(
                    living
                        .clone()
                        .filter(|p| p.role == Role::Mafia)
                        .map(|p| PlayerAction::Show {
                            target: p.identity.id,
                        }),
                );
            }
            actions.extend(living.map(|p| PlayerAction::Vote {
                target: p.identity.id,
            }));
            actions
        }
        _ => Vec::new(),
    }
}

/// Picks one action uniformly from `actions`, or `None` if there is none.
pub fn random_legal_action<R: Rng + ?Sized>(
    actions: &[PlayerAction],
    rng: &mut R,
) -> Option<PlayerAction> {
    actions.choose(rng).cloned()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::{PlayerIdentity, PlayerView, RoomId};

    fn snapshot(phase: Phase, seats: &[(u64, Role, bool)]) -> RoomSnapshot {
        RoomSnapshot {
            room_id: RoomId(1),
            phase,
            players: seats
                .iter()
                .map(|&(id, role, alive)| PlayerView {
                    identity: PlayerIdentity::new(id, format!("player{id}")),
                    role,
                    alive,
                })
                .collect(),
            chat_channels: vec![],
        }
    }

    fn targets(actions: &[PlayerAction]) -> Vec<u64> {
        actions
            .iter()
            .filter_map(|a| match a {
                PlayerAction::Vote { target } => Some(target.0),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_civilian_has_nothing_at_night() {
        let room = snapshot(
            Phase::Night,
            &[(1, Role::Civilian, true), (2, Role::Unknown, true)],
        );
        assert!(legal_actions(&room, PlayerId(1)).is_empty());
    }

    #[test]
    fn test_mafia_votes_for_living_players_at_night() {
        let room = snapshot(
            Phase::Night,
            &[
                (1, Role::Mafia, true),
                (2, Role::Unknown, true),
                (3, Role::Unknown, false),
                (4, Role::Unknown, true),
            ],
        );
        let actions = legal_actions(&room, PlayerId(1));
        assert_eq!(targets(&actions), [1, 2, 4]);
    }

    #[test]
    fn test_sheriff_can_show_visible_mafia_during_day() {
        let room = snapshot(
            Phase::Day,
            &[
                (1, Role::Sheriff, true),
                (2, Role::Mafia, true),
                (3, Role::Unknown, true),
            ],
        );
        let actions = legal_actions(&room, PlayerId(1));

        assert!(actions.contains(&PlayerAction::Show { target: PlayerId(2) }));
        assert!(!actions.contains(&PlayerAction::Show { target: PlayerId(3) }));
        assert_eq!(targets(&actions), [1, 2, 3]);
    }

    #[test]
    fn test_dead_or_unseated_player_has_nothing() {
        let room = snapshot(Phase::Day, &[(1, Role::Civilian, false), (2, Role::Unknown, true)]);
        assert!(legal_actions(&room, PlayerId(1)).is_empty());
        assert!(legal_actions(&room, PlayerId(99)).is_empty());
    }

    #[test]
    fn test_nothing_before_start_or_after_end() {
        for phase in [Phase::NotStarted, Phase::Ended] {
            let room = snapshot(phase, &[(1, Role::Mafia, true), (2, Role::Civilian, true)]);
            assert!(legal_actions(&room, PlayerId(1)).is_empty());
        }
    }

    #[test]
    fn test_random_legal_action_picks_from_set() {
        let room = snapshot(
            Phase::Day,
            &[(1, Role::Civilian, true), (2, Role::Unknown, true)],
        );
        let actions = legal_actions(&room, PlayerId(1));
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let picked = random_legal_action(&actions, &mut rng).unwrap();
            assert!(actions.contains(&picked));
        }
        assert_eq!(random_legal_action(&[], &mut rng), None);
    }
}
