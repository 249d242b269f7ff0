//! Vote tallies and their resolution.
//!
//! A tally works on seat indices: each ballot is one seat's role, liveness
//! and current vote, and the counts are kept per target seat. The room
//! maps player ids to seat indices before calling in, so this module has
//! no notion of identity.

use mafia_protocol::{Phase, Role};
use rand::Rng;

use crate::tie_break::random_max_index;

/// One seat's say in the current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ballot {
    pub role: Role,
    pub alive: bool,
    /// Target seat index.
    pub target: Option<usize>,
}

/// The outcome of feeding the current ballots to [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Some required voter has not voted yet.
    Pending,
    /// Every living mafia and sheriff has voted.
    Night {
        kill: Option<usize>,
        investigate: Option<usize>,
    },
    /// Every living player has voted.
    Day { voted_out: Option<usize> },
}

/// Resolves the cycle for `phase` if every required voter is in.
///
/// At night the mafia and sheriff tallies are separate; a side with no
/// living members resolves to no target. During the day all living
/// players vote in one tally. Ties go to [`random_max_index`].
pub fn resolve<R: Rng + ?Sized>(phase: Phase, ballots: &[Ballot], rng: &mut R) -> Resolution {
    match phase {
        Phase::Night => {
            let voters = |b: &Ballot| b.alive && b.role.acts_at_night();
            if !all_voted(ballots, voters) {
                return Resolution::Pending;
            }
            let mafia = count(ballots, |b| b.alive && b.role == Role::Mafia);
            let sheriff = count(ballots, |b| b.alive && b.role == Role::Sheriff);
            Resolution::Night {
                kill: random_max_index(&mafia, rng),
                investigate: random_max_index(&sheriff, rng),
            }
        }
        Phase::Day => {
            let voters = |b: &Ballot| b.alive;
            if !all_voted(ballots, voters) {
                return Resolution::Pending;
            }
            let city = count(ballots, voters);
            Resolution::Day {
                voted_out: random_max_index(&city, rng),
            }
        }
        Phase::NotStarted | Phase::Ended => Resolution::Pending,
    }
}

fn all_voted(ballots: &[Ballot], required: impl Fn(&Ballot) -> bool) -> bool {
    ballots.iter().filter(|&b| required(b)).all(|b| b.target.is_some())
}

/// Counts the votes of the ballots matching `voters`, one slot per seat.
fn count(ballots: &[Ballot], voters: impl Fn(&Ballot) -> bool) -> Vec<u32> {
    let mut tally = vec![0; ballots.len()];
    for target in ballots.iter().filter(|&b| voters(b)).filter_map(|b| b.target) {
        if let Some(slot) = tally.get_mut(target) {
            *slot += 1;
        }
    }
    tally
}
