use mafia_protocol::Role;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::{ROLE_SET, SEATS};

/// Deals [`ROLE_SET`] across the seats as a uniform random permutation.
pub fn assign_roles<R: Rng + ?Sized>(rng: &mut R) -> [Role; SEATS] {
    let mut roles = ROLE_SET;
    roles.shuffle(rng);
    roles
}
