//! Chat channel naming.
//!
//! The chat relay is a separate service; players subscribe to channels by
//! name. Every seated player belongs to the room's common channel, and the
//! night roles additionally share a private channel per role.

use crate::{Role, RoomId};

/// The channel every player of the room belongs to: `"<room_id>"`.
pub fn common_channel(room_id: RoomId) -> String {
    room_id.to_string()
}

/// The private channel of a night role: `"<room_id><ROLE>"`.
///
/// Returns `None` for roles without a private channel.
pub fn role_channel(room_id: RoomId, role: Role) -> Option<String> {
    role.acts_at_night().then(|| format!("{room_id}{role}"))
}

/// All channels a player with `role` belongs to, common channel first.
pub fn channels_for(room_id: RoomId, role: Role) -> Vec<String> {
    let mut channels = vec![common_channel(room_id)];
    channels.extend(role_channel(room_id, role));
    channels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_channel_is_room_id() {
        assert_eq!(common_channel(RoomId(12)), "12");
    }

    #[test]
    fn test_role_channel_only_for_night_roles() {
        assert_eq!(role_channel(RoomId(4), Role::Mafia).as_deref(), Some("4MAFIA"));
        assert_eq!(role_channel(RoomId(4), Role::Sheriff).as_deref(), Some("4SHERIFF"));
        assert_eq!(role_channel(RoomId(4), Role::Civilian), None);
        assert_eq!(role_channel(RoomId(4), Role::Unknown), None);
    }

    #[test]
    fn test_channels_for_civilian_is_common_only() {
        assert_eq!(channels_for(RoomId(9), Role::Civilian), ["9"]);
        assert_eq!(channels_for(RoomId(9), Role::Mafia), ["9", "9MAFIA"]);
    }
}
