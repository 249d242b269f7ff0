//! Identity validation at connection time.
//!
//! The server does not run an account system. A client claims an identity
//! in its `Connect` frame and an [`Authenticator`] decides whether to
//! accept it, possibly normalizing it on the way.

use mafia_protocol::PlayerIdentity;

use crate::SessionError;

/// Validates the identity a client claims on connect.
///
/// `Send + Sync + 'static` because one authenticator is shared by every
/// connection task for the lifetime of the server.
///
/// # Example
///
/// ```rust
/// use mafia_protocol::PlayerIdentity;
/// use mafia_session::{Authenticator, SessionError};
///
/// /// Accepts everyone. Only for local testing.
/// struct OpenDoor;
///
/// impl Authenticator for OpenDoor {
///     async fn authenticate(
///         &self,
///         claimed: PlayerIdentity,
///     ) -> Result<PlayerIdentity, SessionError> {
///         Ok(claimed)
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Returns the accepted identity, or
    /// [`SessionError::AuthFailed`] with a reason the client may display.
    fn authenticate(
        &self,
        claimed: PlayerIdentity,
    ) -> impl std::future::Future<Output = Result<PlayerIdentity, SessionError>> + Send;
}

/// Accepts any identity whose nickname is 4 to 15 letters long.
#[derive(Debug, Clone, Copy, Default)]
pub struct NicknameAuthenticator;

impl NicknameAuthenticator {
    pub const MIN_LEN: usize = 4;
    pub const MAX_LEN: usize = 15;

    /// Checks a nickname, returning the human-readable reason on failure.
    pub fn validate(nickname: &str) -> Result<(), String> {
        let len = nickname.chars().count();
        if !(Self::MIN_LEN..=Self::MAX_LEN).contains(&len) {
            return Err(format!(
                "Nickname must be at least {} characters and no longer than {}",
                Self::MIN_LEN,
                Self::MAX_LEN
            ));
        }
        if !nickname.chars().all(char::is_alphabetic) {
            return Err("Nickname must contain only letters".to_string());
        }
        Ok(())
    }
}

impl Authenticator for NicknameAuthenticator {
    async fn authenticate(&self, claimed: PlayerIdentity) -> Result<PlayerIdentity, SessionError> {
        Self::validate(&claimed.nickname).map_err(SessionError::AuthFailed)?;
        Ok(claimed)
    }
}
