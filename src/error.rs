//! Errors surfaced to the player.

use strictly_bulls_cows::{CodeError, InvalidAttemptLimit, Outcome, SessionClosed};

/// A rejected player intent.
///
/// Every variant is a user-input error: the controller reports it and
/// leaves the session untouched. A rejected guess is never logged and
/// never consumes an attempt.
#[derive(Debug, Clone, PartialEq, Eq, strum::IntoStaticStr)]
pub enum GameError {
    /// The attempt limit is not one of 10, 15, 20 or 0. Holds the
    /// selection as received.
    InvalidConfiguration(String),
    /// Wrong length or a non-digit character.
    MalformedGuess(String),
    /// A digit appears more than once.
    DuplicateDigits(String),
    /// The guess is already in the session's log.
    RepeatedGuess(String),
    /// No session exists, or it has already ended.
    SessionNotActive(Option<Outcome>),
}

impl GameError {
    /// Stable name of the error kind, used on the wire.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::InvalidConfiguration(raw) => write!(
                f,
                "Attempt limit must be one of 10, 15, 20 or 0 (unlimited), got {raw:?}"
            ),
            GameError::MalformedGuess(raw) => {
                write!(f, "Guess must be 4 digits (0-9), got {raw:?}")
            }
            GameError::DuplicateDigits(raw) => {
                write!(f, "Digits must be unique (no repeats), got {raw:?}")
            }
            GameError::RepeatedGuess(raw) => write!(f, "Guess already made: {raw}"),
            GameError::SessionNotActive(None) => write!(f, "Game not started"),
            GameError::SessionNotActive(Some(outcome)) => {
                write!(f, "Game already over ({outcome}), start a new game")
            }
        }
    }
}

impl std::error::Error for GameError {}

impl From<CodeError> for GameError {
    fn from(err: CodeError) -> Self {
        match err {
            CodeError::Malformed(raw) => GameError::MalformedGuess(raw),
            CodeError::DuplicateDigits(raw) => GameError::DuplicateDigits(raw),
        }
    }
}

impl From<InvalidAttemptLimit> for GameError {
    fn from(err: InvalidAttemptLimit) -> Self {
        GameError::InvalidConfiguration(err.0.to_string())
    }
}

impl From<SessionClosed> for GameError {
    fn from(err: SessionClosed) -> Self {
        GameError::SessionNotActive(Some(err.0))
    }
}
