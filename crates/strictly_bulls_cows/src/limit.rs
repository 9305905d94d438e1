//! Attempt budgets.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};
use tracing::instrument;

/// Maximum number of guesses allowed in a session.
///
/// Only the fixed menu {10, 15, 20, unlimited} is selectable. On the wire
/// the limit is the plain number, with `0` standing for unlimited.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, Serialize, Deserialize,
)]
#[serde(into = "u32", try_from = "u32")]
pub enum AttemptLimit {
    /// Ten guesses.
    #[default]
    Ten,
    /// Fifteen guesses.
    Fifteen,
    /// Twenty guesses.
    Twenty,
    /// No limit; only a correct guess ends the session.
    Unlimited,
}

/// An attempt limit outside the selectable menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("Attempt limit must be one of 10, 15, 20 or 0 (unlimited), got {}", _0)]
pub struct InvalidAttemptLimit(pub u32);

impl std::error::Error for InvalidAttemptLimit {}

impl AttemptLimit {
    /// Numeric cap, or `None` when unlimited.
    pub fn max_attempts(self) -> Option<u32> {
        match self {
            Self::Ten => Some(10),
            Self::Fifteen => Some(15),
            Self::Twenty => Some(20),
            Self::Unlimited => None,
        }
    }

    /// Wire value: the cap, or `0` when unlimited.
    pub fn as_u32(self) -> u32 {
        self.max_attempts().unwrap_or(0)
    }

    /// Guesses left after `used` guesses, never negative.
    #[instrument]
    pub fn remaining(self, used: usize) -> AttemptsRemaining {
        match self.max_attempts() {
            Some(max) => {
                let used = u32::try_from(used).unwrap_or(u32::MAX);
                AttemptsRemaining::Limited(max.saturating_sub(used))
            }
            None => AttemptsRemaining::Unlimited,
        }
    }

    /// Returns `true` once `used` guesses exhaust the budget.
    pub fn is_exhausted(self, used: usize) -> bool {
        matches!(self.remaining(used), AttemptsRemaining::Limited(0))
    }

    /// All selectable limits, in menu order.
    pub fn menu() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// Short label for menus (`"10"`, ..., `"∞"`).
    pub fn label(self) -> String {
        match self.max_attempts() {
            Some(n) => n.to_string(),
            None => "∞".to_string(),
        }
    }
}

impl TryFrom<u32> for AttemptLimit {
    type Error = InvalidAttemptLimit;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Unlimited),
            10 => Ok(Self::Ten),
            15 => Ok(Self::Fifteen),
            20 => Ok(Self::Twenty),
            other => Err(InvalidAttemptLimit(other)),
        }
    }
}

impl From<AttemptLimit> for u32 {
    fn from(limit: AttemptLimit) -> Self {
        limit.as_u32()
    }
}

impl std::fmt::Display for AttemptLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.max_attempts() {
            Some(n) => write!(f, "{n} attempts"),
            None => write!(f, "unlimited attempts"),
        }
    }
}

/// Guesses left in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "count")]
pub enum AttemptsRemaining {
    /// A bounded number of guesses remain (possibly zero).
    Limited(u32),
    /// The session has no attempt limit.
    Unlimited,
}

impl std::fmt::Display for AttemptsRemaining {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Limited(n) => write!(f, "{n}"),
            Self::Unlimited => write!(f, "∞"),
        }
    }
}
