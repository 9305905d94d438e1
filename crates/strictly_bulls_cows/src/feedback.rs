//! Scoring a guess against the secret.

use super::code::{CODE_LENGTH, Code};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Score for a single guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Feedback {
    /// Digits of the guess that appear anywhere in the secret.
    pub digits_correct: u8,
    /// Digits of the guess that match the secret at the same index.
    pub positions_correct: u8,
}

impl Feedback {
    /// Returns `true` when every digit is in place.
    pub fn is_solved(&self) -> bool {
        self.positions_correct as usize == CODE_LENGTH
    }
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} digits correct, {} in position",
            self.digits_correct, self.positions_correct
        )
    }
}

/// Scores `guess` against `secret`.
///
/// Digits are unique within each code, so `digits_correct` is the size of
/// the intersection of the two digit sets.
#[instrument(level = "trace")]
pub fn evaluate(secret: &Code, guess: &Code) -> Feedback {
    let positions_correct = secret
        .digits()
        .iter()
        .zip(guess.digits())
        .filter(|(s, g)| s == g)
        .count() as u8;

    let digits_correct = guess
        .digits()
        .iter()
        .filter(|d| secret.contains(**d))
        .count() as u8;

    Feedback {
        digits_correct,
        positions_correct,
    }
}
