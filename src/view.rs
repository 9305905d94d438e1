//! The single value object a front end renders.
//!
//! Everything a client shows about a game is derived from one
//! [`SessionView`], so the attempt counter, history and result can never
//! drift apart.

use serde::{Deserialize, Serialize};
use strictly_bulls_cows::{AttemptLimit, AttemptsRemaining, Code, GameSession, GuessRecord, Outcome};
use tracing::instrument;

/// Where the player is in the game lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No session exists; the player should pick a limit and start.
    NotStarted,
    /// Guesses are being accepted.
    Playing,
    /// The session ended; the secret is disclosed.
    Finished,
}

/// Render-ready snapshot of a player's session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    /// Lifecycle phase.
    pub phase: Phase,
    /// Attempt limit of the current session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempt_limit: Option<AttemptLimit>,
    /// Guesses left, when a session exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts_remaining: Option<AttemptsRemaining>,
    /// Scored guesses in submission order.
    #[serde(default)]
    pub guesses: Vec<GuessRecord>,
    /// Outcome of the current session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    /// Human-readable result, once finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// The secret, once finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<Code>,
}

impl SessionView {
    /// View for a player without a session.
    pub fn not_started() -> Self {
        Self {
            phase: Phase::NotStarted,
            attempt_limit: None,
            attempts_remaining: None,
            guesses: Vec::new(),
            outcome: None,
            result: None,
            secret: None,
        }
    }

    /// Derives the view from a game record.
    #[instrument(skip(game))]
    pub fn from_game(game: &GameSession) -> Self {
        let outcome = game.outcome();
        Self {
            phase: if outcome.is_terminal() {
                Phase::Finished
            } else {
                Phase::Playing
            },
            attempt_limit: Some(game.limit()),
            attempts_remaining: Some(game.attempts_remaining()),
            guesses: game.guesses().to_vec(),
            outcome: Some(outcome),
            result: result_label(outcome, game.limit()),
            secret: game.revealed_secret().copied(),
        }
    }
}

/// Label shown when a game ends, or `None` while it is in progress.
pub fn result_label(outcome: Outcome, limit: AttemptLimit) -> Option<String> {
    match outcome {
        Outcome::InProgress => None,
        Outcome::Won => Some("You Win!".to_string()),
        Outcome::Lost => Some(match limit.max_attempts() {
            Some(n) => format!("Game Over - You've used all {n} attempts!"),
            None => "Game Over".to_string(),
        }),
    }
}
