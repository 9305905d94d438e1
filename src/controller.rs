//! Session controller: turns player intents into session updates.
//!
//! Input is validated here before it reaches the evaluator, so the scoring
//! function only ever sees well-formed codes.

use crate::error::GameError;
use crate::session::{SessionId, SessionManager};
use crate::view::{SessionView, result_label};
use serde::{Deserialize, Serialize};
use strictly_bulls_cows::{
    AttemptLimit, AttemptsRemaining, Code, GuessRecord, Outcome, evaluate,
};
use tracing::{debug, info, instrument, warn};

/// Reply to a successful start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartResponse {
    /// Id of the new session.
    pub session_id: SessionId,
    /// Attempt limit in force.
    pub attempt_limit: AttemptLimit,
    /// Guesses available.
    pub attempts_remaining: AttemptsRemaining,
    /// Always empty for a fresh session.
    pub past_guesses: Vec<GuessRecord>,
}

/// Reply to an accepted guess.
///
/// `result` and `secret` are present only when `outcome` is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessResponse {
    /// The scored guess.
    pub guess: Code,
    /// Digits shared with the secret.
    pub digits_correct: u8,
    /// Digits in the right place.
    pub positions_correct: u8,
    /// Session status after this guess.
    pub outcome: Outcome,
    /// Guesses left after this guess.
    pub attempts_remaining: AttemptsRemaining,
    /// Result label once the game ends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// The secret once the game ends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<Code>,
}

/// Reply to a history request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PastGuessesResponse {
    /// Scored guesses in submission order.
    pub past_guesses: Vec<GuessRecord>,
}

/// Mediates player intents against the session manager.
#[derive(Debug, Clone, Default)]
pub struct SessionController {
    sessions: SessionManager,
}

impl SessionController {
    /// Creates a controller over `sessions`.
    #[instrument(skip(sessions))]
    pub fn new(sessions: SessionManager) -> Self {
        Self { sessions }
    }

    /// The underlying session manager.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Starts a new session for `player`.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidConfiguration`] unless `attempt_limit` is one of
    /// 10, 15, 20 or 0. The player's existing session is kept in that case.
    #[instrument(skip(self))]
    pub fn on_start(&self, player: &str, attempt_limit: u32) -> Result<StartResponse, GameError> {
        let limit = AttemptLimit::try_from(attempt_limit).map_err(|e| {
            warn!(attempt_limit, "Rejected attempt limit");
            GameError::from(e)
        })?;

        let session_id = self.sessions.start(player, limit);
        Ok(StartResponse {
            session_id,
            attempt_limit: limit,
            attempts_remaining: limit.remaining(0),
            past_guesses: Vec::new(),
        })
    }

    /// Validates, scores and records a guess.
    ///
    /// # Errors
    ///
    /// In order of precedence: [`GameError::MalformedGuess`],
    /// [`GameError::DuplicateDigits`], [`GameError::SessionNotActive`],
    /// [`GameError::RepeatedGuess`]. None of them consumes an attempt.
    #[instrument(skip(self))]
    pub fn on_guess(&self, player: &str, raw: &str) -> Result<GuessResponse, GameError> {
        let guess = Code::parse(raw).map_err(|e| {
            debug!(error = %e, "Rejected guess");
            GameError::from(e)
        })?;

        // Scoring and recording share one lock acquisition.
        let response = self
            .sessions
            .with_session(player, |session| {
                let game = &mut session.game;
                if game.outcome().is_terminal() {
                    return Err(GameError::SessionNotActive(Some(game.outcome())));
                }
                if game.has_guessed(&guess) {
                    return Err(GameError::RepeatedGuess(guess.to_string()));
                }

                let feedback = evaluate(game.secret(), &guess);
                let outcome = game.record_guess(guess, feedback)?;

                Ok(GuessResponse {
                    guess,
                    digits_correct: feedback.digits_correct,
                    positions_correct: feedback.positions_correct,
                    outcome,
                    attempts_remaining: game.attempts_remaining(),
                    result: result_label(outcome, game.limit()),
                    secret: game.revealed_secret().copied(),
                })
            })
            .unwrap_or(Err(GameError::SessionNotActive(None)));

        match &response {
            Ok(r) => info!(
                guess = %r.guess,
                digits_correct = r.digits_correct,
                positions_correct = r.positions_correct,
                outcome = %r.outcome,
                "Guess scored"
            ),
            Err(e) => debug!(error = %e, "Guess not accepted"),
        }
        response
    }

    /// The player's guess log in submission order.
    ///
    /// Empty when the player has no session.
    #[instrument(skip(self))]
    pub fn on_past_guesses(&self, player: &str) -> PastGuessesResponse {
        let past_guesses = self
            .sessions
            .with_session(player, |session| session.game.guesses().to_vec())
            .unwrap_or_default();
        PastGuessesResponse { past_guesses }
    }

    /// Render-ready view of the player's session.
    #[instrument(skip(self))]
    pub fn on_state(&self, player: &str) -> SessionView {
        self.sessions
            .with_session(player, |session| SessionView::from_game(&session.game))
            .unwrap_or_else(SessionView::not_started)
    }

    /// Discards the player's session.
    #[instrument(skip(self))]
    pub fn on_reset(&self, player: &str) {
        self.sessions.reset(player);
    }
}
