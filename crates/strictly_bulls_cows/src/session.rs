//! A single game: secret, attempt budget, guess log and outcome.

use super::code::Code;
use super::feedback::Feedback;
use super::invariants::assert_invariants;
use super::limit::{AttemptLimit, AttemptsRemaining};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Status of a session.
///
/// `Won` and `Lost` are terminal; only a fresh session leaves them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
pub enum Outcome {
    /// Guesses are still accepted.
    #[default]
    InProgress,
    /// A guess matched every position.
    Won,
    /// The attempt limit ran out without a win.
    Lost,
}

impl Outcome {
    /// Returns `true` for `Won` and `Lost`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

/// One scored guess in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRecord {
    /// The submitted code.
    pub guess: Code,
    /// Digits shared with the secret.
    pub digits_correct: u8,
    /// Digits in the right place.
    pub positions_correct: u8,
}

impl GuessRecord {
    /// Pairs a guess with its score.
    pub fn new(guess: Code, feedback: Feedback) -> Self {
        Self {
            guess,
            digits_correct: feedback.digits_correct,
            positions_correct: feedback.positions_correct,
        }
    }

    /// The score as a [`Feedback`].
    pub fn feedback(&self) -> Feedback {
        Feedback {
            digits_correct: self.digits_correct,
            positions_correct: self.positions_correct,
        }
    }
}

/// Returned when a guess is recorded against a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("Session already ended ({})", _0)]
pub struct SessionClosed(pub Outcome);

impl std::error::Error for SessionClosed {}

/// Read-only projection of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Guesses left before a forced loss.
    pub attempts_remaining: AttemptsRemaining,
    /// Scored guesses in submission order.
    pub guesses: Vec<GuessRecord>,
    /// Current status.
    pub outcome: Outcome,
}

/// The mutable record of one game.
#[derive(Debug, Clone)]
pub struct GameSession {
    secret: Code,
    limit: AttemptLimit,
    log: Vec<GuessRecord>,
    outcome: Outcome,
}

impl GameSession {
    /// Starts a game with an empty log.
    #[instrument(skip(secret))]
    pub fn new(secret: Code, limit: AttemptLimit) -> Self {
        debug!(%limit, "New game session");
        Self {
            secret,
            limit,
            log: Vec::new(),
            outcome: Outcome::InProgress,
        }
    }

    /// Appends a scored guess and recomputes the outcome.
    ///
    /// The guess is logged before the outcome is decided, so the final
    /// guess of a lost game still appears in the history.
    ///
    /// # Errors
    ///
    /// Returns [`SessionClosed`] if the session is already `Won` or `Lost`;
    /// the log is left untouched.
    #[instrument(skip(self, guess, feedback), fields(guess = %guess, attempt = self.log.len() + 1))]
    pub fn record_guess(&mut self, guess: Code, feedback: Feedback) -> Result<Outcome, SessionClosed> {
        if self.outcome.is_terminal() {
            warn!(outcome = %self.outcome, "Guess recorded against finished session");
            return Err(SessionClosed(self.outcome));
        }

        self.log.push(GuessRecord::new(guess, feedback));

        self.outcome = if feedback.is_solved() {
            Outcome::Won
        } else if self.limit.is_exhausted(self.log.len()) {
            Outcome::Lost
        } else {
            Outcome::InProgress
        };

        assert_invariants(self);

        if self.outcome.is_terminal() {
            info!(outcome = %self.outcome, attempts = self.log.len(), "Game finished");
        }
        Ok(self.outcome)
    }

    /// The hidden code. Callers must not disclose it while the game is in progress.
    pub fn secret(&self) -> &Code {
        &self.secret
    }

    /// Attempt budget chosen at start.
    pub fn limit(&self) -> AttemptLimit {
        self.limit
    }

    /// Current status.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Scored guesses in submission order.
    pub fn guesses(&self) -> &[GuessRecord] {
        &self.log
    }

    /// Returns `true` if `guess` is already in the log.
    pub fn has_guessed(&self, guess: &Code) -> bool {
        self.log.iter().any(|record| record.guess == *guess)
    }

    /// Guesses left before a forced loss.
    pub fn attempts_remaining(&self) -> AttemptsRemaining {
        self.limit.remaining(self.log.len())
    }

    /// Read-only projection for callers outside the session lock.
    pub fn state(&self) -> SessionState {
        SessionState {
            attempts_remaining: self.attempts_remaining(),
            guesses: self.log.clone(),
            outcome: self.outcome,
        }
    }

    /// The secret, but only once the game is over.
    pub fn revealed_secret(&self) -> Option<&Code> {
        self.outcome.is_terminal().then_some(&self.secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate;

    fn code(raw: &str) -> Code {
        Code::parse(raw).expect("valid test code")
    }

    fn guess(session: &mut GameSession, raw: &str) -> Result<Outcome, SessionClosed> {
        let g = code(raw);
        let fb = evaluate(session.secret(), &g);
        session.record_guess(g, fb)
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = GameSession::new(code("4827"), AttemptLimit::Ten);
        assert!(session.guesses().is_empty());
        assert_eq!(session.outcome(), Outcome::InProgress);
        assert_eq!(session.attempts_remaining(), AttemptsRemaining::Limited(10));
        assert_eq!(session.revealed_secret(), None);
    }

    #[test]
    fn test_winning_guess() {
        let mut session = GameSession::new(code("4827"), AttemptLimit::Ten);
        assert_eq!(guess(&mut session, "1234"), Ok(Outcome::InProgress));
        assert_eq!(guess(&mut session, "4827"), Ok(Outcome::Won));
        assert_eq!(session.guesses().len(), 2);
        assert_eq!(session.revealed_secret(), Some(&code("4827")));
    }

    #[test]
    fn test_limit_reached_loses() {
        let mut session = GameSession::new(code("0193"), AttemptLimit::Ten);
        for (i, raw) in ["5678", "1234", "2345", "3456", "4567", "6789", "7890", "8901", "9012"]
            .iter()
            .enumerate()
        {
            assert_eq!(guess(&mut session, raw), Ok(Outcome::InProgress), "guess {i}");
        }
        assert_eq!(guess(&mut session, "1023"), Ok(Outcome::Lost));
        assert_eq!(session.guesses().len(), 10);
        assert_eq!(session.guesses()[9].guess, code("1023"));
        assert_eq!(session.attempts_remaining(), AttemptsRemaining::Limited(0));
    }

    #[test]
    fn test_win_on_last_attempt_is_a_win() {
        let mut session = GameSession::new(code("0193"), AttemptLimit::Ten);
        for _ in 0..9 {
            guess(&mut session, "5678").unwrap();
        }
        assert_eq!(guess(&mut session, "0193"), Ok(Outcome::Won));
    }

    #[test]
    fn test_unlimited_never_loses() {
        let mut session = GameSession::new(code("0193"), AttemptLimit::Unlimited);
        for _ in 0..100 {
            assert_eq!(guess(&mut session, "5678"), Ok(Outcome::InProgress));
        }
        assert_eq!(session.attempts_remaining(), AttemptsRemaining::Unlimited);
        assert_eq!(guess(&mut session, "0193"), Ok(Outcome::Won));
    }

    #[test]
    fn test_terminal_session_rejects_guesses() {
        let mut session = GameSession::new(code("4827"), AttemptLimit::Ten);
        guess(&mut session, "4827").unwrap();

        assert_eq!(guess(&mut session, "1234"), Err(SessionClosed(Outcome::Won)));
        assert_eq!(session.guesses().len(), 1);
    }

    #[test]
    fn test_state_projection() {
        let mut session = GameSession::new(code("4827"), AttemptLimit::Fifteen);
        guess(&mut session, "1234").unwrap();

        let state = session.state();
        assert_eq!(state.outcome, Outcome::InProgress);
        assert_eq!(state.attempts_remaining, AttemptsRemaining::Limited(14));
        assert_eq!(state.guesses.len(), 1);
        assert_eq!(state.guesses[0].digits_correct, 2);
        assert_eq!(state.guesses[0].positions_correct, 0);
    }

    #[test]
    fn test_has_guessed() {
        let mut session = GameSession::new(code("4827"), AttemptLimit::Ten);
        assert!(!session.has_guessed(&code("1234")));

        guess(&mut session, "1234").unwrap();
        assert!(session.has_guessed(&code("1234")));
        assert!(!session.has_guessed(&code("4321")));
    }
}
