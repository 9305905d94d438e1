//! Invariants that every [`GameSession`] must satisfy after a guess.
//!
//! Each invariant is a zero-sized type with a `holds` check. They are
//! asserted in debug builds after every transition and are usable from
//! tests directly.

use super::code::CODE_LENGTH;
use super::feedback::Feedback;
use super::session::{GameSession, Outcome};
use tracing::{instrument, warn};

/// Every score satisfies `positions_correct <= digits_correct <= 4`.
pub struct FeedbackBounded;

impl FeedbackBounded {
    /// Checks a single score.
    pub fn holds_for(feedback: &Feedback) -> bool {
        feedback.positions_correct <= feedback.digits_correct
            && feedback.digits_correct as usize <= CODE_LENGTH
    }

    /// Checks every logged score.
    #[instrument(skip(session))]
    pub fn holds(session: &GameSession) -> bool {
        let valid = session
            .guesses()
            .iter()
            .all(|record| Self::holds_for(&record.feedback()));
        if !valid {
            warn!("Feedback bounds violated");
        }
        valid
    }
}

/// The log never grows past the attempt limit.
pub struct LogWithinLimit;

impl LogWithinLimit {
    /// Checks the log length against the limit.
    #[instrument(skip(session))]
    pub fn holds(session: &GameSession) -> bool {
        let valid = match session.limit().max_attempts() {
            Some(max) => session.guesses().len() <= max as usize,
            None => true,
        };
        if !valid {
            warn!(
                logged = session.guesses().len(),
                limit = %session.limit(),
                "Guess log exceeds attempt limit"
            );
        }
        valid
    }
}

/// The outcome agrees with the log.
///
/// - `Won` iff the last guess is solved, and no earlier guess is.
/// - `Lost` iff no guess is solved and the limit is exhausted.
/// - `InProgress` otherwise.
pub struct OutcomeConsistent;

impl OutcomeConsistent {
    /// Derives the expected outcome from the log and compares.
    #[instrument(skip(session))]
    pub fn holds(session: &GameSession) -> bool {
        let log = session.guesses();
        let solved_at = log.iter().position(|r| r.feedback().is_solved());

        let expected = match solved_at {
            Some(i) if i + 1 == log.len() => Outcome::Won,
            Some(_) => {
                warn!("Guess recorded after a winning guess");
                return false;
            }
            None if session.limit().is_exhausted(log.len()) => Outcome::Lost,
            None => Outcome::InProgress,
        };

        let valid = expected == session.outcome();
        if !valid {
            warn!(expected = %expected, actual = %session.outcome(), "Outcome inconsistent with log");
        }
        valid
    }
}

/// Asserts all session invariants (panics on violation in debug builds).
#[instrument(skip(session))]
pub fn assert_invariants(session: &GameSession) {
    debug_assert!(FeedbackBounded::holds(session), "Feedback bounds violated");
    debug_assert!(LogWithinLimit::holds(session), "Guess log exceeds attempt limit");
    debug_assert!(OutcomeConsistent::holds(session), "Outcome inconsistent with log");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AttemptLimit, Code, evaluate};

    fn play(secret: &str, limit: AttemptLimit, guesses: &[&str]) -> GameSession {
        let mut session = GameSession::new(Code::parse(secret).unwrap(), limit);
        for raw in guesses {
            let g = Code::parse(raw).unwrap();
            let fb = evaluate(session.secret(), &g);
            session.record_guess(g, fb).unwrap();
        }
        session
    }

    #[test]
    fn test_invariants_hold_in_progress() {
        let session = play("4827", AttemptLimit::Ten, &["1234", "5678"]);
        assert!(FeedbackBounded::holds(&session));
        assert!(LogWithinLimit::holds(&session));
        assert!(OutcomeConsistent::holds(&session));
    }

    #[test]
    fn test_invariants_hold_after_win() {
        let session = play("4827", AttemptLimit::Ten, &["1234", "4827"]);
        assert!(OutcomeConsistent::holds(&session));
    }

    #[test]
    fn test_feedback_bounds_reject_impossible_score() {
        let bad = Feedback {
            digits_correct: 1,
            positions_correct: 2,
        };
        assert!(!FeedbackBounded::holds_for(&bad));

        let too_many = Feedback {
            digits_correct: 5,
            positions_correct: 0,
        };
        assert!(!FeedbackBounded::holds_for(&too_many));
    }
}
