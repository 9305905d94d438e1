//! Pure Bulls and Cows game logic.
//!
//! The player hunts for a secret four-digit [`Code`] whose digits are all
//! distinct. Each guess is scored by [`evaluate`] into a [`Feedback`] pair,
//! and a [`GameSession`] tracks the guess log against an [`AttemptLimit`]
//! until the [`Outcome`] becomes terminal.
//!
//! # Example
//!
//! ```
//! use strictly_bulls_cows::{evaluate, AttemptLimit, Code, GameSession, Outcome};
//!
//! let secret = Code::parse("4827").unwrap();
//! let mut session = GameSession::new(secret, AttemptLimit::Ten);
//!
//! let guess = Code::parse("1234").unwrap();
//! let feedback = evaluate(session.secret(), &guess);
//! assert_eq!((feedback.digits_correct, feedback.positions_correct), (2, 0));
//!
//! let outcome = session.record_guess(guess, feedback).unwrap();
//! assert_eq!(outcome, Outcome::InProgress);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod code;
mod feedback;
mod invariants;
mod limit;
mod session;

pub use code::{CODE_LENGTH, Code, CodeError};
pub use feedback::{Feedback, evaluate};
pub use invariants::{FeedbackBounded, LogWithinLimit, OutcomeConsistent, assert_invariants};
pub use limit::{AttemptLimit, AttemptsRemaining, InvalidAttemptLimit};
pub use session::{GameSession, GuessRecord, Outcome, SessionClosed, SessionState};
