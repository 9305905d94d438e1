//! Four-digit codes with distinct digits.
//!
//! Both the secret and every guess share this shape, so a single newtype
//! covers them. A [`Code`] can only be built through validating
//! constructors, which lets the evaluator assume well-formed input.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of digits in every code.
pub const CODE_LENGTH: usize = 4;

/// A four-digit code over `0-9` with no repeated digit.
///
/// A leading zero is allowed, giving 10 * 9 * 8 * 7 = 5040 distinct codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Code {
    digits: [u8; CODE_LENGTH],
}

/// Reasons a raw string is not a valid code.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum CodeError {
    /// Wrong length, or a character that is not an ASCII digit.
    #[display("Guess must be exactly {} digits, got {:?}", CODE_LENGTH, _0)]
    Malformed(String),

    /// Four digits, but at least one of them repeats.
    #[display("Digits must be unique (no repeats), got {:?}", _0)]
    DuplicateDigits(String),
}

impl std::error::Error for CodeError {}

impl Code {
    /// Parses a code from its textual form.
    ///
    /// The shape check runs before the uniqueness check, so `"11a1"` is
    /// reported as malformed rather than as having duplicates.
    #[instrument]
    pub fn parse(raw: &str) -> Result<Self, CodeError> {
        if raw.chars().count() != CODE_LENGTH || !raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(CodeError::Malformed(raw.to_string()));
        }

        let mut digits = [0u8; CODE_LENGTH];
        for (slot, byte) in digits.iter_mut().zip(raw.bytes()) {
            *slot = byte - b'0';
        }

        Self::from_digits(digits).map_err(|_| CodeError::DuplicateDigits(raw.to_string()))
    }

    /// Builds a code from raw digit values.
    #[instrument]
    pub fn from_digits(digits: [u8; CODE_LENGTH]) -> Result<Self, CodeError> {
        if digits.iter().any(|d| *d > 9) {
            return Err(CodeError::Malformed(format!("{digits:?}")));
        }

        let mut seen = [false; 10];
        for d in digits {
            if seen[d as usize] {
                return Err(CodeError::DuplicateDigits(format!("{digits:?}")));
            }
            seen[d as usize] = true;
        }

        Ok(Self { digits })
    }

    /// Draws a code uniformly from all 5040 valid codes.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut pool: [u8; 10] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        let (picked, _) = pool.partial_shuffle(rng, CODE_LENGTH);

        let mut digits = [0u8; CODE_LENGTH];
        digits.copy_from_slice(picked);
        Self { digits }
    }

    /// Returns the digit values in order.
    pub fn digits(&self) -> &[u8; CODE_LENGTH] {
        &self.digits
    }

    /// Returns `true` if `digit` appears anywhere in the code.
    pub fn contains(&self, digit: u8) -> bool {
        self.digits.contains(&digit)
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for d in self.digits {
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Code {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Code> for String {
    fn from(code: Code) -> Self {
        code.to_string()
    }
}

impl TryFrom<String> for Code {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}
