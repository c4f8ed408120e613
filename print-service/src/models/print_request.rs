use crate::error::PrintError;
use std::fmt;

/// Smallest printable number (inclusive).
pub const MIN_NUMBER: u64 = 100_000;
/// Upper bound (exclusive).
pub const MAX_NUMBER: u64 = 1_000_000;

/// The bound a rejected number fell outside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Below,
    AtOrAbove,
}

impl fmt::Display for RangeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeBound::Below => f.write_str("< 1e5"),
            RangeBound::AtOrAbove => f.write_str(">= 1e6"),
        }
    }
}

/// A six-digit number that has passed range validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintRequest {
    number: u64,
}

impl PrintRequest {
    pub fn new(number: u64) -> Result<Self, PrintError> {
        if number >= MAX_NUMBER {
            return Err(PrintError::OutOfRange {
                number: number.to_string(),
                bound: RangeBound::AtOrAbove,
            });
        }
        if number < MIN_NUMBER {
            return Err(PrintError::OutOfRange {
                number: number.to_string(),
                bound: RangeBound::Below,
            });
        }
        Ok(Self { number })
    }

    /// Validates a string of ASCII digits of any length. Callers check
    /// [`is_decimal_digits`] first.
    ///
    /// Digit strings too long for `u64` are still integers and are rejected
    /// as out of range, quoting the digits without leading zeros.
    pub fn from_digits(digits: &str) -> Result<Self, PrintError> {
        match digits.parse::<u64>() {
            Ok(number) => Self::new(number),
            Err(_) => {
                let trimmed = digits.trim_start_matches('0');
                Err(PrintError::OutOfRange {
                    number: if trimmed.is_empty() { "0" } else { trimmed }.to_string(),
                    bound: RangeBound::AtOrAbove,
                })
            }
        }
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    /// Fixed-width decimal rendering, exactly six characters.
    pub fn formatted(&self) -> String {
        format!("{:06}", self.number)
    }
}

/// True for a non-empty string made only of ASCII digits. Signs, spaces
/// and decimal points do not qualify.
pub fn is_decimal_digits(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}

impl TryFrom<u64> for PrintRequest {
    type Error = PrintError;

    fn try_from(number: u64) -> Result<Self, Self::Error> {
        Self::new(number)
    }
}
