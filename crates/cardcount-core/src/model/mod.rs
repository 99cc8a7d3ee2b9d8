pub mod card;
pub mod rank;
pub mod shoe;
pub mod suit;

use core::fmt;

/// Failure to read a card, rank or suit token such as `10s` or `A♥`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCardError {
    Empty,
    Rank(String),
    Suit(String),
}

impl fmt::Display for ParseCardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCardError::Empty => write!(f, "empty card token"),
            ParseCardError::Rank(raw) => write!(f, "unknown rank '{raw}'"),
            ParseCardError::Suit(raw) => write!(f, "unknown suit '{raw}'"),
        }
    }
}

impl std::error::Error for ParseCardError {}
