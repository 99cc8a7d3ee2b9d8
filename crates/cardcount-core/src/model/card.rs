use crate::model::ParseCardError;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// A counting target: one button on the card grid.
///
/// Field order matters for the derived `Ord`: suit first, then rank, which
/// is the order the grid is laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId {
    pub suit: Suit,
    pub rank: Rank,
}

impl CardId {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }

    /// Human-facing label such as `10♠`.
    pub fn label(self) -> String {
        format!("{}{}", self.rank, self.suit.symbol())
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for CardId {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let Some(first) = token.chars().next() else {
            return Err(ParseCardError::Empty);
        };

        // Numeric ranks may take two digits ("10"); letter ranks take one char.
        let split = if first.is_ascii_digit() {
            token
                .char_indices()
                .find(|(_, c)| !c.is_ascii_digit())
                .map(|(idx, _)| idx)
                .unwrap_or(token.len())
        } else {
            first.len_utf8()
        };

        let (rank, suit) = token.split_at(split);
        if suit.is_empty() {
            return Err(ParseCardError::Suit(String::new()));
        }
        Ok(CardId::new(rank.parse()?, suit.parse()?))
    }
}
