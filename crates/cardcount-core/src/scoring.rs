//! Point assignments for dealt cards.
//!
//! [`score_for`] is the weighted table the counting grid uses. The
//! [`CountSystem`] trait lets the ledger and the drill swap in another
//! table, such as [`HiLo`], without touching their bookkeeping.

use crate::model::rank::Rank;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Weighted per-rank delta. Total over all integers: anything outside
/// 1..=13 scores 0.
pub const fn score_for(rank: i32) -> i32 {
    match rank {
        1 => -1,
        2 | 3 | 7 => 1,
        4..=6 => 2,
        8 | 9 => 0,
        10..=13 => -2,
        _ => 0,
    }
}

pub trait CountSystem: fmt::Debug + Send {
    fn name(&self) -> &'static str;

    fn score(&self, rank: Rank) -> i32;

    /// Net value of one full deck. Balanced systems return 0.
    fn deck_balance(&self) -> i32 {
        Rank::ORDERED.iter().map(|&rank| self.score(rank) * 4).sum()
    }
}

/// The grid's weighted table (see [`score_for`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeightedCount;

impl CountSystem for WeightedCount {
    fn name(&self) -> &'static str {
        "weighted"
    }

    fn score(&self, rank: Rank) -> i32 {
        score_for(i32::from(rank.value()))
    }
}

/// Classic high-low: 2-6 count +1, 7-9 count 0, tens, faces and aces -1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HiLo;

impl CountSystem for HiLo {
    fn name(&self) -> &'static str {
        "hi_lo"
    }

    fn score(&self, rank: Rank) -> i32 {
        match rank.value() {
            2..=6 => 1,
            7..=9 => 0,
            _ => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountSystemKind {
    #[default]
    Weighted,
    HiLo,
}

impl CountSystemKind {
    pub fn build(self) -> Box<dyn CountSystem> {
        match self {
            CountSystemKind::Weighted => Box::new(WeightedCount),
            CountSystemKind::HiLo => Box::new(HiLo),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            CountSystemKind::Weighted => "weighted",
            CountSystemKind::HiLo => "hi_lo",
        }
    }
}

impl core::str::FromStr for CountSystemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weighted" | "default" => Ok(CountSystemKind::Weighted),
            "hi_lo" | "hilo" | "hi-lo" => Ok(CountSystemKind::HiLo),
            other => Err(format!(
                "unknown count system '{other}' (expected weighted or hi_lo)"
            )),
        }
    }
}

/// Betting hint derived from the sign of a running count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advice {
    Idle,
    BetHigh,
    BetLow,
    Neutral,
}

impl Advice {
    pub const fn for_count(count: i64) -> Self {
        if count > 0 {
            Advice::BetHigh
        } else if count < 0 {
            Advice::BetLow
        } else {
            Advice::Neutral
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Advice::Idle => "Let's play!",
            Advice::BetHigh => "Count is positive! Bet high!",
            Advice::BetLow => "Count is negative. Bet low.",
            Advice::Neutral => "Count is neutral. Stick to basic strategy.",
        }
    }
}

impl fmt::Display for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
