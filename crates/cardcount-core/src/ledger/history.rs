use crate::model::card::CardId;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};

pub const REJECT_CAPACITY: usize = 200;
pub const TRUNCATE_CAPACITY: usize = 330;

/// What a full log does with one more entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Refuse the entry and leave the log as it is.
    #[default]
    Reject,
    /// Drop the oldest entries to make room.
    Truncate,
}

impl OverflowPolicy {
    pub const fn default_capacity(self) -> usize {
        match self {
            OverflowPolicy::Reject => REJECT_CAPACITY,
            OverflowPolicy::Truncate => TRUNCATE_CAPACITY,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            OverflowPolicy::Reject => "reject",
            OverflowPolicy::Truncate => "truncate",
        }
    }
}

impl core::str::FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(OverflowPolicy::Reject),
            "truncate" => Ok(OverflowPolicy::Truncate),
            other => Err(format!(
                "unknown overflow policy '{other}' (expected reject or truncate)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub score: i32,
    pub rank: Rank,
    pub suit: Suit,
}

impl HistoryEntry {
    pub const fn new(score: i32, card: CardId) -> Self {
        Self {
            score,
            rank: card.rank,
            suit: card.suit,
        }
    }

    pub const fn card(&self) -> CardId {
        CardId::new(self.rank, self.suit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Appended,
    Rejected,
    Truncated { dropped: usize },
}

/// Ordered score events with a hard upper bound on length.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    capacity: usize,
    policy: OverflowPolicy,
}

impl HistoryLog {
    /// A zero capacity is raised to 1.
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity.min(REJECT_CAPACITY)),
            capacity,
            policy,
        }
    }

    pub fn push(&mut self, entry: HistoryEntry) -> PushOutcome {
        if self.entries.len() < self.capacity {
            self.entries.push(entry);
            return PushOutcome::Appended;
        }

        match self.policy {
            OverflowPolicy::Reject => PushOutcome::Rejected,
            OverflowPolicy::Truncate => {
                let dropped = self.entries.len() + 1 - self.capacity;
                self.entries.drain(..dropped);
                self.entries.push(entry);
                PushOutcome::Truncated { dropped }
            }
        }
    }

    /// Removes the most recent entry equal to `entry`.
    pub fn remove_last_matching(&mut self, entry: &HistoryEntry) -> bool {
        match self.entries.iter().rposition(|candidate| candidate == entry) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn total(&self) -> i64 {
        self.entries.iter().map(|entry| i64::from(entry.score)).sum()
    }

    /// The last `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> &[HistoryEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }
}
