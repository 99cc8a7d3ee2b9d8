use crate::model::card::CardId;
use std::collections::BTreeMap;

/// Per-card occurrence counts. A card with count zero has no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceMap {
    counts: BTreeMap<CardId, u32>,
}

impl OccurrenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the new count.
    pub fn increment(&mut self, card: CardId) -> u32 {
        let count = self.counts.entry(card).or_insert(0);
        *count += 1;
        *count
    }

    /// Returns the new count, never below zero.
    pub fn decrement(&mut self, card: CardId) -> u32 {
        let Some(count) = self.counts.get_mut(&card) else {
            return 0;
        };
        *count = count.saturating_sub(1);
        let remaining = *count;
        if remaining == 0 {
            self.counts.remove(&card);
        }
        remaining
    }

    /// Drops the card entirely, returning what it held.
    pub fn clear(&mut self, card: CardId) -> Option<u32> {
        self.counts.remove(&card)
    }

    pub fn get(&self, card: CardId) -> u32 {
        self.counts.get(&card).copied().unwrap_or(0)
    }

    pub fn badge(&self, card: CardId) -> CardBadge {
        CardBadge::from_count(self.get(card))
    }

    pub fn iter(&self) -> impl Iterator<Item = (CardId, u32)> + '_ {
        self.counts.iter().map(|(&card, &count)| (card, count))
    }

    pub fn reset(&mut self) {
        self.counts.clear();
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// How a grid button is drawn for its current count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardBadge {
    Idle,
    Active,
    Stacked(u32),
    /// Four or more: every copy of a single-deck card has been seen.
    Saturated(u32),
}

impl CardBadge {
    pub const fn from_count(count: u32) -> Self {
        match count {
            0 => CardBadge::Idle,
            1 => CardBadge::Active,
            2 | 3 => CardBadge::Stacked(count),
            n => CardBadge::Saturated(n),
        }
    }
}
