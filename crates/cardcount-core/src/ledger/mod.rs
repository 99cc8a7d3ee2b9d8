//! Session state behind the counting grid.
//!
//! A [`SessionLedger`] pairs an [`OccurrenceMap`] (how many times each card
//! is currently marked) with a bounded [`HistoryLog`] of score events. The
//! running count is the sum of the log, so clearing a card's marks does not
//! move the count while undoing a card does.

mod history;
mod occurrences;

pub use history::{
    HistoryEntry, HistoryLog, OverflowPolicy, PushOutcome, REJECT_CAPACITY, TRUNCATE_CAPACITY,
};
pub use occurrences::{CardBadge, OccurrenceMap};

use crate::model::card::CardId;
use crate::scoring::{CountSystem, CountSystemKind};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerSettings {
    /// `None` takes the policy's default capacity.
    pub capacity: Option<usize>,
    pub policy: OverflowPolicy,
    pub system: CountSystemKind,
}

impl LedgerSettings {
    pub fn resolved_capacity(&self) -> usize {
        self.capacity.unwrap_or_else(|| self.policy.default_capacity())
    }
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            capacity: None,
            policy: OverflowPolicy::Reject,
            system: CountSystemKind::Weighted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Appended,
    /// The log was full under [`OverflowPolicy::Reject`]; nothing changed.
    LimitReached,
    Truncated {
        dropped: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnrecordOutcome {
    pub remaining: u32,
    pub history_removed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchKind {
    Record,
    Unrecord,
    Clear,
}

/// The card most recently acted on, for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Touch {
    pub card: CardId,
    pub kind: TouchKind,
}

#[derive(Debug)]
pub struct SessionLedger {
    occurrences: OccurrenceMap,
    history: HistoryLog,
    system: Box<dyn CountSystem>,
    limit_reached: bool,
    last_touched: Option<Touch>,
}

impl SessionLedger {
    pub fn new(settings: LedgerSettings) -> Self {
        Self {
            occurrences: OccurrenceMap::new(),
            history: HistoryLog::new(settings.resolved_capacity(), settings.policy),
            system: settings.system.build(),
            limit_reached: false,
            last_touched: None,
        }
    }

    /// Score of `card` under the active count system.
    pub fn score_of(&self, card: CardId) -> i32 {
        self.system.score(card.rank)
    }

    fn entry_for(&self, card: CardId) -> HistoryEntry {
        HistoryEntry::new(self.score_of(card), card)
    }

    pub fn record(&mut self, card: CardId) -> RecordOutcome {
        let entry = self.entry_for(card);
        let outcome = match self.history.push(entry) {
            PushOutcome::Appended => RecordOutcome::Appended,
            PushOutcome::Truncated { dropped } => {
                debug!(
                    target: "cardcount_core::ledger",
                    card = %card,
                    dropped,
                    capacity = self.history.capacity(),
                    "history truncated"
                );
                RecordOutcome::Truncated { dropped }
            }
            PushOutcome::Rejected => {
                self.limit_reached = true;
                warn!(
                    target: "cardcount_core::ledger",
                    card = %card,
                    capacity = self.history.capacity(),
                    "history limit reached; reset to continue"
                );
                return RecordOutcome::LimitReached;
            }
        };

        let count = self.occurrences.increment(card);
        self.last_touched = Some(Touch {
            card,
            kind: TouchKind::Record,
        });
        debug!(
            target: "cardcount_core::ledger",
            card = %card,
            score = entry.score,
            count,
            entries = self.history.len(),
            "recorded"
        );
        outcome
    }

    /// Undoes one mark of `card`. The history removal is attempted even when
    /// the card had no marks left.
    pub fn unrecord(&mut self, card: CardId) -> UnrecordOutcome {
        let remaining = self.occurrences.decrement(card);
        let entry = self.entry_for(card);
        let history_removed = self.history.remove_last_matching(&entry);
        self.last_touched = Some(Touch {
            card,
            kind: TouchKind::Unrecord,
        });
        debug!(
            target: "cardcount_core::ledger",
            card = %card,
            remaining,
            history_removed,
            "unrecorded"
        );
        UnrecordOutcome {
            remaining,
            history_removed,
        }
    }

    /// Forgets every mark of `card` without touching the history or total.
    pub fn clear_identity(&mut self, card: CardId) -> Option<u32> {
        let cleared = self.occurrences.clear(card);
        self.last_touched = Some(Touch {
            card,
            kind: TouchKind::Clear,
        });
        debug!(
            target: "cardcount_core::ledger",
            card = %card,
            cleared = cleared.unwrap_or(0),
            "cleared"
        );
        cleared
    }

    pub fn reset_all(&mut self) {
        self.occurrences.reset();
        self.history.clear();
        self.limit_reached = false;
        self.last_touched = None;
        debug!(target: "cardcount_core::ledger", "reset");
    }

    /// Dismisses the limit notice; state is left as is.
    pub fn acknowledge_limit(&mut self) {
        self.limit_reached = false;
    }

    pub fn total(&self) -> i64 {
        self.history.total()
    }

    pub fn count_of(&self, card: CardId) -> u32 {
        self.occurrences.get(card)
    }

    pub fn badge(&self, card: CardId) -> CardBadge {
        self.occurrences.badge(card)
    }

    pub fn occurrences(&self) -> &OccurrenceMap {
        &self.occurrences
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    pub fn recent(&self, n: usize) -> &[HistoryEntry] {
        self.history.recent(n)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.history.capacity()
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.history.policy()
    }

    pub fn system(&self) -> &dyn CountSystem {
        self.system.as_ref()
    }

    pub fn limit_reached(&self) -> bool {
        self.limit_reached
    }

    pub fn last_touched(&self) -> Option<Touch> {
        self.last_touched
    }
}

impl Default for SessionLedger {
    fn default() -> Self {
        Self::new(LedgerSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    fn card(rank: Rank, suit: Suit) -> CardId {
        CardId::new(rank, suit)
    }

    fn scores(ledger: &SessionLedger) -> Vec<i32> {
        ledger.history().iter().map(|e| e.score).collect()
    }

    #[test]
    fn record_then_unrecord_five_of_hearts() {
        let mut ledger = SessionLedger::default();
        let five = card(Rank::Five, Suit::Hearts);

        assert_eq!(ledger.record(five), RecordOutcome::Appended);
        assert_eq!(ledger.count_of(five), 1);
        assert_eq!(ledger.occurrences().len(), 1);
        assert_eq!(scores(&ledger), vec![2]);
        assert_eq!(ledger.total(), 2);

        let outcome = ledger.unrecord(five);
        assert_eq!(
            outcome,
            UnrecordOutcome {
                remaining: 0,
                history_removed: true
            }
        );
        assert!(ledger.occurrences().is_empty());
        assert!(ledger.is_empty());
        assert_eq!(ledger.total(), 0);
    }

    #[test]
    fn clear_identity_keeps_history_and_total() {
        let mut ledger = SessionLedger::default();
        let ace = card(Rank::Ace, Suit::Spades);
        for _ in 0..3 {
            ledger.record(ace);
        }
        assert_eq!(ledger.count_of(ace), 3);
        assert_eq!(ledger.total(), -3);

        assert_eq!(ledger.clear_identity(ace), Some(3));
        assert!(ledger.occurrences().is_empty());
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.total(), -3);
        assert_eq!(
            ledger.last_touched(),
            Some(Touch {
                card: ace,
                kind: TouchKind::Clear
            })
        );
    }

    #[test]
    fn unrecord_without_marks_still_removes_history() {
        let mut ledger = SessionLedger::default();
        let king = card(Rank::King, Suit::Clubs);
        ledger.record(king);
        ledger.record(king);
        ledger.clear_identity(king);

        let outcome = ledger.unrecord(king);
        assert_eq!(outcome.remaining, 0);
        assert!(outcome.history_removed);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.total(), -2);
    }

    #[test]
    fn unrecord_unknown_card_is_noop() {
        let mut ledger = SessionLedger::default();
        ledger.record(card(Rank::Four, Suit::Diamonds));
        let outcome = ledger.unrecord(card(Rank::Four, Suit::Hearts));
        assert!(!outcome.history_removed);
        assert_eq!(ledger.total(), 2);
        assert_eq!(ledger.count_of(card(Rank::Four, Suit::Diamonds)), 1);
    }

    #[test]
    fn unrecord_removes_latest_matching_entry() {
        let mut ledger = SessionLedger::default();
        let two = card(Rank::Two, Suit::Hearts);
        let nine = card(Rank::Nine, Suit::Hearts);
        ledger.record(two);
        ledger.record(nine);
        ledger.record(two);
        ledger.unrecord(two);
        let ranks: Vec<Rank> = ledger.history().iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![Rank::Two, Rank::Nine]);
        assert_eq!(ledger.count_of(two), 1);
    }

    #[test]
    fn reject_policy_raises_limit_and_leaves_state() {
        let mut ledger = SessionLedger::new(LedgerSettings {
            capacity: Some(3),
            policy: OverflowPolicy::Reject,
            system: CountSystemKind::Weighted,
        });
        let six = card(Rank::Six, Suit::Clubs);
        for _ in 0..3 {
            assert_eq!(ledger.record(six), RecordOutcome::Appended);
        }
        let jack = card(Rank::Jack, Suit::Clubs);
        assert_eq!(ledger.record(jack), RecordOutcome::LimitReached);
        assert!(ledger.limit_reached());
        assert_eq!(
            ledger.last_touched(),
            Some(Touch {
                card: six,
                kind: TouchKind::Record
            })
        );
        assert_eq!(ledger.count_of(jack), 0);
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.total(), 6);

        ledger.acknowledge_limit();
        assert!(!ledger.limit_reached());
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn truncate_policy_keeps_newest() {
        let mut ledger = SessionLedger::new(LedgerSettings {
            capacity: Some(2),
            policy: OverflowPolicy::Truncate,
            system: CountSystemKind::Weighted,
        });
        ledger.record(card(Rank::Ace, Suit::Hearts));
        ledger.record(card(Rank::Two, Suit::Hearts));
        assert_eq!(
            ledger.record(card(Rank::Four, Suit::Hearts)),
            RecordOutcome::Truncated { dropped: 1 }
        );
        assert_eq!(scores(&ledger), vec![1, 2]);
        assert_eq!(ledger.total(), 3);
        assert!(!ledger.limit_reached());
        // Marks are not pruned with the history.
        assert_eq!(ledger.count_of(card(Rank::Ace, Suit::Hearts)), 1);
    }

    #[test]
    fn reset_clears_everything() {
        let mut ledger = SessionLedger::new(LedgerSettings {
            capacity: Some(1),
            ..LedgerSettings::default()
        });
        ledger.record(card(Rank::Three, Suit::Spades));
        ledger.record(card(Rank::Three, Suit::Spades));
        assert!(ledger.limit_reached());

        ledger.reset_all();
        assert!(ledger.occurrences().is_empty());
        assert!(ledger.is_empty());
        assert_eq!(ledger.total(), 0);
        assert!(!ledger.limit_reached());
        assert_eq!(ledger.last_touched(), None);
    }

    #[test]
    fn hi_lo_system_scores_entries() {
        let mut ledger = SessionLedger::new(LedgerSettings {
            system: CountSystemKind::HiLo,
            ..LedgerSettings::default()
        });
        ledger.record(card(Rank::Five, Suit::Hearts));
        ledger.record(card(Rank::Ace, Suit::Hearts));
        ledger.record(card(Rank::Queen, Suit::Hearts));
        assert_eq!(scores(&ledger), vec![1, -1, -1]);
        assert_eq!(ledger.system().name(), "hi_lo");
        ledger.unrecord(card(Rank::Ace, Suit::Hearts));
        assert_eq!(ledger.total(), 0);
    }

    #[test]
    fn default_settings_use_reject_at_two_hundred() {
        let ledger = SessionLedger::default();
        assert_eq!(ledger.capacity(), REJECT_CAPACITY);
        assert_eq!(ledger.policy(), OverflowPolicy::Reject);
    }
}
