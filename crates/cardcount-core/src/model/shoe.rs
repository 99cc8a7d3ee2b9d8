use crate::model::card::CardId;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Largest shoe a table deals from.
pub const MAX_DECKS: usize = 8;

/// One or more 52-card decks dealt from the front.
#[derive(Debug, Clone)]
pub struct Shoe {
    cards: Vec<CardId>,
    dealt: usize,
}

impl Shoe {
    pub fn standard() -> Self {
        Self::with_decks(1)
    }

    /// `decks` is clamped to `1..=MAX_DECKS`.
    pub fn with_decks(decks: usize) -> Self {
        let decks = decks.clamp(1, MAX_DECKS);
        let mut cards = Vec::with_capacity(52 * decks);
        for _ in 0..decks {
            for suit in Suit::ALL.iter().copied() {
                for rank in Rank::ORDERED.iter().copied() {
                    cards.push(CardId::new(rank, suit));
                }
            }
        }
        Self { cards, dealt: 0 }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(decks: usize, rng: &mut R) -> Self {
        let mut shoe = Self::with_decks(decks);
        shoe.shuffle_in_place(rng);
        shoe
    }

    pub fn shuffled_with_seed(decks: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(decks, &mut rng)
    }

    /// Reshuffles every card, including those already dealt.
    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.dealt = 0;
    }

    pub fn deal(&mut self) -> Option<CardId> {
        let card = self.cards.get(self.dealt).copied()?;
        self.dealt += 1;
        Some(card)
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.dealt
    }

    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }
}
