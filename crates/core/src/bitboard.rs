//! 64-bit card set.
//!
//! Bit `i` stands for the card with ID `i`. Used for duplicate detection,
//! dead-card tracking, and the undealt-card complement.

use crate::cards::{Card, NUM_CARDS};

/// A set of cards packed into a `u64` bitboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardSet(u64);

impl CardSet {
    /// The empty set.
    pub const EMPTY: CardSet = CardSet(0);

    /// All 52 cards.
    pub const FULL: CardSet = CardSet((1 << NUM_CARDS) - 1);

    /// Add a card to the set. The sentinel is ignored.
    pub fn insert(&mut self, card: Card) {
        if card.is_valid() {
            self.0 |= 1 << card.id();
        }
    }

    /// Remove a card from the set. The sentinel is ignored.
    pub fn remove(&mut self, card: Card) {
        if card.is_valid() {
            self.0 &= !(1 << card.id());
        }
    }

    /// Whether the set contains `card`. Always false for the sentinel.
    #[must_use]
    pub const fn contains(self, card: Card) -> bool {
        card.is_valid() && self.0 & (1 << card.id()) != 0
    }

    /// Number of cards in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Remove and return the lowest-ID card, or `None` when empty.
    pub fn pop_lowest(&mut self) -> Option<Card> {
        if self.0 == 0 {
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        let id = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Card::from_id(id).ok()
    }

    /// Build a set from a slice of cards. Sentinels are skipped.
    #[must_use]
    pub fn from_cards(cards: &[Card]) -> Self {
        let mut set = CardSet::EMPTY;
        for &card in cards {
            set.insert(card);
        }
        set
    }

    /// The cards in the set, in ascending ID order.
    #[must_use]
    pub fn to_cards(self) -> Vec<Card> {
        let mut set = self;
        let mut cards = Vec::with_capacity(set.len());
        while let Some(card) = set.pop_lowest() {
            cards.push(card);
        }
        cards
    }

    /// The raw bit pattern.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }
}
