//! Shuffled 52-card deck with a deal cursor.
//!
//! The deck owns its RNG so that cloning a game state clones the exact
//! deal sequence that would have followed. `set_fixed_order` is the
//! deterministic seam used throughout the test suites.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::bitboard::CardSet;
use crate::cards::{Card, NUM_CARDS};
use crate::error::SolverError;

/// A permutation of the 52 card IDs plus a cursor into it.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: [Card; NUM_CARDS],
    next: usize,
    rng: StdRng,
    fixed: bool,
}

impl Deck {
    /// A freshly shuffled deck seeded from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// A freshly shuffled deck with a deterministic RNG seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        let mut cards = [Card::INVALID; NUM_CARDS];
        for (id, slot) in cards.iter_mut().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let card = Card::from_id(id as u8).unwrap_or(Card::INVALID);
            *slot = card;
        }
        let mut deck = Self {
            cards,
            next: 0,
            rng,
            fixed: false,
        };
        deck.shuffle();
        deck
    }

    /// Deal the card under the cursor and advance.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::ContractViolation`] when the deck is exhausted.
    pub fn deal(&mut self) -> Result<Card, SolverError> {
        if self.next >= NUM_CARDS {
            return Err(SolverError::ContractViolation(
                "deal from an exhausted deck".to_string(),
            ));
        }
        let card = self.cards[self.next];
        self.next += 1;
        Ok(card)
    }

    /// Discard the card under the cursor. A no-op on an exhausted deck.
    pub fn burn(&mut self) {
        if self.next < NUM_CARDS {
            self.next += 1;
        }
    }

    /// Re-permute the deck and rewind the cursor.
    ///
    /// A fixed-order deck keeps its order and only rewinds, so the seam
    /// installed by [`Deck::set_fixed_order`] survives re-deals.
    pub fn shuffle(&mut self) {
        if !self.fixed {
            self.cards.shuffle(&mut self.rng);
        }
        self.next = 0;
    }

    /// Install an explicit deal order and rewind the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidInput`] unless `order` holds each of
    /// the 52 card IDs exactly once.
    pub fn set_fixed_order(&mut self, order: &[Card]) -> Result<(), SolverError> {
        if order.len() != NUM_CARDS {
            return Err(SolverError::InvalidInput(format!(
                "fixed deck order has {} cards, expected {NUM_CARDS}",
                order.len()
            )));
        }
        if CardSet::from_cards(order).len() != NUM_CARDS {
            return Err(SolverError::InvalidInput(
                "fixed deck order repeats or skips a card".to_string(),
            ));
        }
        self.cards.copy_from_slice(order);
        self.next = 0;
        self.fixed = true;
        Ok(())
    }

    /// Cards not yet dealt or burned.
    #[must_use]
    pub fn remaining(&self) -> usize {
        NUM_CARDS - self.next
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a full fixed order that starts with `prefix` and continues with
/// every other card in ascending ID order. Test helper.
///
/// # Errors
///
/// Returns [`SolverError::InvalidInput`] if `prefix` repeats a card.
pub fn fixed_order_with_prefix(prefix: &[Card]) -> Result<Vec<Card>, SolverError> {
    let seen = CardSet::from_cards(prefix);
    if seen.len() != prefix.len() {
        return Err(SolverError::InvalidInput(
            "fixed order prefix repeats a card".to_string(),
        ));
    }
    let mut order = prefix.to_vec();
    let mut rest = CardSet::FULL;
    for &card in prefix {
        rest.remove(card);
    }
    order.extend(rest.to_cards());
    Ok(order)
}
