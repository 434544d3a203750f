//! Card, rank, and suit primitives.
//!
//! A card is a dense integer ID in `[0, 52)`, computed as `13 * suit + rank`.
//! The ID doubles as the bit index in [`CardSet`](crate::bitboard::CardSet).

use std::fmt;
use std::str::FromStr;

use crate::error::SolverError;

/// Number of cards in a standard deck.
pub const NUM_CARDS: usize = 52;

/// Card rank, two low, ace high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Rank {
    Two = 0,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

/// All ranks in ascending strength order.
pub const ALL_RANKS: [Rank; 13] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

impl Rank {
    /// Parse the upper-case single-character spelling (`2`-`9`, `T`, `J`,
    /// `Q`, `K`, `A`).
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidInput`] for any other character.
    pub fn from_char(c: char) -> Result<Self, SolverError> {
        let rank = match c {
            '2' => Rank::Two,
            '3' => Rank::Three,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' => Rank::Ten,
            'J' => Rank::Jack,
            'Q' => Rank::Queen,
            'K' => Rank::King,
            'A' => Rank::Ace,
            _ => return Err(SolverError::InvalidInput(format!("rank character '{c}'"))),
        };
        Ok(rank)
    }

    /// The single-character spelling used in card notation.
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    /// Rank index, `Two = 0` through `Ace = 12`.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Card suit. The discriminant is the high part of the card ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Suit {
    Clubs = 0,
    Diamonds,
    Hearts,
    Spades,
}

/// All four suits in ID order.
pub const ALL_SUITS: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

impl Suit {
    /// Parse the lower-case single-character spelling (`c`, `d`, `h`, `s`).
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidInput`] for any other character.
    pub fn from_char(c: char) -> Result<Self, SolverError> {
        let suit = match c {
            'c' => Suit::Clubs,
            'd' => Suit::Diamonds,
            'h' => Suit::Hearts,
            's' => Suit::Spades,
            _ => return Err(SolverError::InvalidInput(format!("suit character '{c}'"))),
        };
        Ok(suit)
    }

    /// The single-character spelling used in card notation.
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        }
    }
}

/// A playing card identified by its dense ID.
///
/// Ordering and equality follow the ID, which keys canonical infoset
/// encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card(u8);

impl Card {
    /// Sentinel for an unknown or undealt card (ID 52).
    pub const INVALID: Card = Card(NUM_CARDS as u8);

    /// Build a card from rank and suit.
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Card(suit as u8 * 13 + rank as u8)
    }

    /// Build a card from a raw ID in `[0, 52)`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidInput`] when the ID is out of range.
    pub fn from_id(id: u8) -> Result<Self, SolverError> {
        if (id as usize) < NUM_CARDS {
            Ok(Card(id))
        } else {
            Err(SolverError::InvalidInput(format!("card ID {id}")))
        }
    }

    /// The dense card ID.
    #[must_use]
    pub const fn id(self) -> u8 {
        self.0
    }

    /// Whether this is a real card rather than the sentinel.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        (self.0 as usize) < NUM_CARDS
    }

    /// The card's rank. Meaningless for [`Card::INVALID`].
    #[must_use]
    pub fn rank(self) -> Rank {
        debug_assert!(self.is_valid());
        ALL_RANKS[(self.0 % 13) as usize]
    }

    /// The card's suit. Meaningless for [`Card::INVALID`].
    #[must_use]
    pub fn suit(self) -> Suit {
        debug_assert!(self.is_valid());
        ALL_SUITS[(self.0 / 13) as usize]
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}{}", self.rank().to_char(), self.suit().to_char())
        } else {
            write!(f, "??")
        }
    }
}

impl FromStr for Card {
    type Err = SolverError;

    /// Parse strict two-character notation, e.g. `Ah`, `Td`, `2c`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(su), None) => {
                let rank = Rank::from_char(r)
                    .map_err(|_| SolverError::InvalidInput(format!("card string '{s}'")))?;
                let suit = Suit::from_char(su)
                    .map_err(|_| SolverError::InvalidInput(format!("card string '{s}'")))?;
                Ok(Card::new(rank, suit))
            }
            _ => Err(SolverError::InvalidInput(format!("card string '{s}'"))),
        }
    }
}
