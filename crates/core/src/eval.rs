//! Five- and seven-card hand evaluation.
//!
//! Ranks land in the published 7,462-class space: 1 is a royal flush,
//! 7,462 the worst high card, and [`INVALID_RANK`] (0) marks invalid
//! input. Lower is stronger; the engine only ever compares codes.

use std::fmt;
use std::sync::OnceLock;

use crate::bitboard::CardSet;
use crate::cards::Card;

/// Totally ordered hand strength code. Lower is stronger.
pub type HandRank = u16;

/// Sentinel for invalid input (duplicate or sentinel cards).
pub const INVALID_RANK: HandRank = 0;

/// The weakest possible hand (7-5-4-3-2 offsuit).
pub const WORST_RANK: HandRank = 7462;

// Category offsets; a hand's code is offset + in-category index + 1.
const OFFSET_STRAIGHT_FLUSH: u16 = 0; // 10 classes
const OFFSET_QUADS: u16 = 10; // 156
const OFFSET_FULL_HOUSE: u16 = 166; // 156
const OFFSET_FLUSH: u16 = 322; // 1277
const OFFSET_STRAIGHT: u16 = 1599; // 10
const OFFSET_TRIPS: u16 = 1609; // 858
const OFFSET_TWO_PAIR: u16 = 2467; // 858
const OFFSET_PAIR: u16 = 3325; // 2860
const OFFSET_HIGH_CARD: u16 = 6185; // 1277

/// Hand category, strongest first. Derived from a rank code for
/// diagnostics and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandCategory {
    StraightFlush,
    FourOfAKind,
    FullHouse,
    Flush,
    Straight,
    ThreeOfAKind,
    TwoPair,
    OnePair,
    HighCard,
}

impl HandCategory {
    /// The category a rank code falls in, or `None` for [`INVALID_RANK`].
    #[must_use]
    pub fn of(rank: HandRank) -> Option<Self> {
        match rank {
            0 => None,
            r if r <= OFFSET_QUADS => Some(Self::StraightFlush),
            r if r <= OFFSET_FULL_HOUSE => Some(Self::FourOfAKind),
            r if r <= OFFSET_FLUSH => Some(Self::FullHouse),
            r if r <= OFFSET_STRAIGHT => Some(Self::Flush),
            r if r <= OFFSET_TRIPS => Some(Self::Straight),
            r if r <= OFFSET_TWO_PAIR => Some(Self::ThreeOfAKind),
            r if r <= OFFSET_PAIR => Some(Self::TwoPair),
            r if r <= OFFSET_HIGH_CARD => Some(Self::OnePair),
            r if r <= WORST_RANK => Some(Self::HighCard),
            _ => None,
        }
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::StraightFlush => "straight flush",
            Self::FourOfAKind => "four of a kind",
            Self::FullHouse => "full house",
            Self::Flush => "flush",
            Self::Straight => "straight",
            Self::ThreeOfAKind => "three of a kind",
            Self::TwoPair => "two pair",
            Self::OnePair => "one pair",
            Self::HighCard => "high card",
        };
        f.write_str(name)
    }
}

/// Rank a 5-card hand.
///
/// Returns [`INVALID_RANK`] unless the five cards are distinct and valid.
#[must_use]
pub fn rank5(cards: [Card; 5]) -> HandRank {
    if CardSet::from_cards(&cards).len() != 5 {
        return INVALID_RANK;
    }

    let mut counts = [0u8; 13];
    for card in cards {
        counts[card.rank().index()] += 1;
    }
    let flush = cards.iter().all(|c| c.suit() == cards[0].suit());
    let straight = straight_high(&counts);

    if let Some(high) = straight {
        let idx = 12 - high as u16;
        return if flush {
            OFFSET_STRAIGHT_FLUSH + idx + 1
        } else {
            OFFSET_STRAIGHT + idx + 1
        };
    }
    if flush {
        return OFFSET_FLUSH + distinct5_index(&counts) + 1;
    }

    // Rank multiplicities, highest count first, ties broken by rank.
    let quad = find_count(&counts, 4);
    if let Some(q) = quad {
        let kicker = highest_except(&counts, &[q]);
        return OFFSET_QUADS + group_index(q, kicker_pos(kicker, &[q])) + 1;
    }

    let trips = find_count(&counts, 3);
    let pairs = pair_ranks(&counts);
    match (trips, pairs.as_slice()) {
        (Some(t), [p, ..]) => {
            OFFSET_FULL_HOUSE + group_index(t, kicker_pos(*p, &[t])) + 1
        }
        (Some(t), []) => {
            let (k1, k2) = top_two_except(&counts, t);
            let pos = [kicker_pos(k1, &[t]), kicker_pos(k2, &[t])];
            OFFSET_TRIPS + (12 - t as u16) * 66 + desc_subset_index(12, &pos) + 1
        }
        (None, [hi, lo]) => {
            let kicker = highest_except(&counts, &[*hi, *lo]);
            let pair_pos = [(12 - *hi) as u16, (12 - *lo) as u16];
            let pair_idx = desc_subset_index(13, &pair_pos);
            OFFSET_TWO_PAIR + pair_idx * 11 + kicker_pos(kicker, &[*hi, *lo]) + 1
        }
        (None, [p]) => {
            let kickers = top_three_except(&counts, *p);
            let pos = [
                kicker_pos(kickers[0], &[*p]),
                kicker_pos(kickers[1], &[*p]),
                kicker_pos(kickers[2], &[*p]),
            ];
            OFFSET_PAIR + (12 - *p as u16) * 220 + desc_subset_index(12, &pos) + 1
        }
        _ => OFFSET_HIGH_CARD + distinct5_index(&counts) + 1,
    }
}

/// Rank the best 5-card hand from two hole cards and a complete board.
///
/// Returns [`INVALID_RANK`] unless the board has exactly five cards and
/// all seven cards are distinct and valid.
#[must_use]
pub fn rank7(c1: Card, c2: Card, board: &[Card]) -> HandRank {
    if board.len() != 5 {
        return INVALID_RANK;
    }
    let cards = [c1, c2, board[0], board[1], board[2], board[3], board[4]];
    if CardSet::from_cards(&cards).len() != 7 {
        return INVALID_RANK;
    }
    best_of_seven(&cards)
}

fn best_of_seven(cards: &[Card; 7]) -> HandRank {
    let mut best = HandRank::MAX;
    for skip_a in 0..7 {
        for skip_b in skip_a + 1..7 {
            let mut five = [Card::INVALID; 5];
            let mut n = 0;
            for (i, &card) in cards.iter().enumerate() {
                if i != skip_a && i != skip_b {
                    five[n] = card;
                    n += 1;
                }
            }
            best = best.min(rank5(five));
        }
    }
    best
}

/// High rank index of a 5-card straight, if present. The wheel reports a
/// high of Five.
fn straight_high(counts: &[u8; 13]) -> Option<usize> {
    for high in (4..=12).rev() {
        if (high - 4..=high).all(|r| counts[r] > 0) {
            return Some(high);
        }
    }
    if counts[12] > 0 && (0..=3).all(|r| counts[r] > 0) {
        return Some(3);
    }
    None
}

fn find_count(counts: &[u8; 13], target: u8) -> Option<usize> {
    (0..13).rev().find(|&r| counts[r] == target)
}

/// Pair ranks, highest first.
fn pair_ranks(counts: &[u8; 13]) -> Vec<usize> {
    (0..13).rev().filter(|&r| counts[r] == 2).collect()
}

fn highest_except(counts: &[u8; 13], excluded: &[usize]) -> usize {
    (0..13)
        .rev()
        .find(|r| counts[*r] > 0 && !excluded.contains(r))
        .unwrap_or(0)
}

fn top_two_except(counts: &[u8; 13], excluded: usize) -> (usize, usize) {
    let mut found = [0usize; 2];
    let mut n = 0;
    for r in (0..13).rev() {
        if counts[r] > 0 && r != excluded {
            found[n] = r;
            n += 1;
            if n == 2 {
                break;
            }
        }
    }
    (found[0], found[1])
}

fn top_three_except(counts: &[u8; 13], excluded: usize) -> [usize; 3] {
    let mut found = [0usize; 3];
    let mut n = 0;
    for r in (0..13).rev() {
        if counts[r] > 0 && r != excluded {
            found[n] = r;
            n += 1;
            if n == 3 {
                break;
            }
        }
    }
    found
}

/// Index of `rank` in the descending ordering of ranks not in `excluded`.
fn kicker_pos(rank: usize, excluded: &[usize]) -> u16 {
    #[allow(clippy::cast_possible_truncation)]
    let pos = (rank + 1..13).filter(|r| !excluded.contains(r)).count() as u16;
    pos
}

/// `(12 - group_rank) * group_width + kicker_position` for the quads and
/// full-house categories, both of which pick one group rank and one of
/// the 12 remaining ranks.
fn group_index(group_rank: usize, kicker_position: u16) -> u16 {
    (12 - group_rank as u16) * 12 + kicker_position
}

fn choose(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut out = 1usize;
    for i in 0..k {
        out = out * (n - i) / (i + 1);
    }
    out
}

/// Position of a k-subset in the descending-lexicographic enumeration of
/// subsets of an m-element ordered universe. `positions` are ascending,
/// with 0 the strongest element.
fn desc_subset_index(m: usize, positions: &[u16]) -> u16 {
    let k = positions.len();
    let mut idx = 0usize;
    let mut next = 0usize;
    for (i, &p) in positions.iter().enumerate() {
        for q in next..p as usize {
            idx += choose(m - 1 - q, k - 1 - i);
        }
        next = p as usize + 1;
    }
    #[allow(clippy::cast_possible_truncation)]
    let idx = idx as u16;
    idx
}

/// In-category index for the flush and high-card categories: the
/// descending-lexicographic position of the 5 distinct ranks, with the 10
/// straight sets squeezed out.
fn distinct5_index(counts: &[u8; 13]) -> u16 {
    let mut positions = [0u16; 5];
    let mut n = 0;
    for r in (0..13).rev() {
        if counts[r] > 0 {
            positions[n] = 12 - r as u16;
            n += 1;
        }
    }
    let all_idx = desc_subset_index(13, &positions);
    let below = straight_set_indices()
        .iter()
        .filter(|&&s| s < all_idx)
        .count();
    #[allow(clippy::cast_possible_truncation)]
    let below = below as u16;
    all_idx - below
}

/// Descending-lex indices of the 10 straight rank sets, used to skip them
/// inside the flush and high-card enumerations.
fn straight_set_indices() -> &'static [u16; 10] {
    static INDICES: OnceLock<[u16; 10]> = OnceLock::new();
    INDICES.get_or_init(|| {
        let mut out = [0u16; 10];
        for (i, high) in (4..=12).rev().enumerate() {
            let mut positions = [0u16; 5];
            for (j, r) in (high - 4..=high).rev().enumerate() {
                positions[j] = 12 - r as u16;
            }
            out[i] = desc_subset_index(13, &positions);
        }
        // Wheel: A-5-4-3-2.
        out[9] = desc_subset_index(13, &[0, 9, 10, 11, 12]);
        out
    })
}
