//! Hold'em game model: streets, positions, actions, and the state machine.

mod state;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use state::GameState;

/// Maximum number of seats the engine supports.
pub const MAX_PLAYERS: usize = 6;

/// Betting street, in play order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    /// The street that follows this one. Showdown is terminal.
    #[must_use]
    pub const fn next(self) -> Street {
        match self {
            Street::Preflop => Street::Flop,
            Street::Flop => Street::Turn,
            Street::Turn => Street::River,
            Street::River | Street::Showdown => Street::Showdown,
        }
    }

    /// Canonical street name as it appears in infoset keys.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Street::Preflop => "Preflop",
            Street::Flop => "Flop",
            Street::Turn => "Turn",
            Street::River => "River",
            Street::Showdown => "Showdown",
        }
    }

    /// Number of board cards visible on this street.
    #[must_use]
    pub const fn board_cards(self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River | Street::Showdown => 5,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Table position relative to the button.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Btn,
    Sb,
    Bb,
    Utg,
    Mp,
    Co,
}

/// All positions, used when a sizing table applies uniformly.
pub const ALL_POSITIONS: [Position; 6] = [
    Position::Btn,
    Position::Sb,
    Position::Bb,
    Position::Utg,
    Position::Mp,
    Position::Co,
];

impl Position {
    /// The position of `seat` at a table of `num_players` with the button
    /// at `button_pos`. Heads-up, the button seat is the small blind.
    #[must_use]
    pub fn from_seat(seat: usize, button_pos: usize, num_players: usize) -> Position {
        let offset = (seat + num_players - button_pos % num_players) % num_players;
        if num_players == 2 {
            if offset == 0 {
                Position::Sb
            } else {
                Position::Bb
            }
        } else {
            match offset {
                0 => Position::Btn,
                1 => Position::Sb,
                2 => Position::Bb,
                3 => Position::Utg,
                4 => Position::Mp,
                _ => Position::Co,
            }
        }
    }

    /// Position used for sizing lookups: heads-up the SB is the BTN, so
    /// button sizings apply to both formats.
    #[must_use]
    pub const fn effective(self, num_players: usize) -> Position {
        match (self, num_players) {
            (Position::Sb, 2) => Position::Btn,
            (pos, _) => pos,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Position::Btn => "BTN",
            Position::Sb => "SB",
            Position::Bb => "BB",
            Position::Utg => "UTG",
            Position::Mp => "MP",
            Position::Co => "CO",
        };
        f.write_str(name)
    }
}

/// Kind of action at a decision point. A check is a call for zero
/// additional chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionType {
    Fold,
    Call,
    Raise,
}

impl ActionType {
    /// Single-letter code used in infoset keys.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            ActionType::Fold => 'F',
            ActionType::Call => 'C',
            ActionType::Raise => 'R',
        }
    }
}

/// A concrete action by one player.
///
/// For calls and raises, `amount` is the player's **total** street bet
/// after the action, not the increment. The derived ordering is
/// lexicographic over (player, kind, amount).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Action {
    pub player: usize,
    pub kind: ActionType,
    pub amount: u32,
}

impl Action {
    /// A fold by `player`.
    #[must_use]
    pub const fn fold(player: usize) -> Self {
        Action {
            player,
            kind: ActionType::Fold,
            amount: 0,
        }
    }

    /// A call (or check) leaving `player` with a total street bet of
    /// `amount`.
    #[must_use]
    pub const fn call(player: usize, amount: u32) -> Self {
        Action {
            player,
            kind: ActionType::Call,
            amount,
        }
    }

    /// A raise leaving `player` with a total street bet of `amount`.
    #[must_use]
    pub const fn raise(player: usize, amount: u32) -> Self {
        Action {
            player,
            kind: ActionType::Raise,
            amount,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{} {:?} {}", self.player, self.kind, self.amount)
    }
}
