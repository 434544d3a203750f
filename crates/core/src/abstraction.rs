//! Rule-driven action abstraction.
//!
//! Generates the discrete legal action set for a state from a street- and
//! position-indexed configuration: pot fractions, big-blind multiples,
//! and exact chip amounts, each clamped against the min-raise and the
//! all-in total.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::game::{Action, GameState, Position, Street, ALL_POSITIONS};

/// Sizing values indexed by street, then position.
pub type SizingTable<T> = BTreeMap<Street, BTreeMap<Position, Vec<T>>>;

/// Build a table that applies the same values to every position.
#[must_use]
pub fn uniform_table<T: Clone>(rows: Vec<(Street, Vec<T>)>) -> SizingTable<T> {
    let mut table = SizingTable::new();
    for (street, values) in rows {
        let by_pos: BTreeMap<Position, Vec<T>> = ALL_POSITIONS
            .iter()
            .map(|&pos| (pos, values.clone()))
            .collect();
        table.insert(street, by_pos);
    }
    table
}

/// Abstraction configuration.
///
/// The three raise-sizing families are independent; a street/position may
/// draw candidates from any or all of them. Non-positive sizings are
/// dropped with a warning when the abstraction is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbstractionConfig {
    #[serde(default = "default_true")]
    pub allow_fold: bool,
    #[serde(default = "default_true")]
    pub allow_check_call: bool,
    #[serde(default = "default_true")]
    pub allow_all_in: bool,
    /// Raise sizings as fractions of the pot after a call.
    #[serde(default)]
    pub fractions: SizingTable<f64>,
    /// Raise sizings as big-blind multiples.
    #[serde(default)]
    pub bb_multipliers: SizingTable<f64>,
    /// Raise sizings as absolute chip amounts.
    #[serde(default)]
    pub exact_amounts: SizingTable<u32>,
}

fn default_true() -> bool {
    true
}

impl Default for AbstractionConfig {
    /// The stock sizing scheme: pot fractions and BB multiples on every
    /// street, exact bets postflop, all applied uniformly across
    /// positions.
    fn default() -> Self {
        Self {
            allow_fold: true,
            allow_check_call: true,
            allow_all_in: true,
            fractions: uniform_table(vec![
                (Street::Preflop, vec![0.5, 0.75, 1.0, 1.25]),
                (Street::Flop, vec![0.25, 0.33, 0.5, 0.66, 0.75, 1.0, 1.25, 1.5]),
                (Street::Turn, vec![0.33, 0.5, 0.66, 0.75, 1.0, 1.25, 1.5, 2.0]),
                (Street::River, vec![0.33, 0.5, 0.75, 1.0, 1.5, 2.0, 2.5]),
            ]),
            bb_multipliers: uniform_table(vec![
                (Street::Preflop, vec![2.2, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0]),
                (Street::Flop, vec![1.0, 1.5, 2.0]),
                (Street::Turn, vec![1.5, 2.0, 2.5]),
                (Street::River, vec![2.0, 2.5, 3.0]),
            ]),
            exact_amounts: uniform_table(vec![
                (Street::Flop, vec![5, 8, 10, 12, 15, 20, 25, 30]),
                (Street::Turn, vec![10, 15, 20, 25, 30, 40, 50]),
                (Street::River, vec![20, 30, 40, 50, 75, 100]),
            ]),
        }
    }
}

/// A validated action abstraction ready to enumerate actions.
#[derive(Debug, Clone)]
pub struct ActionAbstraction {
    config: AbstractionConfig,
}

impl ActionAbstraction {
    /// Build an abstraction, dropping unusable sizings with a warning.
    #[must_use]
    pub fn new(mut config: AbstractionConfig) -> Self {
        sanitize_real(&mut config.fractions, "pot-fraction");
        sanitize_real(&mut config.bb_multipliers, "bb-multiple");
        sanitize_exact(&mut config.exact_amounts);
        Self { config }
    }

    /// The sanitized configuration.
    #[must_use]
    pub fn config(&self) -> &AbstractionConfig {
        &self.config
    }

    /// The ordered, duplicate-free set of discrete actions legal at
    /// `state`. Empty when the hand is over or the acting player has
    /// folded.
    #[must_use]
    pub fn get_abstract_actions(&self, state: &GameState) -> Vec<Action> {
        let Some(player) = state.current_player() else {
            return Vec::new();
        };
        if state.is_terminal() || state.is_folded(player).unwrap_or(true) {
            return Vec::new();
        }

        let stack = state.stacks()[player];
        let player_bet = state.current_bets()[player];
        let max_bet = state.max_bet();
        let to_call = max_bet - player_bet;
        let big_blind = state.big_blind();

        let mut actions = Vec::new();

        if self.config.allow_fold && player_bet < max_bet {
            actions.push(Action::fold(player));
        }

        if self.config.allow_check_call && (to_call == 0 || stack > 0) {
            // An all-in call when the stack cannot cover the max bet.
            let amount = (player_bet + stack).min(max_bet);
            actions.push(Action::call(player, amount));
        }

        let min_raise_increment = state.last_raise_size().max(big_blind);
        let min_raise_total = max_bet + min_raise_increment;
        let max_raise_total = player_bet + stack;

        if max_raise_total > max_bet {
            for total in self.raise_totals(state, player, min_raise_total, max_raise_total) {
                actions.push(Action::raise(player, total));
            }
        }

        if actions.is_empty() && stack > 0 {
            log::warn!(
                "abstraction produced no actions for P{player} on {}; falling back to fold",
                state.street()
            );
            actions.push(Action::fold(player));
        }

        actions
    }

    fn raise_totals(
        &self,
        state: &GameState,
        player: usize,
        min_raise_total: u32,
        max_raise_total: u32,
    ) -> BTreeSet<u32> {
        let mut totals = BTreeSet::new();

        if min_raise_total >= max_raise_total {
            // Nothing between the min-raise and the stack: all-in or nothing.
            if self.config.allow_all_in {
                totals.insert(max_raise_total);
            }
            return totals;
        }

        let street = state.street();
        let num_players = state.num_players();
        let position = Position::from_seat(player, state.button_pos(), num_players)
            .effective(num_players);
        let player_bet = state.current_bets()[player];
        let max_bet = state.max_bet();
        let to_call = max_bet - player_bet;
        let big_blind = state.big_blind();

        // An "open opportunity": nobody has genuinely raised yet, so BB
        // multiples and exact amounts read as total bets, not increments.
        let open = match street {
            Street::Preflop => max_bet == big_blind && state.last_raise_size() <= big_blind,
            _ => max_bet == 0,
        };

        let mut add = |candidate: u32| {
            let clamped = candidate.clamp(min_raise_total, max_raise_total);
            if clamped > max_bet {
                totals.insert(clamped);
            }
        };

        for &fraction in sizings(&self.config.fractions, street, position) {
            let increment = round_chips(fraction * f64::from(state.pot() + to_call));
            add(max_bet.saturating_add(increment));
        }

        for &multiple in sizings(&self.config.bb_multipliers, street, position) {
            let chips = round_chips(multiple * f64::from(big_blind));
            add(if open {
                chips
            } else {
                max_bet.saturating_add(chips)
            });
        }

        for &exact in sizings(&self.config.exact_amounts, street, position) {
            add(if open {
                exact
            } else {
                max_bet.saturating_add(exact)
            });
        }

        if self.config.allow_all_in {
            totals.insert(max_raise_total);
        }

        totals
    }
}

impl Default for ActionAbstraction {
    fn default() -> Self {
        Self::new(AbstractionConfig::default())
    }
}

fn sizings<T>(table: &SizingTable<T>, street: Street, position: Position) -> &[T] {
    table
        .get(&street)
        .and_then(|by_pos| by_pos.get(&position))
        .map_or(&[], Vec::as_slice)
}

fn round_chips(value: f64) -> u32 {
    if value <= 0.0 {
        0
    } else if value >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let chips = value.round() as u32;
        chips
    }
}

fn sanitize_real(table: &mut SizingTable<f64>, family: &str) {
    for (street, by_pos) in table.iter_mut() {
        for (position, values) in by_pos.iter_mut() {
            values.retain(|&v| {
                let usable = v.is_finite() && v > 0.0;
                if !usable {
                    log::warn!("dropping {family} sizing {v} at {street}/{position}");
                }
                usable
            });
        }
    }
}

fn sanitize_exact(table: &mut SizingTable<u32>) {
    for (street, by_pos) in table.iter_mut() {
        for (position, values) in by_pos.iter_mut() {
            values.retain(|&v| {
                if v == 0 {
                    log::warn!("dropping zero exact sizing at {street}/{position}");
                }
                v > 0
            });
        }
    }
}
