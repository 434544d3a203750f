//! Per-decision-node statistics and canonical key encoding.
//!
//! The key string is part of the persisted external interface and must be
//! byte-exact:
//! `P{player};{hole cards}|{board cards}|{street}|{action history}` with
//! cards ascending by ID and `-`-joined, and history tokens
//! `A{player}{F|C|R}{amount},` in chronological order.

use std::fmt::Write as _;

use rustc_hash::FxHashMap;

use crate::cards::Card;
use crate::game::{Action, Street};

/// Statistics for one information set.
///
/// The regret and strategy arrays are sized on first visit; the arity of
/// a key never changes afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InformationSet {
    pub key: String,
    pub cumulative_regrets: Vec<f64>,
    pub cumulative_strategy: Vec<f64>,
    pub visit_count: u64,
}

/// Flat table of every information set seen so far.
pub type InfosetMap = FxHashMap<String, InformationSet>;

impl InformationSet {
    /// Zero the statistics for `num_actions` legal actions.
    pub fn initialize(&mut self, num_actions: usize) {
        self.cumulative_regrets = vec![0.0; num_actions];
        self.cumulative_strategy = vec![0.0; num_actions];
        self.visit_count = 0;
    }

    /// Regret-matching distribution: proportional to positive regrets,
    /// uniform when no regret is positive.
    #[must_use]
    pub fn current_strategy(&self) -> Vec<f64> {
        let positive_sum: f64 = self.cumulative_regrets.iter().map(|r| r.max(0.0)).sum();
        if positive_sum > 0.0 {
            self.cumulative_regrets
                .iter()
                .map(|r| r.max(0.0) / positive_sum)
                .collect()
        } else {
            let n = self.cumulative_regrets.len();
            if n == 0 {
                Vec::new()
            } else {
                #[allow(clippy::cast_precision_loss)]
                let uniform = 1.0 / n as f64;
                vec![uniform; n]
            }
        }
    }

    /// Accumulate counterfactual regrets, weighted by the probability the
    /// opponents reach this node.
    pub fn update_regrets(&mut self, action_values: &[f64], node_value: f64, opp_reach: f64) {
        if action_values.len() != self.cumulative_regrets.len() {
            log::error!(
                "regret update arity {} does not match infoset '{}' arity {}",
                action_values.len(),
                self.key,
                self.cumulative_regrets.len()
            );
            return;
        }
        for (regret, &value) in self.cumulative_regrets.iter_mut().zip(action_values) {
            *regret += opp_reach * (value - node_value);
        }
    }

    /// Accumulate a reach-weighted strategy and bump the visit count.
    pub fn update_strategy_sum(&mut self, weighted_strategy: &[f64]) {
        if weighted_strategy.len() != self.cumulative_strategy.len() {
            log::error!(
                "strategy update arity {} does not match infoset '{}' arity {}",
                weighted_strategy.len(),
                self.key,
                self.cumulative_strategy.len()
            );
            return;
        }
        for (sum, &w) in self.cumulative_strategy.iter_mut().zip(weighted_strategy) {
            *sum += w;
        }
        self.visit_count += 1;
    }
}

/// Build the canonical infoset key for a decision from one player's
/// perspective.
#[must_use]
pub fn generate_key(
    player: usize,
    hole_cards: [Card; 2],
    board: &[Card],
    street: Street,
    history: &[Action],
) -> String {
    let mut key = String::with_capacity(48 + history.len() * 8);
    let _ = write!(key, "P{player};");

    let mut holes = hole_cards;
    holes.sort_unstable();
    let _ = write!(key, "{}-{}", holes[0], holes[1]);
    key.push('|');

    let mut dealt: Vec<Card> = board.iter().copied().filter(|c| c.is_valid()).collect();
    dealt.sort_unstable();
    for (i, card) in dealt.iter().enumerate() {
        if i > 0 {
            key.push('-');
        }
        let _ = write!(key, "{card}");
    }
    key.push('|');

    key.push_str(street.name());
    key.push('|');

    for action in history {
        let _ = write!(key, "A{}{}{},", action.player, action.kind.code(), action.amount);
    }

    key
}
