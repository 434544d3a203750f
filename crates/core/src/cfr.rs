//! Vanilla CFR traversal.
//!
//! The recursion walks the abstracted hold'em tree depth-first, keying
//! every decision into a flat infoset table and accumulating
//! counterfactual regrets and reach-weighted strategy sums. Utilities are
//! computed from player 0's perspective in the zero-sum heads-up game.

use std::path::Path;

use crate::abstraction::ActionAbstraction;
use crate::cards::Card;
use crate::error::SolverError;
use crate::eval::{rank7, INVALID_RANK};
use crate::game::{Action, GameState, MAX_PLAYERS};
use crate::infoset::{generate_key, InfosetMap};
use crate::persistence;

/// The CFR engine: abstraction, infoset table, and the per-hand action
/// history used to key decisions.
pub struct CfrEngine {
    abstraction: ActionAbstraction,
    infosets: InfosetMap,
    history: Vec<Action>,
}

impl CfrEngine {
    /// An engine with an empty infoset table.
    #[must_use]
    pub fn new(abstraction: ActionAbstraction) -> Self {
        Self {
            abstraction,
            infosets: InfosetMap::default(),
            history: Vec::new(),
        }
    }

    /// The infoset table accumulated so far.
    #[must_use]
    pub fn infosets(&self) -> &InfosetMap {
        &self.infosets
    }

    /// Number of infosets discovered.
    #[must_use]
    pub fn num_infosets(&self) -> usize {
        self.infosets.len()
    }

    /// Run `iterations` full-tree CFR passes. The template is re-dealt
    /// between iterations, which advances its deck RNG; a fixed-order
    /// deck re-deals the same hand, keeping runs deterministic.
    ///
    /// # Errors
    ///
    /// Propagates contract violations from the engine, which indicate a
    /// bug in action generation rather than a recoverable condition.
    pub fn run_iterations(
        &mut self,
        template: &mut GameState,
        iterations: u64,
    ) -> Result<(), SolverError> {
        for i in 0..iterations {
            log::debug!("CFR iteration {}/{iterations}", i + 1);
            self.history.clear();
            let state = template.clone();
            self.traverse(&state, [1.0; MAX_PLAYERS])?;
            template.redeal()?;
        }
        log::info!(
            "completed {iterations} CFR iterations, {} infosets",
            self.infosets.len()
        );
        Ok(())
    }

    /// The average (equilibrium-approximating) strategy for a key, or
    /// `None` for an unknown key. Uniform when the infoset was never
    /// visited.
    #[must_use]
    pub fn average_strategy(&self, key: &str) -> Option<Vec<f64>> {
        let node = self.infosets.get(key)?;
        let n = node.cumulative_strategy.len();
        if n == 0 {
            return None;
        }
        let total: f64 = node.cumulative_strategy.iter().sum();
        if node.visit_count == 0 || total <= 0.0 {
            #[allow(clippy::cast_precision_loss)]
            let uniform = 1.0 / n as f64;
            Some(vec![uniform; n])
        } else {
            Some(node.cumulative_strategy.iter().map(|s| s / total).collect())
        }
    }

    /// Persist the infoset table.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Io`] when the file cannot be written.
    pub fn save_infosets<P: AsRef<Path>>(&self, path: P) -> Result<(), SolverError> {
        persistence::save_infosets(&self.infosets, path.as_ref())
    }

    /// Load a previously saved infoset table, replacing the current one.
    /// Returns `false` (without error) when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Io`] for read failures other than a missing
    /// file.
    pub fn load_infosets<P: AsRef<Path>>(&mut self, path: P) -> Result<bool, SolverError> {
        match persistence::load_infosets(path.as_ref())? {
            Some(map) => {
                self.infosets = map;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn traverse(
        &mut self,
        state: &GameState,
        reach: [f64; MAX_PLAYERS],
    ) -> Result<f64, SolverError> {
        if state.is_terminal() {
            return Ok(self.terminal_utility(state));
        }
        let Some(player) = state.current_player() else {
            return Ok(0.0);
        };

        let hole_cards = state.hand(player)?;
        let key = generate_key(
            player,
            hole_cards,
            state.board(),
            state.street(),
            &self.history,
        );

        let legal_actions = self.abstraction.get_abstract_actions(state);
        if legal_actions.is_empty() {
            log::error!("no legal actions at non-terminal infoset '{key}'");
            return Ok(0.0);
        }

        let node = self.infosets.entry(key.clone()).or_default();
        if node.cumulative_regrets.len() != legal_actions.len() {
            node.initialize(legal_actions.len());
            node.key.clone_from(&key);
        }
        let strategy = node.current_strategy();

        let mut action_values = vec![0.0; legal_actions.len()];
        for (i, action) in legal_actions.iter().enumerate() {
            let mut next_state = state.clone();
            self.history.push(*action);
            let applied = next_state.apply_action(action);
            let value = match applied {
                Ok(()) => {
                    let mut next_reach = reach;
                    next_reach[player] *= strategy[i];
                    self.traverse(&next_state, next_reach)
                }
                Err(e) => Err(e),
            };
            self.history.pop();
            action_values[i] = value?;
        }

        let node_value: f64 = strategy
            .iter()
            .zip(&action_values)
            .map(|(p, v)| p * v)
            .sum();

        let opp_reach: f64 = (0..state.num_players())
            .filter(|&q| q != player)
            .map(|q| reach[q])
            .product();
        let weighted_strategy: Vec<f64> = strategy.iter().map(|p| p * reach[player]).collect();

        if let Some(node) = self.infosets.get_mut(&key) {
            node.update_regrets(&action_values, node_value, opp_reach);
            node.update_strategy_sum(&weighted_strategy);
        }

        Ok(node_value)
    }

    /// Player 0's net utility at a terminal state: fold payoffs by
    /// contribution, complete-board showdowns by rank comparison, and
    /// incomplete-board showdowns by exhaustive runout enumeration.
    #[must_use]
    pub fn terminal_utility(&self, state: &GameState) -> f64 {
        let num_players = state.num_players();
        let contributions = state.contributions();
        let live: Vec<usize> = (0..num_players)
            .filter(|&p| !state.is_folded(p).unwrap_or(true))
            .collect();

        if live.len() == 1 {
            let winner = live[0];
            return if winner == 0 {
                let won: u32 = (1..num_players).map(|p| contributions[p]).sum();
                f64::from(won)
            } else {
                -f64::from(contributions[0])
            };
        }

        if num_players == 2 {
            let Ok(p0_hole) = state.hand(0) else {
                return 0.0;
            };
            let Ok(p1_hole) = state.hand(1) else {
                return 0.0;
            };

            if state.board_cards_dealt() == 5 {
                let p0_rank = rank7(p0_hole[0], p0_hole[1], state.board());
                let p1_rank = rank7(p1_hole[0], p1_hole[1], state.board());
                if p0_rank == INVALID_RANK || p1_rank == INVALID_RANK {
                    log::error!("invalid showdown ranks; state:\n{state}");
                    return 0.0;
                }
                return if p0_rank < p1_rank {
                    f64::from(contributions[1])
                } else if p1_rank < p0_rank {
                    -f64::from(contributions[0])
                } else {
                    0.0
                };
            }

            return Self::board_completion_equity(
                p0_hole,
                p1_hole,
                state.board(),
                &state.remaining_cards(),
                state.pot(),
            );
        }

        // Multiway showdowns are outside the heads-up utility model.
        if state.is_folded(0).unwrap_or(false) {
            -f64::from(contributions[0])
        } else {
            log::warn!("multiway showdown utility unsupported ({num_players} players)");
            0.0
        }
    }

    /// Player 0's net equity against player 1, enumerating every board
    /// completion from `remaining`:
    /// `(p0_wins - p1_wins) * (pot / 2) / runouts`.
    #[must_use]
    pub fn board_completion_equity(
        p0_hole: [Card; 2],
        p1_hole: [Card; 2],
        board: &[Card],
        remaining: &[Card],
        pot: u32,
    ) -> f64 {
        let half_pot = f64::from(pot) / 2.0;
        let needed = 5usize.saturating_sub(board.len());

        if needed == 0 {
            let p0_rank = rank7(p0_hole[0], p0_hole[1], board);
            let p1_rank = rank7(p1_hole[0], p1_hole[1], board);
            if p0_rank == INVALID_RANK || p1_rank == INVALID_RANK {
                log::error!("invalid ranks in equity computation");
                return 0.0;
            }
            return if p0_rank < p1_rank {
                half_pot
            } else if p1_rank < p0_rank {
                -half_pot
            } else {
                0.0
            };
        }

        if remaining.len() < needed {
            log::warn!(
                "cannot complete the board: need {needed} cards, {} remain",
                remaining.len()
            );
            return 0.0;
        }

        let mut p0_wins: i64 = 0;
        let mut p1_wins: i64 = 0;
        let mut runouts: i64 = 0;
        let mut full_board = board.to_vec();
        enumerate_runouts(&mut full_board, remaining, 0, needed, &mut |completed| {
            let p0_rank = rank7(p0_hole[0], p0_hole[1], completed);
            let p1_rank = rank7(p1_hole[0], p1_hole[1], completed);
            if p0_rank == INVALID_RANK || p1_rank == INVALID_RANK {
                log::error!("invalid ranks on runout; skipping");
                return;
            }
            runouts += 1;
            if p0_rank < p1_rank {
                p0_wins += 1;
            } else if p1_rank < p0_rank {
                p1_wins += 1;
            }
        });

        if runouts == 0 {
            log::warn!("no valid runouts in equity enumeration");
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let net = (p0_wins - p1_wins) as f64 * half_pot / runouts as f64;
        net
    }
}

/// Visit every `needed`-card completion of `board` drawn from
/// `remaining[start..]`, in combination order.
fn enumerate_runouts(
    board: &mut Vec<Card>,
    remaining: &[Card],
    start: usize,
    needed: usize,
    visit: &mut impl FnMut(&[Card]),
) {
    if needed == 0 {
        visit(board);
        return;
    }
    let last_start = remaining.len() - needed;
    for i in start..=last_start {
        board.push(remaining[i]);
        enumerate_runouts(board, remaining, i + 1, needed - 1, visit);
        board.pop();
    }
}
