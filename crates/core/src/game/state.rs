//! The hold'em hand state machine.
//!
//! A `GameState` is a value: cloning it reproduces the hand exactly,
//! including the deck cursor and RNG, so the CFR recursion can fork a
//! state per action. All chip amounts are integers; raise amounts are the
//! player's total street bet after the action.

use std::fmt;
use std::fmt::Write as _;

use arrayvec::ArrayVec;

use crate::bitboard::CardSet;
use crate::cards::Card;
use crate::deck::Deck;
use crate::error::SolverError;
use crate::game::{Action, ActionType, Street, MAX_PLAYERS};

/// Full state of one hand of no-limit hold'em for 2-6 players.
#[derive(Debug, Clone)]
pub struct GameState {
    num_players: usize,
    button_pos: usize,
    big_blind: u32,
    ante: u32,
    initial_stack: u32,
    stacks: ArrayVec<u32, MAX_PLAYERS>,
    current_bets: ArrayVec<u32, MAX_PLAYERS>,
    committed: ArrayVec<u32, MAX_PLAYERS>,
    has_folded: ArrayVec<bool, MAX_PLAYERS>,
    hands: ArrayVec<[Card; 2], MAX_PLAYERS>,
    board: [Card; 5],
    board_cards_dealt: usize,
    pot: u32,
    street: Street,
    to_act: Option<usize>,
    last_raise_size: u32,
    last_aggressor: Option<usize>,
    deck: Deck,
}

impl GameState {
    /// Start a hand with a freshly shuffled deck: collect antes, post
    /// blinds (SB = `big_blind / 2`), and deal two hole cards per player.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidInput`] for a player count outside
    /// `[2, 6]`, a button seat outside the table, or a zero big blind.
    pub fn new(
        num_players: usize,
        initial_stack: u32,
        ante: u32,
        button_pos: usize,
        big_blind: u32,
    ) -> Result<Self, SolverError> {
        Self::with_deck(
            num_players,
            initial_stack,
            ante,
            button_pos,
            big_blind,
            Deck::new(),
        )
    }

    /// Start a hand dealt from a caller-supplied deck, which is used as-is
    /// (no shuffle). This is the deterministic seam: pair it with
    /// [`Deck::set_fixed_order`] or [`Deck::with_seed`].
    ///
    /// # Errors
    ///
    /// Same contract as [`GameState::new`].
    pub fn with_deck(
        num_players: usize,
        initial_stack: u32,
        ante: u32,
        button_pos: usize,
        big_blind: u32,
        deck: Deck,
    ) -> Result<Self, SolverError> {
        if !(2..=MAX_PLAYERS).contains(&num_players) {
            return Err(SolverError::InvalidInput(format!(
                "num_players {num_players} outside [2, {MAX_PLAYERS}]"
            )));
        }
        if button_pos >= num_players {
            return Err(SolverError::InvalidInput(format!(
                "button_pos {button_pos} outside [0, {num_players})"
            )));
        }
        if big_blind == 0 {
            return Err(SolverError::InvalidInput("big_blind must be > 0".to_string()));
        }

        let mut state = Self {
            num_players,
            button_pos,
            big_blind,
            ante,
            initial_stack,
            stacks: (0..num_players).map(|_| initial_stack).collect(),
            current_bets: (0..num_players).map(|_| 0).collect(),
            committed: (0..num_players).map(|_| 0).collect(),
            has_folded: (0..num_players).map(|_| false).collect(),
            hands: (0..num_players).map(|_| [Card::INVALID; 2]).collect(),
            board: [Card::INVALID; 5],
            board_cards_dealt: 0,
            pot: 0,
            street: Street::Preflop,
            to_act: None,
            last_raise_size: big_blind,
            last_aggressor: None,
            deck,
        };

        if ante > 0 {
            for player in 0..num_players {
                let posted = state.stacks[player].min(ante);
                state.stacks[player] -= posted;
                state.committed[player] += posted;
                state.pot += posted;
            }
        }

        // Hole cards in standard order: card_i to player_i, then card_(n+i).
        for i in 0..num_players * 2 {
            state.hands[i % num_players][i / num_players] = state.deck.deal()?;
        }

        let (sb_seat, bb_seat) = state.blind_seats();
        state.post_blind(sb_seat, big_blind / 2);
        state.post_blind(bb_seat, big_blind);
        state.last_aggressor = Some(bb_seat);

        state.to_act = Some(if num_players == 2 {
            sb_seat
        } else {
            (button_pos + 3) % num_players
        });

        log::debug!(
            "hand started: {num_players} players, stack {initial_stack}, button {button_pos}, pot {}, first to act P{}",
            state.pot,
            state.to_act.unwrap_or(0)
        );
        Ok(state)
    }

    fn blind_seats(&self) -> (usize, usize) {
        if self.num_players == 2 {
            (self.button_pos, (self.button_pos + 1) % self.num_players)
        } else {
            (
                (self.button_pos + 1) % self.num_players,
                (self.button_pos + 2) % self.num_players,
            )
        }
    }

    fn bb_seat(&self) -> usize {
        self.blind_seats().1
    }

    fn post_blind(&mut self, player: usize, amount: u32) {
        let posted = self.stacks[player].min(amount);
        self.stacks[player] -= posted;
        self.current_bets[player] = posted;
        self.committed[player] += posted;
        self.pot += posted;
    }

    /// Shuffle this state's deck and restart it as a fresh hand with the
    /// same table configuration. A fixed-order deck re-deals identically.
    ///
    /// # Errors
    ///
    /// Propagates dealing failures; cannot occur for a valid 52-card deck.
    pub fn redeal(&mut self) -> Result<(), SolverError> {
        let mut deck = self.deck.clone();
        deck.shuffle();
        *self = Self::with_deck(
            self.num_players,
            self.initial_stack,
            self.ante,
            self.button_pos,
            self.big_blind,
            deck,
        )?;
        Ok(())
    }

    // ─── Accessors ──────────────────────────────────────────────────────

    /// Seat to act, or `None` once the hand has terminated.
    #[must_use]
    pub fn current_player(&self) -> Option<usize> {
        self.to_act
    }

    /// Whether the hand is over: nobody to act or showdown reached.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.to_act.is_none() || self.street == Street::Showdown
    }

    #[must_use]
    pub fn num_players(&self) -> usize {
        self.num_players
    }

    #[must_use]
    pub fn button_pos(&self) -> usize {
        self.button_pos
    }

    #[must_use]
    pub fn big_blind(&self) -> u32 {
        self.big_blind
    }

    #[must_use]
    pub fn pot(&self) -> u32 {
        self.pot
    }

    #[must_use]
    pub fn street(&self) -> Street {
        self.street
    }

    #[must_use]
    pub fn last_raise_size(&self) -> u32 {
        self.last_raise_size
    }

    /// Seat of the last raiser this street (the BB preflop before any
    /// raise), or `None`.
    #[must_use]
    pub fn last_aggressor(&self) -> Option<usize> {
        self.last_aggressor
    }

    /// Per-seat stacks.
    #[must_use]
    pub fn stacks(&self) -> &[u32] {
        &self.stacks
    }

    /// Per-seat bets on the current street.
    #[must_use]
    pub fn current_bets(&self) -> &[u32] {
        &self.current_bets
    }

    /// The highest current street bet.
    #[must_use]
    pub fn max_bet(&self) -> u32 {
        self.current_bets.iter().copied().max().unwrap_or(0)
    }

    /// One seat's stack.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidInput`] for an out-of-range seat.
    pub fn stack(&self, player: usize) -> Result<u32, SolverError> {
        self.check_seat(player)?;
        Ok(self.stacks[player])
    }

    /// One seat's hole cards.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidInput`] for an out-of-range seat.
    pub fn hand(&self, player: usize) -> Result<[Card; 2], SolverError> {
        self.check_seat(player)?;
        Ok(self.hands[player])
    }

    /// Whether a seat has folded.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidInput`] for an out-of-range seat.
    pub fn is_folded(&self, player: usize) -> Result<bool, SolverError> {
        self.check_seat(player)?;
        Ok(self.has_folded[player])
    }

    /// Chips a seat has put into the pot this hand (antes included).
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidInput`] for an out-of-range seat.
    pub fn committed(&self, player: usize) -> Result<u32, SolverError> {
        self.check_seat(player)?;
        Ok(self.committed[player])
    }

    /// Per-seat chips committed this hand (antes included).
    #[must_use]
    pub fn contributions(&self) -> &[u32] {
        &self.committed
    }

    fn check_seat(&self, player: usize) -> Result<(), SolverError> {
        if player < self.num_players {
            Ok(())
        } else {
            Err(SolverError::InvalidInput(format!(
                "player index {player} outside [0, {})",
                self.num_players
            )))
        }
    }

    /// The dealt board cards, in deal order.
    #[must_use]
    pub fn board(&self) -> &[Card] {
        &self.board[..self.board_cards_dealt]
    }

    #[must_use]
    pub fn board_cards_dealt(&self) -> usize {
        self.board_cards_dealt
    }

    /// Seats that have not folded.
    #[must_use]
    pub fn num_active_players(&self) -> usize {
        (0..self.num_players)
            .filter(|&p| !self.has_folded[p])
            .count()
    }

    /// Cards not visible anywhere: the complement of all hole cards and
    /// dealt board cards, in ascending ID order.
    #[must_use]
    pub fn remaining_cards(&self) -> Vec<Card> {
        let mut seen = CardSet::EMPTY;
        for hand in &self.hands {
            for &card in hand {
                seen.insert(card);
            }
        }
        for &card in self.board() {
            seen.insert(card);
        }
        let mut remaining = CardSet::FULL;
        for card in seen.to_cards() {
            remaining.remove(card);
        }
        remaining.to_cards()
    }

    // ─── Transitions ────────────────────────────────────────────────────

    /// Apply one action by the current player, then run end-of-round
    /// detection: fold-outs and all-in run-outs terminate the hand,
    /// matched bets close the street, otherwise the next live seat acts.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::ContractViolation`] when the hand is over,
    /// the action names the wrong seat or a folded seat, or a raise amount
    /// is illegal (total not above the max bet without being all-in, short
    /// of the min-raise without being all-in, or above the seat's chips).
    pub fn apply_action(&mut self, action: &Action) -> Result<(), SolverError> {
        let Some(actor) = self.to_act else {
            return Err(SolverError::ContractViolation(
                "action applied to a terminated hand".to_string(),
            ));
        };
        if action.player != actor {
            return Err(SolverError::ContractViolation(format!(
                "action by P{} but P{actor} is to act",
                action.player
            )));
        }
        if self.has_folded[actor] {
            return Err(SolverError::ContractViolation(format!(
                "action by folded player P{actor}"
            )));
        }

        let player_bet = self.current_bets[actor];
        let max_bet = self.max_bet();

        match action.kind {
            ActionType::Fold => {
                self.has_folded[actor] = true;
                log::debug!("P{actor} folds");
            }
            ActionType::Call => {
                let to_call = max_bet - player_bet;
                let paid = self.stacks[actor].min(to_call);
                self.stacks[actor] -= paid;
                self.current_bets[actor] += paid;
                self.committed[actor] += paid;
                self.pot += paid;
                if paid == 0 {
                    log::debug!("P{actor} checks");
                } else {
                    log::debug!("P{actor} calls {paid}");
                }
            }
            ActionType::Raise => {
                let total = action.amount;
                if total <= player_bet {
                    return Err(SolverError::ContractViolation(format!(
                        "raise to {total} adds nothing over P{actor}'s bet of {player_bet}"
                    )));
                }
                let added = total - player_bet;
                if added > self.stacks[actor] {
                    return Err(SolverError::ContractViolation(format!(
                        "raise to {total} exceeds P{actor}'s stack"
                    )));
                }
                let is_all_in = added == self.stacks[actor];
                if total <= max_bet && !is_all_in {
                    return Err(SolverError::ContractViolation(format!(
                        "raise to {total} does not exceed the max bet of {max_bet}"
                    )));
                }
                if !is_all_in && total - max_bet < self.last_raise_size {
                    return Err(SolverError::ContractViolation(format!(
                        "raise to {total} is short of the min-raise over {max_bet}"
                    )));
                }

                self.stacks[actor] -= added;
                self.current_bets[actor] = total;
                self.committed[actor] += added;
                self.pot += added;
                if total > max_bet {
                    let increment = total - max_bet;
                    if !is_all_in || increment >= self.last_raise_size {
                        self.last_raise_size = increment;
                    }
                }
                self.last_aggressor = Some(actor);
                log::debug!(
                    "P{actor} raises to {total} (+{added}), stack {}",
                    self.stacks[actor]
                );
            }
        }

        self.end_betting_round()
    }

    /// End-of-round detection, run after every action.
    fn end_betting_round(&mut self) -> Result<(), SolverError> {
        // One live player left: the hand is decided without showdown.
        if self.num_active_players() <= 1 {
            self.street = Street::Showdown;
            self.to_act = None;
            self.last_aggressor = None;
            return Ok(());
        }

        // Everyone live is all-in: run out the rest of the board.
        let all_in = (0..self.num_players)
            .filter(|&p| !self.has_folded[p])
            .all(|p| self.stacks[p] == 0);
        if all_in {
            while self.street != Street::Showdown {
                self.progress_to_next_street()?;
            }
            self.to_act = None;
            return Ok(());
        }

        let Some(actor) = self.to_act else {
            return Ok(());
        };
        let Some(next) = self.next_live_seat(actor) else {
            // No seat with chips behind; treated as an all-in run-out.
            while self.street != Street::Showdown {
                self.progress_to_next_street()?;
            }
            self.to_act = None;
            return Ok(());
        };

        let max_bet = self.max_bet();
        if self.current_bets[next] < max_bet {
            self.to_act = Some(next);
            return Ok(());
        }

        // Bets are level; the street closes only once action returns to
        // the closing seat (the BB keeps the preflop option). The BB's
        // forced post is not a genuine raise.
        let bb_seat = self.bb_seat();
        let genuine_raiser = self.last_aggressor.filter(|&agg| {
            !(self.street == Street::Preflop && agg == bb_seat && max_bet <= self.big_blind)
        });
        let closed = if next == actor {
            // Action came all the way back: nobody else can act.
            true
        } else if let Some(agg) = genuine_raiser {
            next == agg
        } else if self.street == Street::Preflop {
            actor == bb_seat
        } else {
            next == self.first_postflop_actor()
        };

        if closed {
            self.progress_to_next_street()
        } else {
            self.to_act = Some(next);
            Ok(())
        }
    }

    /// First seat after `from` that is live and has chips behind.
    fn next_live_seat(&self, from: usize) -> Option<usize> {
        (1..=self.num_players)
            .map(|step| (from + step) % self.num_players)
            .find(|&p| !self.has_folded[p] && self.stacks[p] > 0)
    }

    fn first_postflop_actor(&self) -> usize {
        self.next_live_seat(self.button_pos)
            .unwrap_or((self.button_pos + 1) % self.num_players)
    }

    /// Advance one street: deal the board (with a burn), reset street
    /// bets, and hand the action to the first live seat after the button.
    fn progress_to_next_street(&mut self) -> Result<(), SolverError> {
        self.street = self.street.next();
        log::debug!("street advances to {}", self.street);

        if self.street == Street::Showdown {
            self.to_act = None;
            self.last_aggressor = None;
            return Ok(());
        }

        match (self.street, self.board_cards_dealt) {
            (Street::Flop, 0) => {
                self.deck.burn();
                for i in 0..3 {
                    self.board[i] = self.deck.deal()?;
                }
                self.board_cards_dealt = 3;
                log::debug!(
                    "flop: {} {} {}",
                    self.board[0],
                    self.board[1],
                    self.board[2]
                );
            }
            (Street::Turn, 3) => {
                self.deck.burn();
                self.board[3] = self.deck.deal()?;
                self.board_cards_dealt = 4;
                log::debug!("turn: {}", self.board[3]);
            }
            (Street::River, 4) => {
                self.deck.burn();
                self.board[4] = self.deck.deal()?;
                self.board_cards_dealt = 5;
                log::debug!("river: {}", self.board[4]);
            }
            _ => {}
        }

        for bet in &mut self.current_bets {
            *bet = 0;
        }
        self.last_raise_size = self.big_blind;
        self.last_aggressor = None;
        self.to_act = self.next_live_seat(self.button_pos);
        Ok(())
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board = String::new();
        for (i, card) in self.board().iter().enumerate() {
            if i > 0 {
                board.push(' ');
            }
            let _ = write!(board, "{card}");
        }
        let next = match self.to_act {
            Some(p) => format!("P{p}"),
            None => "none".to_string(),
        };
        writeln!(
            f,
            "Street: {} | Pot: {} | Board: [{board}] | Next: {next} | LastRaise: {}",
            self.street, self.pot, self.last_raise_size
        )?;
        for p in 0..self.num_players {
            writeln!(
                f,
                "  P{p}{}: stack={}, bet={}, hand=[{} {}]{}",
                if p == self.button_pos { "(BTN)" } else { "" },
                self.stacks[p],
                self.current_bets[p],
                self.hands[p][0],
                self.hands[p][1],
                if self.has_folded[p] { " (folded)" } else { "" }
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::fixed_order_with_prefix;

    fn heads_up() -> GameState {
        let deck = Deck::with_seed(11);
        GameState::with_deck(2, 200, 0, 0, 2, deck).unwrap()
    }

    fn total_chips(state: &GameState) -> u32 {
        state.stacks().iter().sum::<u32>() + state.pot()
    }

    #[test]
    fn construction_validates_inputs() {
        assert!(GameState::new(1, 200, 0, 0, 2).is_err());
        assert!(GameState::new(7, 200, 0, 0, 2).is_err());
        assert!(GameState::new(2, 200, 0, 2, 2).is_err());
        assert!(GameState::new(2, 200, 0, 0, 0).is_err());
        assert!(GameState::new(6, 200, 1, 5, 2).is_ok());
    }

    #[test]
    fn heads_up_initial_state() {
        let state = heads_up();
        assert_eq!(state.current_player(), Some(0));
        assert_eq!(state.pot(), 3);
        assert_eq!(state.current_bets(), &[1, 2]);
        assert_eq!(state.last_raise_size(), 2);
        assert_eq!(state.last_aggressor(), Some(1));
        assert_eq!(state.street(), Street::Preflop);
        assert_eq!(total_chips(&state), 400);
    }

    #[test]
    fn three_handed_blinds_and_first_actor() {
        let state = GameState::with_deck(3, 100, 0, 0, 2, Deck::with_seed(3)).unwrap();
        assert_eq!(state.current_bets(), &[0, 1, 2]);
        // UTG == button seat three-handed.
        assert_eq!(state.current_player(), Some(0));
        assert_eq!(state.last_aggressor(), Some(2));
    }

    #[test]
    fn antes_enter_the_pot_but_not_the_bets() {
        let state = GameState::with_deck(2, 200, 5, 0, 2, Deck::with_seed(3)).unwrap();
        assert_eq!(state.pot(), 13);
        assert_eq!(state.current_bets(), &[1, 2]);
        assert_eq!(state.committed(0).unwrap(), 6);
        assert_eq!(state.committed(1).unwrap(), 7);
        assert_eq!(total_chips(&state), 400);
    }

    #[test]
    fn hole_cards_are_dealt_interleaved() {
        let order = fixed_order_with_prefix(&[]).unwrap();
        let mut deck = Deck::with_seed(0);
        deck.set_fixed_order(&order).unwrap();
        let state = GameState::with_deck(2, 200, 0, 0, 2, deck).unwrap();
        assert_eq!(state.hand(0).unwrap(), [order[0], order[2]]);
        assert_eq!(state.hand(1).unwrap(), [order[1], order[3]]);
    }

    #[test]
    fn limp_then_check_reaches_the_flop() {
        let mut state = heads_up();
        state.apply_action(&Action::call(0, 2)).unwrap();
        assert_eq!(state.current_player(), Some(1)); // BB option
        state.apply_action(&Action::call(1, 2)).unwrap();

        assert_eq!(state.street(), Street::Flop);
        assert_eq!(state.pot(), 4);
        assert_eq!(state.current_bets(), &[0, 0]);
        assert_eq!(state.current_player(), Some(1)); // BB first postflop
        assert_eq!(state.board_cards_dealt(), 3);
        assert_eq!(total_chips(&state), 400);
    }

    #[test]
    fn fold_terminates_the_hand_immediately() {
        let mut state = heads_up();
        state.apply_action(&Action::fold(0)).unwrap();
        assert!(state.is_terminal());
        assert_eq!(state.current_player(), None);
        assert_eq!(state.num_active_players(), 1);
    }

    #[test]
    fn raise_updates_pot_and_min_raise() {
        let mut state = heads_up();
        state.apply_action(&Action::raise(0, 6)).unwrap();
        assert_eq!(state.pot(), 8);
        assert_eq!(state.last_raise_size(), 4);
        assert_eq!(state.last_aggressor(), Some(0));
        assert_eq!(state.current_player(), Some(1));

        // Re-raise must add at least the previous increment.
        let err = state.apply_action(&Action::raise(1, 9));
        assert!(matches!(err, Err(SolverError::ContractViolation(_))));
        state.apply_action(&Action::raise(1, 10)).unwrap();
        assert_eq!(state.last_raise_size(), 4);
    }

    #[test]
    fn raise_call_closes_the_street() {
        let mut state = heads_up();
        state.apply_action(&Action::raise(0, 6)).unwrap();
        state.apply_action(&Action::call(1, 6)).unwrap();
        assert_eq!(state.street(), Street::Flop);
        assert_eq!(state.pot(), 12);
    }

    #[test]
    fn bb_check_behind_closes_preflop() {
        let mut state = GameState::with_deck(3, 100, 0, 0, 2, Deck::with_seed(9)).unwrap();
        state.apply_action(&Action::call(0, 2)).unwrap();
        state.apply_action(&Action::call(1, 2)).unwrap();
        assert_eq!(state.current_player(), Some(2)); // BB option
        state.apply_action(&Action::call(2, 2)).unwrap();
        assert_eq!(state.street(), Street::Flop);
        assert_eq!(state.current_player(), Some(1)); // SB first postflop
    }

    #[test]
    fn all_in_call_runs_out_the_board() {
        let mut state = heads_up();
        state.apply_action(&Action::raise(0, 200)).unwrap();
        state.apply_action(&Action::raise(1, 200)).unwrap();

        assert!(state.is_terminal());
        assert_eq!(state.street(), Street::Showdown);
        assert_eq!(state.board_cards_dealt(), 5);
        assert_eq!(state.pot(), 400);
        assert_eq!(total_chips(&state), 400);
    }

    #[test]
    fn short_all_in_raise_does_not_reopen_min_raise() {
        let mut state = GameState::with_deck(2, 200, 0, 0, 2, Deck::with_seed(5)).unwrap();
        state.apply_action(&Action::raise(0, 6)).unwrap();
        state.apply_action(&Action::raise(1, 190)).unwrap();
        assert_eq!(state.last_raise_size(), 184);

        // P0's only raise is the all-in to 200, 10 over the bet: short of
        // the 184 min-raise but legal, and the increment does not stick.
        state.apply_action(&Action::raise(0, 200)).unwrap();
        assert_eq!(state.last_raise_size(), 184);
        assert_eq!(state.current_player(), Some(1));

        state.apply_action(&Action::call(1, 200)).unwrap();
        assert!(state.is_terminal());
        assert_eq!(state.board_cards_dealt(), 5);
        assert_eq!(state.pot(), 400);
    }

    #[test]
    fn wrong_player_and_terminated_hand_are_contract_violations() {
        let mut state = heads_up();
        assert!(matches!(
            state.apply_action(&Action::call(1, 2)),
            Err(SolverError::ContractViolation(_))
        ));
        state.apply_action(&Action::fold(0)).unwrap();
        assert!(matches!(
            state.apply_action(&Action::call(1, 2)),
            Err(SolverError::ContractViolation(_))
        ));
    }

    #[test]
    fn pot_is_monotone_and_folds_are_sticky_across_a_hand() {
        let mut state = heads_up();
        let mut last_pot = state.pot();
        for action in [Action::raise(0, 6), Action::call(1, 6)] {
            state.apply_action(&action).unwrap();
            assert!(state.pot() >= last_pot);
            last_pot = state.pot();
        }
        assert!(!state.is_folded(0).unwrap());
        assert!(!state.is_folded(1).unwrap());
        assert!([0, 3, 4, 5].contains(&state.board_cards_dealt()));
    }

    #[test]
    fn remaining_cards_complement_visible_cards() {
        let mut state = heads_up();
        state.apply_action(&Action::call(0, 2)).unwrap();
        state.apply_action(&Action::call(1, 2)).unwrap();

        let remaining = state.remaining_cards();
        assert_eq!(remaining.len(), 52 - 4 - 3);
        for p in 0..2 {
            for card in state.hand(p).unwrap() {
                assert!(!remaining.contains(&card));
            }
        }
        for &card in state.board() {
            assert!(!remaining.contains(&card));
        }
    }

    #[test]
    fn clone_replays_the_same_board() {
        let mut a = heads_up();
        let mut b = a.clone();
        for state in [&mut a, &mut b] {
            state.apply_action(&Action::call(0, 2)).unwrap();
            state.apply_action(&Action::call(1, 2)).unwrap();
        }
        assert_eq!(a.board(), b.board());
    }

    #[test]
    fn redeal_starts_a_fresh_hand() {
        let mut state = heads_up();
        let first_hand = state.hand(0).unwrap();
        state.apply_action(&Action::raise(0, 6)).unwrap();
        state.redeal().unwrap();

        assert_eq!(state.pot(), 3);
        assert_eq!(state.current_player(), Some(0));
        assert_eq!(state.street(), Street::Preflop);
        // Shuffled deck: a different hand with overwhelming probability.
        let _ = first_hand;
        assert_eq!(total_chips(&state), 400);
    }

    #[test]
    fn accessors_reject_bad_seats() {
        let state = heads_up();
        assert!(state.stack(2).is_err());
        assert!(state.hand(9).is_err());
        assert!(state.is_folded(2).is_err());
        assert!(state.committed(2).is_err());
    }

    #[test]
    fn postflop_opening_bet_must_reach_the_big_blind() {
        let mut state = heads_up();
        state.apply_action(&Action::call(0, 2)).unwrap();
        state.apply_action(&Action::call(1, 2)).unwrap();
        assert_eq!(state.street(), Street::Flop);

        let err = state.apply_action(&Action::raise(1, 1));
        assert!(matches!(err, Err(SolverError::ContractViolation(_))));
        state.apply_action(&Action::raise(1, 2)).unwrap();
        assert_eq!(state.last_raise_size(), 2);
    }
}
