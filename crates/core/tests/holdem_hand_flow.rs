//! End-to-end hand-flow scenarios for the heads-up 200-chip game
//! (button 0, big blind 2, no ante): initial state, limp/check lines,
//! fold payoffs, and chip conservation through multi-street hands.

use gto_solver_core::abstraction::{uniform_table, AbstractionConfig, SizingTable};
use gto_solver_core::deck::fixed_order_with_prefix;
use gto_solver_core::{Action, ActionAbstraction, ActionType, Card, Deck, GameState, Street};

fn cards(notation: &str) -> Vec<Card> {
    notation.split(' ').map(|s| s.parse().unwrap()).collect()
}

fn heads_up_with_prefix(prefix: &str) -> GameState {
    let order = fixed_order_with_prefix(&cards(prefix)).unwrap();
    let mut deck = Deck::with_seed(0);
    deck.set_fixed_order(&order).unwrap();
    GameState::with_deck(2, 200, 0, 0, 2, deck).unwrap()
}

fn total_chips(state: &GameState) -> u32 {
    state.stacks().iter().sum::<u32>() + state.pot()
}

#[test]
fn initial_heads_up_state_matches_the_blinds() {
    let state = GameState::new(2, 200, 0, 0, 2).unwrap();
    assert_eq!(state.current_player(), Some(0)); // SB = BTN acts first
    assert_eq!(state.pot(), 3);
    assert_eq!(state.current_bets(), &[1, 2]);
    assert_eq!(state.last_raise_size(), 2);
    assert_eq!(state.last_aggressor(), Some(1));
    assert_eq!(state.board_cards_dealt(), 0);
}

#[test]
fn limp_and_check_take_the_hand_to_the_flop() {
    let mut state = GameState::new(2, 200, 0, 0, 2).unwrap();
    state.apply_action(&Action::call(0, 2)).unwrap();
    state.apply_action(&Action::call(1, 2)).unwrap();

    assert_eq!(state.street(), Street::Flop);
    assert_eq!(state.pot(), 4);
    assert_eq!(state.current_bets(), &[0, 0]);
    assert_eq!(state.current_player(), Some(1)); // BB first postflop
}

#[test]
fn open_fold_loses_exactly_the_small_blind() {
    let mut state = GameState::new(2, 200, 0, 0, 2).unwrap();
    state.apply_action(&Action::fold(0)).unwrap();

    assert!(state.is_terminal());
    assert_eq!(state.current_player(), None);
    assert_eq!(state.committed(0).unwrap(), 1);
    assert_eq!(state.committed(1).unwrap(), 2);
}

#[test]
fn chips_are_conserved_through_a_raised_multi_street_hand() {
    let mut state = heads_up_with_prefix("As Qh Ks Qd 2c Ac Kc 2h 3c 3d 4c 4s");
    let script = [
        Action::raise(0, 6),
        Action::call(1, 6),
        // Flop: BB check, BTN bets, BB calls.
        Action::call(1, 0),
        Action::raise(0, 8),
        Action::call(1, 8),
        // Turn: check it through.
        Action::call(1, 0),
        Action::call(0, 0),
        // River: BB bets, BTN raises, BB calls.
        Action::raise(1, 10),
        Action::raise(0, 30),
        Action::call(1, 30),
    ];
    for action in &script {
        assert_eq!(total_chips(&state), 400);
        state.apply_action(action).unwrap();
    }

    assert!(state.is_terminal());
    assert_eq!(state.street(), Street::Showdown);
    assert_eq!(state.board(), cards("Ac Kc 2h 3d 4s").as_slice());
    assert_eq!(state.pot(), 2 * (6 + 8 + 30));
    assert_eq!(total_chips(&state), 400);
}

#[test]
fn preflop_all_in_runs_out_five_board_cards() {
    let mut state = heads_up_with_prefix("As Qh Ks Qd 2c Ac Kc 2h 3c 3d 4c 4s");
    state.apply_action(&Action::raise(0, 200)).unwrap();
    state.apply_action(&Action::call(1, 200)).unwrap();

    assert!(state.is_terminal());
    assert_eq!(state.board_cards_dealt(), 5);
    assert_eq!(state.board(), cards("Ac Kc 2h 3d 4s").as_slice());
    assert_eq!(state.pot(), 400);
}

#[test]
fn abstract_actions_for_the_opening_spot() {
    // Pot fractions {0.33, 0.5, 0.75, 1.0} preflop with all-in: the exact
    // action set is fold, call 2, raise 4/5/6, and the 200-chip all-in.
    // A raise to 3 (below the min-raise) must not appear.
    let abstraction = ActionAbstraction::new(AbstractionConfig {
        fractions: uniform_table(vec![(Street::Preflop, vec![0.33, 0.5, 0.75, 1.0])]),
        bb_multipliers: SizingTable::new(),
        exact_amounts: SizingTable::new(),
        ..AbstractionConfig::default()
    });
    let state = GameState::new(2, 200, 0, 0, 2).unwrap();

    let actions = abstraction.get_abstract_actions(&state);
    assert_eq!(
        actions,
        vec![
            Action::fold(0),
            Action::call(0, 2),
            Action::raise(0, 4),
            Action::raise(0, 5),
            Action::raise(0, 6),
            Action::raise(0, 200),
        ]
    );
    assert!(!actions.contains(&Action::raise(0, 3)));
}

#[test]
fn every_abstract_action_satisfies_the_engine_preconditions() {
    fn walk(abstraction: &ActionAbstraction, state: &GameState, depth: usize) {
        if depth == 0 || state.is_terminal() {
            return;
        }
        for action in abstraction.get_abstract_actions(state) {
            let mut next = state.clone();
            next.apply_action(&action)
                .unwrap_or_else(|e| panic!("abstraction emitted illegal {action}: {e}"));
            assert!(total_chips(&next) == 400);
            walk(abstraction, &next, depth - 1);
        }
    }

    let abstraction = ActionAbstraction::default();
    let state = heads_up_with_prefix("As Qh Ks Qd 2c Ac Kc 2h 3c 3d 4c 4s");
    walk(&abstraction, &state, 3);
}

#[test]
fn raise_totals_respect_min_raise_and_stack_bounds() {
    let abstraction = ActionAbstraction::default();
    let mut state = GameState::new(2, 200, 0, 0, 2).unwrap();
    state.apply_action(&Action::raise(0, 6)).unwrap();

    let max_bet = state.max_bet();
    let player = state.current_player().unwrap();
    let all_in = state.current_bets()[player] + state.stacks()[player];
    let min_total = max_bet + state.last_raise_size().max(state.big_blind());

    for action in abstraction.get_abstract_actions(&state) {
        if action.kind == ActionType::Raise {
            assert!(action.amount > max_bet);
            assert!(action.amount <= all_in);
            assert!(action.amount >= min_total || action.amount == all_in);
        }
    }
}
