//! Full solver pipeline on deterministic decks: terminal utilities,
//! training convergence on a dominated spot, key format stability, and
//! persistence warm starts.

use gto_solver_core::abstraction::{AbstractionConfig, SizingTable};
use gto_solver_core::deck::fixed_order_with_prefix;
use gto_solver_core::infoset::generate_key;
use gto_solver_core::{Action, ActionAbstraction, Card, CfrEngine, Deck, GameState, Street};

fn cards(notation: &str) -> Vec<Card> {
    notation.split(' ').map(|s| s.parse().unwrap()).collect()
}

fn hole(notation: &str) -> [Card; 2] {
    let v = cards(notation);
    [v[0], v[1]]
}

fn fixed_template(prefix: &str) -> GameState {
    let order = fixed_order_with_prefix(&cards(prefix)).unwrap();
    let mut deck = Deck::with_seed(0);
    deck.set_fixed_order(&order).unwrap();
    GameState::with_deck(2, 200, 0, 0, 2, deck).unwrap()
}

fn call_only_abstraction() -> ActionAbstraction {
    ActionAbstraction::new(AbstractionConfig {
        allow_all_in: false,
        fractions: SizingTable::new(),
        bb_multipliers: SizingTable::new(),
        exact_amounts: SizingTable::new(),
        ..AbstractionConfig::default()
    })
}

#[test]
fn showdown_on_a_complete_board_pays_the_winner_the_pot_half() {
    // AKs flops two pair against queens; pot built to 100 by a raise to
    // 50 and a call, then checked down.
    let mut state = fixed_template("As Qh Ks Qd 2c Ac Kc 2h 3c 3d 4c 4s");
    let script = [
        Action::raise(0, 50),
        Action::call(1, 50),
        Action::call(1, 0),
        Action::call(0, 0),
        Action::call(1, 0),
        Action::call(0, 0),
        Action::call(1, 0),
        Action::call(0, 0),
    ];
    for action in &script {
        state.apply_action(action).unwrap();
    }
    assert!(state.is_terminal());
    assert_eq!(state.pot(), 100);

    let engine = CfrEngine::new(call_only_abstraction());
    let utility = engine.terminal_utility(&state);
    assert!((utility - 50.0).abs() < 1e-9);
}

#[test]
fn flop_equity_enumeration_matches_the_counted_runouts() {
    // C(3,2) = 3 runouts; the pair hits its set on two of them.
    let equity = CfrEngine::board_completion_equity(
        hole("Ah Kh"),
        hole("7d 7c"),
        &cards("As Ks Qs"),
        &cards("7h 2c 3d"),
        100,
    );
    assert!((equity - (-50.0 / 3.0)).abs() < 1e-3);
}

#[test]
fn training_learns_to_call_with_the_dominating_hand() {
    // P0 holds aces against seven-deuce on a dry run-out; with only
    // fold/call available, the average strategy must converge on calling.
    let mut template = fixed_template("Ah 7d Ad 2c 5s Kh Qs 2d 6h 9c 8h 3s");
    let mut engine = CfrEngine::new(call_only_abstraction());
    engine.run_iterations(&mut template, 50).unwrap();

    let key = generate_key(0, hole("Ah Ad"), &[], Street::Preflop, &[]);
    assert_eq!(key, "P0;Ad-Ah||Preflop|");
    let strategy = engine
        .average_strategy(&key)
        .expect("root infoset must exist");
    // Actions order: fold, then call.
    assert_eq!(strategy.len(), 2);
    assert!(
        strategy[1] > 0.95,
        "aces should call, got fold={:.3} call={:.3}",
        strategy[0],
        strategy[1]
    );
}

#[test]
fn traversal_keys_follow_the_documented_format() {
    let mut template = fixed_template("Ah 7d Ad 2c 5s Kh Qs 2d 6h 9c 8h 3s");
    let mut engine = CfrEngine::new(call_only_abstraction());
    engine.run_iterations(&mut template, 1).unwrap();

    for key in engine.infosets().keys() {
        assert!(key.starts_with('P'), "key {key}");
        assert_eq!(key.matches('|').count(), 3, "key {key}");
        let street = key.split('|').nth(2).unwrap();
        assert!(
            ["Preflop", "Flop", "Turn", "River", "Showdown"].contains(&street),
            "key {key}"
        );
    }

    // The flop decision after a limped pot carries the limp history and
    // the sorted flop.
    let flop_key = engine
        .infosets()
        .keys()
        .find(|k| k.starts_with("P1;") && k.contains("|Flop|"))
        .expect("BB flop infoset");
    assert!(flop_key.ends_with("|Flop|A0C2,A1C2,"), "key {flop_key}");
}

#[test]
fn persistence_round_trips_through_the_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warm_start.tsv");

    let mut template = fixed_template("Ah 7d Ad 2c 5s Kh Qs 2d 6h 9c 8h 3s");
    let mut engine = CfrEngine::new(call_only_abstraction());
    engine.run_iterations(&mut template, 10).unwrap();
    engine.save_infosets(&path).unwrap();

    let mut restored = CfrEngine::new(call_only_abstraction());
    assert!(restored.load_infosets(&path).unwrap());
    assert_eq!(restored.num_infosets(), engine.num_infosets());
    for (key, node) in engine.infosets() {
        let loaded = &restored.infosets()[key];
        assert_eq!(loaded.visit_count, node.visit_count);
        assert_eq!(
            loaded.cumulative_regrets.len(),
            node.cumulative_regrets.len()
        );
    }

    // A warm-started engine keeps training without re-keying anything.
    let mut template = fixed_template("Ah 7d Ad 2c 5s Kh Qs 2d 6h 9c 8h 3s");
    let before = restored.num_infosets();
    restored.run_iterations(&mut template, 5).unwrap();
    assert_eq!(restored.num_infosets(), before);
}

#[test]
fn missing_infoset_file_is_a_cold_start_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = CfrEngine::new(call_only_abstraction());
    let loaded = engine.load_infosets(dir.path().join("absent.tsv")).unwrap();
    assert!(!loaded);
    assert_eq!(engine.num_infosets(), 0);
}
