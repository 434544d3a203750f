#![deny(clippy::all)]
#![warn(clippy::pedantic)]

//! GTO Solver Core Library
//!
//! A vanilla CFR (Counterfactual Regret Minimization) solver for
//! no-limit Texas Hold'em.
//!
//! # Modules
//!
//! - `cards`, `bitboard`, `deck` - card primitives and dealing
//! - `eval` - seven-card hand ranking
//! - `game` - the hold'em betting state machine
//! - `abstraction` - discrete action generation
//! - `infoset`, `cfr`, `persistence` - the solver proper
//! - `config` - YAML training configuration

pub mod abstraction;
pub mod bitboard;
pub mod cards;
pub mod cfr;
pub mod config;
pub mod deck;
pub mod error;
pub mod eval;
pub mod game;
pub mod infoset;
pub mod persistence;

pub use abstraction::{ActionAbstraction, AbstractionConfig};
pub use cards::Card;
pub use cfr::CfrEngine;
pub use config::TrainingConfig;
pub use deck::Deck;
pub use error::SolverError;
pub use game::{Action, ActionType, GameState, Position, Street};
