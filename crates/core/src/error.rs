use thiserror::Error;

/// Errors surfaced by the solver core.
#[derive(Debug, Error)]
pub enum SolverError {
    /// Malformed caller input: bad card strings, out-of-range player
    /// indices, invalid table configuration.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A game-rule contract was broken: acting out of turn, acting after
    /// folding or termination, or an illegal raise amount.
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// I/O error reading or writing the infoset file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
