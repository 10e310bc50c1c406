//! Error taxonomy for the search engine and the move-text parser.
//!
//! `PredicateUnsatisfiable` is deliberately not a variant here: spec says
//! an unsatisfiable predicate is not an error, just an empty solution list.

use thiserror::Error;

/// Errors raised while parsing move-text (scrambles, algorithm literals).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid move text: {0:?}")]
    InvalidMoveText(String),

    #[error("unmatched parenthesis in move text: {0:?}")]
    UnmatchedParenthesis(String),

    #[error("repetition suffix out of range (expected 1..=9): {0}")]
    RepetitionOutOfRange(u8),
}

/// Errors the search engine can surface. The engine never fails
/// silently: an empty `Vec<Solution>` means "no algorithm satisfies the
/// predicate within the depth budget", not an error.
#[derive(Error, Debug)]
pub enum SolveError {
    #[error("search grammar has no levels")]
    EmptyGrammar,

    #[error("{0} worker thread(s) panicked during search")]
    ThreadSpawnFailure(usize),
}
