//! Engine error types.

use thiserror::Error;

/// Errors raised by the percolation engine.
///
/// All of these surface synchronously at the offending call. Construction
/// errors are never deferred into `advance()`.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Coordinate or shape rank does not match what the operation expects.
    #[error("invalid dimension: expected {expected} axes, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    /// Threshold below 1.
    #[error("invalid threshold {0}: must be at least 1")]
    InvalidThreshold(u32),

    /// Permutation seed is not a bijection, or the layer count is wrong.
    #[error("invalid permutation: {0}")]
    InvalidPermutation(String),

    /// Zero extent on some axis, or a seed set built for another grid.
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// `advance()` called after the run reached a terminal status.
    #[error("simulation already terminal ({0})")]
    AlreadyTerminal(crate::automaton::RunStatus),

    /// Worker pool for a race could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
