//! Error types.
//!
//! Predictions and training never fail. Errors only come from building an
//! engine out of a bad configuration, or from reading a trace.

use thiserror::Error;

/// Errors caused by an invalid [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is {bits} bits wide (at most {max} bits are supported)")]
    TableTooLarge { name: &'static str, bits: usize, max: usize },

    #[error("tag width must be between 1 and {max} bits (got {bits})")]
    InvalidTagBits { bits: usize, max: usize },

    #[error("history lengths must be strictly increasing (got {lengths:?})")]
    HistoryNotIncreasing { lengths: Vec<usize> },

    #[error("history length {len} exceeds the maximum of {max} bits")]
    HistoryTooLong { len: usize, max: usize },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors encountered while reading a branch trace.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("line {line}: expected '<pc> <outcome>', got {text:?}")]
    Malformed { line: usize, text: String },

    #[error("line {line}: invalid program counter {text:?}")]
    InvalidPc { line: usize, text: String },

    #[error("line {line}: invalid outcome {text:?} (expected 0 or 1)")]
    InvalidOutcome { line: usize, text: String },

    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),
}
