//! A branch-outcome prediction engine for trace-driven simulation.
//!
//! The harness calls [BranchPredictor::predict] for each conditional branch
//! before its outcome is known, then [BranchPredictor::train] with the
//! resolved outcome.

pub mod branch;
pub mod history;
pub mod predictor;
pub mod config;
pub mod engine;
pub mod error;
pub mod trace;
pub mod stats;
pub mod sim;

pub use branch::*;
pub use history::*;
pub use predictor::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use trace::*;
