//! Implementations of different branch predictors.

pub mod table;
pub mod counter;
pub mod simple;
pub mod gshare;
pub mod tournament;
pub mod tage;

pub use table::*;
pub use counter::*;
pub use simple::*;
pub use gshare::*;
pub use tournament::*;
pub use tage::*;

use crate::Outcome;

/// Interface to a predictor driven by a stream of resolved branches.
///
/// The harness calls [BranchPredictor::predict] before the outcome of a
/// branch is known and [BranchPredictor::train] once it has been resolved.
/// Only `train` is allowed to change the state of the predictor.
pub trait BranchPredictor {
    fn name(&self) -> &'static str;

    /// Return the predicted direction of the branch at `pc`.
    fn predict(&self, pc: usize) -> Outcome;

    /// Update the internal state of the predictor with the correct outcome.
    fn train(&mut self, pc: usize, outcome: Outcome);
}

/// Interface to a predictor with some internal state which is only subject to
/// change by the correct branch outcome.
pub trait StatefulPredictor {
    fn name(&self) -> &'static str;

    /// Reset the internal state of the predictor.
    fn reset(&mut self);

    /// Return the current predicted outcome.
    fn predict(&self) -> Outcome;

    /// Update the internal state of the predictor with the correct outcome.
    fn update(&mut self, outcome: Outcome);
}
