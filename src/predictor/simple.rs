
use crate::Outcome;
use crate::predictor::BranchPredictor;

/// A simple predictor with no state: always predict 'taken'.
#[derive(Clone, Copy, Debug, Default)]
pub struct TakenPredictor;
impl BranchPredictor for TakenPredictor {
    fn name(&self) -> &'static str { "TakenPredictor" }
    fn predict(&self, _pc: usize) -> Outcome { Outcome::T }
    fn train(&mut self, _pc: usize, _outcome: Outcome) {}
}

/// A simple predictor with no state: always predict 'not-taken'.
#[derive(Clone, Copy, Debug, Default)]
pub struct NotTakenPredictor;
impl BranchPredictor for NotTakenPredictor {
    fn name(&self) -> &'static str { "NotTakenPredictor" }
    fn predict(&self, _pc: usize) -> Outcome { Outcome::N }
    fn train(&mut self, _pc: usize, _outcome: Outcome) {}
}
