//! A "tournament" predictor: a meta-predictor chooses between a local-history
//! predictor and a global-history predictor.

use crate::Outcome;
use crate::history::*;
use crate::predictor::*;

/// The component chosen by the selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TournamentChoice {
    Local,
    Global,
}

/// Container for output from [`TournamentPredictor::lookup`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TournamentPrediction {
    /// Index into the global table and the selector
    pub global_idx: usize,

    /// Index into the local table (the local history pattern)
    pub local_idx: usize,

    /// Predicted direction from the global table
    pub global: Outcome,

    /// Predicted direction from the local table
    pub local: Outcome,

    /// The component trusted by the selector
    pub choice: TournamentChoice,
}
impl TournamentPrediction {
    pub fn outcome(&self) -> Outcome {
        match self.choice {
            TournamentChoice::Local => self.local,
            TournamentChoice::Global => self.global,
        }
    }
}

pub struct TournamentPredictor {
    /// Global history register
    ghr: HistoryRegister,

    /// Per-branch local history
    lht: LocalHistoryTable,

    /// Counters indexed by global history
    global: CounterTable,

    /// Counters indexed by local history
    local: CounterTable,

    /// Meta-predictor indexed by global history.
    /// Values below the midpoint favor the local table.
    selector: CounterTable,
}
impl TournamentPredictor {
    pub fn new(ghistory_bits: usize, lhistory_bits: usize, pc_index_bits: usize)
        -> Self
    {
        Self {
            ghr: HistoryRegister::new(ghistory_bits),
            lht: LocalHistoryTable::new(pc_index_bits, lhistory_bits),
            global: CounterTable::new(ghistory_bits, SaturatingCounterConfig::TWO_BIT),
            local: CounterTable::new(lhistory_bits, SaturatingCounterConfig::TWO_BIT),
            selector: CounterTable::new(ghistory_bits, SaturatingCounterConfig::SELECTOR),
        }
    }

    /// Access both components and the selector for this program counter.
    pub fn lookup(&self, pc: usize) -> TournamentPrediction {
        let global_idx = self.global.get_index(self.ghr.value());
        let local_idx = self.local.get_index(self.lht.pattern(pc));
        let choice = match self.selector.get_entry(global_idx).predict() {
            Outcome::N => TournamentChoice::Local,
            Outcome::T => TournamentChoice::Global,
        };
        TournamentPrediction {
            global_idx,
            local_idx,
            global: self.global.get_entry(global_idx).predict(),
            local: self.local.get_entry(local_idx).predict(),
            choice,
        }
    }

    pub fn ghr(&self) -> &HistoryRegister { &self.ghr }
    pub fn lht(&self) -> &LocalHistoryTable { &self.lht }
    pub fn selector(&self) -> &CounterTable { &self.selector }

    pub fn storage_bits(&self) -> usize {
        self.global.storage_bits()
            + self.local.storage_bits()
            + self.selector.storage_bits()
            + self.lht.size() * self.local.index_bits()
            + self.ghr.len()
    }
}

impl BranchPredictor for TournamentPredictor {
    fn name(&self) -> &'static str { "Tournament" }

    fn predict(&self, pc: usize) -> Outcome {
        self.lookup(pc).outcome()
    }

    fn train(&mut self, pc: usize, outcome: Outcome) {
        let p = self.lookup(pc);

        // The selector only moves when exactly one component was correct
        let local_correct = p.local == outcome;
        let global_correct = p.global == outcome;
        if local_correct != global_correct {
            let sel = self.selector.get_entry_mut(p.global_idx);
            if global_correct {
                sel.clamped_increment();
            } else {
                sel.clamped_decrement();
            }
        }

        self.global.get_entry_mut(p.global_idx).update(outcome);
        self.local.get_entry_mut(p.local_idx).update(outcome);
        self.ghr.advance(outcome);
        self.lht.advance(pc, outcome);
    }
}
