//! Types for implementing a table of predictors.

use crate::Outcome;
use crate::history::low_mask;
use crate::predictor::*;

/// Interface to a table of predictors.
///
/// Every access goes through [PredictorTable::get_index], which is the only
/// place an input is turned into a (masked) index.
pub trait PredictorTable: Sized {
    /// The type of input to the table used to form an index.
    type Input<'a>;

    /// The type of entry in the table.
    type Entry;

    /// Returns the number of entries in the table.
    fn size(&self) -> usize;

    /// Given some input, return the corresponding index into the table.
    fn get_index(&self, input: Self::Input<'_>) -> usize;

    /// Returns a reference to an entry in the table.
    fn get_entry(&self, idx: usize) -> &Self::Entry;

    /// Returns a mutable reference to an entry in the table.
    fn get_entry_mut(&mut self, idx: usize) -> &mut Self::Entry;

    /// Returns a bitmask corresponding to the number of entries in the table.
    fn index_mask(&self) -> usize {
        assert!(self.size().is_power_of_two());
        self.size() - 1
    }
}

/// Interface to a *tagged* table of predictors.
pub trait TaggedPredictorTable: PredictorTable {
    fn get_tag(&self, input: Self::Input<'_>) -> usize;
}


/// A table of [SaturatingCounter] indexed by some pre-hashed key.
///
/// A table with zero index bits has exactly one entry.
#[derive(Clone, Debug)]
pub struct CounterTable {
    /// Saturating counter configuration
    cfg: SaturatingCounterConfig,

    /// Table of counters
    data: Vec<SaturatingCounter>,

    /// Number of index bits
    index_bits: usize,
}
impl CounterTable {
    pub fn new(index_bits: usize, cfg: SaturatingCounterConfig) -> Self {
        Self {
            cfg,
            data: vec![cfg.build(); 1 << index_bits],
            index_bits,
        }
    }

    pub fn index_bits(&self) -> usize { self.index_bits }

    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize {
        self.cfg.storage_bits() * self.data.len()
    }

    /// Return the predicted outcome for this key.
    pub fn predict(&self, key: usize) -> Outcome {
        self.get_entry(self.get_index(key)).predict()
    }

    /// Train the counter selected by this key.
    pub fn update(&mut self, key: usize, outcome: Outcome) {
        let idx = self.get_index(key);
        self.get_entry_mut(idx).update(outcome);
    }
}

impl PredictorTable for CounterTable {
    type Input<'a> = usize;
    type Entry = SaturatingCounter;

    fn size(&self) -> usize { self.data.len() }

    fn get_index(&self, key: usize) -> usize {
        key & low_mask(self.index_bits)
    }

    fn get_entry(&self, idx: usize) -> &SaturatingCounter {
        let index = idx & self.index_mask();
        &self.data[index]
    }

    fn get_entry_mut(&mut self, idx: usize) -> &mut SaturatingCounter {
        let index = idx & self.index_mask();
        &mut self.data[index]
    }
}
