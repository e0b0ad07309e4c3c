//! Helpers for collecting statistics.

use std::collections::*;
use bitvec::prelude::*;
use itertools::*;
use crate::branch::*;

/// Container for recording simple statistics while evaluating some model.
#[derive(Debug, Default)]
pub struct BranchStats {
    /// Per-branch statistics (indexed by program counter value).
    pub data: BTreeMap<usize, BranchData>,

    /// Number of correct predictions
    pub global_hits: usize,

    /// Number of times any branch instruction was executed
    pub global_brns: usize,
}
impl BranchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the global hit rate.
    pub fn hit_rate(&self) -> f64 {
        if self.global_brns == 0 {
            return 0.0;
        }
        self.global_hits as f64 / self.global_brns as f64
    }

    /// Return the global misprediction rate [in percent].
    pub fn misprediction_rate(&self) -> f64 {
        if self.global_brns == 0 {
            return 0.0;
        }
        100.0 * self.global_miss() as f64 / self.global_brns as f64
    }

    /// Return the global hit count.
    pub fn global_hits(&self) -> usize { self.global_hits }

    /// Return the global miss count.
    pub fn global_miss(&self) -> usize { self.global_brns - self.global_hits }

    /// Return the total branch count.
    pub fn global_brns(&self) -> usize { self.global_brns }

    /// Record the prediction made for some resolved branch.
    pub fn update(&mut self, record: &BranchRecord, prediction: Outcome) {
        let hit = prediction == record.outcome;
        self.global_brns += 1;
        if hit { self.global_hits += 1; }

        let data = self.get_mut(record.pc);
        data.occ += 1;
        data.pat.push(record.outcome.into());
        if hit { data.hits += 1; }
    }

    /// Returns a reference to data collected for a particular branch.
    pub fn get(&self, pc: usize) -> Option<&BranchData> {
        self.data.get(&pc)
    }

    /// Returns a mutable reference to data collected for a particular branch.
    /// Creates a new entry if one doesn't already exist.
    pub fn get_mut(&mut self, pc: usize) -> &mut BranchData {
        self.data.entry(pc).or_default()
    }

    /// Returns the number of unique observed branch instructions.
    pub fn num_unique_branches(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of branches that are always taken
    pub fn num_always_taken(&self) -> usize {
        self.data.values().filter(|entry| entry.is_always_taken()).count()
    }

    /// Returns the number of branches that are never taken
    pub fn num_never_taken(&self) -> usize {
        self.data.values().filter(|entry| entry.is_never_taken()).count()
    }

    /// Return the `n` most frequently executed branches.
    pub fn get_common_branches(&self, n: usize) -> Vec<(usize, &BranchData)> {
        self.data.iter()
            .sorted_by(|x, y| y.1.occ.cmp(&x.1.occ))
            .take(n)
            .map(|(pc, s)| (*pc, s))
            .collect()
    }

    /// Return the `n` branches responsible for the most mispredictions.
    pub fn get_low_rate_branches(&self, n: usize) -> Vec<(usize, &BranchData)> {
        self.data.iter()
            .filter(|(_, s)| s.misses() > 0)
            .sorted_by(|x, y| y.1.misses().cmp(&x.1.misses()))
            .take(n)
            .map(|(pc, s)| (*pc, s))
            .collect()
    }
}

/// Container for per-branch statistics.
#[derive(Debug, Default)]
pub struct BranchData {
    /// Number of times this branch was encountered.
    pub occ: usize,

    /// Number of correct predictions for this branch.
    pub hits: usize,

    /// Record of all observed outcomes for this branch.
    pub pat: BitVec,
}
impl BranchData {
    /// Return the hit rate for this branch.
    pub fn hit_rate(&self) -> f64 {
        self.hits as f64 / self.occ as f64
    }

    pub fn misses(&self) -> usize { self.occ - self.hits }

    pub fn is_always_taken(&self) -> bool {
        self.pat.count_ones() == self.pat.len()
    }

    pub fn is_never_taken(&self) -> bool {
        self.pat.count_zeros() == self.pat.len()
    }

    pub fn times_taken(&self) -> usize {
        self.pat.count_ones()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn counts_hits_and_misses() {
        let mut stats = BranchStats::new();
        assert_eq!(stats.misprediction_rate(), 0.0);

        let a = BranchRecord::new(0x10, Outcome::T);
        let b = BranchRecord::new(0x20, Outcome::N);
        stats.update(&a, Outcome::T);
        stats.update(&a, Outcome::N);
        stats.update(&b, Outcome::T);
        stats.update(&b, Outcome::T);

        assert_eq!(stats.global_brns(), 4);
        assert_eq!(stats.global_hits(), 1);
        assert_eq!(stats.global_miss(), 3);
        assert_eq!(stats.misprediction_rate(), 75.0);
        assert_eq!(stats.num_unique_branches(), 2);
        assert_eq!(stats.num_always_taken(), 1);
        assert_eq!(stats.num_never_taken(), 1);
        assert_eq!(stats.get(0x10).map(|d| d.times_taken()), Some(2));

        let worst = stats.get_low_rate_branches(1);
        assert_eq!(worst[0].0, 0x20);
        assert_eq!(worst[0].1.hit_rate(), 0.0);
        assert_eq!(stats.get_common_branches(8).len(), 2);
    }
}
