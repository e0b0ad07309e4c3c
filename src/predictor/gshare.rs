//! A "gshare" predictor: a single table of counters indexed by the program
//! counter XOR'ed with global history.

use crate::Outcome;
use crate::history::*;
use crate::predictor::*;

pub struct GsharePredictor {
    /// Global history register
    ghr: HistoryRegister,

    /// Pattern history table
    pht: CounterTable,
}
impl GsharePredictor {
    /// Create a predictor with `ghistory_bits` bits of global history and
    /// `1 << ghistory_bits` counters.
    pub fn new(ghistory_bits: usize) -> Self {
        Self {
            ghr: HistoryRegister::new(ghistory_bits),
            pht: CounterTable::new(ghistory_bits, SaturatingCounterConfig::TWO_BIT),
        }
    }

    /// Index into the pattern history table for this program counter.
    pub fn index(&self, pc: usize) -> usize {
        self.pht.get_index(pc ^ self.ghr.value())
    }

    pub fn ghr(&self) -> &HistoryRegister { &self.ghr }
    pub fn pht(&self) -> &CounterTable { &self.pht }

    pub fn storage_bits(&self) -> usize {
        self.pht.storage_bits() + self.ghr.len()
    }
}

impl BranchPredictor for GsharePredictor {
    fn name(&self) -> &'static str { "Gshare" }

    fn predict(&self, pc: usize) -> Outcome {
        self.pht.get_entry(self.index(pc)).predict()
    }

    fn train(&mut self, pc: usize, outcome: Outcome) {
        let idx = self.index(pc);
        self.pht.get_entry_mut(idx).update(outcome);
        self.ghr.advance(outcome);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn two_bit_history_scenario() {
        let mut bp = GsharePredictor::new(2);
        let pc = 0x100;

        // (0x100 ^ 0b00) & 0b11 == 0
        assert_eq!(bp.index(pc), 0);
        assert_eq!(bp.predict(pc), Outcome::N);
        bp.train(pc, Outcome::T);
        assert_eq!(bp.pht().get_entry(0).value(), 2);
        assert_eq!(bp.ghr().value(), 0b01);

        // (0x100 ^ 0b01) & 0b11 == 1
        assert_eq!(bp.index(pc), 1);
        bp.train(pc, Outcome::T);
        assert_eq!(bp.pht().get_entry(1).value(), 2);

        // (0x100 ^ 0b11) & 0b11 == 3
        assert_eq!(bp.index(pc), 3);
        bp.train(pc, Outcome::T);
        assert_eq!(bp.pht().get_entry(3).value(), 2);
        assert_eq!(bp.ghr().value(), 0b11);

        assert_eq!(bp.predict(pc), Outcome::T);
        for idx in 0..4 {
            assert!(bp.pht().get_entry(idx).value() <= 3);
        }
    }

    #[test]
    fn saturates_on_a_loop_branch() {
        let mut bp = GsharePredictor::new(2);
        for _ in 0..100 {
            bp.train(0x100, Outcome::T);
        }
        assert_eq!(bp.pht().get_entry(3).value(), 3);
        assert_eq!(bp.predict(0x100), Outcome::T);
    }

    #[test]
    fn zero_history_bits_is_a_single_counter() {
        let mut bp = GsharePredictor::new(0);
        assert_eq!(bp.pht().size(), 1);
        bp.train(0x100, Outcome::T);
        bp.train(0x200, Outcome::T);
        assert_eq!(bp.predict(0x300), Outcome::T);
        assert_eq!(bp.storage_bits(), 2);
    }

    #[test]
    fn learns_alternating_pattern() {
        let mut bp = GsharePredictor::new(4);
        let pc = 0x4000;
        for i in 0..64 {
            bp.train(pc, Outcome::from(i % 2 == 0));
        }
        let mut hits = 0;
        for i in 64..128 {
            let outcome = Outcome::from(i % 2 == 0);
            if bp.predict(pc) == outcome {
                hits += 1;
            }
            bp.train(pc, outcome);
        }
        assert_eq!(hits, 64);
    }
}
