
use crate::Outcome;
use crate::history::*;
use crate::predictor::*;

/// Inputs used to form an index and tag in a [`TAGEComponent`].
#[derive(Clone, Copy, Debug)]
pub struct TAGEInputs<'a> {
    /// Program counter associated with a predicted branch
    pub pc: usize,

    /// Committed global history
    pub ghr: &'a HistoryRegister,
}

/// An entry in some [`TAGEComponent`].
#[derive(Clone, Debug)]
pub struct TAGEEntry {
    /// Container for debugging and analysis data
    pub stat: TAGEEntryStats,

    /// Confidence counter tracking a branch outcome
    pub ctr: SaturatingCounter,

    /// Set when this entry was correct and the alternate prediction was not.
    /// Entries without this bit are replaced first.
    pub useful: bool,

    /// Tag associated with this entry
    pub tag: Option<usize>,
}
impl TAGEEntry {
    pub fn new(ctr: SaturatingCounter) -> Self {
        Self {
            ctr,
            useful: false,
            tag: None,
            stat: TAGEEntryStats::default(),
        }
    }

    /// Get the current predicted outcome.
    pub fn predict(&self) -> Outcome {
        self.ctr.predict()
    }

    /// Update the confidence counter associated with this entry.
    pub fn update(&mut self, outcome: Outcome) {
        self.ctr.update(outcome);
        self.stat.updates += 1;
    }

    /// Returns true if the provided tag matches this entry.
    pub fn tag_matches(&self, tag: usize) -> bool {
        self.tag == Some(tag)
    }

    /// Replace this entry with a new branch, weakly biased toward `outcome`.
    pub fn allocate(&mut self, tag: usize, outcome: Outcome) {
        self.tag = Some(tag);
        self.useful = false;
        self.ctr.set_weak(outcome);
        self.stat.allocations += 1;
    }
}

/// A tagged component in the TAGE predictor.
#[derive(Clone, Debug)]
pub struct TAGEComponent {
    pub cfg: TAGEComponentConfig,

    /// Table of entries
    pub data: Vec<TAGEEntry>,
}
impl TAGEComponent {
    pub fn num_useful_entries(&self) -> usize {
        self.data.iter().filter(|e| e.useful).count()
    }

    /// Calculate what percentage of entries have been allocated.
    pub fn utilization(&self) -> f64 {
        let unused_entries = self.data.iter().filter(|e| e.stat.was_unused())
            .count() as f64;
        (1.0 - (unused_entries / self.data.len() as f64)) * 100.0
    }

    /// Reset the 'useful' bit for all entries in this component.
    pub fn reset_useful_bits(&mut self) {
        for entry in self.data.iter_mut() {
            entry.useful = false;
        }
    }
}

impl PredictorTable for TAGEComponent {
    type Input<'a> = TAGEInputs<'a>;
    type Entry = TAGEEntry;

    fn size(&self) -> usize { self.data.len() }

    fn get_index(&self, input: TAGEInputs<'_>) -> usize {
        let bits = self.cfg.index_bits;
        let ghist_bits = input.ghr.fold(self.cfg.history_len, bits);
        let pc_bits = input.pc ^ (input.pc >> bits);
        (pc_bits ^ ghist_bits) & self.index_mask()
    }

    fn get_entry(&self, idx: usize) -> &TAGEEntry {
        let index = idx & self.index_mask();
        &self.data[index]
    }

    fn get_entry_mut(&mut self, idx: usize) -> &mut TAGEEntry {
        let index = idx & self.index_mask();
        &mut self.data[index]
    }
}

impl TaggedPredictorTable for TAGEComponent {
    fn get_tag(&self, input: TAGEInputs<'_>) -> usize {
        let bits = self.cfg.tag_bits;
        let len = self.cfg.history_len;

        // Two different foldings, so that a history and its rotation do
        // not produce the same tag
        let ghist0_bits = input.ghr.fold(len, bits);
        let ghist1_bits = input.ghr.fold(len, bits.saturating_sub(1)) << 1;
        (input.pc ^ ghist0_bits ^ ghist1_bits) & low_mask(bits)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn component(history_len: usize) -> TAGEComponent {
        TAGEComponentConfig {
            index_bits: 4,
            history_len,
            tag_bits: 6,
            ctr: SaturatingCounterConfig::THREE_BIT,
        }.build()
    }

    #[test]
    fn hashes_are_masked() {
        let c = component(32);
        let mut ghr = HistoryRegister::new(32);
        for i in 0..32 {
            ghr.advance(Outcome::from(i % 3 == 0));
        }
        for pc in [0, 0x1000, usize::MAX, 0xdead_beef] {
            let inputs = TAGEInputs { pc, ghr: &ghr };
            assert!(c.get_index(inputs) < 16);
            assert!(c.get_tag(inputs) < 64);
        }
    }

    #[test]
    fn hashes_depend_on_history_window() {
        let short = component(4);
        let long = component(32);
        let mut a = HistoryRegister::new(32);
        let mut b = HistoryRegister::new(32);

        // Same recent history, different old history
        a.advance(Outcome::T);
        b.advance(Outcome::N);
        for _ in 0..8 {
            a.advance(Outcome::N);
            b.advance(Outcome::N);
        }

        let ia = TAGEInputs { pc: 0x400, ghr: &a };
        let ib = TAGEInputs { pc: 0x400, ghr: &b };
        assert_eq!(short.get_index(ia), short.get_index(ib));
        assert_eq!(short.get_tag(ia), short.get_tag(ib));
        assert_ne!(long.get_index(ia), long.get_index(ib));
    }

    #[test]
    fn allocation_resets_entry() {
        let mut c = component(8);
        let entry = c.get_entry_mut(3);
        entry.useful = true;
        entry.allocate(0x2a, Outcome::T);
        assert!(entry.tag_matches(0x2a));
        assert!(!entry.tag_matches(0x2b));
        assert!(!entry.useful);
        assert_eq!(entry.ctr.value(), 4);
        assert_eq!(entry.predict(), Outcome::T);

        entry.allocate(0x2b, Outcome::N);
        assert_eq!(entry.ctr.value(), 3);
        assert_eq!(entry.stat.allocations, 2);
        assert!(c.utilization() > 0.0);
    }

    #[test]
    fn untagged_entries_never_match() {
        let c = component(8);
        assert!(c.data.iter().all(|e| !e.tag_matches(0)));
        assert_eq!(c.num_useful_entries(), 0);
        assert_eq!(c.utilization(), 0.0);
    }
}
