//! Implementation of a "Tagged GEometric history length" (TAGE) predictor.

pub mod component;
pub mod stat;
pub mod config;

pub use component::*;
pub use stat::*;
pub use config::*;

use rand::Rng;
use rand::rngs::StdRng;
use tracing::{ debug, trace };

use crate::history::*;
use crate::Outcome;
use crate::predictor::*;

/// Identifies a particular component in a [`TAGEPredictor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TAGEProvider {
    /// The base component
    Base,

    /// A tagged component
    Tagged(usize),
}

/// Container for output from [`TAGEPredictor::lookup`], including the
/// predicted outcome and other metadata about how the prediction was made.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TAGEPrediction {
    /// The component providing the prediction
    pub provider: TAGEProvider,

    /// A predicted direction
    pub outcome: Outcome,

    /// The index identifying the entry used to make this prediction
    pub idx: usize,

    /// The tag matching the entry used to make this prediction
    pub tag: usize,

    /// Alternate component used to provide a prediction
    pub alt_provider: TAGEProvider,

    /// Predicted direction from the alternate component
    pub alt_outcome: Outcome,
}


/// The "TAgged GEometric history length" predictor.
///
/// See the following:
///  - "A case for (partially) TAgged GEometric history length branch prediction"
///  (Seznec, 2006).
///
/// Tagged components are stored with the longest associated history length
/// at index 0. The predictor owns its global history register, which is
/// advanced exactly once per call to [`BranchPredictor::train`].
pub struct TAGEPredictor {
    /// The configuration used to create this object
    pub cfg: TAGEConfig,

    pub stat: TAGEStats,

    /// Base component
    pub base: CounterTable,

    /// Tagged components
    pub comp: Vec<TAGEComponent>,

    /// Committed global history
    ghr: HistoryRegister,

    /// Generator used to pick a victim when every candidate is 'useful'
    rng: StdRng,

    /// Counter used to periodically reset all 'useful' bits
    reset_ctr: u8,
}
impl TAGEPredictor {

    /// Given a program counter value and the provider of an incorrect
    /// prediction, allocate a new entry in a component with a longer
    /// associated history length.
    fn alloc(&mut self, pc: usize, provider: TAGEProvider, outcome: Outcome) {
        // Components at indexes below this have a longer history length
        // than the provider.
        let limit = match provider {
            TAGEProvider::Base => self.comp.len(),
            TAGEProvider::Tagged(idx) => idx,
        };

        // Early return: when the provider is the component with the longest
        // associated history length, we cannot allocate.
        if limit == 0 {
            return;
        }

        // Take the shortest candidate whose entry is not 'useful'.
        // Otherwise, evict a random 'useful' entry.
        let clean = (0..limit).rev().find(|&idx| {
            let inputs = self.inputs(pc);
            let index = self.comp[idx].get_index(inputs);
            !self.comp[idx].get_entry(index).useful
        });
        let (victim, forced) = match clean {
            Some(idx) => (idx, false),
            None => (self.rng.gen_range(0..limit), true),
        };

        let (index, tag) = {
            let inputs = self.inputs(pc);
            let c = &self.comp[victim];
            (c.get_index(inputs), c.get_tag(inputs))
        };
        self.comp[victim].get_entry_mut(index).allocate(tag, outcome);
        trace!(pc, component = victim, index, tag, forced, "allocated entry");

        // Allocations are tracked with an 8-bit counter which is incremented
        // when a 'useful' entry must be evicted and decremented otherwise.
        // When this counter saturates, we reset the state of all 'useful'
        // bits in an attempt to free up some entries.
        if forced {
            self.stat.forced_alcs += 1;
            self.reset_ctr = self.reset_ctr.saturating_add(1);
        } else {
            self.stat.alcs += 1;
            self.reset_ctr = self.reset_ctr.saturating_sub(1);
        }
    }

    /// Clear the 'useful' bit in every tagged entry.
    fn reset_useful_bits(&mut self) {
        for comp in self.comp.iter_mut() {
            comp.reset_useful_bits();
        }
        self.reset_ctr = 0;
        self.stat.resets += 1;
        debug!(clk = self.stat.clk, resets = self.stat.resets, "reset useful bits");
    }
}

/// The public interface to a [`TAGEPredictor`].
impl TAGEPredictor {
    /// Return the number of tagged components.
    pub fn num_tagged_components(&self) -> usize {
        self.comp.len()
    }

    /// Return the committed global history.
    pub fn ghr(&self) -> &HistoryRegister { &self.ghr }

    /// Return the inputs used to index into tagged components.
    pub fn inputs(&self, pc: usize) -> TAGEInputs<'_> {
        TAGEInputs { pc, ghr: &self.ghr }
    }

    /// Find the providing component (and the alternate component) for
    /// this program counter.
    pub fn lookup(&self, pc: usize) -> TAGEPrediction {
        let inputs = self.inputs(pc);

        // The base component provides the default predicted outcome
        // for cases where we miss in all tagged components
        let base_idx = self.base.get_index(pc);
        let default_outcome = self.base.get_entry(base_idx).predict();
        let mut result = TAGEPrediction {
            provider: TAGEProvider::Base,
            outcome: default_outcome,
            idx: base_idx,
            tag: 0,
            alt_provider: TAGEProvider::Base,
            alt_outcome: default_outcome,
        };

        // The longest matching component provides the prediction, and the
        // next-longest matching component is the alternate
        let mut hit = false;
        for (comp_idx, comp) in self.comp.iter().enumerate() {
            let idx = comp.get_index(inputs);
            let tag = comp.get_tag(inputs);
            let entry = comp.get_entry(idx);
            if !entry.tag_matches(tag) {
                continue;
            }
            if hit {
                result.alt_provider = TAGEProvider::Tagged(comp_idx);
                result.alt_outcome = entry.predict();
                break;
            }
            hit = true;
            result.provider = TAGEProvider::Tagged(comp_idx);
            result.outcome = entry.predict();
            result.idx = idx;
            result.tag = tag;
        }
        result
    }
}

impl BranchPredictor for TAGEPredictor {
    fn name(&self) -> &'static str { "TAGE" }

    fn predict(&self, pc: usize) -> Outcome {
        self.lookup(pc).outcome
    }

    fn train(&mut self, pc: usize, outcome: Outcome) {
        let prediction = self.lookup(pc);
        let correct = prediction.outcome == outcome;

        // Update the entry in the component that provided the prediction
        match prediction.provider {
            TAGEProvider::Base => {
                self.base.get_entry_mut(prediction.idx).update(outcome);
                if correct {
                    self.stat.base_hits += 1;
                } else {
                    self.stat.base_miss += 1;
                }
            },
            TAGEProvider::Tagged(idx) => {
                let entry = self.comp[idx].get_entry_mut(prediction.idx);

                // Only meaningful when the alternate prediction disagrees
                if prediction.alt_outcome != prediction.outcome {
                    entry.useful = correct;
                }
                entry.update(outcome);
                if correct {
                    self.stat.comp_hits[idx] += 1;
                } else {
                    self.stat.comp_miss[idx] += 1;
                }
            },
        }

        if !correct {
            self.alloc(pc, prediction.provider, outcome);
        }

        if self.cfg.useful_reset && self.reset_ctr == u8::MAX {
            self.reset_useful_bits();
        }

        self.stat.clk += 1;
        self.ghr.advance(outcome);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn build_tage(useful_reset: bool) -> TAGEPredictor {
        build_tage_seeded(0x1234, useful_reset)
    }

    fn build_tage_seeded(seed: u64, useful_reset: bool) -> TAGEPredictor {
        let mut cfg = TAGEConfig::new(TAGEBaseConfig {
            ctr: SaturatingCounterConfig::TWO_BIT,
            index_bits: 6,
        });
        for len in [4, 8, 16, 32] {
            cfg.add_component(TAGEComponentConfig {
                index_bits: 5,
                history_len: len,
                tag_bits: 8,
                ctr: SaturatingCounterConfig::THREE_BIT,
            });
        }
        cfg.seed = seed;
        cfg.useful_reset = useful_reset;
        cfg.build()
    }

    /// Install an entry for `pc` in component `comp_idx`.
    fn install(tage: &mut TAGEPredictor, comp_idx: usize, pc: usize, outcome: Outcome) {
        let inputs = tage.inputs(pc);
        let idx = tage.comp[comp_idx].get_index(inputs);
        let tag = tage.comp[comp_idx].get_tag(inputs);
        tage.comp[comp_idx].get_entry_mut(idx).allocate(tag, outcome);
    }

    #[test]
    fn falls_back_to_base() {
        let tage = build_tage(true);
        let p = tage.lookup(0x1000);
        assert_eq!(p.provider, TAGEProvider::Base);
        assert_eq!(p.outcome, Outcome::N);
        assert_eq!(tage.ghr().len(), 32);
    }

    #[test]
    fn longest_match_wins() {
        let mut tage = build_tage(true);
        let pc = 0x1000;
        install(&mut tage, 2, pc, Outcome::N);
        install(&mut tage, 0, pc, Outcome::T);

        let p = tage.lookup(pc);
        assert_eq!(p.provider, TAGEProvider::Tagged(0));
        assert_eq!(p.outcome, Outcome::T);
        assert_eq!(p.alt_provider, TAGEProvider::Tagged(2));
        assert_eq!(p.alt_outcome, Outcome::N);
        assert_eq!(tage.predict(pc), Outcome::T);
    }

    #[test]
    fn misprediction_allocates_in_longer_component() {
        let mut tage = build_tage(true);
        let pc = 0x1000;

        // The base component predicts not-taken; the shortest candidate
        // with a clear 'useful' bit is chosen.
        tage.train(pc, Outcome::T);
        assert_eq!(tage.stat.base_miss, 1);
        assert_eq!(tage.stat.alcs, 1);
        assert_eq!(tage.comp[3].data.iter().filter(|e| e.tag.is_some()).count(), 1);
        for idx in 0..3 {
            assert!(tage.comp[idx].data.iter().all(|e| e.tag.is_none()));
        }
    }

    fn tagged_entries(tage: &TAGEPredictor) -> Vec<usize> {
        tage.comp.iter()
            .map(|c| c.data.iter().filter(|e| e.tag.is_some()).count())
            .collect()
    }

    #[test]
    fn middle_provider_allocates_in_next_longer_component() {
        let mut tage = build_tage(true);
        let pc = 0x7000;
        install(&mut tage, 2, pc, Outcome::N);
        assert_eq!(tage.lookup(pc).provider, TAGEProvider::Tagged(2));

        tage.train(pc, Outcome::T);
        assert_eq!(tage.stat.comp_miss[2], 1);
        assert_eq!(tage.stat.alcs, 1);
        assert_eq!(tage.stat.forced_alcs, 0);
        assert_eq!(tagged_entries(&tage), vec![0, 1, 1, 0]);
    }

    #[test]
    fn middle_provider_only_evicts_longer_components() {
        let pc = 0x7000;
        for seed in 0..64 {
            let mut tage = build_tage_seeded(seed, false);
            for comp in tage.comp.iter_mut() {
                for entry in comp.data.iter_mut() {
                    entry.useful = true;
                }
            }
            install(&mut tage, 2, pc, Outcome::N);
            tage.train(pc, Outcome::T);

            assert_eq!(tage.stat.alcs, 0);
            assert_eq!(tage.stat.forced_alcs, 1);
            let counts = tagged_entries(&tage);
            assert_eq!(counts[0] + counts[1], 1, "seed {}", seed);
            assert_eq!(counts[2], 1, "seed {}", seed);
            assert_eq!(counts[3], 0, "seed {}", seed);
        }
    }

    #[test]
    fn longest_provider_cannot_allocate() {
        let mut tage = build_tage(true);
        let pc = 0x2000;
        install(&mut tage, 0, pc, Outcome::N);
        tage.train(pc, Outcome::T);
        assert_eq!(tage.stat.comp_miss[0], 1);
        assert_eq!(tage.stat.alcs + tage.stat.forced_alcs, 0);
    }

    #[test]
    fn useful_bit_tracks_disagreement() {
        let mut tage = build_tage(true);
        let pc = 0x3000;

        // Provider disagrees with the base component and is correct
        install(&mut tage, 1, pc, Outcome::T);
        let p = tage.lookup(pc);
        tage.train(pc, Outcome::T);
        assert!(tage.comp[1].get_entry(p.idx).useful);

        // Provider agrees with the alternate: unchanged
        let mut tage = build_tage(true);
        install(&mut tage, 1, pc, Outcome::N);
        let p = tage.lookup(pc);
        tage.comp[1].get_entry_mut(p.idx).useful = true;
        tage.train(pc, Outcome::T);
        assert!(tage.comp[1].get_entry(p.idx).useful);

        // Provider disagrees with the alternate and is wrong
        let mut tage = build_tage(true);
        install(&mut tage, 1, pc, Outcome::T);
        let p = tage.lookup(pc);
        tage.comp[1].get_entry_mut(p.idx).useful = true;
        tage.train(pc, Outcome::N);
        assert!(!tage.comp[1].get_entry(p.idx).useful);
    }

    #[test]
    fn evicts_useful_entries_when_necessary() {
        let mut tage = build_tage(false);
        for comp in tage.comp.iter_mut() {
            for entry in comp.data.iter_mut() {
                entry.useful = true;
            }
        }
        tage.train(0x4000, Outcome::T);
        assert_eq!(tage.stat.alcs, 0);
        assert_eq!(tage.stat.forced_alcs, 1);
        assert_eq!(tagged_entries(&tage).iter().sum::<usize>(), 1);
    }

    #[test]
    fn saturated_eviction_pressure_resets_useful_bits() {
        let mut tage = build_tage(true);
        tage.reset_ctr = u8::MAX - 1;
        for comp in tage.comp.iter_mut() {
            for entry in comp.data.iter_mut() {
                entry.useful = true;
            }
        }
        tage.train(0x4000, Outcome::T);
        assert_eq!(tage.stat.resets, 1);
        assert_eq!(tage.reset_ctr, 0);
        assert!(tage.comp.iter().all(|c| c.num_useful_entries() == 0));
    }

    #[test]
    fn history_advances_once_per_train() {
        let mut tage = build_tage(true);
        let outcomes = [Outcome::T, Outcome::T, Outcome::N, Outcome::T];
        for (i, o) in outcomes.iter().enumerate() {
            tage.train(0x5000 + i * 4, *o);
        }
        assert_eq!(tage.ghr().value(), 0b1101);
        assert_eq!(tage.stat.clk, 4);
    }

    #[test]
    fn learns_a_history_correlated_branch() {
        // Period-5 pattern: too long for the base component alone
        let mut tage = build_tage(true);
        let pattern = [Outcome::T, Outcome::T, Outcome::N, Outcome::T, Outcome::N];
        let pc = 0x6000;
        for i in 0..2000 {
            tage.train(pc, pattern[i % pattern.len()]);
        }
        let mut hits = 0;
        for i in 2000..2100 {
            let outcome = pattern[i % pattern.len()];
            if tage.predict(pc) == outcome {
                hits += 1;
            }
            tage.train(pc, outcome);
        }
        assert!(hits >= 95, "hits = {}", hits);
    }
}
