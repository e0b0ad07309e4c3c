
use serde::{ Deserialize, Serialize };
use rand::SeedableRng;
use rand::rngs::StdRng;
use crate::history::*;
use crate::predictor::*;

/// Configuration for the base component of a [`TAGEPredictor`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TAGEBaseConfig {
    /// Parameters for the saturating counters
    pub ctr: SaturatingCounterConfig,

    /// Number of index bits (the table has `1 << index_bits` entries)
    pub index_bits: usize,
}
impl TAGEBaseConfig {
    pub fn size(&self) -> usize { 1 << self.index_bits }

    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize {
        self.ctr.storage_bits() * self.size()
    }

    /// Use this configuration to create the base component.
    ///
    /// The geometry is not checked here. Configurations coming from outside
    /// the crate should pass through [`crate::EngineConfig::validate`] first.
    pub fn build(&self) -> CounterTable {
        CounterTable::new(self.index_bits, self.ctr)
    }
}

/// Configuration for a [`TAGEComponent`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TAGEComponentConfig {
    /// Number of index bits (the table has `1 << index_bits` entries)
    pub index_bits: usize,

    /// Number of global history bits folded into the index and tag
    pub history_len: usize,

    /// Number of tag bits
    pub tag_bits: usize,

    /// Parameters for the saturating counters
    pub ctr: SaturatingCounterConfig,
}
impl TAGEComponentConfig {
    pub fn size(&self) -> usize { 1 << self.index_bits }

    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize {
        // The 'useful' bit is the extra bit
        let entry_size = self.ctr.storage_bits() + self.tag_bits + 1;
        entry_size * self.size()
    }

    /// Use this configuration to create a new [`TAGEComponent`].
    ///
    /// Panics if `index_bits` does not fit a [usize] shift or if the counter
    /// configuration is invalid.
    pub fn build(self) -> TAGEComponent {
        let entry = TAGEEntry::new(self.ctr.build());
        let data = vec![entry; self.size()];
        TAGEComponent {
            cfg: self,
            data,
        }
    }
}


/// Configuration for a [`TAGEPredictor`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TAGEConfig {
    /// Base component configuration
    pub base: TAGEBaseConfig,

    /// Tagged component configurations, longest history first
    pub comp: Vec<TAGEComponentConfig>,

    /// Seed for the generator used to pick an entry to evict
    pub seed: u64,

    /// Periodically clear all 'useful' bits when eviction pressure is high
    pub useful_reset: bool,
}
impl TAGEConfig {
    pub fn new(base: TAGEBaseConfig) -> Self {
        Self {
            base,
            comp: Vec::new(),
            seed: 0,
            useful_reset: true,
        }
    }

    pub fn total_entries(&self) -> usize {
        let c: usize = self.comp.iter().map(|c| c.size()).sum();
        self.base.size() + c
    }

    /// The number of global history bits required by the longest component.
    pub fn history_bits(&self) -> usize {
        self.comp.iter().map(|c| c.history_len).max().unwrap_or(0)
    }

    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize {
        let c: usize = self.comp.iter().map(|c| c.storage_bits()).sum();
        c + self.base.storage_bits() + self.history_bits()
    }

    /// Add a tagged component to the predictor.
    pub fn add_component(&mut self, c: TAGEComponentConfig) {
        self.comp.push(c);
        self.comp.sort_by(|x, y| y.history_len.cmp(&x.history_len));
    }

    /// Use this configuration to create a new [`TAGEPredictor`].
    ///
    /// Expects validated input, see [`crate::CustomConfig::validate`].
    pub fn build(self) -> TAGEPredictor {
        let comp = self.comp.iter().map(|c| c.clone().build())
            .collect::<Vec<TAGEComponent>>();
        let base = self.base.build();
        let stat = TAGEStats::new(comp.len());
        let ghr = HistoryRegister::new(self.history_bits());
        let rng = StdRng::seed_from_u64(self.seed);
        TAGEPredictor {
            cfg: self,
            stat,
            base,
            comp,
            ghr,
            rng,
            reset_ctr: 0,
        }
    }
}
