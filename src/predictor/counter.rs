//! Implementation of a saturating counter.

use serde::{ Deserialize, Serialize };
use crate::Outcome;
use crate::predictor::StatefulPredictor;

/// Configuration for building a [`SaturatingCounter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaturatingCounterConfig {
    /// Width of the counter in bits
    pub bits: u8,

    /// Value of the counter after a reset
    pub default: u8,
}
impl SaturatingCounterConfig {
    /// 2-bit counter starting in the weakly not-taken state.
    pub const TWO_BIT: Self = Self { bits: 2, default: 1 };

    /// 2-bit tournament selector starting in the weakly "use global" state.
    pub const SELECTOR: Self = Self { bits: 2, default: 2 };

    /// 3-bit confidence counter starting in the weakly not-taken state.
    pub const THREE_BIT: Self = Self { bits: 3, default: 3 };

    /// The largest value the counter can hold.
    pub fn max(&self) -> u8 {
        ((1u16 << self.bits) - 1) as u8
    }

    /// The largest value that still predicts not-taken.
    pub fn midpoint(&self) -> u8 {
        (1u8 << (self.bits - 1)) - 1
    }

    pub fn storage_bits(&self) -> usize {
        self.bits as usize
    }

    pub fn build(self) -> SaturatingCounter {
        assert!((1..=8).contains(&self.bits));
        assert!(self.default <= self.max());
        SaturatingCounter {
            cfg: self,
            ctr: self.default,
        }
    }
}

/// An N-bit saturating counter used to follow the behavior of a branch.
///
/// The counter predicts taken when its value is strictly greater than
/// [`SaturatingCounterConfig::midpoint`]. It never leaves `0..=max`.
#[derive(Clone, Copy, Debug)]
pub struct SaturatingCounter {
    cfg: SaturatingCounterConfig,
    ctr: u8,
}
impl SaturatingCounter {
    pub fn value(&self) -> u8 { self.ctr }
    pub fn config(&self) -> &SaturatingCounterConfig { &self.cfg }

    pub fn clamped_increment(&mut self) {
        self.ctr = self.ctr.saturating_add(1).min(self.cfg.max());
    }

    pub fn clamped_decrement(&mut self) {
        self.ctr = self.ctr.saturating_sub(1);
    }

    /// Set the value of the counter (clamped to the valid range).
    pub fn set(&mut self, val: u8) {
        self.ctr = val.min(self.cfg.max());
    }

    /// Put the counter in the weakest state predicting `outcome`.
    pub fn set_weak(&mut self, outcome: Outcome) {
        self.ctr = match outcome {
            Outcome::T => self.cfg.midpoint() + 1,
            Outcome::N => self.cfg.midpoint(),
        };
    }

    pub fn is_saturated(&self) -> bool {
        self.ctr == 0 || self.ctr == self.cfg.max()
    }
}

impl StatefulPredictor for SaturatingCounter {
    fn name(&self) -> &'static str { "SaturatingCounter" }
    fn predict(&self) -> Outcome {
        Outcome::from(self.ctr > self.cfg.midpoint())
    }
    fn reset(&mut self) {
        self.ctr = self.cfg.default;
    }
    fn update(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::T => self.clamped_increment(),
            Outcome::N => self.clamped_decrement(),
        }
    }
}
