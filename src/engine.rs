//! The prediction engine: one configured scheme behind the
//! [`BranchPredictor`] interface.

use tracing::debug;
use crate::Outcome;
use crate::config::*;
use crate::error::ConfigError;
use crate::predictor::*;

/// A predictor selected by an [`EngineConfig`].
///
/// Every engine owns all of its tables and history registers, so several
/// engines can be run side-by-side over the same trace.
pub enum Engine {
    /// No scheme was configured. Always predicts not-taken.
    Unconfigured(NotTakenPredictor),
    Static(TakenPredictor),
    Gshare(GsharePredictor),
    Tournament(TournamentPredictor),
    Custom(TAGEPredictor),
}

impl Default for Engine {
    fn default() -> Self {
        Self::Unconfigured(NotTakenPredictor)
    }
}

impl Engine {
    /// Allocate all tables for the configured scheme.
    pub fn new(cfg: &EngineConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let engine = match cfg.scheme {
            Scheme::Static => Self::Static(TakenPredictor),
            Scheme::Gshare => {
                Self::Gshare(GsharePredictor::new(cfg.ghistory_bits))
            },
            Scheme::Tournament => Self::Tournament(TournamentPredictor::new(
                cfg.ghistory_bits,
                cfg.lhistory_bits,
                cfg.pc_index_bits,
            )),
            Scheme::Custom => Self::Custom(cfg.custom.tage_config().build()),
        };
        debug!(scheme = %cfg.scheme, storage_bits = engine.storage_bits(),
            "built prediction engine");
        Ok(engine)
    }

    /// The configured scheme, if any.
    pub fn scheme(&self) -> Option<Scheme> {
        match self {
            Self::Unconfigured(_) => None,
            Self::Static(_) => Some(Scheme::Static),
            Self::Gshare(_) => Some(Scheme::Gshare),
            Self::Tournament(_) => Some(Scheme::Tournament),
            Self::Custom(_) => Some(Scheme::Custom),
        }
    }

    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize {
        match self {
            Self::Unconfigured(_) | Self::Static(_) => 0,
            Self::Gshare(bp) => bp.storage_bits(),
            Self::Tournament(bp) => bp.storage_bits(),
            Self::Custom(bp) => bp.cfg.storage_bits(),
        }
    }
}

impl BranchPredictor for Engine {
    fn name(&self) -> &'static str {
        match self {
            Self::Unconfigured(bp) => bp.name(),
            Self::Static(bp) => bp.name(),
            Self::Gshare(bp) => bp.name(),
            Self::Tournament(bp) => bp.name(),
            Self::Custom(bp) => bp.name(),
        }
    }

    #[inline]
    fn predict(&self, pc: usize) -> Outcome {
        match self {
            Self::Unconfigured(bp) => bp.predict(pc),
            Self::Static(bp) => bp.predict(pc),
            Self::Gshare(bp) => bp.predict(pc),
            Self::Tournament(bp) => bp.predict(pc),
            Self::Custom(bp) => bp.predict(pc),
        }
    }

    #[inline]
    fn train(&mut self, pc: usize, outcome: Outcome) {
        match self {
            Self::Unconfigured(bp) => bp.train(pc, outcome),
            Self::Static(bp) => bp.train(pc, outcome),
            Self::Gshare(bp) => bp.train(pc, outcome),
            Self::Tournament(bp) => bp.train(pc, outcome),
            Self::Custom(bp) => bp.train(pc, outcome),
        }
    }
}
