//! Engine configuration.
//!
//! Configurations are plain data: they can be built in code, deserialized
//! from JSON, or assembled from command-line arguments by a harness.

use std::path::Path;
use serde::{ Deserialize, Serialize };
use crate::error::ConfigError;
use crate::predictor::*;

/// Largest supported table index width.
pub const MAX_TABLE_BITS: usize = 28;

/// Largest supported tag width in a tagged component.
pub const MAX_TAG_BITS: usize = 16;

/// Largest supported history length in a tagged component.
pub const MAX_HISTORY_LEN: usize = 1024;

/// Number of tagged components in the custom scheme.
pub const NUM_TAGGED_COMPONENTS: usize = 4;

/// Selects a prediction scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Always predict taken
    #[default]
    #[serde(alias = "Static", alias = "STATIC")]
    Static,

    /// Counters indexed by PC XOR global history
    #[serde(alias = "Gshare", alias = "GSHARE")]
    Gshare,

    /// Local and global predictors arbitrated by a selector
    #[serde(alias = "Tournament", alias = "TOURNAMENT")]
    Tournament,

    /// Tagged components with geometric history lengths
    #[serde(alias = "Custom", alias = "CUSTOM", alias = "tage", alias = "TAGE")]
    Custom,
}
impl Scheme {
    pub const ALL: [Scheme; 4] = [
        Scheme::Static, Scheme::Gshare, Scheme::Tournament, Scheme::Custom
    ];
}
impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::Static => "Static",
            Self::Gshare => "Gshare",
            Self::Tournament => "Tournament",
            Self::Custom => "Custom",
        };
        write!(f, "{}", s)
    }
}

/// Parameters for the custom (TAGE-style) scheme.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomConfig {
    /// Index bits for the base component
    pub base_bits: usize,

    /// Index bits for each tagged component
    pub bank_bits: usize,

    /// Tag bits for each tagged component
    pub tag_bits: usize,

    /// History length for each tagged component, shortest first
    pub history_lengths: [usize; NUM_TAGGED_COMPONENTS],

    /// Seed used when a random victim must be chosen
    pub seed: u64,

    /// Periodically clear 'useful' bits
    pub useful_reset: bool,
}
impl Default for CustomConfig {
    fn default() -> Self {
        Self {
            base_bits: 12,
            bank_bits: 10,
            tag_bits: 9,
            history_lengths: [8, 16, 32, 64],
            seed: 0,
            useful_reset: true,
        }
    }
}
impl CustomConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_table_bits("base_bits", self.base_bits)?;
        check_table_bits("bank_bits", self.bank_bits)?;
        if self.tag_bits == 0 || self.tag_bits > MAX_TAG_BITS {
            return Err(ConfigError::InvalidTagBits {
                bits: self.tag_bits, max: MAX_TAG_BITS
            });
        }
        let increasing = self.history_lengths.windows(2).all(|w| w[0] < w[1]);
        if !increasing {
            return Err(ConfigError::HistoryNotIncreasing {
                lengths: self.history_lengths.to_vec()
            });
        }
        if let Some(&len) = self.history_lengths.iter().find(|&&l| l > MAX_HISTORY_LEN) {
            return Err(ConfigError::HistoryTooLong { len, max: MAX_HISTORY_LEN });
        }
        Ok(())
    }

    /// Describe the predictor built by this configuration.
    pub fn tage_config(&self) -> TAGEConfig {
        let mut cfg = TAGEConfig::new(TAGEBaseConfig {
            ctr: SaturatingCounterConfig::TWO_BIT,
            index_bits: self.base_bits,
        });
        for len in self.history_lengths {
            cfg.add_component(TAGEComponentConfig {
                index_bits: self.bank_bits,
                history_len: len,
                tag_bits: self.tag_bits,
                ctr: SaturatingCounterConfig::THREE_BIT,
            });
        }
        cfg.seed = self.seed;
        cfg.useful_reset = self.useful_reset;
        cfg
    }
}

/// Configuration for an [`Engine`](crate::engine::Engine).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// The prediction scheme
    pub scheme: Scheme,

    /// Number of bits of global history (gshare and tournament)
    pub ghistory_bits: usize,

    /// Number of bits of local history (tournament)
    pub lhistory_bits: usize,

    /// Number of program counter bits used to select a local history
    /// (tournament)
    pub pc_index_bits: usize,

    /// Parameters for [`Scheme::Custom`]. The custom scheme takes its
    /// geometry from here only; the widths above do not apply to it.
    pub custom: CustomConfig,
}
impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scheme: Scheme::Static,
            ghistory_bits: 13,
            lhistory_bits: 10,
            pc_index_bits: 10,
            custom: CustomConfig::default(),
        }
    }
}
impl EngineConfig {
    pub fn static_taken() -> Self {
        Self { scheme: Scheme::Static, ..Default::default() }
    }

    pub fn gshare(ghistory_bits: usize) -> Self {
        Self { scheme: Scheme::Gshare, ghistory_bits, ..Default::default() }
    }

    pub fn tournament(ghistory_bits: usize, lhistory_bits: usize,
        pc_index_bits: usize) -> Self
    {
        Self {
            scheme: Scheme::Tournament,
            ghistory_bits,
            lhistory_bits,
            pc_index_bits,
            ..Default::default()
        }
    }

    pub fn custom() -> Self {
        Self { scheme: Scheme::Custom, ..Default::default() }
    }

    /// Check that every table described by this configuration can be built.
    /// Only the parameters used by the selected scheme are checked.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.scheme {
            Scheme::Static => Ok(()),
            Scheme::Gshare => check_table_bits("ghistory_bits", self.ghistory_bits),
            Scheme::Tournament => {
                check_table_bits("ghistory_bits", self.ghistory_bits)?;
                check_table_bits("lhistory_bits", self.lhistory_bits)?;
                check_table_bits("pc_index_bits", self.pc_index_bits)
            },
            Scheme::Custom => self.custom.validate(),
        }
    }

    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let s = std::fs::read_to_string(path)?;
        Self::from_json(&s)
    }
}

fn check_table_bits(name: &'static str, bits: usize) -> Result<(), ConfigError> {
    if bits > MAX_TABLE_BITS {
        return Err(ConfigError::TableTooLarge { name, bits, max: MAX_TABLE_BITS });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_widths_are_valid() {
        assert!(EngineConfig::gshare(0).validate().is_ok());
        assert!(EngineConfig::tournament(0, 0, 0).validate().is_ok());
    }

    #[test]
    fn rejects_oversized_tables() {
        let err = EngineConfig::gshare(MAX_TABLE_BITS + 1).validate();
        assert!(matches!(err, Err(ConfigError::TableTooLarge { name: "ghistory_bits", .. })));

        let err = EngineConfig::tournament(9, 40, 10).validate();
        assert!(matches!(err, Err(ConfigError::TableTooLarge { name: "lhistory_bits", .. })));

        // Parameters of other schemes are ignored
        let mut cfg = EngineConfig::custom();
        cfg.ghistory_bits = 64;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_bad_custom_geometry() {
        let mut cfg = EngineConfig::custom();
        cfg.custom.history_lengths = [8, 8, 16, 32];
        assert!(matches!(cfg.validate(), Err(ConfigError::HistoryNotIncreasing { .. })));

        let mut cfg = EngineConfig::custom();
        cfg.custom.tag_bits = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidTagBits { .. })));

        let mut cfg = EngineConfig::custom();
        cfg.custom.history_lengths = [8, 16, 32, 4096];
        assert!(matches!(cfg.validate(), Err(ConfigError::HistoryTooLong { len: 4096, .. })));
    }

    #[test]
    fn parses_json() {
        let cfg = EngineConfig::from_json(r#"{
            "scheme": "tournament",
            "ghistory_bits": 9,
            "lhistory_bits": 10,
            "pc_index_bits": 10
        }"#).unwrap();
        assert_eq!(cfg, EngineConfig::tournament(9, 10, 10));

        let cfg = EngineConfig::from_json(r#"{
            "scheme": "TAGE",
            "custom": { "history_lengths": [4, 16, 64, 256], "seed": 7 }
        }"#).unwrap();
        assert_eq!(cfg.scheme, Scheme::Custom);
        assert_eq!(cfg.custom.history_lengths, [4, 16, 64, 256]);
        assert_eq!(cfg.custom.bank_bits, 10);
        assert_eq!(cfg.custom.seed, 7);

        assert!(matches!(
            EngineConfig::from_json(r#"{ "scheme": "perceptron" }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn custom_config_orders_components() {
        let tage = CustomConfig::default().tage_config();
        let lens: Vec<usize> = tage.comp.iter().map(|c| c.history_len).collect();
        assert_eq!(lens, vec![64, 32, 16, 8]);
        assert_eq!(tage.history_bits(), 64);
    }
}
