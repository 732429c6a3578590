//! Sylladex configuration.
//!
//! The shell builds a `SylladexConfig` at startup (builder methods, or serde
//! from whatever format it likes) and hands it to [`crate::Sylladex::new`].
//! The engine reads no global state.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ModusError, Result};

/// Default backing store file name.
pub const DEFAULT_STORE: &str = "inventory.MSF";

/// Default number of riffle rounds per shuffle.
pub const DEFAULT_SHUFFLE_ROUNDS: u32 = 9;

/// Which fetch modus to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModusKind {
    /// Five folders of five slots.
    #[default]
    PentaFile,
    /// Linked stack with riffle shuffle.
    TarotDeck,
    /// Self-balancing tree with cascading pops.
    BalancedTree,
}

impl ModusKind {
    /// All kinds, in menu order.
    pub const ALL: [ModusKind; 3] = [Self::PentaFile, Self::TarotDeck, Self::BalancedTree];

    /// Short display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PentaFile => "pentafile",
            Self::TarotDeck => "tarotdeck",
            Self::BalancedTree => "btree",
        }
    }

    /// Resolve a kind from user input (case-insensitive, name or prefix).
    pub fn parse(input: &str) -> Result<Self> {
        let needle = input.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Err(ModusError::UnknownModus(input.to_string()));
        }
        match needle.as_str() {
            "penta" | "pf" | "folders" => return Ok(Self::PentaFile),
            "deck" | "tarot" | "td" => return Ok(Self::TarotDeck),
            "tree" | "bt" | "balancedtree" => return Ok(Self::BalancedTree),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().starts_with(&needle))
            .ok_or_else(|| ModusError::UnknownModus(input.to_string()))
    }
}

impl std::fmt::Display for ModusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How a list of stored cards is read into a modus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadMode {
    /// Ignore the records and start empty.
    Clear,
    /// Keep record positions, including empty cards where the modus has slots.
    #[default]
    AsIs,
    /// Keep record order but drop empty cards.
    NonEmpty,
    /// Capture each occupied record in order until the modus is full,
    /// disregarding saved positions.
    Fast,
}

impl LoadMode {
    /// Resolve a mode from user input.
    pub fn parse(input: &str) -> Result<Self> {
        match input.trim().trim_matches('`').to_ascii_lowercase().as_str() {
            "0" | "clear" => Ok(Self::Clear),
            "1" | "as-is" | "asis" | "auto" | "a" => Ok(Self::AsIs),
            "no-empty" | "non-empty" | "nonempty" => Ok(Self::NonEmpty),
            "3" | "fast" => Ok(Self::Fast),
            other => Err(ModusError::parse(format!("unknown load mode `{other}`"))),
        }
    }
}

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SylladexConfig {
    /// Backing store for save/load.
    pub store_path: PathBuf,

    /// Riffle rounds per deck shuffle.
    pub shuffle_rounds: u32,

    /// RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,

    /// Modus the sylladex starts with.
    pub default_modus: ModusKind,

    /// Mode used by a plain `load`.
    pub load_mode: LoadMode,
}

impl Default for SylladexConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE),
            shuffle_rounds: DEFAULT_SHUFFLE_ROUNDS,
            seed: None,
            default_modus: ModusKind::default(),
            load_mode: LoadMode::default(),
        }
    }
}

impl SylladexConfig {
    /// Create a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backing store path.
    #[must_use]
    pub fn with_store(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    /// Set the number of riffle rounds.
    #[must_use]
    pub fn with_shuffle_rounds(mut self, rounds: u32) -> Self {
        self.shuffle_rounds = rounds;
        self
    }

    /// Fix the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the starting modus.
    #[must_use]
    pub fn with_modus(mut self, kind: ModusKind) -> Self {
        self.default_modus = kind;
        self
    }

    /// Set the default load mode.
    #[must_use]
    pub fn with_load_mode(mut self, mode: LoadMode) -> Self {
        self.load_mode = mode;
        self
    }

    /// Check the configuration for unusable values.
    pub fn validate(&self) -> Result<()> {
        if self.shuffle_rounds == 0 {
            return Err(ModusError::Config("shuffle_rounds must be at least 1".into()));
        }
        if self.store_path.as_os_str().is_empty() {
            return Err(ModusError::Config("store_path is empty".into()));
        }
        Ok(())
    }
}
