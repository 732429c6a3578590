//! # sylladex
//!
//! A captchalogue inventory engine. Items are stored as cards inside a
//! *fetch modus*, a storage strategy with its own insertion, retrieval and
//! eviction quirks.
//!
//! ## Design Principles
//!
//! 1. **Modi Are Pluggable**: Every modus implements [`modus::Modus`]; the
//!    shell never needs to know which one is active.
//!
//! 2. **Misses Are Values**: Looking up a card that isn't there returns the
//!    empty card in an [`Outcome`], not an error. Errors are for bad input,
//!    unsupported operations and unusable stores.
//!
//! 3. **No Globals**: A [`Sylladex`] owns its modus, RNG, store and open
//!    hand. Nothing reads process-wide state or prompts on its own.
//!
//! ## Modules
//!
//! - `core`: Cards, outcomes, RNG, configuration
//! - `modus`: Folder, PentaFile, deck and tree modi
//! - `persist`: Fixed-width record file and bincode snapshots
//! - `sylladex`: Active modus, open hand, save/load, switching
//! - `shell`: Text commands and rendering for the binary

pub mod core;
pub mod error;
pub mod modus;
pub mod persist;
pub mod shell;
pub mod sylladex;

// Re-export commonly used types
pub use crate::core::{
    CaptchaCode, Card, ItemName,
    LoadMode, ModusKind, SylladexConfig,
    Ejected, Outcome, Status,
    ModusRng, ModusRngState,
};

pub use crate::error::{ModusError, Result};

pub use crate::modus::{
    Modus,
    SlottedFolder, PentaFile, FolderTag, Route,
    LinkedDeck, BalancedTree,
};

pub use crate::persist::{LoadReport, LoadStatus, RecordStore};

pub use crate::sylladex::{ActiveModus, Sylladex};
