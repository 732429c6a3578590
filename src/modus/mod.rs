//! Fetch modi: pluggable storage strategies for cards.
//!
//! Each modus owns its cards and enforces its own insertion, retrieval and
//! eviction rules. The shell talks to all of them through the [`Modus`] trait.
//!
//! ## Key Types
//!
//! - `SlottedFolder`: five fixed slots with overflow eviction
//! - `PentaFile`: five named folders (weapons, survival, misc, info, keyCritical)
//! - `LinkedDeck`: arena-backed linked stack with riffle shuffle
//! - `BalancedTree`: AVL-balanced tree whose pops take the whole subtree
//!
//! ## Records
//!
//! `to_records` flattens a modus into the card order its save file uses, and
//! `load_records` rebuilds it under a [`LoadMode`]. The same record list is
//! what the sylladex hands from one modus to the next when switching.

pub mod deck;
pub mod folder;
pub mod penta;
pub mod tree;

pub use deck::{DeckNodeId, LinkedDeck};
pub use folder::{SlottedFolder, FOLDER_SLOTS};
pub use penta::{FolderTag, PentaFile, Route, PENTA_SLOTS};
pub use tree::{BalancedTree, TreeNodeId};

use crate::core::{Card, LoadMode, ModusKind, ModusRng, Outcome};
use crate::error::{ModusError, Result};

/// Common contract every fetch modus offers the shell.
///
/// ## Implementation Notes
///
/// - Lookup misses return the empty sentinel inside an `Outcome`, never `Err`
/// - `Err` is reserved for invalid names and operations the modus can't do
/// - Cards a call releases as a side effect go in `Outcome::ejected`
pub trait Modus {
    /// Which strategy this is.
    fn kind(&self) -> ModusKind;

    /// Captchalogue an item by name, minting a fresh card for it.
    fn capture(&mut self, name: &str) -> Result<Outcome<()>> {
        self.insert_card(Card::new(name)?)
    }

    /// Put an existing card back, keeping its code.
    fn insert_card(&mut self, card: Card) -> Result<Outcome<()>>;

    /// Remove the card at a modus-defined position.
    fn take_out_by_index(&mut self, index: usize) -> Outcome<Card>;

    /// Remove a card by name.
    fn take_out_by_name(&mut self, name: &str) -> Outcome<Card>;

    /// Pop the top card. Only stack-like modi support this.
    fn draw_from_top(&mut self) -> Result<Outcome<Card>> {
        Err(ModusError::Unsupported {
            op: "draw",
            kind: self.kind().name(),
        })
    }

    /// Shuffle the contents. Only decks support this.
    fn shuffle(&mut self, _rng: &mut ModusRng, _rounds: u32) -> Result<Outcome<()>> {
        Err(ModusError::Unsupported {
            op: "shuffle",
            kind: self.kind().name(),
        })
    }

    /// Release every card.
    fn force_eject_all(&mut self) -> Outcome<()>;

    /// Whether another capture would have to evict or fail.
    fn is_full(&self) -> bool;

    /// Whether the modus holds no occupied card.
    fn is_empty(&self) -> bool;

    /// Number of occupied cards held.
    fn card_count(&self) -> usize;

    /// Flatten into save-file record order.
    fn to_records(&self) -> Vec<Card>;

    /// Replace the contents with `records` read under `mode`.
    fn load_records(&mut self, records: &[Card], mode: LoadMode) -> Outcome<()>;

    /// One-paragraph description of the modus and its quirk.
    fn description(&self) -> &'static str;
}
