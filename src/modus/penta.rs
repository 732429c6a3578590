//! PentaFile: five named folders of five slots each.
//!
//! Likened to a file cabinet. The inventory holds 25 cards; each folder
//! follows the [`SlottedFolder`] overflow rule, so a sixth card pushed into a
//! folder bursts the other five out of it.
//!
//! ## Addressing
//!
//! Folders are addressed by [`FolderTag`], parsed from the first letter of the
//! user's input (`w`, `s`, `m`, `i`, `k`). Whole-modus positions ("omni"
//! indices, used by [`Modus::take_out_by_index`]) run 0..25 in folder order:
//! index `i` is slot `i % 5` of folder `i / 5`.
//!
//! ```
//! use sylladex::core::Card;
//! use sylladex::modus::{FolderTag, Modus, PentaFile};
//!
//! let mut penta = PentaFile::new();
//! penta.capture_into(FolderTag::Survival, Card::new("Gem").unwrap());
//! penta.capture("Incense").unwrap(); // first free slot: weapons[0]
//!
//! assert_eq!(penta.folder(FolderTag::Weapons).get(0).unwrap().name(), "Incense");
//! assert_eq!(penta.take_out_by_name("Gem").value.name(), "Gem");
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::folder::{SlottedFolder, FOLDER_SLOTS};
use super::Modus;
use crate::core::{Card, Ejected, LoadMode, ModusKind, Outcome, Status};
use crate::error::{ModusError, Result};

/// Total slots across all folders.
pub const PENTA_SLOTS: usize = FOLDER_SLOTS * FolderTag::ALL.len();

/// One of the five folders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FolderTag {
    Weapons,
    Survival,
    Misc,
    Info,
    KeyCritical,
}

impl FolderTag {
    /// All folders in save-file order.
    pub const ALL: [FolderTag; 5] = [
        Self::Weapons,
        Self::Survival,
        Self::Misc,
        Self::Info,
        Self::KeyCritical,
    ];

    /// Position in save-file order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Single-character tag.
    #[must_use]
    pub const fn tag(self) -> char {
        match self {
            Self::Weapons => 'w',
            Self::Survival => 's',
            Self::Misc => 'm',
            Self::Info => 'i',
            Self::KeyCritical => 'k',
        }
    }

    /// Folder name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Weapons => "weapons",
            Self::Survival => "survival",
            Self::Misc => "misc",
            Self::Info => "info",
            Self::KeyCritical => "keyCritical",
        }
    }

    /// Resolve a folder from a tag character.
    #[must_use]
    pub fn from_tag(tag: char) -> Option<Self> {
        let tag = tag.to_ascii_lowercase();
        Self::ALL.into_iter().find(|folder| folder.tag() == tag)
    }

    /// Resolve a folder from user input by its first letter.
    pub fn parse(input: &str) -> Result<Self> {
        input
            .trim()
            .chars()
            .next()
            .and_then(Self::from_tag)
            .ok_or_else(|| ModusError::UnknownFolder(input.trim().to_string()))
    }
}

impl std::fmt::Display for FolderTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a manual load should put a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Push the record into this folder (overflow rule applies).
    Folder(FolderTag),
    /// Drop the record.
    Skip,
    /// Stop loading; records already routed stay.
    Cancel,
}

/// The five-folder modus.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PentaFile {
    folders: [SlottedFolder; 5],
}

impl PentaFile {
    /// Create a modus with every folder empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow a folder.
    #[must_use]
    pub fn folder(&self, tag: FolderTag) -> &SlottedFolder {
        &self.folders[tag.index()]
    }

    /// Borrow a folder mutably.
    pub fn folder_mut(&mut self, tag: FolderTag) -> &mut SlottedFolder {
        &mut self.folders[tag.index()]
    }

    /// Iterate folders in save-file order.
    pub fn folders(&self) -> impl Iterator<Item = (FolderTag, &SlottedFolder)> {
        FolderTag::ALL.into_iter().zip(self.folders.iter())
    }

    /// Push a card into a specific folder, bursting it if full.
    pub fn capture_into(&mut self, tag: FolderTag, card: Card) -> Outcome<usize> {
        let mut outcome = self.folder_mut(tag).push(card);
        outcome.message = format!("{}: {}", tag, outcome.message);
        outcome
    }

    /// Place a card in the first free slot, scanning folders in order.
    ///
    /// Never evicts: fails with `InventoryFull` when all 25 slots are taken.
    pub fn add_card(&mut self, card: Card) -> Result<Outcome<(FolderTag, usize)>> {
        let target = FolderTag::ALL
            .into_iter()
            .find_map(|tag| self.folder(tag).first_free_slot().map(|slot| (tag, slot)));

        let Some((tag, slot)) = target else {
            return Err(ModusError::InventoryFull);
        };

        let message = format!("added {} to {} slot {}", card.name(), tag, slot);
        debug!(item = card.name(), folder = tag.name(), slot, "added card");
        self.folder_mut(tag).set(slot, card);
        Ok(Outcome::done((tag, slot), message))
    }

    /// Take the card at `index` out of one folder.
    pub fn take_out(&mut self, tag: FolderTag, index: usize) -> Outcome<Card> {
        self.folder_mut(tag).take_out_by_index(index)
    }

    /// Take a card out of one folder by exact name.
    pub fn take_out_named(&mut self, tag: FolderTag, name: &str) -> Outcome<Card> {
        self.folder_mut(tag).take_out_by_name(name)
    }

    /// Folder and slot of the first card named `name`, in folder order.
    #[must_use]
    pub fn locate(&self, name: &str) -> Option<(FolderTag, usize)> {
        self.folders()
            .find_map(|(tag, folder)| folder.position_of(name).map(|slot| (tag, slot)))
    }

    /// Reset every folder and route occupied records one by one.
    ///
    /// The record's original placement is ignored; `router` decides where
    /// each goes. The engine never prompts; the caller's router may.
    pub fn load_manual<F>(&mut self, records: &[Card], mut router: F) -> Outcome<()>
    where
        F: FnMut(&Card) -> Route,
    {
        *self = Self::new();

        let mut routed = 0usize;
        let mut skipped = 0usize;
        let mut ejected = Ejected::new();

        for card in records.iter().filter(|card| card.is_occupied()) {
            match router(card) {
                Route::Folder(tag) => {
                    let outcome = self.capture_into(tag, card.clone());
                    ejected.extend(outcome.ejected);
                    routed += 1;
                }
                Route::Skip => skipped += 1,
                Route::Cancel => {
                    info!(routed, skipped, "manual load cancelled");
                    return Outcome::unit(format!(
                        "manual load cancelled after {routed} cards"
                    ))
                    .with_ejected(ejected);
                }
            }
        }

        info!(routed, skipped, "manual load complete");
        Outcome::unit(format!("routed {routed} cards, skipped {skipped}")).with_ejected(ejected)
    }
}

impl Modus for PentaFile {
    fn kind(&self) -> ModusKind {
        ModusKind::PentaFile
    }

    fn insert_card(&mut self, card: Card) -> Result<Outcome<()>> {
        if !card.is_occupied() {
            return Ok(Outcome::failed(Status::Empty, "nothing to add: card is empty"));
        }
        Ok(self.add_card(card)?.map(|_| ()))
    }

    fn take_out_by_index(&mut self, index: usize) -> Outcome<Card> {
        if index >= PENTA_SLOTS {
            warn!(index, "omni index out of range");
            return Outcome::miss(
                Status::OutOfRange,
                format!("index {index} is out of range (0..{PENTA_SLOTS})"),
            );
        }
        let tag = FolderTag::ALL[index / FOLDER_SLOTS];
        self.take_out(tag, index % FOLDER_SLOTS)
    }

    fn take_out_by_name(&mut self, name: &str) -> Outcome<Card> {
        match self.locate(name) {
            Some((tag, slot)) => {
                let mut outcome = self.take_out(tag, slot);
                outcome.message = format!("{}: {}", tag, outcome.message);
                outcome
            }
            None => Outcome::miss(Status::NotFound, format!("could not find {name}")),
        }
    }

    fn force_eject_all(&mut self) -> Outcome<()> {
        let ejected: Vec<Card> = self
            .folders
            .iter_mut()
            .flat_map(|folder| folder.force_eject())
            .filter(Card::is_occupied)
            .collect();

        info!(count = ejected.len(), "ejected every folder");
        Outcome::unit(format!("ejected {} cards from all folders", ejected.len()))
            .with_ejected(ejected)
    }

    fn is_full(&self) -> bool {
        self.folders.iter().all(SlottedFolder::is_full)
    }

    fn is_empty(&self) -> bool {
        self.folders.iter().all(SlottedFolder::is_empty)
    }

    fn card_count(&self) -> usize {
        self.folders.iter().map(SlottedFolder::occupied_count).sum()
    }

    fn to_records(&self) -> Vec<Card> {
        self.folders
            .iter()
            .flat_map(|folder| folder.iter().cloned())
            .collect()
    }

    fn load_records(&mut self, records: &[Card], mode: LoadMode) -> Outcome<()> {
        *self = Self::new();

        match mode {
            LoadMode::Clear => Outcome::unit("inventory reset"),
            LoadMode::AsIs => {
                for (index, card) in records.iter().take(PENTA_SLOTS).enumerate() {
                    self.folders[index / FOLDER_SLOTS].set(index % FOLDER_SLOTS, card.clone());
                }
                let overflow: Vec<Card> = records
                    .iter()
                    .skip(PENTA_SLOTS)
                    .filter(|card| card.is_occupied())
                    .cloned()
                    .collect();
                if !overflow.is_empty() {
                    warn!(overflow = overflow.len(), "records beyond 25 slots ejected");
                }
                Outcome::unit(format!(
                    "loaded {} cards by position, {} did not fit",
                    self.card_count(),
                    overflow.len()
                ))
                .with_ejected(overflow)
            }
            LoadMode::NonEmpty | LoadMode::Fast => {
                let mut overflow = Ejected::new();
                for card in records.iter().filter(|card| card.is_occupied()) {
                    if self.add_card(card.clone()).is_err() {
                        overflow.push(card.clone());
                    }
                }
                if !overflow.is_empty() {
                    warn!(overflow = overflow.len(), "inventory full, records ejected");
                }
                Outcome::unit(format!(
                    "loaded {} cards, {} did not fit",
                    self.card_count(),
                    overflow.len()
                ))
                .with_ejected(overflow)
            }
        }
    }

    fn description(&self) -> &'static str {
        "The PentaFile fetch modus is a file cabinet: five folders (weapons, survival, misc, \
         info, keyCritical) holding five cards each. Push a sixth card into a folder and the \
         folder bursts, ejecting the five cards it held before taking the new one."
    }
}
