//! Fixed five-slot folder with overflow eviction.
//!
//! A folder holds exactly [`FOLDER_SLOTS`] cards. Slots can be interleaved
//! empty/occupied: taking a card out leaves a hole at its index, and a push
//! always fills the lowest-index hole.
//!
//! ## Overflow
//!
//! Pushing into a full folder bursts it: all five cards are ejected (reported
//! through [`Outcome::ejected`] in slot order) and the new card lands in slot 0.
//!
//! ```
//! use sylladex::core::Card;
//! use sylladex::modus::SlottedFolder;
//!
//! let mut folder = SlottedFolder::new();
//! for name in ["Wand", "Blade", "Marbles", "Dmnd Staff", "SynOrb"] {
//!     folder.push(Card::new(name).unwrap());
//! }
//! assert!(folder.is_full());
//!
//! let burst = folder.push(Card::new("LotusBlade").unwrap());
//! assert_eq!(burst.value, 0);
//! assert_eq!(burst.ejected.len(), 5);
//! assert_eq!(folder.get(0).unwrap().name(), "LotusBlade");
//! assert_eq!(folder.occupied_count(), 1);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{Card, Ejected, Outcome, Status};

/// Number of slots in a folder.
pub const FOLDER_SLOTS: usize = 5;

/// A fixed-capacity folder of cards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlottedFolder {
    slots: [Card; FOLDER_SLOTS],
}

impl SlottedFolder {
    /// Create a folder with every slot empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a folder from explicit slot contents.
    #[must_use]
    pub fn from_slots(slots: [Card; FOLDER_SLOTS]) -> Self {
        Self { slots }
    }

    /// Insert a card, bursting the folder first if it is full.
    ///
    /// The value is the slot the card landed in. Pushing an empty card is a
    /// no-op reported as `Status::Empty`.
    pub fn push(&mut self, card: Card) -> Outcome<usize> {
        if !card.is_occupied() {
            return Outcome {
                value: 0,
                status: Status::Empty,
                message: "nothing to push: card is empty".into(),
                ejected: Ejected::new(),
            };
        }

        let mut ejected = Ejected::new();
        let slot = match self.first_free_slot() {
            Some(slot) => slot,
            None => {
                ejected.extend(self.force_eject());
                debug!(count = ejected.len(), "folder full, ejected every card");
                0
            }
        };

        let message = if ejected.is_empty() {
            format!("added {} to slot {}", card.name(), slot)
        } else {
            format!(
                "folder was full, ejected {} cards; added {} to slot {}",
                ejected.len(),
                card.name(),
                slot
            )
        };
        debug!(item = card.name(), slot, "pushed card into folder");
        self.slots[slot] = card;

        Outcome::done(slot, message).with_ejected(ejected)
    }

    /// Remove and return the card at `index` (0..=4).
    ///
    /// Out-of-range indices return the empty sentinel and leave the folder
    /// untouched. An empty slot yields the sentinel with `Status::Empty`.
    pub fn take_out_by_index(&mut self, index: usize) -> Outcome<Card> {
        let Some(slot) = self.slots.get_mut(index) else {
            warn!(index, "folder index out of range");
            return Outcome::miss(
                Status::OutOfRange,
                format!("slot {index} is out of range (0..{FOLDER_SLOTS})"),
            );
        };
        if !slot.is_occupied() {
            return Outcome::miss(Status::Empty, format!("slot {index} is already empty"));
        }

        let card = slot.take();
        debug!(item = card.name(), index, "took card out of folder");
        let message = format!("retrieved {} from slot {}", card.name(), index);
        Outcome::done(card, message)
    }

    /// Remove and return the first card whose name equals `name` exactly.
    pub fn take_out_by_name(&mut self, name: &str) -> Outcome<Card> {
        match self.position_of(name) {
            Some(index) => self.take_out_by_index(index),
            None => Outcome::miss(Status::NotFound, format!("could not find {name}")),
        }
    }

    /// Slot index of the first occupied card named `name`.
    #[must_use]
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|card| card.is_occupied() && card.name() == name)
    }

    /// Empty every slot, returning the previous contents in slot order.
    pub fn force_eject(&mut self) -> [Card; FOLDER_SLOTS] {
        std::mem::take(&mut self.slots)
    }

    /// Lowest-index empty slot.
    #[must_use]
    pub fn first_free_slot(&self) -> Option<usize> {
        self.slots.iter().position(|card| !card.is_occupied())
    }

    /// True iff every slot is occupied.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Card::is_occupied)
    }

    /// True iff no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.slots.iter().any(Card::is_occupied)
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|card| card.is_occupied()).count()
    }

    /// Card at `index`, occupied or not.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Card> {
        self.slots.get(index)
    }

    /// Overwrite a slot directly (positional loads).
    pub(crate) fn set(&mut self, index: usize, card: Card) {
        self.slots[index] = card;
    }

    /// Iterate slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.slots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str) -> Card {
        Card::new(name).unwrap()
    }

    fn names(folder: &SlottedFolder) -> Vec<&str> {
        folder.iter().map(Card::name).collect()
    }

    #[test]
    fn test_push_fills_lowest_slot() {
        let mut folder = SlottedFolder::new();

        assert_eq!(folder.push(card("Wand")).value, 0);
        assert_eq!(folder.push(card("Blade")).value, 1);
        assert_eq!(folder.occupied_count(), 2);
        assert!(!folder.is_full());
    }

    #[test]
    fn test_push_reuses_hole() {
        let mut folder = SlottedFolder::new();
        for name in ["Wand", "Blade", "Marbles"] {
            folder.push(card(name));
        }

        folder.take_out_by_index(1);
        assert_eq!(names(&folder), ["Wand", "EMPTY", "Marbles", "EMPTY", "EMPTY"]);

        let outcome = folder.push(card("Gem"));
        assert_eq!(outcome.value, 1);
        assert_eq!(names(&folder), ["Wand", "Gem", "Marbles", "EMPTY", "EMPTY"]);
    }

    #[test]
    fn test_overflow_burst() {
        let mut folder = SlottedFolder::new();
        for name in ["Wand", "Blade", "Marbles", "Dmnd Staff", "SynOrb"] {
            let outcome = folder.push(card(name));
            assert!(outcome.ejected.is_empty());
        }
        assert!(folder.is_full());

        let outcome = folder.push(card("LotusBlade"));
        assert!(outcome.is_done());
        assert_eq!(outcome.value, 0);

        let ejected: Vec<_> = outcome.ejected.iter().map(Card::name).collect();
        assert_eq!(ejected, ["Wand", "Blade", "Marbles", "Dmnd Staff", "SynOrb"]);
        assert_eq!(names(&folder), ["LotusBlade", "EMPTY", "EMPTY", "EMPTY", "EMPTY"]);
        assert!(!folder.is_full());
    }

    #[test]
    fn test_push_empty_card_is_noop() {
        let mut folder = SlottedFolder::new();
        let outcome = folder.push(Card::empty());
        assert_eq!(outcome.status, Status::Empty);
        assert!(folder.is_empty());
    }

    #[test]
    fn test_take_out_by_index() {
        let mut folder = SlottedFolder::new();
        folder.push(card("Wand"));

        let outcome = folder.take_out_by_index(0);
        assert!(outcome.is_done());
        assert_eq!(outcome.value.name(), "Wand");
        assert!(folder.is_empty());
    }

    #[test]
    fn test_take_out_by_index_bounds() {
        let mut folder = SlottedFolder::new();
        for name in ["A", "B", "C", "D", "E"] {
            folder.push(card(name));
        }
        let before = folder.clone();

        // Slot 4 is the last valid slot; 5 is out of range.
        let outcome = folder.take_out_by_index(5);
        assert_eq!(outcome.status, Status::OutOfRange);
        assert_eq!(outcome.value, Card::empty());
        assert_eq!(folder, before);

        let outcome = folder.take_out_by_index(4);
        assert_eq!(outcome.value.name(), "E");
    }

    #[test]
    fn test_take_out_empty_slot() {
        let mut folder = SlottedFolder::new();
        let outcome = folder.take_out_by_index(2);
        assert_eq!(outcome.status, Status::Empty);
        assert_eq!(outcome.value, Card::empty());
    }

    #[test]
    fn test_take_out_by_name() {
        let mut folder = SlottedFolder::new();
        for name in ["Wand", "Blade", "Wand"] {
            folder.push(card(name));
        }

        // Lowest index wins.
        let outcome = folder.take_out_by_name("Wand");
        assert_eq!(outcome.value.name(), "Wand");
        assert_eq!(names(&folder), ["EMPTY", "Blade", "Wand", "EMPTY", "EMPTY"]);

        let before = folder.clone();
        let outcome = folder.take_out_by_name("Blad");
        assert_eq!(outcome.status, Status::NotFound);
        assert_eq!(outcome.value, Card::empty());
        assert_eq!(folder, before);
    }

    #[test]
    fn test_take_out_by_name_ignores_sentinel() {
        let mut folder = SlottedFolder::new();
        let outcome = folder.take_out_by_name("EMPTY");
        assert_eq!(outcome.status, Status::NotFound);
    }

    #[test]
    fn test_force_eject() {
        let mut folder = SlottedFolder::new();
        folder.push(card("Wand"));
        folder.push(card("Blade"));
        folder.take_out_by_index(0);

        let ejected = folder.force_eject();
        assert_eq!(ejected[0], Card::empty());
        assert_eq!(ejected[1].name(), "Blade");
        assert!(folder.is_empty());
    }
}
