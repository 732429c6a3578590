//! Arena-backed linked deck (the TarotDeck modus).
//!
//! Cards are pushed onto and drawn from the head. Nodes live in a flat
//! `Vec<DeckNode>` and link through `DeckNodeId` indices; removed nodes go on
//! a free list and are reused by later pushes.
//!
//! ## Shuffle
//!
//! A riffle: split the deck at `len / 2` (the top half goes left, the rest
//! right, both keeping their order), then repeatedly flip a coin to pick a
//! side, pop its top card and push it onto the rebuilt deck. When one side
//! runs out the other is drained. Repeated `shuffle_rounds` times.
//!
//! ```
//! use sylladex::core::{Card, ModusRng};
//! use sylladex::modus::LinkedDeck;
//!
//! let mut deck = LinkedDeck::new();
//! for name in ["C", "B", "A"] {
//!     deck.add_card(Card::new(name).unwrap());
//! }
//! assert_eq!(deck.draw_from_top().value.name(), "A");
//!
//! let mut rng = ModusRng::new(9);
//! deck.shuffle(&mut rng, 9);
//! assert_eq!(deck.len(), 2);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::Modus;
use crate::core::{Card, LoadMode, ModusKind, ModusRng, Outcome, Status};
use crate::error::Result;

/// Index into the deck node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeckNodeId(pub u32);

impl DeckNodeId {
    /// Sentinel value representing no node.
    pub const NONE: DeckNodeId = DeckNodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct DeckNode {
    card: Card,
    next: DeckNodeId,
}

/// Linked stack of cards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinkedDeck {
    nodes: Vec<DeckNode>,
    free: Vec<DeckNodeId>,
    head: DeckNodeId,
    size: usize,
}

impl Default for LinkedDeck {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for LinkedDeck {
    /// Decks are equal when they hold the same cards in the same order,
    /// regardless of arena layout.
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.iter().eq(other.iter())
    }
}

impl Eq for LinkedDeck {}

impl LinkedDeck {
    /// Create an empty deck.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            head: DeckNodeId::NONE,
            size: 0,
        }
    }

    /// Build a deck whose head is the first record.
    ///
    /// Empty records are kept; callers that want them dropped filter first.
    #[must_use]
    pub fn from_records(records: &[Card]) -> Self {
        let mut deck = Self::new();
        for card in records.iter().rev() {
            deck.link_front(card.clone());
        }
        deck
    }

    /// Number of cards in the deck.
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether the deck holds no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// The top card, if any.
    #[must_use]
    pub fn top(&self) -> Option<&Card> {
        (!self.head.is_none()).then(|| &self.nodes[self.head.index()].card)
    }

    /// Iterate cards from the top down.
    pub fn iter(&self) -> DeckIter<'_> {
        DeckIter {
            deck: self,
            cursor: self.head,
        }
    }

    fn alloc(&mut self, card: Card, next: DeckNodeId) -> DeckNodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = DeckNode { card, next };
                id
            }
            None => {
                let id = DeckNodeId::new(self.nodes.len() as u32);
                self.nodes.push(DeckNode { card, next });
                id
            }
        }
    }

    fn release(&mut self, id: DeckNodeId) -> Card {
        let node = &mut self.nodes[id.index()];
        node.next = DeckNodeId::NONE;
        let card = node.card.take();
        self.free.push(id);
        card
    }

    fn link_front(&mut self, card: Card) {
        self.head = self.alloc(card, self.head);
        self.size += 1;
    }

    /// Unlink `id`, whose predecessor is `prev` (NONE when `id` is the head).
    fn unlink(&mut self, prev: DeckNodeId, id: DeckNodeId) -> Card {
        let next = self.nodes[id.index()].next;
        if prev.is_none() {
            self.head = next;
        } else {
            self.nodes[prev.index()].next = next;
        }
        self.size -= 1;
        self.release(id)
    }

    /// Walk to the first node satisfying `pred`, returning `(prev, node)`.
    fn find(&self, mut pred: impl FnMut(usize, &Card) -> bool) -> Option<(DeckNodeId, DeckNodeId)> {
        let mut prev = DeckNodeId::NONE;
        let mut cursor = self.head;
        let mut position = 0;
        while !cursor.is_none() {
            let node = &self.nodes[cursor.index()];
            if pred(position, &node.card) {
                return Some((prev, cursor));
            }
            prev = cursor;
            cursor = node.next;
            position += 1;
        }
        None
    }

    /// Push a card onto the top of the deck.
    pub fn add_card(&mut self, card: Card) -> Outcome<()> {
        if !card.is_occupied() {
            return Outcome::failed(Status::Empty, "nothing to add: card is empty");
        }
        let message = format!("added {} to the top of the deck", card.name());
        debug!(item = card.name(), size = self.size + 1, "pushed card onto deck");
        self.link_front(card);
        Outcome::unit(message)
    }

    /// Remove and return the top card.
    pub fn draw_from_top(&mut self) -> Outcome<Card> {
        if self.head.is_none() {
            return Outcome::miss(Status::Empty, "deck empty");
        }
        let card = self.unlink(DeckNodeId::NONE, self.head);
        if !card.is_occupied() {
            debug!(size = self.size, "drew an empty placeholder");
            return Outcome::miss(Status::Empty, "drew an empty card");
        }
        debug!(item = card.name(), size = self.size, "drew top card");
        let message = format!("drew {}", card.name());
        Outcome::done(card, message)
    }

    /// Remove and return the card `index` positions below the top.
    pub fn take_out_by_index(&mut self, index: usize) -> Outcome<Card> {
        if index >= self.size {
            warn!(index, size = self.size, "deck index out of range");
            return Outcome::miss(
                Status::OutOfRange,
                format!("index {index} is out of range (deck holds {})", self.size),
            );
        }
        match self.find(|position, _| position == index) {
            Some((prev, id)) => {
                let card = self.unlink(prev, id);
                debug!(item = card.name(), index, "spliced card out of deck");
                let message = format!("retrieved {} from position {}", card.name(), index);
                Outcome::done(card, message)
            }
            None => Outcome::miss(Status::OutOfRange, format!("index {index} is out of range")),
        }
    }

    /// Remove and return the first card, from the top, whose name contains
    /// `query`.
    pub fn take_out_by_item(&mut self, query: &str) -> Outcome<Card> {
        match self.find(|_, card| card.matches(query)) {
            Some((prev, id)) => {
                let card = self.unlink(prev, id);
                debug!(item = card.name(), query, "spliced matching card out of deck");
                let message = format!("retrieved {}", card.name());
                Outcome::done(card, message)
            }
            None => Outcome::miss(Status::NotFound, format!("no card matches {query}")),
        }
    }

    /// Riffle-shuffle the deck `rounds` times.
    ///
    /// Decks with fewer than two cards are left as they are.
    pub fn shuffle(&mut self, rng: &mut ModusRng, rounds: u32) -> Outcome<()> {
        if self.size < 2 {
            return Outcome::failed(Status::Empty, "not enough cards to shuffle");
        }

        for _ in 0..rounds {
            self.riffle(rng);
        }

        debug!(rounds, size = self.size, "shuffled deck");
        Outcome::unit(format!("shuffled {} cards {} times", self.size, rounds))
    }

    fn riffle(&mut self, rng: &mut ModusRng) {
        let order: Vec<DeckNodeId> = self.node_ids().collect();
        let half = order.len() / 2;

        // Reversed so that `pop` yields each side's top card.
        let mut left: Vec<DeckNodeId> = order[..half].iter().rev().copied().collect();
        let mut right: Vec<DeckNodeId> = order[half..].iter().rev().copied().collect();

        let mut head = DeckNodeId::NONE;
        loop {
            let from_left = match (left.is_empty(), right.is_empty()) {
                (true, true) => break,
                (false, true) => true,
                (true, false) => false,
                (false, false) => !rng.coin_flip(),
            };
            let side = if from_left { &mut left } else { &mut right };
            let Some(id) = side.pop() else { break };
            self.nodes[id.index()].next = head;
            head = id;
        }
        self.head = head;
    }

    fn node_ids(&self) -> impl Iterator<Item = DeckNodeId> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            if cursor.is_none() {
                return None;
            }
            let id = cursor;
            cursor = self.nodes[id.index()].next;
            Some(id)
        })
    }

    /// Shuffle, then draw the top card.
    pub fn shuffle_and_draw(&mut self, rng: &mut ModusRng, rounds: u32) -> Outcome<Card> {
        let shuffled = self.shuffle(rng, rounds);
        let mut outcome = self.draw_from_top();
        if outcome.is_done() && shuffled.is_done() {
            outcome.message = format!("{}; {}", shuffled.message, outcome.message);
        }
        outcome
    }

    /// Drop every node and reset the arena.
    pub fn free_deck(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = DeckNodeId::NONE;
        self.size = 0;
    }

    /// Remove every card, returning them from the top down.
    pub fn drain(&mut self) -> Vec<Card> {
        let ids: Vec<DeckNodeId> = self.node_ids().collect();
        let cards: Vec<Card> = ids.into_iter().map(|id| self.nodes[id.index()].card.take()).collect();
        self.free_deck();
        cards
    }
}

/// Iterator over deck cards from the top down.
pub struct DeckIter<'a> {
    deck: &'a LinkedDeck,
    cursor: DeckNodeId,
}

impl<'a> Iterator for DeckIter<'a> {
    type Item = &'a Card;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.is_none() {
            return None;
        }
        let node = &self.deck.nodes[self.cursor.index()];
        self.cursor = node.next;
        Some(&node.card)
    }
}

impl Modus for LinkedDeck {
    fn kind(&self) -> ModusKind {
        ModusKind::TarotDeck
    }

    fn insert_card(&mut self, card: Card) -> Result<Outcome<()>> {
        Ok(self.add_card(card))
    }

    fn take_out_by_index(&mut self, index: usize) -> Outcome<Card> {
        LinkedDeck::take_out_by_index(self, index)
    }

    fn take_out_by_name(&mut self, name: &str) -> Outcome<Card> {
        self.take_out_by_item(name)
    }

    fn draw_from_top(&mut self) -> Result<Outcome<Card>> {
        Ok(LinkedDeck::draw_from_top(self))
    }

    fn shuffle(&mut self, rng: &mut ModusRng, rounds: u32) -> Result<Outcome<()>> {
        Ok(LinkedDeck::shuffle(self, rng, rounds))
    }

    fn force_eject_all(&mut self) -> Outcome<()> {
        let cards = self.drain();
        info!(count = cards.len(), "ejected whole deck");
        Outcome::unit(format!("ejected {} cards from the deck", cards.len())).with_ejected(cards)
    }

    /// Decks grow without bound.
    fn is_full(&self) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        !self.iter().any(Card::is_occupied)
    }

    fn card_count(&self) -> usize {
        self.iter().filter(|card| card.is_occupied()).count()
    }

    fn to_records(&self) -> Vec<Card> {
        self.iter().cloned().collect()
    }

    fn load_records(&mut self, records: &[Card], mode: LoadMode) -> Outcome<()> {
        *self = match mode {
            LoadMode::Clear => Self::new(),
            LoadMode::AsIs => Self::from_records(records),
            LoadMode::NonEmpty | LoadMode::Fast => {
                let occupied: Vec<Card> =
                    records.iter().filter(|card| card.is_occupied()).cloned().collect();
                Self::from_records(&occupied)
            }
        };
        Outcome::unit(format!("loaded {} cards into the deck", self.card_count()))
    }

    fn description(&self) -> &'static str {
        "The TarotDeck fetch modus stores cards in a deck. New cards go on top, and only the \
         top card can be drawn. Shuffling riffles the deck nine times, so what comes off the \
         top after a shuffle is anyone's guess."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck_of(names: &[&str]) -> LinkedDeck {
        let cards: Vec<Card> = names.iter().map(|n| Card::new(*n).unwrap()).collect();
        LinkedDeck::from_records(&cards)
    }

    fn names(deck: &LinkedDeck) -> Vec<String> {
        deck.iter().map(|c| c.name().to_string()).collect()
    }

    #[test]
    fn test_add_then_draw_is_identity() {
        let mut deck = deck_of(&["B", "C"]);
        deck.add_card(Card::new("A").unwrap());
        assert_eq!(deck.len(), 3);

        let outcome = deck.draw_from_top();
        assert_eq!(outcome.value.name(), "A");
        assert_eq!(names(&deck), ["B", "C"]);
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn test_draw_empty() {
        let mut deck = LinkedDeck::new();
        let outcome = deck.draw_from_top();
        assert_eq!(outcome.status, Status::Empty);
        assert_eq!(outcome.value, Card::empty());
        assert_eq!(outcome.message, "deck empty");
    }

    #[test]
    fn test_take_out_by_index() {
        let mut deck = deck_of(&["A", "B", "C", "D"]);

        assert_eq!(deck.take_out_by_index(2).value.name(), "C");
        assert_eq!(names(&deck), ["A", "B", "D"]);
        assert_eq!(deck.len(), 3);

        assert_eq!(deck.take_out_by_index(0).value.name(), "A");
        assert_eq!(names(&deck), ["B", "D"]);

        let outcome = deck.take_out_by_index(2);
        assert_eq!(outcome.status, Status::OutOfRange);
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn test_take_out_by_item_head_and_middle() {
        let mut deck = deck_of(&["Wand", "LotusBlade", "Blade"]);

        let outcome = deck.take_out_by_item("Wa");
        assert_eq!(outcome.value.name(), "Wand");
        assert_eq!(names(&deck), ["LotusBlade", "Blade"]);

        // First from the top containing the substring.
        let outcome = deck.take_out_by_item("Blade");
        assert_eq!(outcome.value.name(), "LotusBlade");
        assert_eq!(deck.len(), 1);

        let outcome = deck.take_out_by_item("Gem");
        assert_eq!(outcome.status, Status::NotFound);
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn test_nodes_are_reused() {
        let mut deck = deck_of(&["A", "B"]);
        deck.draw_from_top();
        deck.add_card(Card::new("C").unwrap());
        assert_eq!(deck.nodes.len(), 2);
        assert_eq!(names(&deck), ["C", "B"]);
    }

    #[test]
    fn test_shuffle_small_decks_unchanged() {
        let mut rng = ModusRng::new(1);

        let mut deck = LinkedDeck::new();
        let outcome = deck.shuffle(&mut rng, 9);
        assert!(!outcome.is_done());
        assert_eq!(outcome.message, "not enough cards to shuffle");

        let mut deck = deck_of(&["Solo"]);
        deck.shuffle(&mut rng, 9);
        assert_eq!(names(&deck), ["Solo"]);
    }

    #[test]
    fn test_shuffle_preserves_cards() {
        let mut rng = ModusRng::new(42);
        let mut deck = deck_of(&["A", "B", "C", "D", "E"]);
        let outcome = deck.shuffle(&mut rng, 9);
        assert!(outcome.is_done());

        let mut after = names(&deck);
        after.sort();
        assert_eq!(after, ["A", "B", "C", "D", "E"]);
        assert_eq!(deck.len(), 5);
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let mut a = deck_of(&["A", "B", "C", "D", "E", "F", "G", "H"]);
        let mut b = a.clone();
        a.shuffle(&mut ModusRng::new(5), 9);
        b.shuffle(&mut ModusRng::new(5), 9);
        assert_eq!(names(&a), names(&b));
    }

    #[test]
    fn test_riffle_two_cards() {
        // With two cards each side holds one; the rebuilt deck is the
        // reverse of the pop order, so it is either [A, B] or [B, A].
        let mut rng = ModusRng::new(3);
        let mut deck = deck_of(&["A", "B"]);
        deck.shuffle(&mut rng, 1);
        let after = names(&deck);
        assert!(after == ["A", "B"] || after == ["B", "A"]);
    }

    #[test]
    fn test_shuffle_and_draw() {
        let mut rng = ModusRng::new(8);
        let mut deck = deck_of(&["A", "B", "C"]);
        let outcome = deck.shuffle_and_draw(&mut rng, 9);
        assert!(outcome.is_done());
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn test_free_and_drain() {
        let mut deck = deck_of(&["A", "B", "C"]);
        let cards = deck.drain();
        let drained: Vec<_> = cards.iter().map(Card::name).collect();
        assert_eq!(drained, ["A", "B", "C"]);
        assert!(deck.is_empty());
        assert_eq!(deck.len(), 0);

        let mut deck = deck_of(&["A"]);
        deck.free_deck();
        assert!(deck.is_empty());
        assert!(deck.nodes.is_empty());
    }

    #[test]
    fn test_load_modes() {
        let records = vec![Card::new("A").unwrap(), Card::empty(), Card::new("B").unwrap()];

        let mut deck = LinkedDeck::new();
        deck.load_records(&records, LoadMode::AsIs);
        assert_eq!(deck.len(), 3);
        assert_eq!(deck.card_count(), 2);

        deck.load_records(&records, LoadMode::NonEmpty);
        assert_eq!(names(&deck), ["A", "B"]);

        deck.load_records(&records, LoadMode::Clear);
        assert!(Modus::is_empty(&deck));
    }

    #[test]
    fn test_as_is_placeholders_are_not_cards() {
        let records = vec![Card::empty(), Card::new("A").unwrap()];
        let mut deck = LinkedDeck::new();
        let outcome = deck.load_records(&records, LoadMode::AsIs);
        assert_eq!(outcome.message, "loaded 1 cards into the deck");

        let outcome = deck.draw_from_top();
        assert_eq!(outcome.status, Status::Empty);
        assert!(!outcome.value.is_occupied());
        assert_eq!(deck.len(), 1);

        let outcome = deck.draw_from_top();
        assert!(outcome.is_done());
        assert_eq!(outcome.value.name(), "A");
    }

    #[test]
    fn test_equality_ignores_arena_layout() {
        let mut a = deck_of(&["X", "B"]);
        a.draw_from_top();
        a.add_card(Card::new("A").unwrap());
        let b = deck_of(&["A", "B"]);
        assert_eq!(a, b);
    }
}
