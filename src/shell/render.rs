//! Text rendering of the inventory.

use std::fmt::Write as _;

use crate::core::{Card, Outcome};
use crate::modus::{BalancedTree, LinkedDeck, PentaFile};
use crate::sylladex::{ActiveModus, Sylladex};

const CELL: usize = 12;

/// Draw the active modus.
#[must_use]
pub fn render(sylladex: &Sylladex) -> String {
    match sylladex.active() {
        ActiveModus::Penta(penta) => render_penta(penta),
        ActiveModus::Deck(deck) => render_deck(deck),
        ActiveModus::Tree(tree) => render_tree(tree),
    }
}

/// One row per folder, one cell per slot.
#[must_use]
pub fn render_penta(penta: &PentaFile) -> String {
    let mut out = String::new();
    for (tag, folder) in penta.folders() {
        let _ = write!(out, "{:<width$}|", tag.name(), width = CELL);
        for card in folder.iter() {
            let label = if card.is_occupied() { card.name() } else { "-" };
            let _ = write!(out, " {label:<width$}|", width = CELL);
        }
        out.push('\n');
    }
    out
}

/// Numbered list from the top.
#[must_use]
pub fn render_deck(deck: &LinkedDeck) -> String {
    if deck.is_empty() {
        return "(deck is empty)\n".to_string();
    }
    let mut out = String::new();
    for (position, card) in deck.iter().enumerate() {
        let marker = if position == 0 { " <- top" } else { "" };
        let _ = writeln!(out, "{position:>3}: {card}{marker}");
    }
    out
}

/// Indented outline, root first.
#[must_use]
pub fn render_tree(tree: &BalancedTree) -> String {
    if tree.is_empty() {
        return "(tree is empty)\n".to_string();
    }
    let mut out = String::new();
    for (depth, card) in tree.outline() {
        let _ = writeln!(out, "{}{}", "  ".repeat(depth), card.name());
    }
    out
}

/// Cards in the open hand.
#[must_use]
pub fn render_hand(hand: &[Card]) -> String {
    if hand.is_empty() {
        return "(hand is empty)\n".to_string();
    }
    let names: Vec<&str> = hand.iter().map(Card::name).collect();
    format!("in hand: {}\n", names.join(", "))
}

/// Outcome message plus any ejected cards.
#[must_use]
pub fn render_outcome<T>(outcome: &Outcome<T>) -> String {
    let mut out = outcome.message.clone();
    let ejected: Vec<&str> = outcome
        .ejected
        .iter()
        .filter(|card| card.is_occupied())
        .map(Card::name)
        .collect();
    if !ejected.is_empty() {
        let _ = write!(out, "\nejected: {}", ejected.join(", "));
    }
    out.push('\n');
    out
}
