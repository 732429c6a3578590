//! Self-balancing tree modus.
//!
//! A binary search tree keyed by item name (equal names go right), stored in
//! a node arena like the deck. Inserts rebalance the insertion path with AVL
//! rotations, so the root can change as cards come in.
//!
//! ## Popping
//!
//! Taking a card out takes its whole subtree with it: the requested card is
//! the outcome's value and every card below it lands in `ejected`. Nothing is
//! rebalanced afterwards, so a tree that has been popped can lean.
//!
//! ```
//! use sylladex::core::Card;
//! use sylladex::modus::{BalancedTree, Modus};
//!
//! let mut tree = BalancedTree::new();
//! for name in ["A", "B", "C"] {
//!     tree.capture(name).unwrap();
//! }
//! // The right-leaning chain A-B-C rotates so B becomes the root.
//! assert_eq!(tree.nearest_root().unwrap().name(), "B");
//!
//! let popped = tree.pop_by_name("B");
//! assert_eq!(popped.value.name(), "B");
//! assert_eq!(popped.ejected.len(), 2);
//! assert!(tree.is_empty());
//! ```

use std::cmp::Ordering;
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::Modus;
use crate::core::{Card, Ejected, LoadMode, ModusKind, Outcome, Status};
use crate::error::Result;

/// Index into the tree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeNodeId(pub u32);

impl TreeNodeId {
    /// Sentinel value representing no node.
    pub const NONE: TreeNodeId = TreeNodeId(u32::MAX);

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
struct TreeNode {
    card: Card,
    left: TreeNodeId,
    right: TreeNodeId,
    parent: TreeNodeId,
    height: u32,
}

impl TreeNode {
    fn leaf(card: Card, parent: TreeNodeId) -> Self {
        Self {
            card,
            left: TreeNodeId::NONE,
            right: TreeNodeId::NONE,
            parent,
            height: 1,
        }
    }
}

/// AVL-balanced card tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BalancedTree {
    nodes: Vec<TreeNode>,
    free: Vec<TreeNodeId>,
    root: TreeNodeId,
    size: usize,
}

impl Default for BalancedTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for BalancedTree {
    /// Same shape and cards, regardless of arena layout.
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.outline() == other.outline()
    }
}

impl Eq for BalancedTree {}

impl BalancedTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: TreeNodeId::NONE,
            size: 0,
        }
    }

    /// Build a tree by inserting occupied records in order.
    #[must_use]
    pub fn from_records(records: &[Card]) -> Self {
        let mut tree = Self::new();
        for card in records.iter().filter(|card| card.is_occupied()) {
            tree.insert(card.clone());
        }
        tree
    }

    /// Root node, or `NONE` when empty.
    #[must_use]
    pub fn root(&self) -> TreeNodeId {
        self.root
    }

    /// Card at the root.
    #[must_use]
    pub fn nearest_root(&self) -> Option<&Card> {
        self.get(self.root)
    }

    /// Card stored at `id`, if the node is live.
    #[must_use]
    pub fn get(&self, id: TreeNodeId) -> Option<&Card> {
        if id.is_none() {
            return None;
        }
        self.nodes
            .get(id.index())
            .map(|node| &node.card)
            .filter(|card| card.is_occupied())
    }

    /// Left and right children of a live node.
    #[must_use]
    pub fn children(&self, id: TreeNodeId) -> Option<(TreeNodeId, TreeNodeId)> {
        self.get(id)?;
        let node = &self.nodes[id.index()];
        Some((node.left, node.right))
    }

    /// Number of cards in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether the tree holds no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree (0 when empty, 1 for a lone root).
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height_of(self.root)
    }

    fn height_of(&self, id: TreeNodeId) -> u32 {
        if id.is_none() {
            0
        } else {
            self.nodes[id.index()].height
        }
    }

    fn node(&self, id: TreeNodeId) -> &TreeNode {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: TreeNodeId) -> &mut TreeNode {
        &mut self.nodes[id.index()]
    }

    fn alloc(&mut self, node: TreeNode) -> TreeNodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = node;
                id
            }
            None => {
                let id = TreeNodeId::new(self.nodes.len() as u32);
                self.nodes.push(node);
                id
            }
        }
    }

    /// Search for a node whose card is named `name`. The shallowest match wins.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<TreeNodeId> {
        self.search(name).map(|(id, _)| id)
    }

    /// Depth of the shallowest card named `name` (root is depth 0).
    #[must_use]
    pub fn depth_of(&self, name: &str) -> Option<usize> {
        self.search(name).map(|(_, depth)| depth)
    }

    fn search(&self, name: &str) -> Option<(TreeNodeId, usize)> {
        let mut cursor = self.root;
        let mut depth = 0;
        while !cursor.is_none() {
            let node = self.node(cursor);
            match name.cmp(node.card.name()) {
                Ordering::Equal => return Some((cursor, depth)),
                Ordering::Less => cursor = node.left,
                Ordering::Greater => cursor = node.right,
            }
            depth += 1;
        }
        None
    }

    /// Insert a card at a leaf and rebalance the path back to the root.
    pub fn insert(&mut self, card: Card) -> Outcome<TreeNodeId> {
        if !card.is_occupied() {
            return Outcome {
                value: TreeNodeId::NONE,
                status: Status::Empty,
                message: "nothing to insert: card is empty".into(),
                ejected: Ejected::new(),
            };
        }

        let message = format!("added {} to the tree", card.name());
        debug!(item = card.name(), "inserting card into tree");

        if self.root.is_none() {
            let id = self.alloc(TreeNode::leaf(card, TreeNodeId::NONE));
            self.root = id;
            self.size = 1;
            return Outcome::done(id, message);
        }

        let mut parent = self.root;
        let goes_left = loop {
            let node = self.node(parent);
            let left = card.name() < node.card.name();
            let next = if left { node.left } else { node.right };
            if next.is_none() {
                break left;
            }
            parent = next;
        };

        let id = self.alloc(TreeNode::leaf(card, parent));
        if goes_left {
            self.node_mut(parent).left = id;
        } else {
            self.node_mut(parent).right = id;
        }
        self.size += 1;
        self.rebalance_from(parent);

        Outcome::done(id, message)
    }

    fn update_height(&mut self, id: TreeNodeId) {
        let node = self.node(id);
        let height = 1 + self.height_of(node.left).max(self.height_of(node.right));
        self.node_mut(id).height = height;
    }

    fn balance_factor(&self, id: TreeNodeId) -> i64 {
        let node = self.node(id);
        i64::from(self.height_of(node.left)) - i64::from(self.height_of(node.right))
    }

    /// Point `parent`'s link (or the root) at `new` instead of `old`.
    fn replace_child(&mut self, parent: TreeNodeId, old: TreeNodeId, new: TreeNodeId) {
        if parent.is_none() {
            self.root = new;
        } else if self.node(parent).left == old {
            self.node_mut(parent).left = new;
        } else {
            self.node_mut(parent).right = new;
        }
        if !new.is_none() {
            self.node_mut(new).parent = parent;
        }
    }

    fn rotate_right(&mut self, x: TreeNodeId) -> TreeNodeId {
        let y = self.node(x).left;
        let inner = self.node(y).right;
        let parent = self.node(x).parent;

        self.node_mut(x).left = inner;
        if !inner.is_none() {
            self.node_mut(inner).parent = x;
        }
        self.node_mut(y).right = x;
        self.replace_child(parent, x, y);
        self.node_mut(x).parent = y;

        self.update_height(x);
        self.update_height(y);
        debug!(pivot = self.node(y).card.name(), "rotated right");
        y
    }

    fn rotate_left(&mut self, x: TreeNodeId) -> TreeNodeId {
        let y = self.node(x).right;
        let inner = self.node(y).left;
        let parent = self.node(x).parent;

        self.node_mut(x).right = inner;
        if !inner.is_none() {
            self.node_mut(inner).parent = x;
        }
        self.node_mut(y).left = x;
        self.replace_child(parent, x, y);
        self.node_mut(x).parent = y;

        self.update_height(x);
        self.update_height(y);
        debug!(pivot = self.node(y).card.name(), "rotated left");
        y
    }

    fn rebalance_from(&mut self, start: TreeNodeId) {
        let mut cursor = start;
        while !cursor.is_none() {
            self.update_height(cursor);
            let balance = self.balance_factor(cursor);

            if balance > 1 {
                let left = self.node(cursor).left;
                if self.balance_factor(left) < 0 {
                    self.rotate_left(left);
                }
                cursor = self.rotate_right(cursor);
            } else if balance < -1 {
                let right = self.node(cursor).right;
                if self.balance_factor(right) > 0 {
                    self.rotate_right(right);
                }
                cursor = self.rotate_left(cursor);
            }

            cursor = self.node(cursor).parent;
        }
    }

    /// Recompute heights from `start` up, without rotating.
    fn refresh_heights(&mut self, start: TreeNodeId) {
        let mut cursor = start;
        while !cursor.is_none() {
            self.update_height(cursor);
            cursor = self.node(cursor).parent;
        }
    }

    /// Detach `id` and everything under it.
    ///
    /// The node's card is the value; the rest of the subtree is ejected in
    /// name order. Popping the root empties the tree.
    pub fn pop(&mut self, id: TreeNodeId) -> Outcome<Card> {
        if self.get(id).is_none() {
            return Outcome::miss(Status::NotFound, "no such node");
        }

        let parent = self.node(id).parent;
        self.replace_child(parent, id, TreeNodeId::NONE);
        self.refresh_heights(parent);

        let mut subtree = Vec::new();
        self.collect_in_order(id, &mut subtree);

        let mut card = Card::empty();
        let mut ejected = Ejected::new();
        for node_id in subtree {
            let taken = self.release(node_id);
            if node_id == id {
                card = taken;
            } else {
                ejected.push(taken);
            }
        }
        self.size -= 1 + ejected.len();

        debug!(item = card.name(), ejected = ejected.len(), "popped subtree");
        let message = if ejected.is_empty() {
            format!("retrieved {}", card.name())
        } else {
            format!("retrieved {}; {} cards fell out with it", card.name(), ejected.len())
        };
        Outcome::done(card, message).with_ejected(ejected)
    }

    fn release(&mut self, id: TreeNodeId) -> Card {
        let node = self.node_mut(id);
        node.left = TreeNodeId::NONE;
        node.right = TreeNodeId::NONE;
        node.parent = TreeNodeId::NONE;
        node.height = 0;
        let card = node.card.take();
        self.free.push(id);
        card
    }

    /// Pop the shallowest card named `name`, with its subtree.
    pub fn pop_by_name(&mut self, name: &str) -> Outcome<Card> {
        match self.find(name) {
            Some(id) => self.pop(id),
            None => Outcome::miss(Status::NotFound, format!("could not find {name}")),
        }
    }

    /// Pop the card at in-order position `index`, with its subtree.
    pub fn pop_at(&mut self, index: usize) -> Outcome<Card> {
        let mut order = Vec::with_capacity(self.size);
        self.collect_in_order(self.root, &mut order);
        match order.get(index) {
            Some(&id) => self.pop(id),
            None => {
                warn!(index, size = self.size, "tree index out of range");
                Outcome::miss(
                    Status::OutOfRange,
                    format!("index {index} is out of range (tree holds {})", self.size),
                )
            }
        }
    }

    fn collect_in_order(&self, id: TreeNodeId, out: &mut Vec<TreeNodeId>) {
        if id.is_none() {
            return;
        }
        let node = self.node(id);
        self.collect_in_order(node.left, out);
        out.push(id);
        self.collect_in_order(node.right, out);
    }

    /// Cards in name order.
    #[must_use]
    pub fn in_order(&self) -> Vec<&Card> {
        let mut order = Vec::with_capacity(self.size);
        self.collect_in_order(self.root, &mut order);
        order.into_iter().map(|id| &self.node(id).card).collect()
    }

    /// Cards breadth-first from the root.
    #[must_use]
    pub fn level_order(&self) -> Vec<&Card> {
        let mut out = Vec::with_capacity(self.size);
        let mut queue = VecDeque::new();
        if !self.root.is_none() {
            queue.push_back(self.root);
        }
        while let Some(id) = queue.pop_front() {
            let node = self.node(id);
            out.push(&node.card);
            for child in [node.left, node.right] {
                if !child.is_none() {
                    queue.push_back(child);
                }
            }
        }
        out
    }

    /// Pre-order `(depth, card)` pairs, for drawing the tree.
    #[must_use]
    pub fn outline(&self) -> Vec<(usize, &Card)> {
        let mut out = Vec::with_capacity(self.size);
        let mut stack = Vec::new();
        if !self.root.is_none() {
            stack.push((0, self.root));
        }
        while let Some((depth, id)) = stack.pop() {
            let node = self.node(id);
            out.push((depth, &node.card));
            for child in [node.right, node.left] {
                if !child.is_none() {
                    stack.push((depth + 1, child));
                }
            }
        }
        out
    }
}

impl Modus for BalancedTree {
    fn kind(&self) -> ModusKind {
        ModusKind::BalancedTree
    }

    fn insert_card(&mut self, card: Card) -> Result<Outcome<()>> {
        Ok(self.insert(card).map(|_| ()))
    }

    fn take_out_by_index(&mut self, index: usize) -> Outcome<Card> {
        self.pop_at(index)
    }

    fn take_out_by_name(&mut self, name: &str) -> Outcome<Card> {
        self.pop_by_name(name)
    }

    fn force_eject_all(&mut self) -> Outcome<()> {
        if self.is_empty() {
            return Outcome::unit("tree is already empty");
        }
        let popped = self.pop(self.root);
        let count = popped.ejected.len() + 1;
        info!(count, "ejected whole tree");

        let mut ejected = Ejected::new();
        ejected.push(popped.value);
        ejected.extend(popped.ejected);
        Outcome::unit(format!("ejected {count} cards from the tree")).with_ejected(ejected)
    }

    /// Trees grow without bound.
    fn is_full(&self) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        BalancedTree::is_empty(self)
    }

    fn card_count(&self) -> usize {
        self.size
    }

    fn to_records(&self) -> Vec<Card> {
        self.level_order().into_iter().cloned().collect()
    }

    fn load_records(&mut self, records: &[Card], mode: LoadMode) -> Outcome<()> {
        *self = match mode {
            LoadMode::Clear => Self::new(),
            LoadMode::AsIs | LoadMode::NonEmpty | LoadMode::Fast => Self::from_records(records),
        };
        Outcome::unit(format!("loaded {} cards into the tree", self.size))
    }

    fn description(&self) -> &'static str {
        "The BalancedTree fetch modus files cards in a self-balancing tree sorted by name. \
         Retrieving a card pulls its whole branch loose: every card hanging beneath it \
         falls out along with it."
    }
}
