//! The sylladex: one active modus plus everything around it.
//!
//! `Sylladex` owns the configuration, the active modus, the RNG, the record
//! store and the open hand. The shell holds exactly one and drives it; there
//! is no global state.
//!
//! ## Open Hand
//!
//! Cards that leave the modus (taken out, drawn, burst out of a folder,
//! dropped with a popped subtree, or left over after a load or switch) are
//! appended to the open hand, where the shell can show them and the user can
//! pick them back up.
//!
//! ## Switching
//!
//! `switch_modus` flattens the active modus into the shared buffer (the
//! "sylladex deck") and loads a fresh modus of the new kind from it. The
//! buffer keeps the last flattened contents until the next switch.
//!
//! ```
//! use sylladex::{LoadMode, ModusKind, Sylladex, SylladexConfig};
//!
//! let config = SylladexConfig::new().with_seed(7);
//! let mut syl = Sylladex::new(config).unwrap();
//! syl.capture("Wand").unwrap();
//! syl.capture("Blade").unwrap();
//!
//! syl.switch_modus(ModusKind::TarotDeck, LoadMode::NonEmpty);
//! assert_eq!(syl.kind(), ModusKind::TarotDeck);
//! assert_eq!(syl.modus().card_count(), 2);
//! ```

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{
    Card, LoadMode, ModusKind, ModusRng, ModusRngState, Outcome, SylladexConfig,
};
use crate::error::{ModusError, Result};
use crate::modus::{BalancedTree, FolderTag, LinkedDeck, Modus, PentaFile, Route};
use crate::persist::{from_snapshot, to_snapshot, LoadStatus, RecordStore};

/// The modus currently in use.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveModus {
    Penta(PentaFile),
    Deck(LinkedDeck),
    Tree(BalancedTree),
}

impl ActiveModus {
    /// Empty modus of the given kind.
    #[must_use]
    pub fn new(kind: ModusKind) -> Self {
        match kind {
            ModusKind::PentaFile => Self::Penta(PentaFile::new()),
            ModusKind::TarotDeck => Self::Deck(LinkedDeck::new()),
            ModusKind::BalancedTree => Self::Tree(BalancedTree::new()),
        }
    }

    /// Borrow through the common interface.
    #[must_use]
    pub fn as_modus(&self) -> &dyn Modus {
        match self {
            Self::Penta(penta) => penta,
            Self::Deck(deck) => deck,
            Self::Tree(tree) => tree,
        }
    }

    /// Mutably borrow through the common interface.
    pub fn as_modus_mut(&mut self) -> &mut dyn Modus {
        match self {
            Self::Penta(penta) => penta,
            Self::Deck(deck) => deck,
            Self::Tree(tree) => tree,
        }
    }
}

/// Everything a snapshot restores.
#[derive(Serialize, Deserialize)]
struct Checkpoint {
    active: ActiveModus,
    buffer: Vector<Card>,
    hand: Vec<Card>,
    rng: ModusRngState,
}

/// A running sylladex.
#[derive(Clone, Debug)]
pub struct Sylladex {
    config: SylladexConfig,
    active: ActiveModus,
    buffer: Vector<Card>,
    hand: Vec<Card>,
    rng: ModusRng,
    store: RecordStore,
}

impl Sylladex {
    /// Start a sylladex with an empty modus of the configured kind.
    pub fn new(config: SylladexConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ModusRng::new(seed),
            None => ModusRng::from_entropy(),
        };
        info!(
            modus = config.default_modus.name(),
            store = %config.store_path.display(),
            seed = rng.seed(),
            "sylladex ready"
        );
        Ok(Self {
            active: ActiveModus::new(config.default_modus),
            store: RecordStore::new(config.store_path.clone()),
            buffer: Vector::new(),
            hand: Vec::new(),
            rng,
            config,
        })
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &SylladexConfig {
        &self.config
    }

    /// Kind of the active modus.
    #[must_use]
    pub fn kind(&self) -> ModusKind {
        self.modus().kind()
    }

    /// The active modus.
    #[must_use]
    pub fn active(&self) -> &ActiveModus {
        &self.active
    }

    /// The active modus through the common interface.
    #[must_use]
    pub fn modus(&self) -> &dyn Modus {
        self.active.as_modus()
    }

    /// The active modus through the common interface, mutably.
    pub fn modus_mut(&mut self) -> &mut dyn Modus {
        self.active.as_modus_mut()
    }

    /// Contents of the shared buffer as of the last switch.
    #[must_use]
    pub fn buffer(&self) -> &Vector<Card> {
        &self.buffer
    }

    /// Cards waiting in the open hand, oldest first.
    #[must_use]
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    /// Empty the open hand, returning what was in it.
    pub fn clear_hand(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.hand)
    }

    /// Throw away the oldest hand card named exactly `name`.
    pub fn drop_from_hand(&mut self, name: &str) -> Option<Card> {
        let position = self.hand.iter().position(|card| card.name() == name)?;
        Some(self.hand.remove(position))
    }

    /// Move cards an operation released into the hand.
    fn absorb<T>(&mut self, outcome: &Outcome<T>) {
        self.hand.extend(outcome.ejected.iter().cloned());
    }

    /// Like `absorb`, plus the retrieved card itself.
    fn absorb_card(&mut self, outcome: Outcome<Card>) -> Outcome<Card> {
        if outcome.value.is_occupied() {
            self.hand.push(outcome.value.clone());
        }
        self.absorb(&outcome);
        outcome
    }

    fn penta_mut(&mut self, op: &'static str) -> Result<&mut PentaFile> {
        match &mut self.active {
            ActiveModus::Penta(penta) => Ok(penta),
            other => Err(ModusError::Unsupported {
                op,
                kind: other.as_modus().kind().name(),
            }),
        }
    }

    /// Captchalogue an item into the active modus.
    pub fn capture(&mut self, name: &str) -> Result<Outcome<()>> {
        let outcome = self.modus_mut().capture(name)?;
        self.absorb(&outcome);
        Ok(outcome)
    }

    /// Captchalogue an item into a specific folder (folder modus only).
    pub fn capture_into(&mut self, name: &str, tag: FolderTag) -> Result<Outcome<()>> {
        let card = Card::new(name)?;
        let outcome = self
            .penta_mut("capture into folder")?
            .capture_into(tag, card)
            .map(|_| ());
        self.absorb(&outcome);
        Ok(outcome)
    }

    /// Captchalogue every card in the open hand again, oldest first.
    ///
    /// Cards the modus refuses stay in the hand; cards a capture bursts
    /// loose join it.
    pub fn pick_up_hand(&mut self) -> Outcome<()> {
        let hand = std::mem::take(&mut self.hand);
        let mut refused = Vec::new();
        let mut picked = 0usize;

        for card in hand {
            match self.modus_mut().insert_card(card.clone()) {
                Ok(outcome) if outcome.is_done() => {
                    picked += 1;
                    self.absorb(&outcome);
                }
                _ => refused.push(card),
            }
        }

        let message = format!("picked up {picked} cards, {} still in hand", refused.len());
        refused.append(&mut self.hand);
        self.hand = refused;
        Outcome::unit(message)
    }

    /// Take out by position in the active modus.
    pub fn take_out_by_index(&mut self, index: usize) -> Outcome<Card> {
        let outcome = self.modus_mut().take_out_by_index(index);
        self.absorb_card(outcome)
    }

    /// Take out by slot within a folder (folder modus only).
    pub fn take_out_in(&mut self, tag: FolderTag, index: usize) -> Result<Outcome<Card>> {
        let outcome = self.penta_mut("take out of folder")?.take_out(tag, index);
        Ok(self.absorb_card(outcome))
    }

    /// Take out by name in the active modus.
    pub fn take_out_by_name(&mut self, name: &str) -> Outcome<Card> {
        let outcome = self.modus_mut().take_out_by_name(name);
        self.absorb_card(outcome)
    }

    /// Take out by name within a folder (folder modus only).
    pub fn take_out_named_in(&mut self, tag: FolderTag, name: &str) -> Result<Outcome<Card>> {
        let outcome = self.penta_mut("take out of folder")?.take_out_named(tag, name);
        Ok(self.absorb_card(outcome))
    }

    /// Draw the top card (deck modus only).
    pub fn draw(&mut self) -> Result<Outcome<Card>> {
        let outcome = self.modus_mut().draw_from_top()?;
        Ok(self.absorb_card(outcome))
    }

    /// Shuffle the active modus with the configured number of rounds.
    pub fn shuffle(&mut self) -> Result<Outcome<()>> {
        let rounds = self.config.shuffle_rounds;
        self.active.as_modus_mut().shuffle(&mut self.rng, rounds)
    }

    /// Shuffle, then draw the top card (deck modus only).
    pub fn shuffle_and_draw(&mut self) -> Result<Outcome<Card>> {
        let rounds = self.config.shuffle_rounds;
        let outcome = match &mut self.active {
            ActiveModus::Deck(deck) => deck.shuffle_and_draw(&mut self.rng, rounds),
            other => {
                return Err(ModusError::Unsupported {
                    op: "shuffle and draw",
                    kind: other.as_modus().kind().name(),
                })
            }
        };
        Ok(self.absorb_card(outcome))
    }

    /// Release every card in the active modus into the hand.
    pub fn eject_all(&mut self) -> Outcome<()> {
        let outcome = self.modus_mut().force_eject_all();
        self.absorb(&outcome);
        outcome
    }

    /// Write the active modus to the record store.
    pub fn save(&self) -> Result<()> {
        self.store.save(&self.modus().to_records())
    }

    /// Replace the active modus with the store contents read under `mode`.
    ///
    /// The value reports how the file read went; a missing or corrupt store
    /// still loads whatever could be read.
    pub fn load(&mut self, mode: LoadMode) -> Result<Outcome<LoadStatus>> {
        let report = self.store.load()?;
        let outcome = self.modus_mut().load_records(&report.cards, mode);
        self.absorb(&outcome);
        info!(mode = ?mode, records = report.cards.len(), status = ?report.status, "load finished");

        let status = report.status;
        Ok(outcome.map(|()| status))
    }

    /// Load the store into the folder modus, routing each record with `router`.
    pub fn load_manual<F>(&mut self, router: F) -> Result<Outcome<LoadStatus>>
    where
        F: FnMut(&Card) -> Route,
    {
        self.penta_mut("manual load")?;
        let report = self.store.load()?;
        let outcome = self.penta_mut("manual load")?.load_manual(&report.cards, router);
        self.absorb(&outcome);

        let status = report.status;
        Ok(outcome.map(|()| status))
    }

    /// Move every card into a fresh modus of kind `kind`.
    pub fn switch_modus(&mut self, kind: ModusKind, mode: LoadMode) -> Outcome<()> {
        let from = self.kind();
        self.buffer = self.modus().to_records().into_iter().collect();

        let records: Vec<Card> = self.buffer.iter().cloned().collect();
        self.active = ActiveModus::new(kind);
        let mut outcome = self.modus_mut().load_records(&records, mode);
        self.absorb(&outcome);

        info!(
            from = from.name(),
            to = kind.name(),
            cards = self.modus().card_count(),
            "switched modus"
        );
        outcome.message = format!("switched from {from} to {kind}: {}", outcome.message);
        outcome
    }

    /// Encode the session (modus, buffer, hand, RNG position).
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        to_snapshot(&Checkpoint {
            active: self.active.clone(),
            buffer: self.buffer.clone(),
            hand: self.hand.clone(),
            rng: self.rng.state(),
        })
    }

    /// Roll the session back to a snapshot. Configuration is kept.
    pub fn restore(&mut self, bytes: &[u8]) -> Result<()> {
        let checkpoint: Checkpoint = from_snapshot(bytes)?;
        self.active = checkpoint.active;
        self.buffer = checkpoint.buffer;
        self.hand = checkpoint.hand;
        self.rng = ModusRng::from_state(&checkpoint.rng);
        info!(modus = self.kind().name(), "restored snapshot");
        Ok(())
    }
}
