//! Line-oriented shell over a [`Sylladex`].
//!
//! The shell turns text commands into sylladex calls and sylladex outcomes
//! into text. It never reads input itself: the binary feeds it lines and
//! supplies the router used by `load manual`.
//!
//! ```
//! use sylladex::shell::Shell;
//! use sylladex::modus::Route;
//! use sylladex::{Sylladex, SylladexConfig};
//!
//! let mut shell = Shell::new(Sylladex::new(SylladexConfig::new().with_seed(1)).unwrap());
//! let reply = shell.execute("capture Wand, w", &mut |_| Route::Skip).unwrap();
//! assert!(reply.text.contains("Wand"));
//! assert!(!reply.quit);
//! ```

pub mod command;
pub mod render;

pub use command::{Command, LoadRequest};
pub use render::{render, render_hand, render_outcome};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::core::{Card, LoadMode, ModusKind};
use crate::error::{ModusError, Result};
use crate::modus::Route;
use crate::persist::LoadStatus;
use crate::sylladex::Sylladex;

/// Text produced by one command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub quit: bool,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quit: false,
        }
    }
}

const HELP: &[(&str, &str)] = &[
    ("capture", "capture <item>[, <folder>]\n  captchalogue an item, optionally into a folder"),
    ("take", "take <index>[, <folder>]\n  take out the card at a position"),
    ("name", "name <item>[, <folder>]\n  take out a card by name"),
    ("draw", "draw\n  draw the top card of the deck"),
    ("shuffle", "shuffle\n  riffle-shuffle the deck"),
    ("drawcard", "drawcard\n  shuffle the deck, then draw the top card"),
    ("eject", "eject\n  force every card out of the modus"),
    ("save", "save\n  write the inventory to the store"),
    ("load", "load [clear|as-is|no-empty|fast|manual]\n  read the inventory from the store"),
    ("switch", "switch <modus>[, <load mode>]\n  move every card into another modus"),
    ("checkpoint", "checkpoint\n  remember the current session"),
    ("rollback", "rollback\n  return to the last checkpoint"),
    ("show", "show\n  draw the inventory"),
    ("hand", "hand\n  list cards in the open hand"),
    ("pickup", "pickup\n  captchalogue everything in the open hand"),
    ("drop", "drop [item]\n  throw away one card from the open hand, or all of them"),
    ("describe", "describe\n  explain the active modus"),
    ("help", "help [command]\n  list commands or explain one"),
    ("quit", "quit\n  leave the sylladex"),
];

/// Command interpreter holding the sylladex and its checkpoint.
pub struct Shell {
    sylladex: Sylladex,
    checkpoint: Option<Vec<u8>>,
    help: FxHashMap<&'static str, &'static str>,
}

impl Shell {
    /// Wrap a sylladex.
    pub fn new(sylladex: Sylladex) -> Self {
        Self {
            sylladex,
            checkpoint: None,
            help: HELP.iter().copied().collect(),
        }
    }

    /// The sylladex being driven.
    #[must_use]
    pub fn sylladex(&self) -> &Sylladex {
        &self.sylladex
    }

    /// Mutable access to the sylladex.
    pub fn sylladex_mut(&mut self) -> &mut Sylladex {
        &mut self.sylladex
    }

    /// Parse and run one line.
    pub fn execute(
        &mut self,
        line: &str,
        router: &mut dyn FnMut(&Card) -> Route,
    ) -> Result<Reply> {
        let command = Command::parse(line)?;
        debug!(?command, "executing");
        self.dispatch(command, router)
    }

    /// Run a parsed command.
    pub fn dispatch(
        &mut self,
        command: Command,
        router: &mut dyn FnMut(&Card) -> Route,
    ) -> Result<Reply> {
        let syl = &mut self.sylladex;
        let text = match command {
            Command::Capture { item, folder } => match folder {
                Some(tag) => render_outcome(&syl.capture_into(&item, tag)?),
                None => render_outcome(&syl.capture(&item)?),
            },
            Command::Take { index, folder } => match folder {
                Some(tag) => render_outcome(&syl.take_out_in(tag, index)?),
                None => render_outcome(&syl.take_out_by_index(index)),
            },
            Command::Name { item, folder } => match folder {
                Some(tag) => render_outcome(&syl.take_out_named_in(tag, &item)?),
                None => render_outcome(&syl.take_out_by_name(&item)),
            },
            Command::Draw => render_outcome(&syl.draw()?),
            Command::Shuffle => render_outcome(&syl.shuffle()?),
            Command::ShuffleDraw => render_outcome(&syl.shuffle_and_draw()?),
            Command::Eject => render_outcome(&syl.eject_all()),
            Command::Save => {
                syl.save()?;
                format!(
                    "saved {} cards to {}\n",
                    syl.modus().card_count(),
                    syl.config().store_path.display()
                )
            }
            Command::Load(request) => {
                let outcome = match request {
                    LoadRequest::Default => {
                        let mode = syl.config().load_mode;
                        syl.load(mode)?
                    }
                    LoadRequest::Mode(mode) => syl.load(mode)?,
                    LoadRequest::Manual => syl.load_manual(|card| router(card))?,
                };
                let mut text = render_outcome(&outcome);
                match &outcome.value {
                    LoadStatus::Complete => {}
                    LoadStatus::StoreMissing => text.push_str("no saved inventory found\n"),
                    LoadStatus::Unavailable { reason } => {
                        text.push_str(&format!("could not read the store: {reason}\n"));
                    }
                    LoadStatus::Corrupt { record, reason } => {
                        text.push_str(&format!("stopped at corrupt record {record}: {reason}\n"));
                    }
                }
                text
            }
            Command::Switch { kind, mode } => {
                let mode = mode.unwrap_or(LoadMode::NonEmpty);
                render_outcome(&syl.switch_modus(kind, mode))
            }
            Command::Checkpoint => {
                self.checkpoint = Some(syl.snapshot()?);
                "checkpoint saved\n".to_string()
            }
            Command::Rollback => match &self.checkpoint {
                Some(bytes) => {
                    syl.restore(bytes)?;
                    "rolled back to checkpoint\n".to_string()
                }
                None => "no checkpoint to roll back to\n".to_string(),
            },
            Command::Show => render(syl),
            Command::Hand => render_hand(syl.hand()),
            Command::Pickup => render_outcome(&syl.pick_up_hand()),
            Command::Drop(None) => format!("dropped {} cards\n", syl.clear_hand().len()),
            Command::Drop(Some(item)) => match syl.drop_from_hand(&item) {
                Some(card) => format!("dropped {}\n", card.name()),
                None => format!("no {item} in hand\n"),
            },
            Command::Describe => format!("{}\n", syl.modus().description()),
            Command::Help(topic) => help_text(&self.help, topic.as_deref())?,
            Command::Quit => {
                return Ok(Reply {
                    text: "bye\n".to_string(),
                    quit: true,
                })
            }
        };
        Ok(Reply::text(text))
    }
}

fn help_text(help: &FxHashMap<&'static str, &'static str>, topic: Option<&str>) -> Result<String> {
    match topic {
        Some(topic) => help
            .get(topic)
            .map(|text| format!("{text}\n"))
            .ok_or_else(|| ModusError::parse(format!("no help for `{topic}`"))),
        None => {
            let names: Vec<&str> = HELP.iter().map(|(name, _)| *name).collect();
            Ok(format!(
                "commands: {}\nmodi: {}\n",
                names.join(", "),
                ModusKind::ALL.map(ModusKind::name).join(", ")
            ))
        }
    }
}
