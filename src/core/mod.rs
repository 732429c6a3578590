//! Core engine types: cards, outcomes, RNG, configuration.
//!
//! These are shared by every modus. Nothing here knows about folders, decks
//! or trees.

pub mod card;
pub mod config;
pub mod outcome;
pub mod rng;

pub use card::{CaptchaCode, Card, ItemName, CODE_LEN, EMPTY_CODE, EMPTY_NAME, NAME_MAX};
pub use config::{LoadMode, ModusKind, SylladexConfig, DEFAULT_SHUFFLE_ROUNDS, DEFAULT_STORE};
pub use outcome::{Ejected, Outcome, Status};
pub use rng::{ModusRng, ModusRngState};
