//! Operation outcomes handed back to the shell.
//!
//! Every modus operation returns an [`Outcome`]: the value (usually a
//! [`Card`]), a [`Status`], a human-readable message for the shell to print,
//! and any cards the operation released as a side effect (a burst folder, a
//! popped subtree).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::Card;

/// Cards released by an operation, in the order they left the modus.
///
/// SmallVec keeps the common case (a 5-card folder burst) off the heap.
pub type Ejected = SmallVec<[Card; 5]>;

/// How an operation went.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Operation completed.
    Done,
    /// Name or substring lookup missed.
    NotFound,
    /// Index outside the valid domain.
    OutOfRange,
    /// Nothing to operate on (draw from an empty deck, pop an empty tree).
    Empty,
}

/// Result of a modus operation plus its report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome<T> {
    /// Value produced by the operation.
    pub value: T,
    /// How the operation went.
    pub status: Status,
    /// Description for display.
    pub message: String,
    /// Cards released as a side effect.
    pub ejected: Ejected,
}

impl<T> Outcome<T> {
    /// Successful outcome.
    pub fn done(value: T, message: impl Into<String>) -> Self {
        Self {
            value,
            status: Status::Done,
            message: message.into(),
            ejected: Ejected::new(),
        }
    }

    /// Attach released cards.
    #[must_use]
    pub fn with_ejected(mut self, ejected: impl IntoIterator<Item = Card>) -> Self {
        self.ejected.extend(ejected);
        self
    }

    /// Whether the operation completed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status == Status::Done
    }

    /// Transform the value, keeping status, message and ejected cards.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            status: self.status,
            message: self.message,
            ejected: self.ejected,
        }
    }
}

impl Outcome<Card> {
    /// Miss: the empty sentinel with the given status.
    pub fn miss(status: Status, message: impl Into<String>) -> Self {
        Self {
            value: Card::empty(),
            status,
            message: message.into(),
            ejected: Ejected::new(),
        }
    }
}

impl Outcome<()> {
    /// Successful outcome with no value.
    pub fn unit(message: impl Into<String>) -> Self {
        Self::done((), message)
    }

    /// Unsuccessful outcome with no value.
    pub fn failed(status: Status, message: impl Into<String>) -> Self {
        Self {
            value: (),
            status,
            message: message.into(),
            ejected: Ejected::new(),
        }
    }
}
