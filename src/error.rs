//! Error types for the modus engine.
//!
//! Lookup misses (a name that isn't captchalogued, an index past the end of a
//! folder) are *not* errors: they come back as an empty card with a
//! `Status::NotFound` / `Status::OutOfRange` outcome. `ModusError` covers the
//! failures a caller has to handle: invalid input, unusable stores and
//! corrupt records.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the sylladex engine.
#[derive(Error, Debug)]
pub enum ModusError {
    /// Item names must contain at least one character.
    #[error("item name is empty")]
    EmptyName,

    /// Item name exceeds the fixed name field.
    #[error("item name `{name}` is {len} bytes, max is {max}")]
    NameTooLong { name: String, len: usize, max: usize },

    /// Item name contains a NUL byte, which the record layout reserves.
    #[error("item name contains a NUL byte")]
    NulInName,

    /// Captcha code is not exactly 7 ASCII alphanumerics.
    #[error("invalid captcha code `{0}`")]
    InvalidCode(String),

    /// Every slot of the modus is occupied and the operation does not evict.
    #[error("inventory is full")]
    InventoryFull,

    /// Operation not offered by this kind of modus.
    #[error("{op} is not supported by the {kind} modus")]
    Unsupported { op: &'static str, kind: &'static str },

    /// Backing store could not be opened or written.
    #[error("store {path} unavailable: {source}")]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record failed validation while decoding.
    #[error("corrupt record #{record}: {reason}")]
    CorruptRecord { record: usize, reason: String },

    /// Snapshot encoding/decoding failed.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),

    /// Folder tag or name did not resolve to one of the five folders.
    #[error("unknown folder `{0}`")]
    UnknownFolder(String),

    /// Modus name did not resolve to a known modus kind.
    #[error("unknown modus `{0}`")]
    UnknownModus(String),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// Shell command could not be parsed.
    #[error("could not parse command: {0}")]
    Parse(String),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, ModusError>;

impl ModusError {
    /// Create a corrupt-record error.
    pub fn corrupt(record: usize, reason: impl Into<String>) -> Self {
        Self::CorruptRecord {
            record,
            reason: reason.into(),
        }
    }

    /// Create a store-unavailable error for `path`.
    pub fn store(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StoreUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModusError::NameTooLong {
            name: "Caledfwlch Sword".into(),
            len: 16,
            max: 12,
        };
        assert_eq!(
            err.to_string(),
            "item name `Caledfwlch Sword` is 16 bytes, max is 12"
        );

        let err = ModusError::corrupt(3, "missing name terminator");
        assert_eq!(err.to_string(), "corrupt record #3: missing name terminator");
    }

    #[test]
    fn test_store_error_keeps_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ModusError::store("/nope/inventory.MSF", io);

        assert!(err.to_string().contains("/nope/inventory.MSF"));
        assert!(err.source().is_some());
    }
}
