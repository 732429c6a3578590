//! File-backed record store.

use std::fs::File;
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::record::{decode, encode, RECORD_LEN};
use crate::core::Card;
use crate::error::{ModusError, Result};

/// How a load went.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    /// Every record decoded.
    Complete,
    /// No store file yet; nothing was loaded.
    StoreMissing,
    /// The store exists but could not be read; nothing was loaded.
    Unavailable { reason: String },
    /// Decoding stopped at a bad record. Cards before it were kept.
    Corrupt { record: usize, reason: String },
}

/// Cards read from a store plus how the read went.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadReport {
    pub cards: Vec<Card>,
    pub status: LoadStatus,
}

impl LoadReport {
    /// Whether the whole file was read.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == LoadStatus::Complete
    }
}

/// A record file on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Store backed by `path`. Nothing is opened until save or load.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the store with `cards`, one record each, in order.
    pub fn save(&self, cards: &[Card]) -> Result<()> {
        let file = File::create(&self.path).map_err(|err| {
            warn!(path = %self.path.display(), error = %err, "store unavailable");
            ModusError::store(&self.path, err)
        })?;

        let mut writer = BufWriter::new(file);
        for card in cards {
            writer
                .write_all(&encode(card))
                .map_err(|err| ModusError::store(&self.path, err))?;
        }
        writer.flush().map_err(|err| ModusError::store(&self.path, err))?;

        info!(path = %self.path.display(), records = cards.len(), "saved inventory");
        Ok(())
    }

    /// Read every record in the store.
    ///
    /// A missing or unreadable file is not an error: it loads as no cards
    /// with `StoreMissing` or `Unavailable`. A corrupt or truncated record
    /// stops the read and is reported in the status; the cards before it are
    /// returned.
    pub fn load(&self) -> Result<LoadReport> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no store yet, starting empty");
                return Ok(LoadReport {
                    cards: Vec::new(),
                    status: LoadStatus::StoreMissing,
                });
            }
            Err(err) => return Ok(self.unavailable(&err)),
        };

        let mut bytes = Vec::new();
        if let Err(err) = file.read_to_end(&mut bytes) {
            return Ok(self.unavailable(&err));
        }

        let mut cards = Vec::with_capacity(bytes.len() / RECORD_LEN);
        for (index, chunk) in bytes.chunks(RECORD_LEN).enumerate() {
            match decode(chunk, index) {
                Ok(card) => cards.push(card),
                Err(ModusError::CorruptRecord { record, reason }) => {
                    warn!(record, %reason, kept = cards.len(), "corrupt record, load stopped");
                    return Ok(LoadReport {
                        cards,
                        status: LoadStatus::Corrupt { record, reason },
                    });
                }
                Err(err) => return Err(err),
            }
        }

        info!(path = %self.path.display(), records = cards.len(), "loaded inventory");
        Ok(LoadReport {
            cards,
            status: LoadStatus::Complete,
        })
    }

    fn unavailable(&self, err: &std::io::Error) -> LoadReport {
        warn!(path = %self.path.display(), error = %err, "store unavailable, starting empty");
        LoadReport {
            cards: Vec::new(),
            status: LoadStatus::Unavailable {
                reason: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("inventory.MSF"));

        let report = store.load().unwrap();
        assert!(report.cards.is_empty());
        assert_eq!(report.status, LoadStatus::StoreMissing);
    }

    #[test]
    fn test_unreadable_store_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());

        let report = store.load().unwrap();
        assert!(report.cards.is_empty());
        assert!(matches!(report.status, LoadStatus::Unavailable { .. }));
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("inventory.MSF"));

        let cards: Vec<_> = ["A", "B", "C"].iter().map(|n| Card::new(*n).unwrap()).collect();
        store.save(&cards).unwrap();
        store.save(&cards[..1]).unwrap();

        let report = store.load().unwrap();
        assert!(report.is_complete());
        assert_eq!(report.cards, cards[..1]);
        assert_eq!(std::fs::metadata(store.path()).unwrap().len(), RECORD_LEN as u64);
    }

    #[test]
    fn test_save_to_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("nope").join("inventory.MSF"));

        let err = store.save(&[Card::empty()]).unwrap_err();
        assert!(matches!(err, ModusError::StoreUnavailable { .. }));
    }
}
