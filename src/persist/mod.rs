//! Persistence: the fixed-width record file and in-session snapshots.
//!
//! ## Record File
//!
//! The store is a flat sequence of 28-byte records with no header, count or
//! checksum. Each modus decides which cards it writes and in what order (see
//! [`crate::modus::Modus::to_records`]).
//!
//! ## Snapshots
//!
//! A snapshot is the bincode encoding of the active modus. Unlike the record
//! file it keeps exact structure (tree shape, empty folder slots) and is
//! meant for checkpoints within a session, not for interchange.

pub mod record;
pub mod snapshot;
pub mod store;

pub use record::{decode, encode, RECORD_LEN};
pub use snapshot::{from_snapshot, to_snapshot};
pub use store::{LoadReport, LoadStatus, RecordStore};
