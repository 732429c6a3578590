//! 28-byte card record codec.
//!
//! Layout (little-endian):
//!
//! | offset | size | field                                 |
//! |--------|------|---------------------------------------|
//! | 0      | 13   | item name, NUL padded, byte 12 is NUL |
//! | 13     | 8    | captcha code, byte 20 is NUL          |
//! | 21     | 3    | padding                               |
//! | 24     | 4    | occupancy flag, `i32`, 0 or 1         |

use crate::core::{Card, CODE_LEN, NAME_MAX};
use crate::error::{ModusError, Result};

/// Size of the name field, terminator included.
pub const NAME_FIELD: usize = NAME_MAX + 1;

/// Size of the code field, terminator included.
pub const CODE_FIELD: usize = CODE_LEN + 1;

const CODE_OFFSET: usize = NAME_FIELD;
const FLAG_OFFSET: usize = 24;

/// Bytes per record.
pub const RECORD_LEN: usize = FLAG_OFFSET + 4;

/// Encode a card into its record.
#[must_use]
pub fn encode(card: &Card) -> [u8; RECORD_LEN] {
    let mut record = [0u8; RECORD_LEN];

    let name = card.name().as_bytes();
    record[..name.len()].copy_from_slice(name);

    let code = card.code().as_bytes();
    record[CODE_OFFSET..CODE_OFFSET + code.len()].copy_from_slice(code);

    let flag = i32::from(card.is_occupied());
    record[FLAG_OFFSET..].copy_from_slice(&flag.to_le_bytes());
    record
}

/// Decode record number `index` from `bytes`.
///
/// Fails with `CorruptRecord` when the slice is short, a field terminator is
/// missing, a field is not UTF-8, the flag is not 0/1 or an occupied record
/// carries an invalid name or code.
pub fn decode(bytes: &[u8], index: usize) -> Result<Card> {
    if bytes.len() < RECORD_LEN {
        return Err(ModusError::corrupt(
            index,
            format!("truncated record: {} of {RECORD_LEN} bytes", bytes.len()),
        ));
    }

    let name = field(&bytes[..NAME_FIELD], index, "name")?;
    let code = field(&bytes[CODE_OFFSET..CODE_OFFSET + CODE_FIELD], index, "code")?;

    let mut flag = [0u8; 4];
    flag.copy_from_slice(&bytes[FLAG_OFFSET..RECORD_LEN]);
    let occupied = match i32::from_le_bytes(flag) {
        0 => false,
        1 => true,
        other => {
            return Err(ModusError::corrupt(index, format!("occupancy flag is {other}")));
        }
    };

    Card::from_parts(name, code, occupied).map_err(|err| ModusError::corrupt(index, err.to_string()))
}

/// Read a NUL-terminated string field whose last byte must be NUL.
fn field<'a>(raw: &'a [u8], index: usize, what: &str) -> Result<&'a str> {
    let (last, body) = raw
        .split_last()
        .ok_or_else(|| ModusError::corrupt(index, format!("empty {what} field")))?;
    if *last != 0 {
        return Err(ModusError::corrupt(index, format!("missing {what} terminator")));
    }
    let end = body.iter().position(|&b| b == 0).unwrap_or(body.len());
    std::str::from_utf8(&body[..end])
        .map_err(|_| ModusError::corrupt(index, format!("{what} is not valid UTF-8")))
}
