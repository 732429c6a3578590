//! Cards - the atomic inventory record.
//!
//! A `Card` holds one captchalogued item: a bounded name, a 7-character
//! captcha code and an occupancy flag. Cards are plain values; containers
//! hand out copies and reset their own slot when a card leaves.
//!
//! ## Empty Cards
//!
//! An unoccupied card always carries the sentinel name [`EMPTY_NAME`] and the
//! sentinel code [`EMPTY_CODE`]. Every lookup miss returns `Card::empty()`.
//!
//! ```
//! use sylladex::core::Card;
//!
//! let card = Card::new("Wand").unwrap();
//! assert!(card.is_occupied());
//! assert_eq!(card.name(), "Wand");
//!
//! let empty = Card::empty();
//! assert!(!empty.is_occupied());
//! assert_eq!(empty.name(), "EMPTY");
//!
//! // Names are bounded, never truncated.
//! assert!(Card::new("Caledfwlch Sword").is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ModusError, Result};

/// Maximum item name length in bytes (the record field is one byte longer).
pub const NAME_MAX: usize = 12;

/// Captcha code length in characters.
pub const CODE_LEN: usize = 7;

/// Name carried by unoccupied cards.
pub const EMPTY_NAME: &str = "EMPTY";

/// Code carried by unoccupied cards.
pub const EMPTY_CODE: &str = "0000000";

/// A validated item name of 1..=12 bytes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

impl ItemName {
    /// Validate and wrap an item name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ModusError::EmptyName);
        }
        if name.len() > NAME_MAX {
            return Err(ModusError::NameTooLong {
                len: name.len(),
                name,
                max: NAME_MAX,
            });
        }
        if name.contains('\0') {
            return Err(ModusError::NulInName);
        }
        Ok(Self(name))
    }

    fn sentinel() -> Self {
        Self(EMPTY_NAME.to_string())
    }

    /// Borrow the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ItemName {
    type Error = ModusError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ItemName> for String {
    fn from(name: ItemName) -> Self {
        name.0
    }
}

impl std::fmt::Display for ItemName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A 7-character alphanumeric captcha code.
///
/// Codes are placeholders: they identify a card but carry no secret.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CaptchaCode(String);

impl CaptchaCode {
    /// Validate and wrap a captcha code.
    pub fn new(code: impl Into<String>) -> Result<Self> {
        let code = code.into();
        if code.len() != CODE_LEN || !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(ModusError::InvalidCode(code));
        }
        Ok(Self(code))
    }

    /// The code carried by empty cards.
    #[must_use]
    pub fn empty() -> Self {
        Self(EMPTY_CODE.to_string())
    }

    /// Derive the placeholder code for an item name.
    ///
    /// Folds the name bytes into a 64-bit value (FNV-1a) and renders the low
    /// bits in base 36. Deterministic, not a hash anyone should rely on.
    #[must_use]
    pub fn for_item(name: &ItemName) -> Self {
        const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

        let mut acc: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in name.as_str().bytes() {
            acc ^= u64::from(byte);
            acc = acc.wrapping_mul(0x0100_0000_01b3);
        }

        let mut code = [b'0'; CODE_LEN];
        for slot in code.iter_mut().rev() {
            *slot = ALPHABET[(acc % 36) as usize];
            acc /= 36;
        }
        Self(code.iter().map(|&b| b as char).collect())
    }

    /// Borrow the code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CaptchaCode {
    type Error = ModusError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<CaptchaCode> for String {
    fn from(code: CaptchaCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for CaptchaCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One inventory record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    name: ItemName,
    code: CaptchaCode,
    occupied: bool,
}

impl Card {
    /// Create an empty (unoccupied) card.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            name: ItemName::sentinel(),
            code: CaptchaCode::empty(),
            occupied: false,
        }
    }

    /// Create an occupied card for `name`, deriving its captcha code.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = ItemName::new(name)?;
        let code = CaptchaCode::for_item(&name);
        Ok(Self {
            name,
            code,
            occupied: true,
        })
    }

    /// Reassemble a card from stored fields.
    ///
    /// An unoccupied card is normalized to the empty sentinel regardless of
    /// the stored name/code.
    pub fn from_parts(name: &str, code: &str, occupied: bool) -> Result<Self> {
        if !occupied {
            return Ok(Self::empty());
        }
        Ok(Self {
            name: ItemName::new(name)?,
            code: CaptchaCode::new(code)?,
            occupied: true,
        })
    }

    /// Item name (the sentinel for empty cards).
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Captcha code.
    #[must_use]
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    /// Whether the card holds an item.
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Check the card against the field bounds.
    ///
    /// Constructed cards are always valid; this exists for cards that came
    /// back through serde, where a corrupt payload could slip through.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        ItemName::new(self.name.as_str()).is_ok() && CaptchaCode::new(self.code.as_str()).is_ok()
    }

    /// Substring match used by deck lookups. Empty cards never match.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        self.occupied && self.name.as_str().contains(query)
    }

    /// Take this card's contents, leaving an empty card in place.
    pub fn take(&mut self) -> Card {
        std::mem::replace(self, Card::empty())
    }
}

impl Default for Card {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.occupied {
            write!(f, "{} [{}]", self.name, self.code)
        } else {
            f.write_str(EMPTY_NAME)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_card() {
        let card = Card::empty();
        assert!(!card.is_occupied());
        assert_eq!(card.name(), EMPTY_NAME);
        assert_eq!(card.code(), EMPTY_CODE);
        assert_eq!(card, Card::default());
    }

    #[test]
    fn test_new_card() {
        let card = Card::new("Dmnd Staff").unwrap();
        assert!(card.is_occupied());
        assert_eq!(card.name(), "Dmnd Staff");
        assert_eq!(card.code().len(), CODE_LEN);
        assert!(card.is_valid());
    }

    #[test]
    fn test_name_bounds() {
        assert!(Card::new("twelve chars").is_ok());
        assert!(matches!(
            Card::new("thirteen char"),
            Err(ModusError::NameTooLong { len: 13, max: 12, .. })
        ));
        assert!(matches!(Card::new(""), Err(ModusError::EmptyName)));
        assert!(matches!(Card::new("a\0b"), Err(ModusError::NulInName)));
    }

    #[test]
    fn test_code_is_deterministic() {
        let a = Card::new("SynOrb").unwrap();
        let b = Card::new("SynOrb").unwrap();
        let c = Card::new("Marbles").unwrap();

        assert_eq!(a.code(), b.code());
        assert_ne!(a.code(), c.code());
        assert!(a.code().bytes().all(|b| b.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_code_validation() {
        assert!(CaptchaCode::new("AB12CD3").is_ok());
        assert!(CaptchaCode::new("AB12CD").is_err());
        assert!(CaptchaCode::new("AB-2CD3").is_err());
    }

    #[test]
    fn test_from_parts() {
        let card = Card::from_parts("Blade", "0000ABC", true).unwrap();
        assert_eq!(card.name(), "Blade");
        assert_eq!(card.code(), "0000ABC");

        // Unoccupied cards collapse to the sentinel.
        let empty = Card::from_parts("junk", "junk", false).unwrap();
        assert_eq!(empty, Card::empty());

        assert!(Card::from_parts("Blade", "bad", true).is_err());
    }

    #[test]
    fn test_matches() {
        let card = Card::new("LotusBlade").unwrap();
        assert!(card.matches("Blade"));
        assert!(card.matches("Lotus"));
        assert!(!card.matches("blade"));
        assert!(!Card::empty().matches("EMP"));
    }

    #[test]
    fn test_take() {
        let mut slot = Card::new("Gem").unwrap();
        let taken = slot.take();
        assert_eq!(taken.name(), "Gem");
        assert_eq!(slot, Card::empty());
    }

    #[test]
    fn test_serialization() {
        let card = Card::new("Incense").unwrap();
        let json = serde_json::to_string(&card).unwrap();
        let deserialized: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(card, deserialized);

        // Validation runs on the way in.
        let bad = json.replace("Incense", "Much Too Long Name");
        assert!(serde_json::from_str::<Card>(&bad).is_err());
    }
}
