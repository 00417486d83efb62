//! DevEUI identifier type.
//!
//! A DevEUI is an 8-byte device identifier. Its full form is the 16-character
//! uppercase hex encoding of all bytes; its short form is a 5-character
//! derivative used to keep a batch free of near-duplicates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::IdParseError;

/// Number of bytes in a DevEUI.
pub const DEV_EUI_LEN: usize = 8;

/// Length of the full-form hex representation.
pub const FULL_FORM_LEN: usize = DEV_EUI_LEN * 2;

/// Mask keeping the low 20 bits (5 hex digits) of the trailing 3 bytes.
const SHORT_FORM_MASK: u32 = 0x000F_FFFF;

/// Number of distinct short forms, and so the largest batch that can be
/// generated without a short-form collision.
pub const MAX_BATCH: usize = 1 << 20;

/// An ordered batch of DevEUIs in generation order.
pub type Batch = Vec<DevEui>;

/// An 8-byte device identifier.
///
/// Ordering follows the raw bytes, which matches lexicographic ordering of
/// the full form.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DevEui([u8; DEV_EUI_LEN]);

impl DevEui {
    /// Create a DevEUI from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; DEV_EUI_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw bytes of this DevEUI.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; DEV_EUI_LEN] {
        &self.0
    }

    /// Derive the short form from the last 3 bytes.
    ///
    /// The hex encoding of the last 3 bytes is 6 characters; the first one is
    /// dropped, leaving the low 20 bits.
    #[must_use]
    pub const fn short_form(&self) -> ShortForm {
        let tail = u32::from_be_bytes([0, self.0[5], self.0[6], self.0[7]]);
        ShortForm(tail & SHORT_FORM_MASK)
    }
}

impl From<[u8; DEV_EUI_LEN]> for DevEui {
    fn from(bytes: [u8; DEV_EUI_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for DevEui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

impl fmt::Debug for DevEui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DevEui({self})")
    }
}

impl FromStr for DevEui {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != FULL_FORM_LEN {
            return Err(IdParseError::InvalidLength(s.len()));
        }

        let mut bytes = [0u8; DEV_EUI_LEN];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|_| IdParseError::InvalidHex(s.to_string()))?;

        Ok(Self(bytes))
    }
}

impl Serialize for DevEui {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DevEui {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The 5-hex-digit short form of a DevEUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShortForm(u32);

impl fmt::Display for ShortForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:05X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_batch_covers_short_form_space() {
        let top = DevEui::from_bytes([0xFF; DEV_EUI_LEN]).short_form();
        assert_eq!(top, ShortForm(SHORT_FORM_MASK));
        assert_eq!(MAX_BATCH, 0x10_0000);
    }

    #[test]
    fn test_short_form() {
        let cases = [
            ([0, 0, 0, 0, 0, 0, 0, 0], "00000"),
            ([0xFF; 8], "FFFFF"),
            ([0, 0, 0, 0, 0, 0x7F, 0xFF, 0xFF], "FFFFF"),
            ([0, 0, 0, 0, 0, 0x7F, 0x7F, 0x7F], "F7F7F"),
            ([0xAB, 0xCD, 0, 0, 0, 0x12, 0x34, 0x56], "23456"),
        ];

        for (bytes, want) in cases {
            assert_eq!(DevEui::from_bytes(bytes).short_form().to_string(), want);
        }
    }

    #[test]
    fn test_short_form_ignores_leading_bytes() {
        let a = DevEui::from_bytes([1, 2, 3, 4, 5, 0x0A, 0xBC, 0xDE]);
        let b = DevEui::from_bytes([9, 9, 9, 9, 9, 0xFA, 0xBC, 0xDE]);
        assert_eq!(a.short_form(), b.short_form());
    }

    #[test]
    fn test_display_full_form() {
        let eui = DevEui::from_bytes([0, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(eui.to_string(), "00000000FFFFFFFF");
    }

    #[test]
    fn test_parse_round_trip() {
        let eui: DevEui = "DEADBEEFDEADBEEF".parse().unwrap();
        assert_eq!(
            eui.as_bytes(),
            &[0xDE, 0xAD, 0xBE, 0xEF, 0xDE, 0xAD, 0xBE, 0xEF]
        );
        assert_eq!(eui.to_string(), "DEADBEEFDEADBEEF");
    }

    #[test]
    fn test_parse_lowercase_normalises() {
        let eui: DevEui = "deadbeef00000001".parse().unwrap();
        assert_eq!(eui.to_string(), "DEADBEEF00000001");
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(matches!(
            "DEADBEEF".parse::<DevEui>(),
            Err(IdParseError::InvalidLength(8))
        ));
        assert!(matches!(
            "DEADBEEFDEADBEEF00".parse::<DevEui>(),
            Err(IdParseError::InvalidLength(18))
        ));
        assert!(matches!(
            "".parse::<DevEui>(),
            Err(IdParseError::InvalidLength(0))
        ));
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        assert!(matches!(
            "DEADBEEFDEADBEEG".parse::<DevEui>(),
            Err(IdParseError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_ordering_matches_full_form() {
        let mut euis: Vec<DevEui> = ["F9F319F764C1036C", "2D1596B0D99D7732", "2D1596B0D99D7731"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        euis.sort();

        let strings: Vec<String> = euis.iter().map(ToString::to_string).collect();
        let mut expected = strings.clone();
        expected.sort();
        assert_eq!(strings, expected);
    }

    #[test]
    fn test_serde_as_string() {
        let eui: DevEui = "AAAAAAAAFFFFFFFF".parse().unwrap();
        let json = serde_json::to_string(&eui).unwrap();
        assert_eq!(json, "\"AAAAAAAAFFFFFFFF\"");

        let back: DevEui = serde_json::from_str(&json).unwrap();
        assert_eq!(back, eui);

        assert!(serde_json::from_str::<DevEui>("\"XYZ\"").is_err());
    }
}
