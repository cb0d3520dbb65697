//! Bin indices, record column widths, and the bin-space digest.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ValidationError, ValidationResult};

/// Index of a bin in `[0, n_bins)`.
pub type BinIndex = u32;

/// Length in bytes of a bin-space digest.
pub const BIN_DIGEST_LEN: usize = 32;

/// Narrowest unsigned integer width used for bin columns in stored records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinWidth {
    U8,
    U16,
    U32,
}

impl BinWidth {
    /// Pick the narrowest width able to hold the value `n_bins` itself.
    pub fn for_n_bins(n_bins: usize) -> Self {
        if n_bins <= u8::MAX as usize {
            BinWidth::U8
        } else if n_bins <= u16::MAX as usize {
            BinWidth::U16
        } else {
            BinWidth::U32
        }
    }

    /// Width in bytes.
    pub fn bytes(&self) -> usize {
        match self {
            BinWidth::U8 => 1,
            BinWidth::U16 => 2,
            BinWidth::U32 => 4,
        }
    }
}

impl std::fmt::Display for BinWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinWidth::U8 => write!(f, "u8"),
            BinWidth::U16 => write!(f, "u16"),
            BinWidth::U32 => write!(f, "u32"),
        }
    }
}

/// Opaque digest identifying the bin-space definition a run was made with.
///
/// Produced by whoever defines the bins; carried through to the run summary
/// untouched so stale results can be recognised later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BinDigest([u8; BIN_DIGEST_LEN]);

impl BinDigest {
    pub fn new(bytes: [u8; BIN_DIGEST_LEN]) -> Self {
        BinDigest(bytes)
    }

    /// Build a digest from a byte slice of exactly [`BIN_DIGEST_LEN`] bytes.
    pub fn from_slice(bytes: &[u8]) -> ValidationResult<Self> {
        let arr: [u8; BIN_DIGEST_LEN] =
            bytes
                .try_into()
                .map_err(|_| ValidationError::DigestLength {
                    expected: BIN_DIGEST_LEN,
                    actual: bytes.len(),
                })?;
        Ok(BinDigest(arr))
    }

    pub fn as_bytes(&self) -> &[u8; BIN_DIGEST_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Serialize for BinDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BinDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        BinDigest::from_slice(&bytes).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_holds_n_bins() {
        assert_eq!(BinWidth::for_n_bins(3), BinWidth::U8);
        assert_eq!(BinWidth::for_n_bins(255), BinWidth::U8);
        assert_eq!(BinWidth::for_n_bins(256), BinWidth::U16);
        assert_eq!(BinWidth::for_n_bins(65_535), BinWidth::U16);
        assert_eq!(BinWidth::for_n_bins(65_536), BinWidth::U32);
        assert_eq!(BinWidth::U16.bytes(), 2);
    }

    #[test]
    fn test_digest_rejects_wrong_length() {
        let err = BinDigest::from_slice(&[0u8; 20]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DigestLength {
                expected: BIN_DIGEST_LEN,
                actual: 20
            }
        );
    }

    #[test]
    fn test_digest_serializes_as_hex() {
        let mut bytes = [0u8; BIN_DIGEST_LEN];
        bytes[0] = 0xab;
        bytes[31] = 0x01;
        let digest = BinDigest::new(bytes);

        let json = serde_json::to_string(&digest).unwrap();
        assert!(json.starts_with("\"ab00"));
        assert!(json.ends_with("01\""));

        let back: BinDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, digest);
    }

    #[test]
    fn test_digest_deserialize_rejects_short_hex() {
        let result: Result<BinDigest, _> = serde_json::from_str("\"abcd\"");
        assert!(result.is_err());
    }
}
