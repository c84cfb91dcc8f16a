//! Account, chain and transaction identifiers
//!
//! Identifiers are opaque at the session layer: they are parsed from and
//! rendered to the hex forms wallets and ledgers exchange, and compared by
//! value. The all-zero [`WalletAddress`] is the ledger's "no such account"
//! sentinel and must never be treated as a populated identity.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Failure to parse a textual account address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressParseError {
    /// Address text was not `0x`-prefixed
    #[error("address must start with 0x")]
    MissingPrefix,
    /// Address did not decode to exactly 20 bytes
    #[error("address must be 20 bytes, got {0}")]
    InvalidLength(usize),
    /// Address contained non-hex characters
    #[error("invalid hex in address: {0}")]
    InvalidHex(String),
}

/// Wallet account identity (20 bytes)
///
/// Displayed as lowercase `0x`-prefixed hex. Parsing is case-insensitive so
/// checksummed addresses from wallets compare equal to lowercase ones.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct WalletAddress([u8; 20]);

impl WalletAddress {
    /// The null-equivalent identity used by the ledger to mean "absent"
    pub const ZERO: WalletAddress = WalletAddress([0u8; 20]);

    /// Create from raw bytes
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Whether this is the zero sentinel
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Shortened form for logs and status lines, e.g. `0x46dd…0dd8`
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}…{}", &full[..6], &full[full.len() - 4..])
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletAddress({self})")
    }
}

impl FromStr for WalletAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex_str = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or(AddressParseError::MissingPrefix)?;
        let bytes = hex::decode(hex_str.to_ascii_lowercase())
            .map_err(|e| AddressParseError::InvalidHex(e.to_string()))?;
        if bytes.len() != 20 {
            return Err(AddressParseError::InvalidLength(bytes.len()));
        }
        let mut array = [0u8; 20];
        array.copy_from_slice(&bytes);
        Ok(Self(array))
    }
}

impl Serialize for WalletAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for WalletAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Chain identifier as reported by the wallet
///
/// Wallets report chain ids as hex quantities (`0x1`); configuration files
/// usually carry decimals. Both spellings are kept verbatim and compared by
/// numeric value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(String);

impl ChainId {
    /// Wrap a reported chain id
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The id as reported
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value, accepting `0x`-prefixed hex or decimal
    pub fn as_u64(&self) -> Option<u64> {
        let raw = self.0.trim();
        match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
            Some(hex_digits) => u64::from_str_radix(hex_digits, 16).ok(),
            None => raw.parse().ok(),
        }
    }
}

impl PartialEq for ChainId {
    fn eq(&self, other: &Self) -> bool {
        match (self.as_u64(), other.as_u64()) {
            (Some(a), Some(b)) => a == b,
            _ => self.0 == other.0,
        }
    }
}

impl Eq for ChainId {}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hash of a submitted write operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    /// Wrap a transaction hash as reported by the ledger
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Hash text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: &str = "0x46dd2d2500d038c89289f8f98d373d6a97080dd8";

    #[test]
    fn test_address_round_trips_through_display() {
        let addr: WalletAddress = CONTRACT.parse().unwrap();
        assert_eq!(addr.to_string(), CONTRACT);
        assert!(!addr.is_zero());
    }

    #[test]
    fn test_address_parse_is_case_insensitive() {
        let lower: WalletAddress = CONTRACT.parse().unwrap();
        let upper: WalletAddress = "0x46DD2D2500D038C89289F8F98D373D6A97080DD8".parse().unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_address_parse_errors() {
        assert_eq!(
            "46dd2d2500d038c89289f8f98d373d6a97080dd8".parse::<WalletAddress>(),
            Err(AddressParseError::MissingPrefix)
        );
        assert_eq!(
            "0x46dd".parse::<WalletAddress>(),
            Err(AddressParseError::InvalidLength(2))
        );
        assert!(matches!(
            "0xzz".parse::<WalletAddress>(),
            Err(AddressParseError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_zero_sentinel() {
        let zero: WalletAddress = "0x0000000000000000000000000000000000000000".parse().unwrap();
        assert_eq!(zero, WalletAddress::ZERO);
        assert!(zero.is_zero());
        assert_eq!(WalletAddress::default(), WalletAddress::ZERO);
    }

    #[test]
    fn test_short_form() {
        let addr: WalletAddress = CONTRACT.parse().unwrap();
        assert_eq!(addr.short(), "0x46dd…0dd8");
    }

    #[test]
    fn test_address_serde_as_string() {
        let addr: WalletAddress = CONTRACT.parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{CONTRACT}\""));
        let back: WalletAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn test_chain_id_compares_numerically() {
        assert_eq!(ChainId::new("0x1"), ChainId::new("1"));
        assert_eq!(ChainId::new("0xaa36a7").as_u64(), Some(11_155_111));
        assert_ne!(ChainId::new("0x1"), ChainId::new("0x5"));
        assert_eq!(ChainId::new("mainnet").as_u64(), None);
    }

    proptest::proptest! {
        #[test]
        fn prop_chain_id_hex_and_decimal_agree(n in proptest::prelude::any::<u64>()) {
            let hex_form = ChainId::new(format!("0x{n:x}"));
            let decimal_form = ChainId::new(n.to_string());
            proptest::prop_assert_eq!(hex_form.as_u64(), Some(n));
            proptest::prop_assert_eq!(hex_form, decimal_form);
        }

        #[test]
        fn prop_address_parse_ignores_case(bytes in proptest::prelude::any::<[u8; 20]>()) {
            let address = WalletAddress::from_bytes(bytes);
            let upper = format!("0x{}", hex::encode_upper(bytes));
            proptest::prop_assert_eq!(upper.parse::<WalletAddress>(), Ok(address));
        }
    }
}
