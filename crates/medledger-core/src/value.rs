//! Dynamic ledger values
//!
//! Arguments and results cross the ledger boundary as [`LedgerValue`]s.
//! Argument order and types per operation belong to the external ledger
//! interface; this type only carries them.

use crate::identifiers::WalletAddress;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A value passed to or returned from a ledger operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum LedgerValue {
    /// No return value
    Unit,
    /// Boolean flag
    Bool(bool),
    /// Unsigned integer (ids, dates, counters)
    Uint(u128),
    /// UTF-8 text
    Text(String),
    /// Account identity
    Address(WalletAddress),
    /// Ordered list
    List(Vec<LedgerValue>),
    /// Named fields of a structured result
    Struct(BTreeMap<String, LedgerValue>),
}

impl LedgerValue {
    /// Build a struct value from `(name, value)` pairs
    pub fn record<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, LedgerValue)>,
        K: Into<String>,
    {
        Self::Struct(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Boolean payload, if any
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer payload, if any
    pub fn as_uint(&self) -> Option<u128> {
        match self {
            Self::Uint(n) => Some(*n),
            _ => None,
        }
    }

    /// Text payload, if any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Address payload, if any
    pub fn as_address(&self) -> Option<WalletAddress> {
        match self {
            Self::Address(a) => Some(*a),
            _ => None,
        }
    }

    /// List payload, if any
    pub fn as_list(&self) -> Option<&[LedgerValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Named field of a struct value
    pub fn field(&self, name: &str) -> Option<&LedgerValue> {
        match self {
            Self::Struct(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Short type label for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Bool(_) => "bool",
            Self::Uint(_) => "uint",
            Self::Text(_) => "text",
            Self::Address(_) => "address",
            Self::List(_) => "list",
            Self::Struct(_) => "struct",
        }
    }
}

impl fmt::Display for LedgerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => write!(f, "()"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Address(a) => write!(f, "{a}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Struct(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for LedgerValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u64> for LedgerValue {
    fn from(value: u64) -> Self {
        Self::Uint(u128::from(value))
    }
}

impl From<u128> for LedgerValue {
    fn from(value: u128) -> Self {
        Self::Uint(value)
    }
}

impl From<&str> for LedgerValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for LedgerValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<WalletAddress> for LedgerValue {
    fn from(value: WalletAddress) -> Self {
        Self::Address(value)
    }
}

impl From<Vec<LedgerValue>> for LedgerValue {
    fn from(value: Vec<LedgerValue>) -> Self {
        Self::List(value)
    }
}
