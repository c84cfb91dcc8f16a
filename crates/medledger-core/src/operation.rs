//! Pending operation descriptors
//!
//! A [`PendingOperation`] exists only while a call is in flight. It is the
//! unit the dispatcher logs and reports status against.

use crate::value::LedgerValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an operation mutates ledger state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Submitted, signed and confirmed
    Write,
    /// Queried directly, no confirmation
    Read,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write => write!(f, "write"),
            Self::Read => write!(f, "read"),
        }
    }
}

/// A single in-flight ledger call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOperation {
    /// Write or read
    pub kind: OperationKind,
    /// Ledger operation name
    pub target: String,
    /// Ordered arguments
    pub arguments: Vec<LedgerValue>,
}

impl PendingOperation {
    /// Describe a write
    pub fn write(target: impl Into<String>, arguments: Vec<LedgerValue>) -> Self {
        Self {
            kind: OperationKind::Write,
            target: target.into(),
            arguments,
        }
    }

    /// Describe a read
    pub fn read(target: impl Into<String>, arguments: Vec<LedgerValue>) -> Self {
        Self {
            kind: OperationKind::Read,
            target: target.into(),
            arguments,
        }
    }
}

impl fmt::Display for PendingOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.target)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, ")")
    }
}
