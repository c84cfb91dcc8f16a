//! Field extraction for structured ledger results
//!
//! A result that does not have the shape the ledger interface promises is
//! reported as a revert naming the operation, never as a panic.

use medledger_core::{LedgerError, LedgerValue, Outcome, WalletAddress};

pub(crate) fn unexpected(operation: &str, value: &LedgerValue) -> LedgerError {
    LedgerError::reverted(format!(
        "unexpected result from {operation}: {}",
        value.type_name()
    ))
}

fn missing(operation: &str, field: &str, expected: &str) -> LedgerError {
    LedgerError::reverted(format!(
        "unexpected result from {operation}: field `{field}` is not a {expected}"
    ))
}

/// Named fields of one struct result
pub(crate) struct Fields<'a> {
    operation: &'a str,
    value: &'a LedgerValue,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(operation: &'a str, value: &'a LedgerValue) -> Outcome<Self> {
        match value {
            LedgerValue::Struct(_) => Ok(Self { operation, value }),
            other => Err(unexpected(operation, other)),
        }
    }

    pub(crate) fn text(&self, name: &str) -> Outcome<String> {
        self.value
            .field(name)
            .and_then(LedgerValue::as_text)
            .map(str::to_owned)
            .ok_or_else(|| missing(self.operation, name, "text"))
    }

    pub(crate) fn address(&self, name: &str) -> Outcome<WalletAddress> {
        self.value
            .field(name)
            .and_then(LedgerValue::as_address)
            .ok_or_else(|| missing(self.operation, name, "address"))
    }

    pub(crate) fn flag(&self, name: &str) -> Outcome<bool> {
        self.value
            .field(name)
            .and_then(LedgerValue::as_bool)
            .ok_or_else(|| missing(self.operation, name, "bool"))
    }

    pub(crate) fn uint(&self, name: &str) -> Outcome<u64> {
        self.value
            .field(name)
            .and_then(LedgerValue::as_uint)
            .and_then(|n| u64::try_from(n).ok())
            .ok_or_else(|| missing(self.operation, name, "64-bit integer"))
    }
}

/// Decode a list result element by element
pub(crate) fn list<T>(
    operation: &str,
    value: &LedgerValue,
    mut decode: impl FnMut(&LedgerValue) -> Outcome<T>,
) -> Outcome<Vec<T>> {
    value
        .as_list()
        .ok_or_else(|| unexpected(operation, value))?
        .iter()
        .map(&mut decode)
        .collect()
}
