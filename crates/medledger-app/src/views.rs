//! Result views
//!
//! A [`ResultSlot`] holds the last successful result of a read for display.
//! A failed read clears it, so a frontend never shows a stale value next to
//! an error.

use futures_signals::signal::{Mutable, Signal};
use medledger_core::Outcome;

/// Latest result of a repeated read
#[derive(Debug)]
pub struct ResultSlot<T> {
    value: Mutable<Option<T>>,
}

impl<T> Default for ResultSlot<T> {
    fn default() -> Self {
        Self {
            value: Mutable::new(None),
        }
    }
}

impl<T: Clone> ResultSlot<T> {
    /// Empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a successful value, or clear on failure
    pub fn apply(&self, outcome: &Outcome<T>) {
        match outcome {
            Ok(value) => self.value.set(Some(value.clone())),
            Err(_) => self.value.set(None),
        }
    }

    /// Current value
    pub fn get_cloned(&self) -> Option<T> {
        self.value.get_cloned()
    }

    /// Empty the slot
    pub fn clear(&self) {
        self.value.set(None);
    }

    /// Signal of the slot's value
    pub fn signal_cloned(&self) -> impl Signal<Item = Option<T>> {
        self.value.signal_cloned()
    }
}

impl<T> Clone for ResultSlot<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
        }
    }
}
