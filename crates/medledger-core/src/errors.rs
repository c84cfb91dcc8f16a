//! Capability and outcome error taxonomy
//!
//! Two layers of errors exist:
//!
//! - [`CapabilityError`] is what the external wallet and ledger report. It
//!   describes *what went wrong at the capability*.
//! - [`LedgerError`] is the typed failure every session and dispatcher
//!   operation resolves to. It describes *what the caller should show*.
//!
//! The session layer translates the former into the latter at its boundary;
//! nothing below it is surfaced to frontends directly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error reported by an external wallet or ledger capability
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    /// The user declined a prompt (account access or signing)
    #[error("user rejected: {message}")]
    UserRejected {
        /// Message supplied by the wallet
        message: String,
    },

    /// The ledger refused the operation
    #[error("reverted: {}", reason.as_deref().unwrap_or("no reason given"))]
    Reverted {
        /// Ledger-supplied revert reason, if any
        reason: Option<String>,
    },

    /// Transport-level failure reaching the capability
    #[error("transport error: {message}")]
    Transport {
        /// Message describing the transport issue
        message: String,
    },

    /// Any other provider-side failure
    #[error("provider error: {message}")]
    Provider {
        /// Message supplied by the provider
        message: String,
    },
}

impl CapabilityError {
    /// Create a user rejection
    pub fn user_rejected(message: impl Into<String>) -> Self {
        Self::UserRejected {
            message: message.into(),
        }
    }

    /// Create a revert with a reason
    pub fn reverted(reason: impl Into<String>) -> Self {
        Self::Reverted {
            reason: Some(reason.into()),
        }
    }

    /// Create a revert without a reason
    pub fn reverted_silently() -> Self {
        Self::Reverted { reason: None }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a provider error
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }
}

/// Originating cause of a failed outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureCause {
    /// No wallet present
    CapabilityUnavailable,
    /// User declined or capability failed during connect
    ConnectionRejected,
    /// Operation attempted with no bound session
    SessionAbsent,
    /// User declined signing a write
    Rejected,
    /// Ledger refused the operation
    Reverted,
    /// Transport-level failure reaching the capability
    NetworkFailure,
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::CapabilityUnavailable => "capability unavailable",
            Self::ConnectionRejected => "connection rejected",
            Self::SessionAbsent => "session absent",
            Self::Rejected => "rejected",
            Self::Reverted => "reverted",
            Self::NetworkFailure => "network failure",
        };
        write!(f, "{label}")
    }
}

/// Typed failure of a session or dispatcher operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum LedgerError {
    /// No wallet capability is present
    #[error("No wallet available: install a wallet extension to connect")]
    CapabilityUnavailable,

    /// Connection was declined or failed
    #[error("Connection rejected: {message}")]
    ConnectionRejected {
        /// Message describing why the connection failed
        message: String,
    },

    /// No session is bound
    #[error("Connect wallet first")]
    SessionAbsent,

    /// Signing was declined
    #[error("Transaction rejected: {message}")]
    Rejected {
        /// Message supplied by the wallet
        message: String,
    },

    /// The ledger refused the operation
    #[error("Transaction failed: {}", reason.as_deref().unwrap_or("transaction failed"))]
    Reverted {
        /// Ledger-supplied reason, if any
        reason: Option<String>,
    },

    /// Transport-level failure
    #[error("Network error: {message}")]
    NetworkFailure {
        /// Message describing the transport issue
        message: String,
    },
}

impl LedgerError {
    /// Create a connection rejection
    pub fn connection_rejected(message: impl Into<String>) -> Self {
        Self::ConnectionRejected {
            message: message.into(),
        }
    }

    /// Create a signing rejection
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Create a revert carrying the ledger's reason
    pub fn reverted(reason: impl Into<String>) -> Self {
        Self::Reverted {
            reason: Some(reason.into()),
        }
    }

    /// Create a revert with no reason (generic failure)
    pub fn reverted_generic() -> Self {
        Self::Reverted { reason: None }
    }

    /// Create a network failure
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkFailure {
            message: message.into(),
        }
    }

    /// Originating cause of this failure
    pub fn cause(&self) -> FailureCause {
        match self {
            Self::CapabilityUnavailable => FailureCause::CapabilityUnavailable,
            Self::ConnectionRejected { .. } => FailureCause::ConnectionRejected,
            Self::SessionAbsent => FailureCause::SessionAbsent,
            Self::Rejected { .. } => FailureCause::Rejected,
            Self::Reverted { .. } => FailureCause::Reverted,
            Self::NetworkFailure { .. } => FailureCause::NetworkFailure,
        }
    }

    /// Revert reason, when the ledger supplied one
    pub fn revert_reason(&self) -> Option<&str> {
        match self {
            Self::Reverted { reason } => reason.as_deref(),
            _ => None,
        }
    }
}

/// Typed result of every session, dispatch and lookup operation
pub type Outcome<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverted_display_with_and_without_reason() {
        assert_eq!(
            LedgerError::reverted("not owner").to_string(),
            "Transaction failed: not owner"
        );
        assert_eq!(
            LedgerError::reverted_generic().to_string(),
            "Transaction failed: transaction failed"
        );
    }

    #[test]
    fn test_cause_mapping() {
        assert_eq!(
            LedgerError::CapabilityUnavailable.cause(),
            FailureCause::CapabilityUnavailable
        );
        assert_eq!(
            LedgerError::connection_rejected("denied").cause(),
            FailureCause::ConnectionRejected
        );
        assert_eq!(LedgerError::SessionAbsent.cause(), FailureCause::SessionAbsent);
        assert_eq!(LedgerError::rejected("no").cause(), FailureCause::Rejected);
        assert_eq!(LedgerError::reverted("x").cause(), FailureCause::Reverted);
        assert_eq!(
            LedgerError::network("offline").cause(),
            FailureCause::NetworkFailure
        );
    }

    #[test]
    fn test_revert_reason() {
        assert_eq!(LedgerError::reverted("not owner").revert_reason(), Some("not owner"));
        assert_eq!(LedgerError::reverted_generic().revert_reason(), None);
        assert_eq!(LedgerError::SessionAbsent.revert_reason(), None);
    }

    #[test]
    fn test_capability_error_display() {
        assert_eq!(
            CapabilityError::user_rejected("User denied transaction signature").to_string(),
            "user rejected: User denied transaction signature"
        );
        assert_eq!(
            CapabilityError::reverted_silently().to_string(),
            "reverted: no reason given"
        );
    }
}
