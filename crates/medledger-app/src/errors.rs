//! Categorized application errors
//!
//! Provides frontend-facing classification of [`LedgerError`]s:
//! - Categorized error handling (session vs user action vs ledger vs network)
//! - Appropriate toast severity routing
//! - Recovery hints for user-actionable errors

use medledger_core::{FailureCause, LedgerError};
use std::fmt;

/// Toast severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastLevel {
    /// Informational
    Info,
    /// Completed successfully
    Success,
    /// Needs attention, usually recoverable
    Warning,
    /// Operation failed
    Error,
}

/// High-level error categories for frontend error handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// No wallet or no bound session (correctable by connecting)
    Session,
    /// The user declined a prompt
    UserAction,
    /// The ledger refused the operation
    Ledger,
    /// Transport failures (often transient)
    Network,
}

impl ErrorCategory {
    /// Classify a ledger error
    pub fn of(error: &LedgerError) -> Self {
        match error.cause() {
            FailureCause::CapabilityUnavailable | FailureCause::SessionAbsent => Self::Session,
            FailureCause::ConnectionRejected | FailureCause::Rejected => Self::UserAction,
            FailureCause::Reverted => Self::Ledger,
            FailureCause::NetworkFailure => Self::Network,
        }
    }

    /// Check if this error category is user-correctable.
    #[must_use]
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Session | Self::UserAction)
    }

    /// Check if this error category is likely transient.
    ///
    /// Transient errors may resolve when the user tries again. Writes are
    /// never retried automatically.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network)
    }

    /// Get the appropriate toast severity for this category.
    #[must_use]
    pub fn toast_severity(&self) -> ToastLevel {
        match self {
            Self::Session => ToastLevel::Warning,
            Self::UserAction => ToastLevel::Info,
            Self::Ledger => ToastLevel::Error,
            Self::Network => ToastLevel::Warning,
        }
    }

    /// Get a short label for this category.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Session => "Wallet",
            Self::UserAction => "Cancelled",
            Self::Ledger => "Ledger",
            Self::Network => "Network",
        }
    }

    /// Get a hint for the user on how to resolve this category of error.
    #[must_use]
    pub fn resolution_hint(&self) -> &'static str {
        match self {
            Self::Session => "Connect your wallet and try again",
            Self::UserAction => "Approve the request in your wallet to continue",
            Self::Ledger => "The ledger refused this operation; check your role and inputs",
            Self::Network => "Check your network connection and retry",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Short code for a ledger error, stable across releases
pub fn error_code(error: &LedgerError) -> &'static str {
    match error.cause() {
        FailureCause::CapabilityUnavailable => "WALLET_UNAVAILABLE",
        FailureCause::ConnectionRejected => "WALLET_REJECTED",
        FailureCause::SessionAbsent => "SESSION_ABSENT",
        FailureCause::Rejected => "TX_REJECTED",
        FailureCause::Reverted => "TX_REVERTED",
        FailureCause::NetworkFailure => "NET_ERROR",
    }
}
