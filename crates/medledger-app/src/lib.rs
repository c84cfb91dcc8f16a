//! # Medledger App - Portable Session Core
//!
//! Headless core shared by every Medledger frontend. It owns the wallet
//! session and mediates every call to the medical-records ledger; it has no
//! UI and reaches wallets, ledgers and storage only through the effect traits
//! of `medledger-core`.
//!
//! ## Components
//!
//! - [`SessionManager`]: connect, silent restore, wallet event reconciliation
//! - [`CallDispatcher`]: submit → confirm → report for writes, query → report
//!   for reads, with uniform failure translation
//! - [`LookupFacade`]: role checks and record lookups with sentinel
//!   normalization
//! - [`workflows`]: typed call shapes for the healthcare operations
//!
//! ## Usage
//!
//! ```rust,ignore
//! let core = AppCore::new(AppConfig::default(), wallet, ledger, storage, status);
//! if let Some(events) = core.start().await {
//!     let session = Arc::clone(core.session());
//!     spawn_local(async move { session.run_events(events).await });
//! }
//! core.session().connect().await?;
//! workflows::registry::add_doctor(core.dispatcher(), doctor, "Dr. X", 19800101).await?;
//! ```

#![forbid(unsafe_code)]

pub mod app;
pub mod config;
mod decode;
pub mod dispatch;
pub mod errors;
pub mod lookup;
pub mod session;
pub mod views;
pub mod workflows;

pub use crate::app::AppCore;
pub use crate::config::{AppConfig, ConfigError, DEFAULT_CONTRACT_ADDRESS, DEFAULT_PERSISTENCE_KEY};
pub use crate::dispatch::CallDispatcher;
pub use crate::errors::{error_code, ErrorCategory, ToastLevel};
pub use crate::lookup::{
    AssistantInfo, LookupFacade, LookupResult, PatientInfo, Profile, RecordKind, RoleKind,
};
pub use crate::session::{
    ConnectionState, PersistedFlag, Session, SessionBinding, SessionManager, SessionSnapshot,
};
pub use crate::views::ResultSlot;
pub use crate::workflows::records::MedicalRecord;

pub use medledger_core::{LedgerError, LedgerValue, Outcome, Receipt, WalletAddress};
