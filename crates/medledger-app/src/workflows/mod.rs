//! # Workflows - Healthcare Ledger Operations
//!
//! Typed call shapes for the medical-records ledger. Each workflow builds the
//! argument list for one named operation and runs it through the
//! [`CallDispatcher`](crate::CallDispatcher); the ledger enforces every
//! business rule (who may register whom, who may read which records).
//!
//! ## Pattern
//!
//! ```rust,ignore
//! let receipt = registry::add_doctor(&dispatcher, doctor, "Dr. X", 19800101).await?;
//! let records = records::get_patient_records(&dispatcher, patient).await;
//! view.apply(&records);
//! ```
//!
//! Writes return the confirmation [`Receipt`](medledger_core::Receipt); reads
//! return decoded domain types. Both return [`Outcome`](medledger_core::Outcome).

pub mod records;
pub mod registry;
