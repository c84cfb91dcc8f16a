//! Records Workflow - Record and Directory Reads
//!
//! Reads decode the ledger's list results into domain types. Pair them with a
//! [`ResultSlot`](crate::ResultSlot) to get clear-on-failure display.

use crate::decode::{self, unexpected, Fields};
use crate::dispatch::CallDispatcher;
use medledger_core::{LedgerValue, Outcome, WalletAddress};
use serde::Serialize;

/// One entry of a patient's medical history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MedicalRecord {
    /// Ledger-assigned id
    pub record_id: u64,
    /// Diagnosis text
    pub diagnosis: String,
    /// Treatment text
    pub treatment: String,
    /// Account that created the record
    pub created_by: WalletAddress,
    /// Visibility flag, on ledgers that track it
    pub is_public: Option<bool>,
}

impl MedicalRecord {
    fn decode(operation: &str, value: &LedgerValue) -> Outcome<Self> {
        let fields = Fields::new(operation, value)?;
        Ok(Self {
            record_id: fields.uint("recordId")?,
            diagnosis: fields.text("diagnosis")?,
            treatment: fields.text("treatment")?,
            created_by: fields.address("createdBy")?,
            is_public: value.field("isPublic").and_then(LedgerValue::as_bool),
        })
    }
}

async fn records(
    dispatcher: &CallDispatcher,
    operation: &str,
    args: Vec<LedgerValue>,
) -> Outcome<Vec<MedicalRecord>> {
    dispatcher
        .query_read_with(operation, args, |value| {
            decode::list(operation, &value, |item| MedicalRecord::decode(operation, item))
        })
        .await
}

async fn addresses(dispatcher: &CallDispatcher, operation: &str) -> Outcome<Vec<WalletAddress>> {
    dispatcher
        .query_read_with(operation, Vec::new(), |value| {
            decode::list(operation, &value, |item| {
                item.as_address().ok_or_else(|| unexpected(operation, item))
            })
        })
        .await
}

/// Records of the calling patient
pub async fn get_my_records(dispatcher: &CallDispatcher) -> Outcome<Vec<MedicalRecord>> {
    records(dispatcher, "getMyRecords", Vec::new()).await
}

/// Records of a patient who granted the caller access
pub async fn get_patient_records(
    dispatcher: &CallDispatcher,
    patient: WalletAddress,
) -> Outcome<Vec<MedicalRecord>> {
    records(dispatcher, "getPatientRecords", vec![patient.into()]).await
}

/// Records of any patient, for roles the ledger allows
pub async fn get_any_patient_records(
    dispatcher: &CallDispatcher,
    patient: WalletAddress,
) -> Outcome<Vec<MedicalRecord>> {
    records(dispatcher, "getAnyPatientRecords", vec![patient.into()]).await
}

/// All registered doctors
pub async fn get_all_doctors(dispatcher: &CallDispatcher) -> Outcome<Vec<WalletAddress>> {
    addresses(dispatcher, "getAllDoctors").await
}

/// All registered doctor's assistants
pub async fn get_all_doctor_assistants(
    dispatcher: &CallDispatcher,
) -> Outcome<Vec<WalletAddress>> {
    addresses(dispatcher, "getAllDoctorAssistants").await
}

/// Assistants of the calling doctor
pub async fn get_my_assistants(dispatcher: &CallDispatcher) -> Outcome<Vec<WalletAddress>> {
    addresses(dispatcher, "getMyAssistants").await
}
