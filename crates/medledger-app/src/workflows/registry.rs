//! Registry Workflow - Registration, Access and Status Writes
//!
//! Every function here submits one write and resolves once the ledger has
//! confirmed or refused it.

use crate::dispatch::CallDispatcher;
use medledger_core::{LedgerValue, Outcome, Receipt, WalletAddress};

fn person(address: WalletAddress, name: &str, date_of_birth: u64) -> Vec<LedgerValue> {
    vec![address.into(), name.into(), date_of_birth.into()]
}

/// Register a central assistant (owner only)
pub async fn add_central_assistant(
    dispatcher: &CallDispatcher,
    assistant: WalletAddress,
    name: &str,
    date_of_birth: u64,
) -> Outcome<Receipt> {
    dispatcher
        .submit_write("addCentralAssistant", person(assistant, name, date_of_birth))
        .await
}

/// Register a doctor
pub async fn add_doctor(
    dispatcher: &CallDispatcher,
    doctor: WalletAddress,
    name: &str,
    date_of_birth: u64,
) -> Outcome<Receipt> {
    dispatcher
        .submit_write("addDoctor", person(doctor, name, date_of_birth))
        .await
}

/// Register an assistant working for the calling doctor
pub async fn add_doctor_assistant(
    dispatcher: &CallDispatcher,
    assistant: WalletAddress,
    name: &str,
    date_of_birth: u64,
) -> Outcome<Receipt> {
    dispatcher
        .submit_write("addDoctorAssistant", person(assistant, name, date_of_birth))
        .await
}

/// Register a patient
pub async fn add_patient(
    dispatcher: &CallDispatcher,
    patient: WalletAddress,
    name: &str,
    date_of_birth: u64,
) -> Outcome<Receipt> {
    dispatcher
        .submit_write("addPatient", person(patient, name, date_of_birth))
        .await
}

/// Append a medical record to a patient's history
pub async fn add_record(
    dispatcher: &CallDispatcher,
    patient: WalletAddress,
    diagnosis: &str,
    treatment: &str,
) -> Outcome<Receipt> {
    dispatcher
        .submit_write(
            "addRecord",
            vec![patient.into(), diagnosis.into(), treatment.into()],
        )
        .await
}

/// Let a doctor read the calling patient's records
pub async fn grant_access(dispatcher: &CallDispatcher, doctor: WalletAddress) -> Outcome<Receipt> {
    dispatcher
        .submit_write("grantAccess", vec![doctor.into()])
        .await
}

/// Withdraw a doctor's access to the calling patient's records
pub async fn revoke_access(dispatcher: &CallDispatcher, doctor: WalletAddress) -> Outcome<Receipt> {
    dispatcher
        .submit_write("revokeAccess", vec![doctor.into()])
        .await
}

/// Activate or deactivate a central assistant
pub async fn set_central_assistant_status(
    dispatcher: &CallDispatcher,
    assistant: WalletAddress,
    active: bool,
) -> Outcome<Receipt> {
    dispatcher
        .submit_write(
            "setCentralAssistantStatus",
            vec![assistant.into(), active.into()],
        )
        .await
}

/// Activate or deactivate one of the calling doctor's assistants
pub async fn set_assistant_status(
    dispatcher: &CallDispatcher,
    assistant: WalletAddress,
    active: bool,
) -> Outcome<Receipt> {
    dispatcher
        .submit_write("setAssistantStatus", vec![assistant.into(), active.into()])
        .await
}

/// Mark a record public or private
pub async fn set_record_visibility(
    dispatcher: &CallDispatcher,
    record_id: u64,
    public: bool,
) -> Outcome<Receipt> {
    dispatcher
        .submit_write("setRecordVisibility", vec![record_id.into(), public.into()])
        .await
}
