//! # Lookup Facade
//!
//! Typed projections over [`CallDispatcher::query_read_with`] for role checks and
//! profile lookups.
//!
//! The ledger represents "no such entry" with a valid-looking default: a
//! profile whose `exists` flag is false, or an info record whose identity
//! field is the zero address. Those sentinels are normalized here to an
//! absent [`LookupResult`] and never surface as populated values.

use crate::decode::{unexpected, Fields};
use crate::dispatch::CallDispatcher;
use medledger_core::{LedgerValue, Outcome, WalletAddress};
use serde::Serialize;

/// Role membership checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleKind {
    /// Registered doctor
    Doctor,
    /// Registered doctor's assistant
    DoctorAssistant,
    /// Registered patient
    Patient,
}

impl RoleKind {
    /// Ledger read operation backing this check
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Doctor => "isDoctor",
            Self::DoctorAssistant => "isDoctorAssistant",
            Self::Patient => "isPatient",
        }
    }
}

/// Structured per-address records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Name and date of birth; absent when `exists` is false
    Profile,
    /// Patient and primary doctor; absent when `patientAddress` is zero
    PatientInfo,
    /// Assistant, assigned doctor and status; absent when `assistantAddress` is zero
    DoctorAssistantInfo,
}

impl RecordKind {
    /// Ledger read operation backing this record
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Profile => "profiles",
            Self::PatientInfo => "patientInfo",
            Self::DoctorAssistantInfo => "doctorAssistantInfo",
        }
    }

    fn is_sentinel(&self, value: &LedgerValue) -> bool {
        if let LedgerValue::Address(address) = value {
            return address.is_zero();
        }
        match self {
            Self::Profile => value.field("exists").and_then(LedgerValue::as_bool) == Some(false),
            Self::PatientInfo => is_zero_field(value, "patientAddress"),
            Self::DoctorAssistantInfo => is_zero_field(value, "assistantAddress"),
        }
    }
}

fn is_zero_field(value: &LedgerValue, name: &str) -> bool {
    value
        .field(name)
        .and_then(LedgerValue::as_address)
        .is_some_and(|address| address.is_zero())
}

/// Sentinel-normalized lookup result
///
/// Present if and only if a value is carried.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LookupResult {
    value: Option<LedgerValue>,
}

impl LookupResult {
    /// No entry
    pub fn absent() -> Self {
        Self { value: None }
    }

    /// A populated entry
    pub fn present(value: LedgerValue) -> Self {
        Self { value: Some(value) }
    }

    /// Whether an entry exists
    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }

    /// The entry, if present
    pub fn value(&self) -> Option<&LedgerValue> {
        self.value.as_ref()
    }

    /// Take the entry, if present
    pub fn into_value(self) -> Option<LedgerValue> {
        self.value
    }
}

/// Registered profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    /// Display name
    pub name: String,
    /// Date of birth as stored by the ledger (e.g. `19800101`)
    pub date_of_birth: u64,
}

/// Patient registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientInfo {
    /// Patient account
    pub patient: WalletAddress,
    /// Primary doctor, if one is assigned
    pub primary_doctor: Option<WalletAddress>,
}

/// Doctor's assistant registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantInfo {
    /// Assistant account
    pub assistant: WalletAddress,
    /// Doctor the assistant works for
    pub assigned_doctor: WalletAddress,
    /// Whether the assistant is currently active
    pub is_active: bool,
}

/// Role and record lookups with sentinel normalization
#[derive(Debug, Clone)]
pub struct LookupFacade {
    dispatcher: CallDispatcher,
}

impl LookupFacade {
    /// Create a facade over `dispatcher`
    pub fn new(dispatcher: CallDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Check whether `address` holds a role
    pub async fn check_role(&self, kind: RoleKind, address: WalletAddress) -> Outcome<bool> {
        let operation = kind.operation();
        self.dispatcher
            .query_read_with(operation, vec![address.into()], |value| {
                value.as_bool().ok_or_else(|| unexpected(operation, &value))
            })
            .await
    }

    /// Fetch a structured record for `address`
    pub async fn fetch_record(
        &self,
        kind: RecordKind,
        address: WalletAddress,
    ) -> Outcome<LookupResult> {
        let value = self.fetch_with(kind, address, Ok).await?;
        Ok(value.map_or_else(LookupResult::absent, LookupResult::present))
    }

    /// Profile of `address`
    pub async fn fetch_profile(&self, address: WalletAddress) -> Outcome<Option<Profile>> {
        let kind = RecordKind::Profile;
        self.fetch_with(kind, address, |value| {
            let fields = Fields::new(kind.operation(), &value)?;
            Ok(Profile {
                name: fields.text("name")?,
                date_of_birth: fields.uint("dateOfBirth")?,
            })
        })
        .await
    }

    /// Patient registration of `address`
    pub async fn fetch_patient_info(&self, address: WalletAddress) -> Outcome<Option<PatientInfo>> {
        let kind = RecordKind::PatientInfo;
        self.fetch_with(kind, address, |value| {
            let fields = Fields::new(kind.operation(), &value)?;
            let primary_doctor = fields.address("primaryDoctor")?;
            Ok(PatientInfo {
                patient: fields.address("patientAddress")?,
                primary_doctor: (!primary_doctor.is_zero()).then_some(primary_doctor),
            })
        })
        .await
    }

    /// Assistant registration of `address`
    pub async fn fetch_assistant_info(
        &self,
        address: WalletAddress,
    ) -> Outcome<Option<AssistantInfo>> {
        let kind = RecordKind::DoctorAssistantInfo;
        self.fetch_with(kind, address, |value| {
            let fields = Fields::new(kind.operation(), &value)?;
            Ok(AssistantInfo {
                assistant: fields.address("assistantAddress")?,
                assigned_doctor: fields.address("assignedDoctor")?,
                is_active: fields.flag("isActive")?,
            })
        })
        .await
    }

    /// Contract owner; a zero owner reads as absent
    pub async fn owner(&self) -> Outcome<Option<WalletAddress>> {
        self.dispatcher
            .query_read_with("owner", Vec::new(), |value| {
                let owner = value
                    .as_address()
                    .ok_or_else(|| unexpected("owner", &value))?;
                Ok((!owner.is_zero()).then_some(owner))
            })
            .await
    }

    /// Read a record, normalize its sentinel and project what remains
    async fn fetch_with<T>(
        &self,
        kind: RecordKind,
        address: WalletAddress,
        project: impl FnOnce(LedgerValue) -> Outcome<T>,
    ) -> Outcome<Option<T>> {
        let operation = kind.operation();
        self.dispatcher
            .query_read_with(operation, vec![address.into()], |value| {
                if kind.is_sentinel(&value) {
                    tracing::debug!(operation, address = %address, "no entry");
                    return Ok(None);
                }
                project(value).map(Some)
            })
            .await
    }
}
