//! In-memory medical-records ledger
//!
//! Implements the healthcare ledger interface closely enough for session and
//! dispatcher tests: role registries, access grants, records, and the
//! sentinel results the real ledger returns for unknown entries. Writes are
//! validated and applied at submission; confirmation can be held back,
//! failed, or left to resolve immediately.

use async_trait::async_trait;
use futures::channel::oneshot;
use medledger_core::{
    CapabilityError, LedgerEffects, LedgerHandle, LedgerValue, PendingTransaction, Receipt,
    SigningIdentity, TxHash, WalletAddress,
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Revert reason for owner-only operations called by anyone else
pub const NOT_OWNER: &str = "not owner";

type Confirmation = Result<(), CapabilityError>;

/// A write observed by the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedCall {
    /// Account that signed the write
    pub signer: WalletAddress,
    /// Operation name
    pub operation: String,
    /// Arguments as submitted
    pub args: Vec<LedgerValue>,
}

#[derive(Debug, Clone)]
struct Person {
    name: String,
    date_of_birth: u64,
}

#[derive(Debug, Clone)]
struct StoredRecord {
    id: u64,
    patient: WalletAddress,
    diagnosis: String,
    treatment: String,
    created_by: WalletAddress,
    public: bool,
}

#[derive(Debug, Clone, Copy)]
struct Assistant {
    doctor: WalletAddress,
    active: bool,
}

#[derive(Default)]
struct LedgerState {
    owner: WalletAddress,
    contract: Option<WalletAddress>,
    profiles: BTreeMap<WalletAddress, Person>,
    central_assistants: BTreeMap<WalletAddress, bool>,
    doctors: Vec<WalletAddress>,
    assistants: BTreeMap<WalletAddress, Assistant>,
    patients: BTreeMap<WalletAddress, WalletAddress>,
    access: BTreeSet<(WalletAddress, WalletAddress)>,
    records: Vec<StoredRecord>,
    next_tx: u64,
    block: u64,
    reject_signing: Option<String>,
    network_down: Option<String>,
    read_overrides: BTreeMap<String, LedgerValue>,
    hold_confirmations: bool,
    held: Vec<oneshot::Sender<Confirmation>>,
    submissions: Vec<SubmittedCall>,
    queries: usize,
    binds: usize,
}

/// Ledger backed by in-memory registries
///
/// Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl InMemoryLedger {
    /// Ledger deployed by `owner`, reachable at any contract address
    pub fn new(owner: WalletAddress) -> Self {
        let ledger = Self::default();
        ledger.state.lock().owner = owner;
        ledger
    }

    /// Only accept binds to `contract`
    pub fn at(self, contract: WalletAddress) -> Self {
        self.state.lock().contract = Some(contract);
        self
    }

    /// Contract owner
    pub fn owner(&self) -> WalletAddress {
        self.state.lock().owner
    }

    /// Reject every signing prompt with `message`
    pub fn reject_signing(&self, message: impl Into<String>) {
        self.state.lock().reject_signing = Some(message.into());
    }

    /// Approve signing prompts again
    pub fn approve_signing(&self) {
        self.state.lock().reject_signing = None;
    }

    /// Fail every call with a transport error
    pub fn disconnect_network(&self, message: impl Into<String>) {
        self.state.lock().network_down = Some(message.into());
    }

    /// Restore the transport
    pub fn reconnect_network(&self) {
        self.state.lock().network_down = None;
    }

    /// Answer every `operation` read with `value`, as a ledger with a
    /// different interface would
    pub fn answer_read(&self, operation: &str, value: LedgerValue) {
        self.state
            .lock()
            .read_overrides
            .insert(operation.to_owned(), value);
    }

    /// Hold confirmations of subsequent writes until released
    pub fn hold_confirmations(&self) {
        self.state.lock().hold_confirmations = true;
    }

    /// Confirm every held write and stop holding
    pub fn release_confirmations(&self) {
        self.resolve_held(Ok(()));
    }

    /// Fail every held write with `error` and stop holding
    pub fn fail_held_confirmations(&self, error: CapabilityError) {
        self.resolve_held(Err(error));
    }

    /// Writes awaiting release
    pub fn held_confirmations(&self) -> usize {
        self.state.lock().held.len()
    }

    /// Writes observed so far, including refused ones
    pub fn submissions(&self) -> Vec<SubmittedCall> {
        self.state.lock().submissions.clone()
    }

    /// Number of reads served
    pub fn query_count(&self) -> usize {
        self.state.lock().queries
    }

    /// Number of successful binds
    pub fn bind_count(&self) -> usize {
        self.state.lock().binds
    }

    /// Register a doctor directly, bypassing signing
    pub fn seed_doctor(&self, doctor: WalletAddress, name: &str, date_of_birth: u64) {
        let mut state = self.state.lock();
        state.profiles.insert(doctor, person(name, date_of_birth));
        if !state.doctors.contains(&doctor) {
            state.doctors.push(doctor);
        }
    }

    /// Register a patient directly, bypassing signing
    pub fn seed_patient(
        &self,
        patient: WalletAddress,
        name: &str,
        date_of_birth: u64,
        primary_doctor: WalletAddress,
    ) {
        let mut state = self.state.lock();
        state.profiles.insert(patient, person(name, date_of_birth));
        state.patients.insert(patient, primary_doctor);
    }

    fn resolve_held(&self, outcome: Confirmation) {
        let held = {
            let mut state = self.state.lock();
            state.hold_confirmations = false;
            std::mem::take(&mut state.held)
        };
        for sender in held {
            let _ = sender.send(outcome.clone());
        }
    }

    fn submit_as(
        &self,
        signer: WalletAddress,
        operation: &str,
        args: &[LedgerValue],
    ) -> Result<InMemoryTransaction, CapabilityError> {
        let mut state = self.state.lock();
        state.submissions.push(SubmittedCall {
            signer,
            operation: operation.to_string(),
            args: args.to_vec(),
        });
        if let Some(message) = &state.network_down {
            return Err(CapabilityError::transport(message.clone()));
        }
        if let Some(message) = &state.reject_signing {
            return Err(CapabilityError::user_rejected(message.clone()));
        }

        state.apply(signer, operation, &Args::new(operation, args))?;

        state.next_tx += 1;
        let tx_hash = TxHash::new(format!("0x{:064x}", state.next_tx));
        let confirmation = if state.hold_confirmations {
            let (sender, receiver) = oneshot::channel();
            state.held.push(sender);
            Some(receiver)
        } else {
            None
        };
        state.block += 1;
        tracing::trace!(operation, tx_hash = %tx_hash, "in-memory ledger accepted write");
        Ok(InMemoryTransaction {
            receipt: Receipt::new(tx_hash, Some(state.block)),
            confirmation: Mutex::new(confirmation),
        })
    }

    fn query_as(
        &self,
        caller: WalletAddress,
        operation: &str,
        args: &[LedgerValue],
    ) -> Result<LedgerValue, CapabilityError> {
        let mut state = self.state.lock();
        state.queries += 1;
        if let Some(message) = &state.network_down {
            return Err(CapabilityError::transport(message.clone()));
        }
        if let Some(value) = state.read_overrides.get(operation) {
            return Ok(value.clone());
        }
        state.read(caller, operation, &Args::new(operation, args))
    }
}

impl std::fmt::Debug for InMemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("InMemoryLedger")
            .field("owner", &state.owner)
            .field("doctors", &state.doctors.len())
            .field("records", &state.records.len())
            .finish_non_exhaustive()
    }
}

fn person(name: &str, date_of_birth: u64) -> Person {
    Person {
        name: name.to_string(),
        date_of_birth,
    }
}

fn revert(reason: &str) -> CapabilityError {
    CapabilityError::reverted(reason)
}

fn ensure(condition: bool, reason: &str) -> Result<(), CapabilityError> {
    if condition {
        Ok(())
    } else {
        Err(revert(reason))
    }
}

/// Positional argument access with provider errors on mismatch
struct Args<'a> {
    operation: &'a str,
    values: &'a [LedgerValue],
}

impl<'a> Args<'a> {
    fn new(operation: &'a str, values: &'a [LedgerValue]) -> Self {
        Self { operation, values }
    }

    fn get<T>(
        &self,
        index: usize,
        expected: &str,
        extract: impl FnOnce(&LedgerValue) -> Option<T>,
    ) -> Result<T, CapabilityError> {
        self.values.get(index).and_then(extract).ok_or_else(|| {
            CapabilityError::provider(format!(
                "invalid argument {index} for {}: expected {expected}",
                self.operation
            ))
        })
    }

    fn address(&self, index: usize) -> Result<WalletAddress, CapabilityError> {
        self.get(index, "address", LedgerValue::as_address)
    }

    fn text(&self, index: usize) -> Result<String, CapabilityError> {
        self.get(index, "text", |v| v.as_text().map(str::to_owned))
    }

    fn uint(&self, index: usize) -> Result<u64, CapabilityError> {
        self.get(index, "uint", |v| {
            v.as_uint().and_then(|n| u64::try_from(n).ok())
        })
    }

    fn flag(&self, index: usize) -> Result<bool, CapabilityError> {
        self.get(index, "bool", LedgerValue::as_bool)
    }
}

impl LedgerState {
    fn is_doctor(&self, account: WalletAddress) -> bool {
        self.doctors.contains(&account)
    }

    fn is_central_assistant(&self, account: WalletAddress) -> bool {
        self.central_assistants.get(&account).copied().unwrap_or(false)
    }

    fn is_active_assistant(&self, account: WalletAddress) -> bool {
        self.assistants.get(&account).is_some_and(|a| a.active)
    }

    fn can_register(&self, account: WalletAddress) -> bool {
        account == self.owner || self.is_central_assistant(account)
    }

    fn apply(
        &mut self,
        caller: WalletAddress,
        operation: &str,
        args: &Args<'_>,
    ) -> Result<(), CapabilityError> {
        match operation {
            "addCentralAssistant" => {
                ensure(caller == self.owner, NOT_OWNER)?;
                let account = args.address(0)?;
                self.profiles
                    .insert(account, person(&args.text(1)?, args.uint(2)?));
                self.central_assistants.insert(account, true);
            }
            "setCentralAssistantStatus" => {
                ensure(caller == self.owner, NOT_OWNER)?;
                let account = args.address(0)?;
                let active = args.flag(1)?;
                let entry = self
                    .central_assistants
                    .get_mut(&account)
                    .ok_or_else(|| revert("not a central assistant"))?;
                *entry = active;
            }
            "addDoctor" => {
                ensure(self.can_register(caller), NOT_OWNER)?;
                let doctor = args.address(0)?;
                ensure(!self.is_doctor(doctor), "doctor already registered")?;
                self.profiles
                    .insert(doctor, person(&args.text(1)?, args.uint(2)?));
                self.doctors.push(doctor);
            }
            "addDoctorAssistant" => {
                ensure(self.is_doctor(caller), "not a doctor")?;
                let assistant = args.address(0)?;
                self.profiles
                    .insert(assistant, person(&args.text(1)?, args.uint(2)?));
                self.assistants.insert(
                    assistant,
                    Assistant {
                        doctor: caller,
                        active: true,
                    },
                );
            }
            "setAssistantStatus" => {
                let assistant = args.address(0)?;
                let active = args.flag(1)?;
                let entry = self
                    .assistants
                    .get_mut(&assistant)
                    .ok_or_else(|| revert("not an assistant"))?;
                ensure(entry.doctor == caller, "not your assistant")?;
                entry.active = active;
            }
            "addPatient" => {
                let primary = if self.is_doctor(caller) {
                    caller
                } else if self.is_active_assistant(caller) {
                    self.assistants
                        .get(&caller)
                        .map_or(WalletAddress::ZERO, |a| a.doctor)
                } else {
                    ensure(self.can_register(caller), NOT_OWNER)?;
                    WalletAddress::ZERO
                };
                let patient = args.address(0)?;
                ensure(!self.patients.contains_key(&patient), "patient already registered")?;
                self.profiles
                    .insert(patient, person(&args.text(1)?, args.uint(2)?));
                self.patients.insert(patient, primary);
                if !primary.is_zero() {
                    self.access.insert((patient, primary));
                }
            }
            "addRecord" => {
                let patient = args.address(0)?;
                ensure(self.patients.contains_key(&patient), "not a patient")?;
                let author_doctor = if self.is_doctor(caller) {
                    caller
                } else if self.is_active_assistant(caller) {
                    self.assistants
                        .get(&caller)
                        .map_or(WalletAddress::ZERO, |a| a.doctor)
                } else {
                    return Err(revert("not a doctor"));
                };
                ensure(self.access.contains(&(patient, author_doctor)), "Access denied")?;
                let id = self.records.len() as u64 + 1;
                self.records.push(StoredRecord {
                    id,
                    patient,
                    diagnosis: args.text(1)?,
                    treatment: args.text(2)?,
                    created_by: caller,
                    public: false,
                });
            }
            "grantAccess" | "revokeAccess" => {
                ensure(self.patients.contains_key(&caller), "not a patient")?;
                let doctor = args.address(0)?;
                ensure(self.is_doctor(doctor), "not a doctor")?;
                if operation == "grantAccess" {
                    self.access.insert((caller, doctor));
                } else {
                    self.access.remove(&(caller, doctor));
                }
            }
            "setRecordVisibility" => {
                let id = args.uint(0)?;
                let public = args.flag(1)?;
                let record = self
                    .records
                    .iter_mut()
                    .find(|r| r.id == id)
                    .ok_or_else(|| revert("record not found"))?;
                ensure(record.patient == caller, "not your record")?;
                record.public = public;
            }
            other => {
                return Err(CapabilityError::provider(format!(
                    "no such write operation: {other}"
                )))
            }
        }
        Ok(())
    }

    fn read(
        &self,
        caller: WalletAddress,
        operation: &str,
        args: &Args<'_>,
    ) -> Result<LedgerValue, CapabilityError> {
        let value = match operation {
            "owner" => LedgerValue::Address(self.owner),
            "isDoctor" => LedgerValue::Bool(self.is_doctor(args.address(0)?)),
            "isDoctorAssistant" => LedgerValue::Bool(self.assistants.contains_key(&args.address(0)?)),
            "isPatient" => LedgerValue::Bool(self.patients.contains_key(&args.address(0)?)),
            "profiles" => {
                let account = args.address(0)?;
                match self.profiles.get(&account) {
                    Some(p) => profile_value(&p.name, p.date_of_birth, true),
                    None => profile_value("", 0, false),
                }
            }
            "patientInfo" => {
                let account = args.address(0)?;
                match self.patients.get(&account) {
                    Some(doctor) => LedgerValue::record([
                        ("patientAddress", LedgerValue::Address(account)),
                        ("primaryDoctor", LedgerValue::Address(*doctor)),
                    ]),
                    None => LedgerValue::record([
                        ("patientAddress", LedgerValue::Address(WalletAddress::ZERO)),
                        ("primaryDoctor", LedgerValue::Address(WalletAddress::ZERO)),
                    ]),
                }
            }
            "doctorAssistantInfo" => {
                let account = args.address(0)?;
                let (assistant, info) = match self.assistants.get(&account) {
                    Some(info) => (account, *info),
                    None => (
                        WalletAddress::ZERO,
                        Assistant {
                            doctor: WalletAddress::ZERO,
                            active: false,
                        },
                    ),
                };
                LedgerValue::record([
                    ("assistantAddress", LedgerValue::Address(assistant)),
                    ("assignedDoctor", LedgerValue::Address(info.doctor)),
                    ("isActive", LedgerValue::Bool(info.active)),
                ])
            }
            "getMyRecords" => {
                ensure(self.patients.contains_key(&caller), "not a patient")?;
                self.records_of(caller)
            }
            "getPatientRecords" => {
                let patient = args.address(0)?;
                let doctor = if self.is_active_assistant(caller) {
                    self.assistants
                        .get(&caller)
                        .map_or(WalletAddress::ZERO, |a| a.doctor)
                } else {
                    caller
                };
                ensure(self.access.contains(&(patient, doctor)), "Access denied")?;
                self.records_of(patient)
            }
            "getAnyPatientRecords" => {
                ensure(self.can_register(caller), NOT_OWNER)?;
                self.records_of(args.address(0)?)
            }
            "getAllDoctors" => addresses(self.doctors.iter().copied()),
            "getAllDoctorAssistants" => addresses(self.assistants.keys().copied()),
            "getMyAssistants" => addresses(
                self.assistants
                    .iter()
                    .filter(|(_, a)| a.doctor == caller)
                    .map(|(account, _)| *account),
            ),
            other => {
                return Err(CapabilityError::provider(format!(
                    "no such read operation: {other}"
                )))
            }
        };
        Ok(value)
    }

    fn records_of(&self, patient: WalletAddress) -> LedgerValue {
        LedgerValue::List(
            self.records
                .iter()
                .filter(|r| r.patient == patient)
                .map(|r| {
                    LedgerValue::record([
                        ("recordId", LedgerValue::from(r.id)),
                        ("diagnosis", LedgerValue::from(r.diagnosis.as_str())),
                        ("treatment", LedgerValue::from(r.treatment.as_str())),
                        ("createdBy", LedgerValue::Address(r.created_by)),
                        ("isPublic", LedgerValue::Bool(r.public)),
                    ])
                })
                .collect(),
        )
    }
}

fn profile_value(name: &str, date_of_birth: u64, exists: bool) -> LedgerValue {
    LedgerValue::record([
        ("name", LedgerValue::from(name)),
        ("dateOfBirth", LedgerValue::from(date_of_birth)),
        ("exists", LedgerValue::Bool(exists)),
    ])
}

fn addresses(accounts: impl Iterator<Item = WalletAddress>) -> LedgerValue {
    LedgerValue::List(accounts.map(LedgerValue::Address).collect())
}

impl LedgerEffects for InMemoryLedger {
    fn bind(
        &self,
        contract: WalletAddress,
        signer: &SigningIdentity,
    ) -> Result<Arc<dyn LedgerHandle>, CapabilityError> {
        let mut state = self.state.lock();
        if let Some(deployed) = state.contract {
            if deployed != contract {
                return Err(CapabilityError::provider(format!(
                    "no contract deployed at {contract}"
                )));
            }
        }
        state.binds += 1;
        Ok(Arc::new(BoundLedger {
            ledger: self.clone(),
            signer: signer.clone(),
        }))
    }
}

/// Ledger bound to one signing identity
struct BoundLedger {
    ledger: InMemoryLedger,
    signer: SigningIdentity,
}

#[async_trait]
impl LedgerHandle for BoundLedger {
    fn signer(&self) -> &SigningIdentity {
        &self.signer
    }

    async fn submit(
        &self,
        operation: &str,
        args: &[LedgerValue],
    ) -> Result<Box<dyn PendingTransaction>, CapabilityError> {
        let transaction = self
            .ledger
            .submit_as(self.signer.address(), operation, args)?;
        Ok(Box::new(transaction))
    }

    async fn query(
        &self,
        operation: &str,
        args: &[LedgerValue],
    ) -> Result<LedgerValue, CapabilityError> {
        self.ledger.query_as(self.signer.address(), operation, args)
    }
}

/// Write accepted by the in-memory ledger
struct InMemoryTransaction {
    receipt: Receipt,
    confirmation: Mutex<Option<oneshot::Receiver<Confirmation>>>,
}

#[async_trait]
impl PendingTransaction for InMemoryTransaction {
    fn tx_hash(&self) -> &TxHash {
        &self.receipt.tx_hash
    }

    async fn await_confirmation(&self) -> Result<Receipt, CapabilityError> {
        let held = self.confirmation.lock().take();
        if let Some(held) = held {
            match held.await {
                Ok(Ok(())) => {}
                Ok(Err(error)) => return Err(error),
                Err(_) => return Err(CapabilityError::transport("ledger dropped the transaction")),
            }
        }
        Ok(self.receipt.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn addr(last: u8) -> WalletAddress {
        let mut bytes = [0u8; 20];
        bytes[19] = last;
        WalletAddress::from_bytes(bytes)
    }

    fn handle(ledger: &InMemoryLedger, account: WalletAddress) -> Arc<dyn LedgerHandle> {
        ledger
            .bind(WalletAddress::ZERO, &SigningIdentity::new(account, "test"))
            .unwrap()
    }

    fn doctor_args(doctor: WalletAddress) -> Vec<LedgerValue> {
        vec![doctor.into(), "Dr. X".into(), 19_800_101u64.into()]
    }

    #[tokio::test]
    async fn test_owner_only_write_reverts_for_others() {
        let ledger = InMemoryLedger::new(addr(1));
        let stranger = handle(&ledger, addr(9));

        let result = stranger.submit("addDoctor", &doctor_args(addr(2))).await.map(|_| ());
        assert_matches!(result, Err(CapabilityError::Reverted { reason: Some(r) }) if r == NOT_OWNER);
        assert_eq!(ledger.submissions().len(), 1);
    }

    #[tokio::test]
    async fn test_owner_registers_doctor() {
        let ledger = InMemoryLedger::new(addr(1));
        let owner = handle(&ledger, addr(1));

        let pending = owner.submit("addDoctor", &doctor_args(addr(2))).await.unwrap();
        let receipt = pending.await_confirmation().await.unwrap();
        assert_eq!(&receipt.tx_hash, pending.tx_hash());

        let is_doctor = owner.query("isDoctor", &[addr(2).into()]).await.unwrap();
        assert_eq!(is_doctor, LedgerValue::Bool(true));
    }

    #[tokio::test]
    async fn test_unknown_entries_return_sentinels() {
        let ledger = InMemoryLedger::new(addr(1));
        let caller = handle(&ledger, addr(5));

        let profile = caller.query("profiles", &[addr(7).into()]).await.unwrap();
        assert_eq!(profile.field("exists"), Some(&LedgerValue::Bool(false)));

        let info = caller.query("patientInfo", &[addr(7).into()]).await.unwrap();
        assert_eq!(
            info.field("patientAddress"),
            Some(&LedgerValue::Address(WalletAddress::ZERO))
        );
    }

    #[tokio::test]
    async fn test_answered_read_replaces_registry() {
        let ledger = InMemoryLedger::new(addr(1));
        ledger.answer_read("isDoctor", LedgerValue::from(1u64));
        let caller = handle(&ledger, addr(5));

        assert_eq!(
            caller.query("isDoctor", &[addr(2).into()]).await.unwrap(),
            LedgerValue::from(1u64)
        );
        assert_eq!(
            caller.query("isPatient", &[addr(2).into()]).await.unwrap(),
            LedgerValue::Bool(false)
        );
    }

    #[tokio::test]
    async fn test_held_confirmation_resolves_on_release() {
        let ledger = InMemoryLedger::new(addr(1));
        let owner = handle(&ledger, addr(1));
        ledger.hold_confirmations();

        let pending = owner.submit("addDoctor", &doctor_args(addr(2))).await.unwrap();
        assert_eq!(ledger.held_confirmations(), 1);
        ledger.fail_held_confirmations(CapabilityError::reverted_silently());
        assert_eq!(
            pending.await_confirmation().await,
            Err(CapabilityError::reverted_silently())
        );
    }

    #[tokio::test]
    async fn test_record_access_follows_grants() {
        let ledger = InMemoryLedger::new(addr(1));
        ledger.seed_doctor(addr(2), "Dr. X", 19_800_101);
        ledger.seed_doctor(addr(3), "Dr. Y", 19_750_505);
        ledger.seed_patient(addr(4), "Pat", 19_900_101, addr(2));
        ledger.state.lock().access.insert((addr(4), addr(2)));

        let doctor = handle(&ledger, addr(2));
        let other = handle(&ledger, addr(3));
        doctor
            .submit("addRecord", &[addr(4).into(), "Flu".into(), "Rest".into()])
            .await
            .unwrap();

        let records = doctor.query("getPatientRecords", &[addr(4).into()]).await.unwrap();
        assert_eq!(records.as_list().map(<[LedgerValue]>::len), Some(1));
        assert_matches!(
            other.query("getPatientRecords", &[addr(4).into()]).await,
            Err(CapabilityError::Reverted { .. })
        );
    }

    #[test]
    fn test_bind_rejects_other_contract() {
        let ledger = InMemoryLedger::new(addr(1)).at(addr(0xcc));
        assert!(ledger
            .bind(addr(0xdd), &SigningIdentity::new(addr(1), "test"))
            .is_err());
        assert!(ledger
            .bind(addr(0xcc), &SigningIdentity::new(addr(1), "test"))
            .is_ok());
        assert_eq!(ledger.bind_count(), 1);
    }
}
