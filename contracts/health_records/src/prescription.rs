use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

// ── Storage keys ──────────────────────────────────────────────

pub const RX_CTR: Symbol = symbol_short!("RX_CTR");
const RX_RECORD: Symbol = symbol_short!("RX");
const RX_PATIENT: Symbol = symbol_short!("RX_PAT");

// ── Types ─────────────────────────────────────────────────────

/// One medication entry on a prescription.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
}

/// A medication order tied to exactly one visit.
///
/// Verification is monotonic: pending → verified, exactly once. The first
/// verifier and timestamp are retained for the life of the record.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Prescription {
    pub id: u64,
    pub visit_id: u64,
    pub patient_id: String,
    pub prescriber: Address,
    pub medications: Vec<Medication>,
    pub instructions: Option<String>,
    pub verified: bool,
    pub verified_by: Option<Address>,
    pub verified_at: Option<u64>,
    pub created_at: u64,
}

// ── Storage functions ─────────────────────────────────────────

/// Increments and returns the next prescription id.
pub fn increment_prescription_counter(env: &Env) -> u64 {
    let current: u64 = env.storage().instance().get(&RX_CTR).unwrap_or(0);
    let next = current + 1;
    env.storage().instance().set(&RX_CTR, &next);
    next
}

/// Stores a prescription and appends it to the patient's history index.
pub fn set_prescription(env: &Env, prescription: &Prescription) {
    let key = (RX_RECORD, prescription.id);
    env.storage().persistent().set(&key, prescription);

    let patient_key = (RX_PATIENT, prescription.patient_id.clone());
    let mut ids: Vec<u64> = env
        .storage()
        .persistent()
        .get(&patient_key)
        .unwrap_or(Vec::new(env));
    if !ids.contains(prescription.id) {
        ids.push_back(prescription.id);
        env.storage().persistent().set(&patient_key, &ids);
    }
}

pub fn get_prescription(env: &Env, prescription_id: u64) -> Option<Prescription> {
    let key = (RX_RECORD, prescription_id);
    env.storage().persistent().get(&key)
}

pub fn patient_prescription_ids(env: &Env, patient_id: &String) -> Vec<u64> {
    let key = (RX_PATIENT, patient_id.clone());
    env.storage()
        .persistent()
        .get(&key)
        .unwrap_or(Vec::new(env))
}

/// Prescriptions for a patient, newest first.
pub fn list_prescriptions(env: &Env, patient_id: &String) -> Vec<Prescription> {
    let ids = patient_prescription_ids(env, patient_id);
    let mut prescriptions = Vec::new(env);
    for i in (0..ids.len()).rev() {
        if let Some(id) = ids.get(i) {
            if let Some(prescription) = get_prescription(env, id) {
                prescriptions.push_back(prescription);
            }
        }
    }
    prescriptions
}
