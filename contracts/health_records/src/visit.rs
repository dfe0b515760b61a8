use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

// ── Storage keys ──────────────────────────────────────────────

pub const VISIT_CTR: Symbol = symbol_short!("VIS_CTR");
const VISIT_RECORD: Symbol = symbol_short!("VISIT");
const VISIT_PATIENT: Symbol = symbol_short!("VIS_PAT");

// ── Types ─────────────────────────────────────────────────────

/// One clinical encounter. Immutable once recorded; there is no update or
/// delete path.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Visit {
    pub id: u64,
    pub patient_id: String,
    pub clinician: Address,
    pub recorded_at: u64,
    pub chief_complaint: String,
    pub diagnosis: String,
    pub notes: String,
    pub transcript: Option<String>,
    pub critical: bool,
}

// ── Storage functions ─────────────────────────────────────────

/// Increments and returns the next visit id.
pub fn increment_visit_counter(env: &Env) -> u64 {
    let current: u64 = env.storage().instance().get(&VISIT_CTR).unwrap_or(0);
    let next = current + 1;
    env.storage().instance().set(&VISIT_CTR, &next);
    next
}

/// Stores a visit and appends it to the patient's history index.
pub fn set_visit(env: &Env, visit: &Visit) {
    let key = (VISIT_RECORD, visit.id);
    env.storage().persistent().set(&key, visit);

    let patient_key = (VISIT_PATIENT, visit.patient_id.clone());
    let mut ids: Vec<u64> = env
        .storage()
        .persistent()
        .get(&patient_key)
        .unwrap_or(Vec::new(env));
    if !ids.contains(visit.id) {
        ids.push_back(visit.id);
        env.storage().persistent().set(&patient_key, &ids);
    }
}

pub fn get_visit(env: &Env, visit_id: u64) -> Option<Visit> {
    let key = (VISIT_RECORD, visit_id);
    env.storage().persistent().get(&key)
}

pub fn patient_visit_ids(env: &Env, patient_id: &String) -> Vec<u64> {
    let key = (VISIT_PATIENT, patient_id.clone());
    env.storage()
        .persistent()
        .get(&key)
        .unwrap_or(Vec::new(env))
}

/// Visits for a patient, newest first. `limit == 0` returns the full
/// history; the recent-window caps shown in dashboards belong to callers.
pub fn list_visits(env: &Env, patient_id: &String, limit: u32) -> Vec<Visit> {
    let ids = patient_visit_ids(env, patient_id);
    let mut visits = Vec::new(env);
    for i in (0..ids.len()).rev() {
        if limit > 0 && visits.len() >= limit {
            break;
        }
        if let Some(id) = ids.get(i) {
            if let Some(visit) = get_visit(env, id) {
                visits.push_back(visit);
            }
        }
    }
    visits
}
