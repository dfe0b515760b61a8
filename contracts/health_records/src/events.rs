use crate::Role;
use soroban_sdk::{symbol_short, Address, Env, String};

/// Event published when the contract is initialized.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub timestamp: u64,
}

/// Event published when a new user is registered.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserRegisteredEvent {
    pub user: Address,
    pub role: Role,
    pub name: String,
    pub timestamp: u64,
}

/// Event published when a patient record is created and a permanent health
/// id assigned.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatientRegisteredEvent {
    pub health_id: String,
    pub account: Address,
    pub timestamp: u64,
}

/// Event published when a clinician profile is created.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClinicianRegisteredEvent {
    pub clinician: Address,
    pub license_number: String,
    pub timestamp: u64,
}

/// Event published when an access token is issued. The token value itself
/// stays out of the event stream; only the numeric id is exposed.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenIssuedEvent {
    pub token_id: u64,
    pub patient_id: String,
    pub expires_at: u64,
    pub timestamp: u64,
}

/// Event published when an access token is explicitly deactivated.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenDeactivatedEvent {
    pub token_id: u64,
    pub patient_id: String,
    pub timestamp: u64,
}

/// Event published when a visit is appended to a patient's ledger.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VisitRecordedEvent {
    pub visit_id: u64,
    pub patient_id: String,
    pub clinician: Address,
    pub critical: bool,
    pub timestamp: u64,
}

/// Event published when a prescription is written against a visit.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrescriptionAddedEvent {
    pub prescription_id: u64,
    pub visit_id: u64,
    pub patient_id: String,
    pub prescriber: Address,
    pub timestamp: u64,
}

/// Event published on the pending → verified transition of a prescription.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrescriptionVerifiedEvent {
    pub prescription_id: u64,
    pub verifier: Address,
    pub timestamp: u64,
}

pub fn publish_initialized(env: &Env, admin: Address) {
    let topics = (symbol_short!("INIT"),);
    let data = InitializedEvent {
        admin,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_user_registered(env: &Env, user: Address, role: Role, name: String) {
    let topics = (symbol_short!("USR_REG"), user.clone());
    let data = UserRegisteredEvent {
        user,
        role,
        name,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_patient_registered(env: &Env, health_id: String, account: Address) {
    let topics = (symbol_short!("PAT_REG"), account.clone());
    let data = PatientRegisteredEvent {
        health_id,
        account,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_clinician_registered(env: &Env, clinician: Address, license_number: String) {
    let topics = (symbol_short!("CLIN_REG"), clinician.clone());
    let data = ClinicianRegisteredEvent {
        clinician,
        license_number,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_token_issued(env: &Env, token_id: u64, patient_id: String, expires_at: u64) {
    let topics = (symbol_short!("TOK_ISS"), patient_id.clone());
    let data = TokenIssuedEvent {
        token_id,
        patient_id,
        expires_at,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_token_deactivated(env: &Env, token_id: u64, patient_id: String) {
    let topics = (symbol_short!("TOK_REV"), patient_id.clone());
    let data = TokenDeactivatedEvent {
        token_id,
        patient_id,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_visit_recorded(
    env: &Env,
    visit_id: u64,
    patient_id: String,
    clinician: Address,
    critical: bool,
) {
    let topics = (symbol_short!("VIS_REC"), patient_id.clone(), clinician.clone());
    let data = VisitRecordedEvent {
        visit_id,
        patient_id,
        clinician,
        critical,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_prescription_added(
    env: &Env,
    prescription_id: u64,
    visit_id: u64,
    patient_id: String,
    prescriber: Address,
) {
    let topics = (symbol_short!("RX_ADD"), patient_id.clone(), prescriber.clone());
    let data = PrescriptionAddedEvent {
        prescription_id,
        visit_id,
        patient_id,
        prescriber,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_prescription_verified(env: &Env, prescription_id: u64, verifier: Address) {
    let topics = (symbol_short!("RX_VER"), verifier.clone());
    let data = PrescriptionVerifiedEvent {
        prescription_id,
        verifier,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}
