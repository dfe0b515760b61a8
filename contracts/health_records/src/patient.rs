use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Sex {
    Male,
    Female,
    Other,
}

/// A registered patient. The health id is assigned once and never reissued;
/// the record is amended, never deleted.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Patient {
    pub health_id: String,
    pub account: Address,
    pub date_of_birth: String,
    pub sex: Sex,
    pub blood_group: Option<String>,
    pub emergency_contact: String,
    pub home_address: String,
    pub nearest_police_station: Option<String>,
    pub registered_at: u64,
}

pub fn patient_key(health_id: &String) -> (Symbol, String) {
    (symbol_short!("PATIENT"), health_id.clone())
}

pub fn account_index_key(account: &Address) -> (Symbol, Address) {
    (symbol_short!("PAT_ACCT"), account.clone())
}

pub fn get_patient(env: &Env, health_id: &String) -> Option<Patient> {
    env.storage().persistent().get(&patient_key(health_id))
}

pub fn has_patient(env: &Env, health_id: &String) -> bool {
    env.storage().persistent().has(&patient_key(health_id))
}

/// Stores the patient record and the account-to-id index used for
/// self-service lookups.
pub fn set_patient(env: &Env, patient: &Patient) {
    env.storage()
        .persistent()
        .set(&patient_key(&patient.health_id), patient);
    env.storage()
        .persistent()
        .set(&account_index_key(&patient.account), &patient.health_id);
}

pub fn health_id_for_account(env: &Env, account: &Address) -> Option<String> {
    env.storage().persistent().get(&account_index_key(account))
}
