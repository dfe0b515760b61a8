use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol};

/// Professional profile for a doctor account. Visits and prescriptions
/// reference clinicians by account address; this record carries the
/// credential details shown alongside them.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Clinician {
    pub account: Address,
    pub license_number: String,
    pub specialization: Option<String>,
    pub hospital_affiliation: Option<String>,
    pub registered_at: u64,
}

pub fn clinician_key(account: &Address) -> (Symbol, Address) {
    (symbol_short!("CLIN"), account.clone())
}

pub fn get_clinician(env: &Env, account: &Address) -> Option<Clinician> {
    env.storage().persistent().get(&clinician_key(account))
}

pub fn set_clinician(env: &Env, clinician: &Clinician) {
    env.storage()
        .persistent()
        .set(&clinician_key(&clinician.account), clinician);
}
