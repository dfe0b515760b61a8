use soroban_sdk::{contracttype, symbol_short, Env, String, Symbol, Vec};

// ── Storage keys ──────────────────────────────────────────────

pub const TOKEN_CTR: Symbol = symbol_short!("TOK_CTR");
const TOKEN_RECORD: Symbol = symbol_short!("TOKEN");
const TOKEN_VALUE: Symbol = symbol_short!("TOK_VAL");
const TOKEN_PATIENT: Symbol = symbol_short!("TOK_PAT");

/// TTL applied when a caller passes zero for the issuance window: two hours.
pub const DEFAULT_TOKEN_TTL: u64 = 7_200;

// ── Types ─────────────────────────────────────────────────────

/// A short-lived capability credential that resolves to a patient without
/// revealing the permanent health id.
///
/// A token is resolvable iff `active && now < expires_at`. The active flag
/// alone is not proof of validity; expiry is derived at read time, never
/// swept by a background job.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessToken {
    pub id: u64,
    pub value: String,
    pub patient_id: String,
    pub issued_at: u64,
    pub expires_at: u64,
    pub active: bool,
}

// ── Storage functions ─────────────────────────────────────────

/// Increments and returns the next token id.
pub fn increment_token_counter(env: &Env) -> u64 {
    let current: u64 = env.storage().instance().get(&TOKEN_CTR).unwrap_or(0);
    let next = current + 1;
    env.storage().instance().set(&TOKEN_CTR, &next);
    next
}

/// Stores a token record, the value-to-id lookup, and the per-patient index.
pub fn set_token(env: &Env, token: &AccessToken) {
    let key = (TOKEN_RECORD, token.id);
    env.storage().persistent().set(&key, token);

    let value_key = (TOKEN_VALUE, token.value.clone());
    env.storage().persistent().set(&value_key, &token.id);

    let patient_key = (TOKEN_PATIENT, token.patient_id.clone());
    let mut ids: Vec<u64> = env
        .storage()
        .persistent()
        .get(&patient_key)
        .unwrap_or(Vec::new(env));
    if !ids.contains(token.id) {
        ids.push_back(token.id);
        env.storage().persistent().set(&patient_key, &ids);
    }
}

pub fn get_token(env: &Env, token_id: u64) -> Option<AccessToken> {
    let key = (TOKEN_RECORD, token_id);
    env.storage().persistent().get(&key)
}

/// Latest token id issued under `value`. A dead token's mapping may be
/// overwritten by a later issuance of the same value.
pub fn token_id_for_value(env: &Env, value: &String) -> Option<u64> {
    let key = (TOKEN_VALUE, value.clone());
    env.storage().persistent().get(&key)
}

/// Ids of every token ever issued to the patient, oldest first.
pub fn patient_token_ids(env: &Env, patient_id: &String) -> Vec<u64> {
    let key = (TOKEN_PATIENT, patient_id.clone());
    env.storage()
        .persistent()
        .get(&key)
        .unwrap_or(Vec::new(env))
}

/// Whether the token currently resolves: active and not yet expired.
pub fn is_live(token: &AccessToken, now: u64) -> bool {
    token.active && token.expires_at > now
}

/// Whether `value` is held by a live token. Uniqueness is required among
/// live tokens only; values of expired or deactivated tokens may be reused.
pub fn value_in_use(env: &Env, value: &String, now: u64) -> bool {
    match token_id_for_value(env, value).and_then(|id| get_token(env, id)) {
        Some(token) => is_live(&token, now),
        None => false,
    }
}
