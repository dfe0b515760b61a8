use soroban_sdk::{Env, String};

use crate::patient::{self, Patient};
use crate::token;

/// Maps a caller-supplied search string to the owning patient record.
///
/// Permanent health ids are tried first and never expire; token values are
/// the fallback and resolve only while live. `None` covers every failure
/// (unknown string, expired token, deactivated token) so callers cannot
/// probe token validity through the error shape.
pub fn resolve(env: &Env, query: &String) -> Option<Patient> {
    if let Some(found) = patient::get_patient(env, query) {
        return Some(found);
    }

    let token_id = token::token_id_for_value(env, query)?;
    let tok = token::get_token(env, token_id)?;
    if !token::is_live(&tok, env.ledger().timestamp()) {
        return None;
    }
    patient::get_patient(env, &tok.patient_id)
}
