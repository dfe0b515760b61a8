use soroban_sdk::{Env, String};

/// Permanent health ids are exactly twelve decimal digits.
pub const HEALTH_ID_LEN: usize = 12;

/// Access token values are exactly eight symbols from [`TOKEN_ALPHABET`].
pub const TOKEN_VALUE_LEN: usize = 8;

// Low-order eight digits of the ledger timestamp form the id prefix.
const TIMESTAMP_MODULUS: u64 = 100_000_000;
// Four-digit random suffix.
const RANDOM_SPAN: u64 = 10_000;

const TOKEN_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Writes `value` into `out` as zero-padded decimal digits.
fn write_decimal(out: &mut [u8], mut value: u64) {
    let mut i = out.len();
    while i > 0 {
        i -= 1;
        out[i] = b'0' + (value % 10) as u8;
        value /= 10;
    }
}

/// Generates a candidate permanent health id: the low-order eight digits of
/// the ledger timestamp followed by a zero-padded four-digit random segment.
///
/// Uniqueness is probabilistic only (shared timestamp granule, small random
/// space). The patient registry's occupancy check is the authoritative
/// guard; callers regenerate on collision.
pub fn generate_health_id(env: &Env) -> String {
    let mut buf = [0u8; HEALTH_ID_LEN];
    let stamp = env.ledger().timestamp() % TIMESTAMP_MODULUS;
    let random: u64 = env.prng().gen_range(0..RANDOM_SPAN);
    write_decimal(&mut buf[..8], stamp);
    write_decimal(&mut buf[8..], random);
    String::from_bytes(env, &buf)
}

/// Generates a candidate access token value: eight symbols drawn uniformly
/// from `A-Z0-9` (keyspace 36^8).
///
/// The token store's liveness check against currently active tokens is the
/// authoritative uniqueness guard. Health ids are twelve digits and token
/// values eight symbols, so the two identifier spaces never overlap and
/// resolution needs no tie-break.
pub fn generate_token_value(env: &Env) -> String {
    let mut buf = [0u8; TOKEN_VALUE_LEN];
    for slot in buf.iter_mut() {
        let idx: u64 = env.prng().gen_range(0..TOKEN_ALPHABET.len() as u64);
        *slot = TOKEN_ALPHABET[idx as usize];
    }
    String::from_bytes(env, &buf)
}
