use chrono::{SecondsFormat, Utc};
use rand::Rng;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of generated ids.
pub const ID_LEN: usize = 9;

/// Generate an opaque id: 9 random base-36 characters.
///
/// Ids are assigned once when an entity is created (or first materialized by
/// the migration layer) and are never recomputed afterwards.
pub fn generate_id() -> String {
    let mut rng = rand::rng();
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Current UTC time as an ISO-8601 string with millisecond precision,
/// e.g. `2026-01-01T12:00:00.000Z`.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Today's UTC date as `YYYY-MM-DD`.
pub fn today_iso() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}
