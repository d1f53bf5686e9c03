//! Note id generation.

use chrono::Utc;
use uuid::Uuid;

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a new note id.
///
/// The id is the current Unix time in milliseconds followed by a random
/// component, both in base 36. Ids sort roughly by creation time. Collisions
/// are not checked.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u128;
    // Low 64 bits of a v4 UUID: 62 of them are random.
    let random = Uuid::new_v4().as_u128() as u64 as u128;

    format!("{}{}", to_base36(millis), to_base36(random))
}

fn to_base36(mut n: u128) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();

    String::from_utf8(out).unwrap_or_default()
}
