//! # Identifier Generation
//!
//! Invoice ids look like `inv_lt5x1k2m9q3wz7d0hb`:
//!
//! ```text
//!   inv _ lt5x1k2m  9q3wz7d0hb
//!   │     │         └─ 10 base-36 chars from a v4 UUID (~51 random bits)
//!   │     └─ wall-clock milliseconds, base 36
//!   └─ prefix
//! ```
//!
//! No shared state: two calls in the same millisecond differ in the random
//! part with overwhelming probability.

use chrono::Utc;
use uuid::Uuid;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random component.
const RANDOM_LEN: usize = 10;

/// Generates a new identifier with the given prefix.
///
/// ## Example
/// ```rust
/// use folio_core::id::new_id;
///
/// let id = new_id("inv");
/// assert!(id.starts_with("inv_"));
/// assert_ne!(id, new_id("inv"));
/// ```
pub fn new_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let random = random_component();
    format!("{}_{}{}", prefix, to_base36(millis), random)
}

/// Renders `value` in base 36, lowercase.
///
/// ```rust
/// use folio_core::id::to_base36;
///
/// assert_eq!(to_base36(0), "0");
/// assert_eq!(to_base36(35), "z");
/// assert_eq!(to_base36(36), "10");
/// ```
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::with_capacity(13);
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

fn random_component() -> String {
    let bytes = Uuid::new_v4().into_bytes();
    let mut acc = u128::from_be_bytes(bytes);
    let mut out = String::with_capacity(RANDOM_LEN);
    for _ in 0..RANDOM_LEN {
        out.push(ALPHABET[(acc % 36) as usize] as char);
        acc /= 36;
    }
    out
}
