use chrono::{DateTime, Duration, Utc};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

/// Length of generated entity ids.
pub(crate) const ID_LEN: usize = 9;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Current wall-clock time.
///
/// `chrono` reads `Date.now()` on wasm32 and the system clock elsewhere.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now()
}

/// A timestamp strictly later than `prev`.
///
/// Browser clocks only have millisecond resolution, so two edits in the same tick
/// would otherwise share an `updatedAt`.
pub(crate) fn next_timestamp(prev: DateTime<Utc>) -> DateTime<Utc> {
    let now = now();
    if now > prev {
        now
    } else {
        prev + Duration::milliseconds(1)
    }
}

/// Short base-36 token for blocks, notes and collections.
///
/// Unique enough for a single user in a single browser profile; not a security token.
pub fn generate_id() -> String {
    let mut bytes = [0u8; ID_LEN];
    if getrandom::getrandom(&mut bytes).is_err() {
        bytes = fallback_bytes();
    }

    bytes
        .iter()
        .map(|b| ALPHABET[*b as usize % ALPHABET.len()] as char)
        .collect()
}

// Used when the platform entropy source is unavailable.
fn fallback_bytes() -> [u8; ID_LEN] {
    let counter = COUNTER.fetch_add(1, Ordering::SeqCst);
    let nanos = now().timestamp_nanos_opt().unwrap_or_default();

    let mut first = DefaultHasher::new();
    counter.hash(&mut first);
    nanos.hash(&mut first);
    let a = first.finish();

    let mut second = DefaultHasher::new();
    a.hash(&mut second);
    counter.hash(&mut second);
    let b = second.finish();

    let mut pool = [0u8; 16];
    pool[..8].copy_from_slice(&a.to_le_bytes());
    pool[8..].copy_from_slice(&b.to_le_bytes());

    let mut out = [0u8; ID_LEN];
    out.copy_from_slice(&pool[..ID_LEN]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_id_shape() {
        let id = generate_id();
        assert_eq!(id.len(), ID_LEN);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_generate_id_is_unique_enough() {
        let ids = (0..2_000).map(|_| generate_id()).collect::<HashSet<_>>();
        assert_eq!(ids.len(), 2_000);
    }

    #[test]
    fn test_fallback_bytes_differ_between_calls() {
        assert_ne!(fallback_bytes(), fallback_bytes());
    }

    #[test]
    fn test_next_timestamp_is_strictly_later() {
        let future = now() + Duration::days(1);
        let next = next_timestamp(future);
        assert_eq!(next, future + Duration::milliseconds(1));

        let past = now() - Duration::days(1);
        assert!(next_timestamp(past) > past);
    }
}
