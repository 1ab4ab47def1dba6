//! Continuation key generation.

use sha2::{Digest, Sha256};

/// Compute an opaque continuation key.
///
/// The nanosecond timestamp and process-wide sequence number make two keys
/// minted for the same URL and offset distinct. Keys are process-local
/// capabilities and carry no meaning a caller can parse.
pub fn compute_continuation_key(url: &str, offset: usize, timestamp_nanos: i64, sequence: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hasher.update(b"\n");
    hasher.update(offset.to_le_bytes());
    hasher.update(b"\n");
    hasher.update(timestamp_nanos.to_le_bytes());
    hasher.update(b"\n");
    hasher.update(sequence.to_le_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_stability() {
        let key1 = compute_continuation_key("https://example.com", 100, 42, 1);
        let key2 = compute_continuation_key("https://example.com", 100, 42, 1);
        assert_eq!(key1, key2);
    }

    #[test]
    fn test_key_differs_by_timestamp() {
        let key1 = compute_continuation_key("https://example.com", 100, 42, 1);
        let key2 = compute_continuation_key("https://example.com", 100, 43, 1);
        assert_ne!(key1, key2);
    }

    #[test]
    fn test_key_differs_by_sequence() {
        let key1 = compute_continuation_key("https://example.com", 100, 42, 1);
        let key2 = compute_continuation_key("https://example.com", 100, 42, 2);
        assert_ne!(key1, key2);
    }

    #[test]
    fn test_key_format() {
        let key = compute_continuation_key("https://example.com", 0, 0, 0);
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
