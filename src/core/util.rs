//! Common utilities

use xxhash_rust::xxh3::xxh3_64;

/// Compute the XXH3 hash of bytes as 16 hex digits
pub fn hash_bytes(data: &[u8]) -> String {
    format!("{:016x}", xxh3_64(data))
}

/// Truncate string to max bytes, returning (truncated_string, was_truncated)
pub fn truncate_string(s: &str, max_bytes: usize) -> (String, bool) {
    if s.len() <= max_bytes {
        return (s.to_string(), false);
    }

    // Find a valid UTF-8 boundary
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }

    (s[..end].to_string(), true)
}

/// 1-indexed line number of a byte offset
pub fn line_of_offset(s: &str, offset: usize) -> usize {
    s[..offset.min(s.len())].matches('\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_bytes() {
        let hash = hash_bytes(b"hello world");
        assert_eq!(hash.len(), 16);
        assert_eq!(hash, hash_bytes(b"hello world"));
        assert_ne!(hash, hash_bytes(b"hello world!"));
    }

    #[test]
    fn test_truncate_string() {
        let (truncated, was_truncated) = truncate_string("hello world", 5);
        assert_eq!(truncated, "hello");
        assert!(was_truncated);

        let (not_truncated, was_truncated) = truncate_string("hello world", 100);
        assert_eq!(not_truncated, "hello world");
        assert!(!was_truncated);
    }

    #[test]
    fn test_truncate_string_utf8() {
        // '●' is 3 bytes
        let (truncated, _) = truncate_string("●●●", 4);
        assert_eq!(truncated, "●");
    }

    #[test]
    fn test_line_of_offset() {
        let s = "a\nb\nc";
        assert_eq!(line_of_offset(s, 0), 1);
        assert_eq!(line_of_offset(s, 2), 2);
        assert_eq!(line_of_offset(s, 4), 3);
        assert_eq!(line_of_offset(s, 99), 3);
    }
}
