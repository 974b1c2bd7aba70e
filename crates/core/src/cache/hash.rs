//! Content-addressed id generation.

use sha2::{Digest, Sha256};

/// Compute the content id for a canonicalized source URL.
///
/// The id is the join key between the cache index and the blob store, so
/// the same URL must always produce the same id.
pub fn content_id(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_stability() {
        let id1 = content_id("https://example.com/");
        let id2 = content_id("https://example.com/");
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_id_distinct_urls() {
        let id1 = content_id("https://example.com/a");
        let id2 = content_id("https://example.com/b");
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_id_format() {
        let id = content_id("https://example.com/");
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
