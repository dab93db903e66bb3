//! Hashing Utilities

use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of content and return as hex string
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Stable edge id for a (source, target, relationship) triple
pub fn edge_id(source_id: &str, target_id: &str, relationship: &str) -> String {
    let mut hasher = Sha256::new();
    for part in [source_id, target_id, relationship] {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hex::encode(hasher.finalize());
    format!("edge-{}", &digest[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash() {
        let hash = content_hash("hello world");
        assert_eq!(hash.len(), 64); // SHA-256 produces 64 hex chars

        assert_eq!(content_hash("hello world"), content_hash("hello world"));
        assert_ne!(content_hash("hello world"), content_hash("hello world!"));
    }

    #[test]
    fn test_known_hash() {
        let hash = content_hash("hello");
        assert_eq!(
            hash,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_edge_id_is_directional() {
        let forward = edge_id("a", "b", "co_retrieved");
        assert_eq!(forward, edge_id("a", "b", "co_retrieved"));
        assert_ne!(forward, edge_id("b", "a", "co_retrieved"));
        assert_ne!(forward, edge_id("a", "b", "co_selected"));
        // Separator keeps ("ab", "c") and ("a", "bc") apart
        assert_ne!(edge_id("ab", "c", "x"), edge_id("a", "bc", "x"));
        assert!(forward.starts_with("edge-"));
    }
}
