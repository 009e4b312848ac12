//! Cache keys and the on-disk identifiers derived from them.

use sha2::{Digest, Sha256};

/// Identifies an image across every cache tier.
///
/// In practice this is the image URL. Identity is exact string equality:
/// no normalization is applied, so `https://a/b` and `https://a/b/` are
/// different entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Creates a key from any string-like input.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as it was supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives the stable identifier used as the disk file stem.
    #[must_use]
    pub fn disk_entry_id(&self) -> DiskEntryId {
        DiskEntryId::from_key(self)
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Fixed-width hex identifier for a disk cache entry.
///
/// Truncated SHA-256 of the key, so it is stable across runs and platforms.
/// Distinct keys that collide share one file; this is not detected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiskEntryId(String);

impl DiskEntryId {
    /// Number of digest bytes kept in the identifier.
    pub const DIGEST_BYTES: usize = 16;

    /// Hashes a key into its disk identifier.
    #[must_use]
    pub fn from_key(key: &CacheKey) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(key.as_str().as_bytes());
        let digest = hasher.finalize();
        Self(hex::encode(&digest[..Self::DIGEST_BYTES]))
    }

    /// Returns the hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DiskEntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_entry_id_is_fixed_width_hex() {
        let key = CacheKey::new("https://example.org/a.png");
        let id = key.disk_entry_id();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_disk_entry_id_consistency() {
        let id1 = CacheKey::new("https://example.com/image.png").disk_entry_id();
        let id2 = CacheKey::from("https://example.com/image.png").disk_entry_id();
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_disk_entry_id_is_stable_across_runs() {
        // sha256("abc") = ba7816bf8f01cfea414140de5dae2223...
        let id = CacheKey::new("abc").disk_entry_id();
        assert_eq!(id.as_str(), "ba7816bf8f01cfea414140de5dae2223");
    }

    #[test]
    fn test_keys_are_not_normalized() {
        let plain = CacheKey::new("https://example.org/a");
        let slash = CacheKey::new("https://example.org/a/");
        assert_ne!(plain, slash);
        assert_ne!(plain.disk_entry_id(), slash.disk_entry_id());

        let q1 = CacheKey::new("https://example.org/a?x=1&y=2");
        let q2 = CacheKey::new("https://example.org/a?y=2&x=1");
        assert_ne!(q1.disk_entry_id(), q2.disk_entry_id());
    }

    #[test]
    fn test_display_is_raw_key() {
        let key = CacheKey::new("https://example.org/a.png");
        assert_eq!(key.to_string(), "https://example.org/a.png");
    }
}
