//! Cache entry naming.

use sha2::{Digest, Sha256};

pub const WSDL_EXTENSION: &str = "wsdl";
pub const LOCK_EXTENSION: &str = "lock";

/// Deterministic file name for a WSDL source: hex SHA-256 of the source
/// string plus a fixed extension.
pub fn cache_file_name(source: &str) -> String {
    format!("{:x}.{}", Sha256::digest(source.as_bytes()), WSDL_EXTENSION)
}

/// Advisory lock file guarding one cache entry.
pub fn lock_file_name(source: &str) -> String {
    format!("{}.{}", cache_file_name(source), LOCK_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_stable_and_distinct() {
        let a = cache_file_name("https://eaisto.example/ws?wsdl");
        let b = cache_file_name("https://eaisto.example/ws?wsdl");
        let c = cache_file_name("https://eaisto.example/ws2?wsdl");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.ends_with(".wsdl"));
        // 64 hex chars + ".wsdl"
        assert_eq!(a.len(), 69);
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            cache_file_name(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855.wsdl"
        );
        assert_eq!(lock_file_name(""), format!("{}.lock", cache_file_name("")));
    }
}
