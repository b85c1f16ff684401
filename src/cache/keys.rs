//! Storage key encoding.
//!
//! Maps a logical cache key to the address it occupies in the store. The
//! mapping is a fixed prefix, so it is deterministic and injective, and
//! [`decode_key`] inverts it.

const STORAGE_PREFIX: &str = "entry/";

/// Storage address for a logical cache key.
pub fn encode_key(key: &str) -> String {
    format!("{STORAGE_PREFIX}{key}")
}

/// Logical cache key for a storage address, or `None` for foreign addresses.
pub fn decode_key(storage_key: &str) -> Option<&str> {
    storage_key.strip_prefix(STORAGE_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_is_deterministic() {
        assert_eq!(encode_key("post:1"), encode_key("post:1"));
        assert_eq!(encode_key("post:1"), "entry/post:1");
    }

    #[test]
    fn test_distinct_keys_get_distinct_addresses() {
        assert_ne!(encode_key("post:1"), encode_key("post:10"));
        assert_ne!(encode_key(""), encode_key("entry/"));
    }

    #[test]
    fn test_decode_rejects_foreign_addresses() {
        assert_eq!(decode_key("entry/post:1"), Some("post:1"));
        assert_eq!(decode_key("other/post:1"), None);
    }
}
