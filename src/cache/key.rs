//! # Cache Keys
//!
//! A key is `query-{table}:{sha256}` over the serialized query identity
//! (`columns`, `filter`, `sort`, `pagination`, in that order). Filter key
//! order is preserved, since it decides leaf order on the wire.

use sha2::{Digest, Sha256};

use crate::query::Query;

/// Derive the cache key of `query` on `table`
pub fn cache_key(table: &str, query: &Query) -> String {
    // Serializing a struct of JSON values cannot fail.
    let canonical = serde_json::to_vec(&query.identity()).unwrap_or_default();
    let digest = Sha256::digest(&canonical);

    let mut key = String::with_capacity(table.len() + 7 + digest.len() * 2);
    key.push_str("query-");
    key.push_str(table);
    key.push(':');
    for byte in digest.iter() {
        key.push_str(&format!("{:02x}", byte));
    }
    key
}
