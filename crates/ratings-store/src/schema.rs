//! Column family layout of the ratings database.
//!
//! The store is a flat namespace, so one family holds every entry.

/// Column family names.
pub mod cf {
    /// Flat string key-value entries, keyed by the caller's key string.
    pub const KV: &str = "kv";
}

/// Column families created when the database is opened.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::KV]
}
