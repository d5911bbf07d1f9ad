//! Client constants.
//!
//! This module contains constant values shared across the client shell:
//! storage keys, cookie names, and protocol-level magic numbers.

/// Keys under which client state is persisted in the key-value store.
pub mod storage_keys {
    /// Cached copy of the authoritative preferences entity, stored as JSON.
    pub const USER_PREFERENCES: &str = "user-preferences";
}

/// Cookie names and lifetimes written through the platform adapter.
pub mod cookies {
    /// Language cookie consulted before any session exists.
    pub const LANGUAGE: &str = "language";

    /// Lifetime of the language cookie in days.
    pub const LANGUAGE_TTL_DAYS: i64 = 365;
}

/// Response envelope protocol values.
pub mod envelope {
    /// Application-level code marking a successful envelope.
    pub const SUCCESS_CODE: i64 = 200;
}

/// Session lifetime defaults.
pub mod session {
    /// Hours a session stays valid when the backend does not say otherwise.
    pub const DEFAULT_TTL_HOURS: i64 = 24;
}
