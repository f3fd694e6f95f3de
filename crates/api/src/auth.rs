//! Shared-secret API key primitive.
//!
//! The configured key is kept only as a SHA-256 digest. Presented keys are
//! hashed and compared digest-to-digest, so the comparison always runs over
//! fixed-length values.

use std::fmt;

use sha2::{Digest, Sha256};

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// The configured API key.
#[derive(Clone)]
pub struct ApiKey {
    digest: [u8; 32],
}

impl ApiKey {
    pub fn new(plaintext: &str) -> Self {
        Self {
            digest: hash_api_key(plaintext),
        }
    }

    /// Whether `presented` equals the configured key.
    pub fn verify(&self, presented: &str) -> bool {
        hash_api_key(presented) == self.digest
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// SHA-256 digest of an API key.
pub fn hash_api_key(key: &str) -> [u8; 32] {
    Sha256::digest(key.as_bytes()).into()
}
