//! Token digest computation
//!
//! One SHA-256 pass over the plaintext, URL-safe base64 without padding.
//! The same function digests issued keys and root-key bearer tokens, and
//! external verification flows must apply it identically: the output format
//! is a storage contract, not a per-call-site choice. No salt; inputs carry
//! generator-supplied entropy.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use sha2::{Digest, Sha256};

/// Hash a plaintext token for storage and lookup
pub fn hash_key(plaintext: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(plaintext.as_bytes()))
}

/// Verify a plaintext token against a stored digest
pub fn verify_key(plaintext: &str, stored_hash: &str) -> bool {
    constant_time_compare(&hash_key(plaintext), stored_hash)
}

/// Comparison that inspects every byte regardless of where a mismatch sits
fn constant_time_compare(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());

    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
