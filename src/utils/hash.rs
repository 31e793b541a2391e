//! Salted password hashing.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Extra SHA-256 rounds applied on top of the salted digest.
const STRETCH_ROUNDS: u32 = 4096;

/// Generate `len` random bytes, hex encoded.
pub fn generate_salt(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hex digest of `password` under `salt`.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut digest = Sha256::new()
        .chain_update(salt.as_bytes())
        .chain_update(password.as_bytes())
        .finalize();
    for _ in 0..STRETCH_ROUNDS {
        digest = Sha256::new()
            .chain_update(digest)
            .chain_update(salt.as_bytes())
            .finalize();
    }
    hex::encode(digest)
}

/// Check `password` against a stored salt and digest.
pub fn verify_password(password: &str, salt: &str, digest: &str) -> bool {
    let computed = hash_password(password, salt);
    // Compare every byte regardless of where the first mismatch is.
    computed.len() == digest.len()
        && computed
            .bytes()
            .zip(digest.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

/// A salt and the digest derived with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub salt: String,
    pub hash: String,
}

impl Credential {
    /// Derive a fresh credential for `password` with a new random salt.
    pub fn derive(password: &str, salt_len: usize) -> Self {
        let salt = generate_salt(salt_len);
        let hash = hash_password(password, &salt);
        Self { salt, hash }
    }

    pub fn verify(&self, password: &str) -> bool {
        verify_password(password, &self.salt, &self.hash)
    }
}

/// Limits applied when a password is set or changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Salt length in bytes
    pub salt_length: usize,
    pub min_password_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            salt_length: 16,
            min_password_length: 6,
        }
    }
}

impl PasswordPolicy {
    pub fn accepts(&self, password: &str) -> bool {
        password.chars().count() >= self.min_password_length
    }

    pub fn derive(&self, password: &str) -> Credential {
        Credential::derive(password, self.salt_length)
    }
}
