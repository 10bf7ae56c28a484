use std::fmt;

use rand::RngCore;
use sha2::{Digest, Sha256};

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

/// One-way verifier derived from a player's secret.
///
/// Stored as `sha256$<salt>$<digest>`; the plaintext is never kept.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn derive(secret: &str) -> Self {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt = hex::encode(salt);
        let digest = digest(&salt, secret);
        Credential(format!("{}${}${}", SCHEME, salt, digest))
    }

    /// Wraps a verifier read back from the store.
    pub fn from_stored(stored: String) -> Self {
        Credential(stored)
    }

    pub fn as_stored(&self) -> &str {
        &self.0
    }

    /// Malformed stored values never verify.
    pub fn verify(&self, secret: &str) -> bool {
        let mut parts = self.0.splitn(3, '$');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(SCHEME), Some(salt), Some(expected)) => {
                constant_time_eq(digest(salt, secret).as_bytes(), expected.as_bytes())
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

fn digest(salt: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
