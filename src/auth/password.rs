//! Password Credential
//!
//! Salted PBKDF2-HMAC-SHA256 password hashing backed by `ring`.

use std::num::NonZeroU32;

use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use thiserror::Error;

/// Number of PBKDF2 rounds applied to every password.
pub const PBKDF2_ROUNDS: u32 = 10_000;

/// Length in bytes of a derived password hash.
pub const CREDENTIAL_LEN: usize = 32;

/// Length in bytes of a freshly generated salt.
pub const SALT_LEN: usize = 16;

const ROUNDS: NonZeroU32 = match NonZeroU32::new(PBKDF2_ROUNDS) {
    Some(rounds) => rounds,
    None => panic!("PBKDF2 rounds must be non-zero"),
};

/// The system entropy source failed to produce random bytes.
#[derive(Debug, Error)]
#[error("secure random number generator failed")]
pub struct RandomnessError;

/// Derive the hash of `password` under `salt`.
pub fn derive(password: &str, salt: &[u8]) -> [u8; CREDENTIAL_LEN] {
    let mut out = [0u8; CREDENTIAL_LEN];
    pbkdf2::derive(pbkdf2::PBKDF2_HMAC_SHA256, ROUNDS, salt, password.as_bytes(), &mut out);
    out
}

/// Fill a new buffer of `len` bytes from the operating system CSPRNG.
pub fn generate_salt(len: usize) -> Result<Vec<u8>, RandomnessError> {
    let mut salt = vec![0u8; len];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| RandomnessError)?;
    Ok(salt)
}

/// Check `password` against a previously derived hash.
///
/// The comparison runs in constant time with respect to the hash contents.
pub fn verify(password: &str, salt: &[u8], expected_hash: &[u8]) -> bool {
    pbkdf2::verify(
        pbkdf2::PBKDF2_HMAC_SHA256,
        ROUNDS,
        salt,
        password.as_bytes(),
        expected_hash,
    )
    .is_ok()
}

/// Hash and salt pair owned by a single account.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordCredential {
    hash: Vec<u8>,
    salt: Vec<u8>,
}

impl PasswordCredential {
    /// Hash `password` under a freshly generated salt.
    pub fn generate(password: &str) -> Result<Self, RandomnessError> {
        let salt = generate_salt(SALT_LEN)?;
        let hash = derive(password, &salt).to_vec();
        Ok(Self { hash, salt })
    }

    /// Rebuild a credential from stored material. Emptiness is checked by the account.
    pub fn from_parts(hash: Vec<u8>, salt: Vec<u8>) -> Self {
        Self { hash, salt }
    }

    pub fn hash(&self) -> &[u8] {
        &self.hash
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn verify(&self, password: &str) -> bool {
        verify(password, &self.salt, &self.hash)
    }
}

// Never print key material.
impl std::fmt::Debug for PasswordCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordCredential")
            .field("hash", &"<redacted>")
            .field("salt_len", &self.salt.len())
            .finish()
    }
}
