use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::{OsRng, RngCore},
    },
};
use sha2::{Digest, Sha256};

use crate::constants::SESSION_TOKEN_BYTES;
use crate::error::Result;

// =============================================================================
// Password Hashing
// =============================================================================

/// Hash a password into a PHC string (`$argon2id$...`) with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string
///
/// Returns `Ok(false)` on mismatch. A stored hash that cannot be parsed is an
/// internal error, not a failed login.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Session Tokens
// =============================================================================

/// Generate a random session token (hex encoded)
///
/// The token only ever lives in the client's cookie; the server stores
/// [`session_key`] of it.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Derive the storage key for a session token
///
/// `session_key = SHA256(token + pepper)`
///
/// A leaked sessions table cannot be replayed as cookies without the pepper,
/// which lives in the environment rather than the database.
pub fn session_key(token: &str, pepper: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.update(pepper.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check that a presented token has the shape [`generate_session_token`] produces
pub fn is_well_formed_token(token: &str) -> bool {
    token.len() == SESSION_TOKEN_BYTES * 2 && token.chars().all(|c| c.is_ascii_hexdigit())
}
