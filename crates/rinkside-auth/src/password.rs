//! Password hashing and verification using Argon2id

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

/// Upper bound on accepted password length, in bytes
pub const MAX_PASSWORD_BYTES: usize = 1024;

/// Error types for password operations
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Empty passwords are never hashed
    #[error("Password must not be empty")]
    Empty,

    /// Password exceeds [`MAX_PASSWORD_BYTES`]
    #[error("Password must be at most {max} bytes (got {len})")]
    TooLong { len: usize, max: usize },

    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),
}

/// Hash a password using Argon2id
///
/// Uses the crate's default Argon2id parameters with a fresh random 16 byte
/// salt on every call, so hashing the same password twice yields two different
/// PHC strings that both verify.
///
/// # Arguments
/// * `password` - The plain text password to hash
///
/// # Returns
/// * `Ok(String)` - PHC-formatted hash string (suitable for storage)
/// * `Err(PasswordError)` - If the password is empty, too long, or hashing fails
///
/// # Example
/// ```
/// use rinkside_auth::password::hash_password;
///
/// let hash = hash_password("MySecurePassword123!").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::Empty);
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(PasswordError::TooLong {
            len: password.len(),
            max: MAX_PASSWORD_BYTES,
        });
    }

    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(password_hash.to_string())
}

/// Verify a password against a stored hash
///
/// Comparison is done by Argon2 itself. A stored hash that cannot be parsed
/// never matches, so a corrupted row behaves like a wrong password.
///
/// # Example
/// ```
/// use rinkside_auth::password::{hash_password, verify_password};
///
/// let hash = hash_password("MyPassword123!").unwrap();
/// assert!(verify_password("MyPassword123!", &hash));
/// assert!(!verify_password("WrongPassword", &hash));
/// assert!(!verify_password("MyPassword123!", "not-a-phc-string"));
/// ```
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Stored password hash is malformed: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
