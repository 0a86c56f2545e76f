//! Argon2 password verification for the admin account.
//!
//! Only the hash is configured on the server (`ADMIN_PASSWORD_HASH`); the
//! plaintext never leaves the login request.

use argon2::password_hash::PasswordHash;
use argon2::{Argon2, PasswordVerifier};

/// Verify a plaintext password against a stored Argon2 hash string.
///
/// Returns `false` both for a mismatched password and for a malformed
/// stored hash; the caller cannot distinguish the two, which is fine for a
/// login check.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        tracing::error!("stored admin password hash is not a valid PHC string");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
