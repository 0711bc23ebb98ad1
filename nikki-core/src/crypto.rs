//! Password digests and reset-token generation
//!
//! Passwords are digested as SHA-256 over the plaintext followed by a single
//! application-wide salt, base64-encoded. Every account shares the salt;
//! moving to per-user salts with an adaptive KDF only requires changing this
//! module, since registration, login and reset all route through
//! [`digest_password`].
//!
//! Reset tokens are 256-bit values from the OS CSPRNG, encoded as URL-safe
//! base64 so they can travel in a link without escaping.

use base64::{
    Engine,
    prelude::{BASE64_STANDARD, BASE64_URL_SAFE_NO_PAD},
};
use rand::{TryRngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Application-wide password salt. Compile-time constant by design of the
/// digest scheme; see the module docs.
const STATIC_SALT: &str = "nikki_static_salt_v1";

/// Digest a plaintext password into its stored form.
pub fn digest_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(STATIC_SALT.as_bytes());
    BASE64_STANDARD.encode(hasher.finalize())
}

/// Verify a plaintext password against a stored digest.
///
/// Password equality is decided by comparing digest outputs, never
/// plaintexts, and the comparison runs in constant time.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let computed = digest_password(password);
    constant_time_compare(computed.as_bytes(), stored_hash.as_bytes())
}

/// Generate a cryptographically secure password-reset token.
///
/// Produces a 256-bit (32-byte) random token encoded as URL-safe base64
/// without padding (43 characters).
///
/// # Panics
///
/// Panics if the OS random number generator fails. This indicates a critical
/// system failure from which recovery is not possible for security-sensitive
/// operations.
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .expect("OS RNG failure - system entropy source unavailable");
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}

/// Constant-time comparison of two byte slices.
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
