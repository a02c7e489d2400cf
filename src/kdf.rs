//! Key derivation from passphrases
//!
//! Stretches a passphrase plus a salt into a 256-bit symmetric key using
//! PBKDF2 with HMAC-SHA-256 at a fixed iteration count. Derivation is
//! deterministic: identical (passphrase, salt) always yields the identical
//! key, which is what lets opening reconstruct the key used at seal time.
//!
//! The iteration count is intentionally expensive (tens of milliseconds)
//! to slow offline guessing. It is a shared constant rather than an
//! envelope field, so both sides must agree on it.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroize;

/// PBKDF2 iteration count, identical on the seal and open paths.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Length of the derived key in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// A symmetric key derived from a passphrase.
///
/// Ephemeral by design: recomputed on every seal/open, never cached or
/// persisted, and zeroized when dropped.
pub struct DerivedKey {
    key: [u8; KEY_LEN],
}

impl DerivedKey {
    /// The raw key bytes. Use only for an immediate cipher operation.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive a key from a passphrase and salt at the standard iteration count.
pub fn derive(passphrase: &[u8], salt: &[u8]) -> DerivedKey {
    derive_with_iterations(passphrase, salt, PBKDF2_ITERATIONS)
}

fn derive_with_iterations(passphrase: &[u8], salt: &[u8], iterations: u32) -> DerivedKey {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(passphrase, salt, iterations, &mut key);
    DerivedKey { key }
}
