//! Authenticated encryption using AES-256-GCM
//!
//! Thin wrapper over the AEAD primitive: seal produces ciphertext with a
//! 128-bit authentication tag appended; open returns the original
//! plaintext byte-for-byte if and only if the same key and nonce were used
//! and the ciphertext-with-tag is unmodified. It never returns partially
//! correct or truncated plaintext.
//!
//! No associated authenticated data is used; the envelope's own layout is
//! the only context bound into the tag.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use crate::error::{ErrorCategory, ErrorKind, Result, SealboxError};
use crate::kdf::DerivedKey;

/// Length of the GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Length of the GCM authentication tag appended to the ciphertext.
pub const TAG_LEN: usize = 16;

/// Encrypt and authenticate `plaintext` under `key` and `nonce`.
///
/// The caller is responsible for nonce uniqueness under a given key.
pub fn seal(key: &DerivedKey, nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());
    cipher
        .encrypt(&Nonce::from(*nonce), plaintext)
        .map_err(|_| {
            SealboxError::with_kind(
                ErrorCategory::Internal,
                ErrorKind::PlatformUnavailable,
                "cipher failed to seal payload",
            )
        })
}

/// Verify and decrypt `body` (ciphertext with trailing tag).
///
/// A verification failure is reported as a single combined condition; the
/// primitive cannot tell a wrong key from tampered data, and the error
/// deliberately does not try to.
pub fn open(key: &DerivedKey, nonce: &[u8; NONCE_LEN], body: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());
    cipher.decrypt(&Nonce::from(*nonce), body).map_err(|_| {
        SealboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::AuthenticationFailed,
            "wrong passphrase, or corrupted or tampered-with data",
        )
    })
}
