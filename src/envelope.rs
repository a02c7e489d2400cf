//! The passphrase envelope codec
//!
//! An envelope is the self-contained, tamper-evident blob produced from a
//! byte payload and a passphrase. The binary layout is:
//!
//! - salt: 16 bytes (random, public)
//! - nonce: 12 bytes (random, public)
//! - ciphertext with trailing 16-byte tag: variable length
//!
//! The minimum valid total length is 44 bytes (empty plaintext). The text
//! variant is the identical bytes run through [`crate::armor`].
//!
//! Salt and nonce are drawn fresh from the injected [`RandomSource`] on
//! every seal, and the key is rederived on every seal and open; nothing is
//! cached across calls and no state survives a call except the envelope
//! itself. A (key, nonce) pair reuse is therefore cryptographically
//! negligible but not structurally impossible; accepted trade-off of the
//! format.

use crate::aead;
use crate::armor;
use crate::error::{ErrorCategory, ErrorKind, Result, SealboxError};
use crate::kdf;
use crate::passphrase::PassphrasePolicy;
use crate::rng::{OsRandom, RandomSource};

/// Length of the salt prefix in bytes.
pub const SALT_LEN: usize = 16;

/// Smallest structurally valid envelope: salt, nonce, and a bare tag.
pub const MIN_ENVELOPE_LEN: usize = SALT_LEN + aead::NONCE_LEN + aead::TAG_LEN;

/// Seal `plaintext` under `passphrase`, drawing salt and nonce from the
/// operating system generator.
pub fn seal(passphrase: &[u8], plaintext: &[u8], policy: PassphrasePolicy) -> Result<Vec<u8>> {
    seal_with(&mut OsRandom, passphrase, plaintext, policy)
}

/// Seal `plaintext` using an explicit randomness source.
///
/// Production callers should use [`seal`]; this entry point exists so
/// tests can script the salt and nonce and assert on envelope layout.
pub fn seal_with(
    rng: &mut dyn RandomSource,
    passphrase: &[u8],
    plaintext: &[u8],
    policy: PassphrasePolicy,
) -> Result<Vec<u8>> {
    policy.validate(passphrase)?;

    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)?;
    let mut nonce = [0u8; aead::NONCE_LEN];
    rng.fill(&mut nonce)?;

    let key = kdf::derive(passphrase, &salt);
    let body = aead::seal(&key, &nonce, plaintext)?;

    let mut envelope = Vec::with_capacity(SALT_LEN + aead::NONCE_LEN + body.len());
    envelope.extend_from_slice(&salt);
    envelope.extend_from_slice(&nonce);
    envelope.extend_from_slice(&body);
    Ok(envelope)
}

/// Open a binary envelope, returning the original plaintext.
///
/// Structural validation happens before any key derivation or cipher
/// work; an input shorter than [`MIN_ENVELOPE_LEN`] never costs a PBKDF2
/// run.
pub fn open(passphrase: &[u8], envelope: &[u8]) -> Result<Vec<u8>> {
    if envelope.len() < MIN_ENVELOPE_LEN {
        return Err(SealboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::MalformedEnvelope,
            format!(
                "envelope is {} bytes but at least {} are required; likely truncated",
                envelope.len(),
                MIN_ENVELOPE_LEN
            ),
        ));
    }

    let (salt, rest) = envelope.split_at(SALT_LEN);
    let (nonce_bytes, body) = rest.split_at(aead::NONCE_LEN);
    let mut nonce = [0u8; aead::NONCE_LEN];
    nonce.copy_from_slice(nonce_bytes);

    let key = kdf::derive(passphrase, salt);
    aead::open(&key, &nonce, body)
}

/// Seal `plaintext` into a single-line armored string (text mode).
pub fn seal_text(passphrase: &[u8], plaintext: &[u8]) -> Result<String> {
    seal_text_with(&mut OsRandom, passphrase, plaintext)
}

/// Text-mode seal using an explicit randomness source (testing only).
pub fn seal_text_with(
    rng: &mut dyn RandomSource,
    passphrase: &[u8],
    plaintext: &[u8],
) -> Result<String> {
    let envelope = seal_with(rng, passphrase, plaintext, PassphrasePolicy::TEXT)?;
    Ok(armor::wrap(&envelope))
}

/// Open an armored envelope (text mode).
///
/// Decoding failures surface as [`ErrorKind::MalformedEnvelope`] before
/// any cryptographic step runs.
pub fn open_text(passphrase: &[u8], armored: &str) -> Result<Vec<u8>> {
    let envelope = armor::unwrap(armored)?;
    open(passphrase, &envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRandom;

    const POLICY: PassphrasePolicy = PassphrasePolicy::FILE;

    #[test]
    fn test_roundtrip() {
        let envelope = seal(b"password123", b"hello", POLICY).unwrap();
        let plaintext = open(b"password123", &envelope).unwrap();
        assert_eq!(plaintext, b"hello");
    }

    #[test]
    fn test_roundtrip_empty_payload() {
        let envelope = seal(b"password123", b"", POLICY).unwrap();
        assert_eq!(envelope.len(), MIN_ENVELOPE_LEN);
        assert_eq!(open(b"password123", &envelope).unwrap(), b"");
    }

    #[test]
    fn test_roundtrip_all_byte_values() {
        let plaintext: Vec<u8> = (0..=255).collect();
        let envelope = seal(b"password123", &plaintext, POLICY).unwrap();
        assert_eq!(open(b"password123", &envelope).unwrap(), plaintext);
    }

    #[test]
    fn test_roundtrip_large_payload() {
        let plaintext = vec![0x42u8; 128 * 1024];
        let envelope = seal(b"password123", &plaintext, POLICY).unwrap();
        assert_eq!(open(b"password123", &envelope).unwrap(), plaintext);
    }

    #[test]
    fn test_sealing_is_nondeterministic() {
        let a = seal(b"password123", b"hello", POLICY).unwrap();
        let b = seal(b"password123", b"hello", POLICY).unwrap();

        assert_ne!(a[..SALT_LEN], b[..SALT_LEN]);
        assert_ne!(
            a[SALT_LEN..SALT_LEN + aead::NONCE_LEN],
            b[SALT_LEN..SALT_LEN + aead::NONCE_LEN]
        );
        assert_ne!(a, b);

        // Both still open to the same plaintext.
        assert_eq!(open(b"password123", &a).unwrap(), b"hello");
        assert_eq!(open(b"password123", &b).unwrap(), b"hello");
    }

    #[test]
    fn test_wrong_passphrase() {
        let envelope = seal(b"password123", b"hello", POLICY).unwrap();
        let err = open(b"wrongpass", &envelope).expect_err("expected auth failure");
        assert_eq!(err.kind, Some(ErrorKind::AuthenticationFailed));
    }

    #[test]
    fn test_tampering_anywhere_is_detected() {
        let envelope = seal(b"password123", b"hi", POLICY).unwrap();

        // Flipping a bit in any region - salt, nonce, ciphertext, or tag -
        // must fail authentication, never yield a different plaintext.
        for byte in 0..envelope.len() {
            let mut tampered = envelope.clone();
            tampered[byte] ^= 0x01;
            let err = open(b"password123", &tampered)
                .expect_err("tampered envelope must not open");
            assert_eq!(err.kind, Some(ErrorKind::AuthenticationFailed));
        }
    }

    #[test]
    fn test_below_minimum_length_rejected() {
        let err = open(b"anything", &[0u8; 10]).expect_err("expected malformed envelope");
        assert_eq!(err.kind, Some(ErrorKind::MalformedEnvelope));
        assert_eq!(err.category, ErrorCategory::User);
    }

    #[test]
    fn test_one_byte_short_of_minimum_rejected() {
        let err = open(b"anything", &vec![0u8; MIN_ENVELOPE_LEN - 1])
            .expect_err("expected malformed envelope");
        assert_eq!(err.kind, Some(ErrorKind::MalformedEnvelope));
    }

    #[test]
    fn test_weak_passphrase_rejected_before_sealing() {
        let err = seal(b"short", b"hello", POLICY).expect_err("expected weak passphrase");
        assert_eq!(err.kind, Some(ErrorKind::WeakPassphrase));

        let err = seal(b"", b"hello", POLICY).expect_err("expected missing input");
        assert_eq!(err.kind, Some(ErrorKind::MissingInput));
    }

    #[test]
    fn test_layout_with_scripted_randomness() {
        let script: Vec<u8> = (1u8..=28).collect();
        let mut rng = ScriptedRandom::new(script.clone());

        let envelope = seal_with(&mut rng, b"password123", b"hello", POLICY).unwrap();

        assert_eq!(envelope.len(), MIN_ENVELOPE_LEN + b"hello".len());
        assert_eq!(&envelope[..SALT_LEN], &script[..16]);
        assert_eq!(&envelope[SALT_LEN..SALT_LEN + aead::NONCE_LEN], &script[16..28]);
        assert_eq!(open(b"password123", &envelope).unwrap(), b"hello");
    }

    #[test]
    fn test_scripted_sealing_is_reproducible() {
        let script: Vec<u8> = (1u8..=28).collect();
        let a = seal_with(
            &mut ScriptedRandom::new(script.clone()),
            b"password123",
            b"hello",
            POLICY,
        )
        .unwrap();
        let b = seal_with(&mut ScriptedRandom::new(script), b"password123", b"hello", POLICY)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_text_roundtrip() {
        let armored = seal_text(b"pass", b"hello").unwrap();
        assert_eq!(open_text(b"pass", &armored).unwrap(), b"hello");
    }

    #[test]
    fn test_text_mode_matches_binary_bytes() {
        // The armored envelope must decode to exactly the bytes binary-mode
        // sealing would have produced under the same randomness.
        let script: Vec<u8> = (1u8..=28).collect();

        let armored =
            seal_text_with(&mut ScriptedRandom::new(script.clone()), b"pass", b"hello").unwrap();
        let binary = seal_with(
            &mut ScriptedRandom::new(script),
            b"pass",
            b"hello",
            PassphrasePolicy::TEXT,
        )
        .unwrap();

        assert_eq!(armor::unwrap(&armored).unwrap(), binary);
    }

    #[test]
    fn test_text_mode_allows_shorter_passphrase() {
        // Text mode minimum is 4; the same passphrase fails file mode.
        let armored = seal_text(b"abcd", b"hello").unwrap();
        assert_eq!(open_text(b"abcd", &armored).unwrap(), b"hello");

        let err = seal(b"abcd", b"hello", PassphrasePolicy::FILE)
            .expect_err("four characters must fail file mode");
        assert_eq!(err.kind, Some(ErrorKind::WeakPassphrase));
    }

    #[test]
    fn test_text_mode_rejects_bad_armor() {
        let err = open_text(b"pass", "not&valid&base64!").expect_err("expected malformed");
        assert_eq!(err.kind, Some(ErrorKind::MalformedEnvelope));
    }

    #[test]
    fn test_text_wrong_passphrase() {
        let armored = seal_text(b"password123", b"hello").unwrap();
        let err = open_text(b"wrongpass", &armored).expect_err("expected auth failure");
        assert_eq!(err.kind, Some(ErrorKind::AuthenticationFailed));
    }
}
