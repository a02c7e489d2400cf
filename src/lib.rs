//! Sealbox - passphrase-based authenticated encryption envelopes
//!
//! Turns an arbitrary byte payload plus a passphrase into a self-contained,
//! tamper-evident envelope and back. The envelope is:
//!
//! ```text
//! [0:16)   salt             (random, public)
//! [16:28)  nonce            (random, public)
//! [28:end) ciphertext ‖ tag (tag is the trailing 16 bytes)
//! ```
//!
//! with a minimum valid length of 44 bytes, either as raw bytes (binary
//! mode) or base64-armored into one line of text (text mode). Keys are
//! derived with PBKDF2-HMAC-SHA-256 at 100,000 iterations; sealing uses
//! AES-256-GCM.
//!
//! Every seal/open is a pure function of its inputs plus one entropy draw;
//! passphrases and derived keys are zeroized on drop and never cached.
//! Intermediate copies made by the allocator or by terminal input cannot
//! be forcibly wiped; that is an inherent limitation, not a configurable
//! one.

#![forbid(unsafe_code)]

pub mod aead;
pub mod armor;
pub mod envelope;
pub mod error;
pub mod file_ops;
pub mod kdf;
pub mod passphrase;
pub mod rng;
