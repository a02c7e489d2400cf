//! Text armoring for binary envelopes
//!
//! Text mode carries the exact binary envelope bytes through standard
//! base64 (padded, `+/` alphabet - what a browser's `btoa` emits) as a
//! single line with no embedded delimiters or whitespace, so it can be
//! copy-pasted intact. Decoding rejects anything outside the alphabet
//! before any cryptographic work happens.

use crate::error::{ErrorCategory, ErrorKind, Result, SealboxError};
use base64::{Engine, engine::general_purpose::STANDARD};

/// Encode envelope bytes as a single-line armored string.
pub fn wrap(envelope: &[u8]) -> String {
    STANDARD.encode(envelope)
}

/// Decode an armored string back to envelope bytes.
pub fn unwrap(armored: &str) -> Result<Vec<u8>> {
    STANDARD.decode(armored.trim_end_matches(['\r', '\n'])).map_err(|e| {
        SealboxError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::MalformedEnvelope,
            format!("input is not valid base64: {}", e),
            e,
        )
    })
}
