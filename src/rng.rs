//! Cryptographically secure randomness
//!
//! Salts and nonces are drawn through the [`RandomSource`] trait rather
//! than from an ambient global, so tests can substitute a scripted source
//! for reproducible envelope-layout checks. Production code always uses
//! [`OsRandom`].

use crate::error::{ErrorCategory, ErrorKind, Result, SealboxError};
use rand::TryRngCore;
use rand::rngs::OsRng;

/// Supplier of cryptographically secure random bytes.
pub trait RandomSource {
    /// Fill `buf` entirely with random bytes.
    fn fill(&mut self, buf: &mut [u8]) -> Result<()>;
}

/// The operating system's secure generator.
///
/// If the platform generator is unavailable the operation fails fatally;
/// there is no fallback to a weaker source.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        OsRng.try_fill_bytes(buf).map_err(|e| {
            SealboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::PlatformUnavailable,
                "secure random generator unavailable",
                e,
            )
        })
    }
}

/// Returns bytes from a fixed script, in order.
///
/// This source is ONLY for testing purposes to produce deterministic
/// envelopes. NEVER use it in production - always use [`OsRandom`].
pub struct ScriptedRandom {
    script: Vec<u8>,
    pos: usize,
}

impl ScriptedRandom {
    pub fn new(script: Vec<u8>) -> Self {
        Self { script, pos: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        let remaining = self.script.len() - self.pos;
        if buf.len() > remaining {
            return Err(SealboxError::with_kind(
                ErrorCategory::Internal,
                ErrorKind::PlatformUnavailable,
                "scripted random source exhausted",
            ));
        }
        buf.copy_from_slice(&self.script[self.pos..self.pos + buf.len()]);
        self.pos += buf.len();
        Ok(())
    }
}
