//! Passphrase policy and acquisition
//!
//! The minimum-length contract exists once, as [`PassphrasePolicy`], with
//! one constant per mode. The two thresholds are inherited from the two
//! original call sites (file encryption: 8, text encryption: 4); neither
//! is assumed to be the "correct" one, both are surfaced as configuration.
//!
//! Passphrases travel as raw bytes (not necessarily UTF-8) wrapped in
//! `Zeroizing`, and are never persisted by this crate.

use crate::error::{ErrorCategory, ErrorKind, Result, SealboxError};
use std::io::{self, IsTerminal, Read, Write};
use zeroize::Zeroizing;

/// Minimum-length policy applied before a payload is sealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassphrasePolicy {
    /// Minimum passphrase length in characters.
    pub min_chars: usize,
}

impl PassphrasePolicy {
    /// Policy for binary (file) mode.
    pub const FILE: Self = Self { min_chars: 8 };

    /// Policy for text (armored) mode.
    pub const TEXT: Self = Self { min_chars: 4 };

    /// Check a passphrase against this policy.
    ///
    /// Length is measured in characters when the passphrase is valid
    /// UTF-8, in bytes otherwise (non-UTF-8 passphrases can arrive via
    /// stdin).
    pub fn validate(&self, passphrase: &[u8]) -> Result<()> {
        if passphrase.is_empty() {
            return Err(SealboxError::with_kind(
                ErrorCategory::User,
                ErrorKind::MissingInput,
                "no passphrase provided",
            ));
        }

        let length = match std::str::from_utf8(passphrase) {
            Ok(s) => s.chars().count(),
            Err(_) => passphrase.len(),
        };
        if length < self.min_chars {
            return Err(SealboxError::with_kind(
                ErrorCategory::User,
                ErrorKind::WeakPassphrase,
                format!(
                    "passphrase must be at least {} characters (got {})",
                    self.min_chars, length
                ),
            ));
        }

        Ok(())
    }
}

/// Trait for reading passphrases from various sources
pub trait PassphraseReader {
    /// Read a passphrase as arbitrary bytes (not necessarily UTF-8)
    ///
    /// Returns the passphrase wrapped in `Zeroizing` to ensure it is securely
    /// wiped from memory when dropped.
    fn read_passphrase(&mut self) -> Result<Zeroizing<Vec<u8>>>;
}

/// Returns a fixed passphrase (for testing)
pub struct ConstantPassphraseReader {
    passphrase: Zeroizing<Vec<u8>>,
}

impl ConstantPassphraseReader {
    pub fn new(passphrase: Vec<u8>) -> Self {
        Self {
            passphrase: Zeroizing::new(passphrase),
        }
    }
}

impl PassphraseReader for ConstantPassphraseReader {
    fn read_passphrase(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        Ok(Zeroizing::new((*self.passphrase).clone()))
    }
}

/// Reads passphrase from any io::Read source
pub struct ReaderPassphraseReader {
    reader: Box<dyn Read>,
}

impl ReaderPassphraseReader {
    pub fn new(reader: Box<dyn Read>) -> Self {
        Self { reader }
    }
}

impl PassphraseReader for ReaderPassphraseReader {
    fn read_passphrase(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        let mut data = Zeroizing::new(Vec::new());
        self.reader.read_to_end(&mut data).map_err(|e| {
            SealboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("error reading passphrase: {}", e),
                e,
            )
        })?;
        Ok(data)
    }
}

/// Reads passphrase from terminal with no echo
pub struct TerminalPassphraseReader;

impl TerminalPassphraseReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalPassphraseReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PassphraseReader for TerminalPassphraseReader {
    /// Read passphrase from terminal.
    ///
    /// Note: Terminal input is limited to UTF-8 due to rpassword library
    /// constraints. For non-UTF-8 passphrases, use --passphrase-stdin instead.
    fn read_passphrase(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        if !io::stdin().is_terminal() {
            return Err(SealboxError::with_kind(
                ErrorCategory::User,
                ErrorKind::PassphraseUnavailable,
                "cannot read passphrase from terminal - stdin is not a terminal",
            ));
        }

        io::stderr()
            .write_all(b"Passphrase (sealbox): ")
            .map_err(|e| {
                SealboxError::with_kind_and_source(
                    ErrorCategory::Internal,
                    ErrorKind::Io,
                    format!("failed to write prompt: {}", e),
                    e,
                )
            })?;
        io::stderr().flush().map_err(|e| {
            SealboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("failed to flush prompt: {}", e),
                e,
            )
        })?;

        // Read password *without echo*
        // Note: rpassword returns String (UTF-8 only), not zeroized
        let passphrase = rpassword::read_password().map_err(|e| {
            SealboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::PassphraseUnavailable,
                format!("failure reading passphrase: {}", e),
                e,
            )
        })?;

        Ok(Zeroizing::new(passphrase.into_bytes()))
    }
}

/// Wraps another PassphraseReader and caches the result
///
/// Provides "at most once" semantics - the upstream reader is called
/// only on the first invocation, and subsequent calls return the cached value.
/// The cached passphrase is wrapped in `Zeroizing` and will be securely wiped
/// when this reader is dropped.
pub struct CachingPassphraseReader {
    upstream: Box<dyn PassphraseReader>,
    cached: Option<Zeroizing<Vec<u8>>>,
}

impl CachingPassphraseReader {
    pub fn new(upstream: Box<dyn PassphraseReader>) -> Self {
        Self {
            upstream,
            cached: None,
        }
    }
}

impl PassphraseReader for CachingPassphraseReader {
    fn read_passphrase(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        if self.cached.is_none() {
            let passphrase = self.upstream.read_passphrase()?;
            self.cached = Some(passphrase);
        }
        let inner: &Vec<u8> = self.cached.as_ref().unwrap();
        Ok(Zeroizing::new(inner.clone()))
    }
}
