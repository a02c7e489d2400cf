//! File sealing/opening operations
//!
//! The file-facing layer over the envelope codec: reads a payload, obtains
//! a passphrase from a [`PassphraseReader`], and writes either a raw binary
//! envelope or its armored text form. Also owns the cosmetic output-naming
//! policy; the codec itself knows nothing about files.

use crate::envelope;
use crate::error::{ErrorCategory, ErrorKind, Result, SealboxError};
use crate::passphrase::{PassphrasePolicy, PassphraseReader};
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Suffix appended to sealed output file names.
pub const SEALED_SUFFIX: &str = ".sealed";

/// Prefix applied when opening a file whose name lacks [`SEALED_SUFFIX`].
pub const OPENED_PREFIX: &str = "unsealed-";

/// Default output path for sealing: the input name plus [`SEALED_SUFFIX`].
pub fn sealed_path(input: &Path) -> PathBuf {
    let mut name = input.file_name().map(OsString::from).unwrap_or_default();
    name.push(SEALED_SUFFIX);
    input.with_file_name(name)
}

/// Default output path for opening: strips [`SEALED_SUFFIX`] when present,
/// otherwise prefixes [`OPENED_PREFIX`] to the file name.
pub fn opened_path(input: &Path) -> PathBuf {
    let name = input.file_name().unwrap_or_default().to_string_lossy();
    match name.strip_suffix(SEALED_SUFFIX) {
        Some(stripped) if !stripped.is_empty() => input.with_file_name(stripped.to_string()),
        _ => input.with_file_name(format!("{}{}", OPENED_PREFIX, name)),
    }
}

/// Seal a file with a passphrase
///
/// Reads the payload from `input_path`, seals it using a passphrase from
/// `passphrase_reader`, and writes the envelope to `output_path`: raw
/// bytes in binary mode, a single armored line when `armor` is set. The
/// passphrase minimum follows the mode.
///
/// The output file is created with mode 0o600 (read/write for owner only)
/// on Unix systems.
pub fn seal_file(
    input_path: &Path,
    output_path: &Path,
    armor: bool,
    passphrase_reader: &mut dyn PassphraseReader,
) -> Result<()> {
    let plaintext = fs::read(input_path).map_err(|e| read_error(input_path, e))?;
    let passphrase = passphrase_reader.read_passphrase()?;

    let contents = if armor {
        envelope::seal_text(&passphrase, &plaintext)
            .map_err(|e| e.with_context("sealing failed"))?
            .into_bytes()
    } else {
        envelope::seal(&passphrase, &plaintext, PassphrasePolicy::FILE)
            .map_err(|e| e.with_context("sealing failed"))?
    };

    write_file_secure(output_path, &contents)
        .map_err(|e| e.with_context(format!("failed to write to {}", output_path.display())))?;
    Ok(())
}

/// Open a sealed file with a passphrase
///
/// Reads an envelope from `input_path` (armored text when `armor` is set,
/// raw bytes otherwise) and writes the recovered payload to `output_path`.
///
/// The output file is created with mode 0o600 (read/write for owner only)
/// on Unix systems.
pub fn open_file(
    input_path: &Path,
    output_path: &Path,
    armor: bool,
    passphrase_reader: &mut dyn PassphraseReader,
) -> Result<()> {
    let contents = fs::read(input_path).map_err(|e| read_error(input_path, e))?;
    let passphrase = passphrase_reader.read_passphrase()?;
    let plaintext = open_contents(&passphrase, &contents, armor)?;
    write_file_secure(output_path, &plaintext)
        .map_err(|e| e.with_context(format!("failed to write to {}", output_path.display())))?;
    Ok(())
}

/// Update a sealed file with new plaintext using the same passphrase
///
/// This function:
/// 1. Opens the existing envelope at `crypt_path` to validate the passphrase
/// 2. Reads new plaintext from `plain_path`
/// 3. Seals the new plaintext with the validated passphrase
/// 4. Atomically writes to `crypt_path` (tempfile + fsync + rename)
///
/// The atomic write ensures that either the old file or the new file exists,
/// never a partial/corrupted file. The passphrase validation prevents
/// accidental passphrase changes.
pub fn update_file(
    plain_path: &Path,
    crypt_path: &Path,
    armor: bool,
    passphrase_reader: &mut dyn PassphraseReader,
) -> Result<()> {
    let existing = fs::read(crypt_path).map_err(|e| read_error(crypt_path, e))?;
    let passphrase = passphrase_reader.read_passphrase()?;

    // Validate passphrase by opening the existing envelope (discard plaintext)
    open_contents(&passphrase, &existing, armor)?;

    let new_plaintext = fs::read(plain_path).map_err(|e| read_error(plain_path, e))?;
    let new_contents = if armor {
        envelope::seal_text(&passphrase, &new_plaintext)
            .map_err(|e| e.with_context("sealing failed"))?
            .into_bytes()
    } else {
        envelope::seal(&passphrase, &new_plaintext, PassphrasePolicy::FILE)
            .map_err(|e| e.with_context("sealing failed"))?
    };

    let crypt_dir = crypt_path.parent().ok_or_else(|| {
        SealboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::Io,
            "crypt_path has no parent directory",
        )
    })?;
    let mut temp_file = tempfile::NamedTempFile::new_in(crypt_dir).map_err(|e| {
        SealboxError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to create tempfile",
            e,
        )
    })?;

    temp_file.write_all(&new_contents).map_err(|e| {
        SealboxError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to write to tempfile",
            e,
        )
    })?;
    // Flush and fsync() such that the rename later, if it succeeds, will
    // always point to a valid file.
    temp_file.flush().map_err(|e| {
        SealboxError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to flush tempfile",
            e,
        )
    })?;
    temp_file.as_file().sync_all().map_err(|e| {
        SealboxError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to sync file prior to rename",
            e,
        )
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = temp_file
            .as_file()
            .metadata()
            .map_err(|e| {
                SealboxError::with_kind_and_source(
                    ErrorCategory::Internal,
                    ErrorKind::Io,
                    "failed to get tempfile metadata",
                    e,
                )
            })?
            .permissions();
        perms.set_mode(0o600);
        temp_file.as_file().set_permissions(perms).map_err(|e| {
            SealboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                "failed to set tempfile permissions",
                e,
            )
        })?;
    }
    temp_file.persist(crypt_path).map_err(|e| {
        SealboxError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            format!("failed to rename to target file {}", crypt_path.display()),
            e,
        )
    })?;
    Ok(())
}

fn open_contents(passphrase: &[u8], contents: &[u8], armor: bool) -> Result<Vec<u8>> {
    if armor {
        let armored = std::str::from_utf8(contents).map_err(|e| {
            SealboxError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::MalformedEnvelope,
                "armored input is not valid UTF-8",
                e,
            )
        })?;
        envelope::open_text(passphrase, armored).map_err(|e| e.with_context("failed to open"))
    } else {
        envelope::open(passphrase, contents).map_err(|e| e.with_context("failed to open"))
    }
}

/// Write file with secure permissions (0o600 on Unix)
fn write_file_secure(path: &Path, contents: &[u8]) -> Result<()> {
    #[cfg(unix)]
    {
        use std::fs::OpenOptions;
        use std::os::unix::fs::OpenOptionsExt;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .map_err(|e| {
                SealboxError::with_kind_and_source(
                    ErrorCategory::User,
                    ErrorKind::Io,
                    format!("failed to open {}", path.display()),
                    e,
                )
            })?;

        file.write_all(contents).map_err(|e| {
            SealboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("failed to write {}", path.display()),
                e,
            )
        })?;
        Ok(())
    }

    #[cfg(not(unix))]
    {
        fs::write(path, contents).map_err(|e| {
            SealboxError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::Io,
                format!("failed to write {}", path.display()),
                e,
            )
        })?;
        Ok(())
    }
}

fn read_error(path: &Path, err: io::Error) -> SealboxError {
    let category = if err.kind() == io::ErrorKind::NotFound {
        ErrorCategory::User
    } else {
        ErrorCategory::Internal
    };
    SealboxError::with_kind_and_source(
        category,
        ErrorKind::Io,
        format!("failed to read from {}", path.display()),
        err,
    )
}
