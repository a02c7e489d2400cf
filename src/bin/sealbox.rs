//! Sealbox CLI - passphrase-based encryption envelopes
//!
//! Command-line interface for sealing and opening files using
//! AES-256-GCM with PBKDF2-HMAC-SHA-256 key derivation.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

use sealbox::error::SealboxError;
use sealbox::file_ops;
use sealbox::passphrase::{PassphraseReader, ReaderPassphraseReader, TerminalPassphraseReader};

#[derive(Parser)]
#[command(name = "sealbox")]
#[command(version)]
#[command(about = "Passphrase-based encryption envelopes.", long_about = None)]
struct Cli {
    /// Read passphrase from stdin instead of from terminal
    #[arg(long, global = true)]
    passphrase_stdin: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seal a file into an envelope
    #[command(alias = "s")]
    Seal {
        /// Path to the file whose contents is to be sealed
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to write the envelope to (default: input plus ".sealed")
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Produce a base64-armored text envelope instead of raw bytes
        #[arg(long)]
        armor: bool,
    },

    /// Open an envelope back into the original file
    #[command(alias = "o")]
    Open {
        /// Path to the envelope to open
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to write the payload to (default: input without ".sealed")
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Treat the input as a base64-armored text envelope
        #[arg(long)]
        armor: bool,
    },

    /// Update a sealed file with new content, while validating
    /// that the passphrase is not accidentally changed.
    #[command(alias = "u")]
    Update {
        /// Path to the file whose contents is to be sealed
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to the existing envelope to replace
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Treat the envelope as base64-armored text
        #[arg(long)]
        armor: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Seal {
            input,
            output,
            armor,
        } => {
            let output = output.unwrap_or_else(|| file_ops::sealed_path(&input));
            let mut reader = get_passphrase_reader(cli.passphrase_stdin);
            file_ops::seal_file(&input, &output, armor, &mut *reader)
                .map(|()| report_output(&output))
        }
        Commands::Open {
            input,
            output,
            armor,
        } => {
            let output = output.unwrap_or_else(|| file_ops::opened_path(&input));
            let mut reader = get_passphrase_reader(cli.passphrase_stdin);
            file_ops::open_file(&input, &output, armor, &mut *reader)
                .map(|()| report_output(&output))
        }
        Commands::Update {
            input,
            output,
            armor,
        } => {
            let mut reader = get_passphrase_reader(cli.passphrase_stdin);
            file_ops::update_file(&input, &output, armor, &mut *reader)
        }
    };

    if let Err(e) = result {
        print_error_chain(&e);
        process::exit(1);
    }
}

fn report_output(path: &Path) {
    eprintln!("wrote {}", path.display());
}

fn print_error_chain(err: &SealboxError) {
    eprint!("Error: {}", err);
    let mut source: Option<&dyn std::error::Error> = err.source_error().map(|s| s as _);
    while let Some(s) = source {
        eprint!(": {}", s);
        source = s.source();
    }
    eprintln!();
}

fn get_passphrase_reader(use_stdin: bool) -> Box<dyn PassphraseReader> {
    if use_stdin {
        Box::new(ReaderPassphraseReader::new(Box::new(std::io::stdin())))
    } else {
        Box::new(TerminalPassphraseReader)
    }
}
