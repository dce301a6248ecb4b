//! sigil key lifecycle command line tool

mod commands;
mod error;
mod logging;
mod settings;

use std::{path::PathBuf, process::ExitCode};

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use error::CliResult;
use settings::Settings;

#[derive(Parser)]
#[command(name = "sigil")]
#[command(about = "sigil - RSA and ECDSA key generation, signing and verification")]
#[command(version)]
struct Cli {
    /// Settings file (TOML); defaults to ./sigil.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log verbosity: -v info, -vv debug
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate, sign and verify with every configured algorithm
    Demo {
        /// Algorithm profile, e.g. rsa:2048:sha256 or ecdsa:secp384r1 (repeatable)
        #[arg(short, long = "algorithm")]
        algorithms: Vec<String>,

        /// Base directory for the run's artifacts
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep key files instead of removing them at the end
        #[arg(long)]
        keep: bool,

        /// Message to sign
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Generate a new key pair
    Generate {
        /// Key name
        #[arg(short, long)]
        name: String,

        /// Algorithm profile
        #[arg(short, long, default_value = "rsa")]
        algorithm: String,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Sign a file
    Sign {
        /// File to sign
        #[arg(short, long)]
        file: PathBuf,

        /// Private key PEM file
        #[arg(short, long)]
        key: PathBuf,

        /// Digest algorithm (sha256, sha384 or sha512)
        #[arg(short, long)]
        digest: Option<String>,

        /// Signature output file, defaults to <file>.sig
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify a signature; exit code 0 valid, 1 invalid, 2 error
    Verify {
        /// Signed file
        #[arg(short, long)]
        file: PathBuf,

        /// Signature file
        #[arg(short, long)]
        signature: PathBuf,

        /// Public or private key PEM file
        #[arg(short, long)]
        key: PathBuf,
    },

    /// Export the public key of a private key
    Export {
        /// Private key PEM file
        #[arg(short, long)]
        key: PathBuf,

        /// Public key output path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show key information
    Info {
        /// Key PEM file
        #[arg(short, long)]
        key: PathBuf,
    },
}

fn run(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Commands::Demo { algorithms, output, keep, message } => {
            let settings = Settings::load(cli.config.as_deref())?;
            let args = commands::demo::DemoArgs {
                algorithms,
                output,
                keep,
                message,
            };
            commands::demo::handle(settings, args)
        }
        Commands::Generate { name, algorithm, output } => {
            commands::generate::handle(name, algorithm, output)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Sign { file, key, digest, output } => {
            commands::sign::handle(file, key, digest, output)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Verify { file, signature, key } => commands::verify::handle(file, signature, key),
        Commands::Export { key, output } => {
            commands::export::handle(key, output)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Info { key } => {
            commands::info::handle(key)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_demo_flags() {
        let cli = Cli::try_parse_from([
            "sigil", "-vv", "demo", "-a", "rsa:3072", "-a", "ecdsa", "--keep", "-m", "hi",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Demo { algorithms, keep, message, output } => {
                assert_eq!(algorithms, vec!["rsa:3072", "ecdsa"]);
                assert!(keep);
                assert_eq!(message.as_deref(), Some("hi"));
                assert!(output.is_none());
            }
            _ => panic!("expected demo"),
        }
    }
}
