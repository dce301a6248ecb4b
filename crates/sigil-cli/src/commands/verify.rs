use std::{fs, path::PathBuf, process::ExitCode};

use colored::Colorize;
use sigil_key::{SignatureResult, SignatureService, VerificationOutcome};

use super::{read_input_file, read_key_file};
use crate::error::{CliError, CliResult};

/// Exit code for a verification outcome: 0 valid, 1 invalid, 2 error
pub fn exit_code(outcome: &VerificationOutcome) -> u8 {
    match outcome {
        VerificationOutcome::Valid => 0,
        VerificationOutcome::Invalid => 1,
        VerificationOutcome::Error(_) => 2,
    }
}

pub fn handle(file: PathBuf, signature: PathBuf, key: PathBuf) -> CliResult<ExitCode> {
    println!("{}", format!("Verifying signature of: {}", file.display()).cyan());

    let data = read_input_file(&file)?;
    println!("  File size: {} bytes", data.len());

    if !signature.exists() {
        return Err(CliError::FileNotFound(signature.display().to_string()));
    }
    let signature = SignatureResult::from_json(&fs::read_to_string(&signature)?)?;
    let exported = read_key_file(&key)?;

    let outcome = SignatureService::new().verify_exported(&data, &signature, &exported);
    match &outcome {
        VerificationOutcome::Valid => {
            println!("{} {}", "✓".green(), "Signature is VALID".green().bold());
        }
        VerificationOutcome::Invalid => {
            println!("{} {}", "✗".red(), "Signature is INVALID".red().bold());
            println!("{}", "Possible causes:".yellow());
            println!("  - the file was modified");
            println!("  - the signature belongs to another key");
        }
        VerificationOutcome::Error(reason) => {
            println!("{} {}", "⚠".yellow(), "Verification could not be performed".yellow().bold());
            println!("  {reason}");
        }
    }
    println!("  Digest: {}", signature.payload_digest_alg);

    Ok(ExitCode::from(exit_code(&outcome)))
}
