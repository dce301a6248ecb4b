use std::{fs, path::PathBuf};

use colored::Colorize;
use sigil_key::{profile::DEFAULT_DIGEST, SignatureService};

use super::{read_input_file, read_key_file};
use crate::error::{CliError, CliResult};

pub fn handle(
    file: PathBuf,
    key: PathBuf,
    digest: Option<String>,
    output: Option<PathBuf>,
) -> CliResult<()> {
    println!("{}", format!("Signing file: {}", file.display()).cyan());

    let data = read_input_file(&file)?;
    println!("  File size: {} bytes", data.len());

    let exported = read_key_file(&key)?;
    if !exported.is_private() {
        return Err(CliError::InvalidInput(format!(
            "{} is not a private key",
            key.display()
        )));
    }
    let private_key = exported.to_private_key()?;
    println!("  Private key: {}", key.display());

    let digest = digest.unwrap_or_else(|| DEFAULT_DIGEST.to_string());
    let signature = SignatureService::new().sign_named(&data, &private_key, &digest)?;

    let output_file = output.unwrap_or_else(|| {
        let mut name = file.clone().into_os_string();
        name.push(".sig");
        PathBuf::from(name)
    });
    fs::write(&output_file, signature.to_json()?)?;

    println!("{} Signature saved to: {}", "✓".green(), output_file.display());
    println!();
    println!("{}", "Signature information:".cyan());
    println!("  Algorithm: {}", private_key.algorithm());
    println!("  Digest: {}", signature.payload_digest_alg);
    println!("  Length: {} bytes", signature.signature_bytes.len());

    Ok(())
}
