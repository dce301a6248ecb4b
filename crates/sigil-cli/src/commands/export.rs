use std::{fs, path::{Path, PathBuf}};

use colored::Colorize;

use super::read_key_file;
use crate::error::{CliError, CliResult};

/// `alice_private.pem` becomes `alice_public.pem` next to the input
fn default_output(key: &Path) -> PathBuf {
    let stem = key.file_stem().unwrap_or_default().to_string_lossy();
    let name = stem.strip_suffix("_private").unwrap_or(&*stem);
    key.with_file_name(format!("{name}_public.pem"))
}

pub fn handle(key: PathBuf, output: Option<PathBuf>) -> CliResult<()> {
    println!("{}", format!("Exporting public key from: {}", key.display()).cyan());

    let exported = read_key_file(&key)?;
    if !exported.is_private() {
        return Err(CliError::InvalidInput(format!(
            "{} is not a private key",
            key.display()
        )));
    }
    let public_key = exported.to_private_key()?.public_key();

    let output_file = output.unwrap_or_else(|| default_output(&key));
    fs::write(&output_file, public_key.to_spki_pem()?)?;
    println!("{} Public key exported to: {}", "✓".green(), output_file.display());

    println!();
    println!("{}", "Public key information:".cyan());
    println!("  Algorithm: {}", public_key.algorithm());
    println!("  Key size: {} bits", public_key.size_bits());
    println!("  Fingerprint: {}", hex::encode(&public_key.fingerprint_sha256()?[.. 8]));

    Ok(())
}
