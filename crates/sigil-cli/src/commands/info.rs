use std::{fs, path::PathBuf};

use colored::Colorize;

use super::read_key_file;
use crate::error::CliResult;

pub fn handle(key: PathBuf) -> CliResult<()> {
    println!("{}", format!("Key information: {}", key.display()).cyan().bold());
    println!();

    let exported = read_key_file(&key)?;
    let public_key = exported.to_public_key()?;

    if exported.is_private() {
        println!("{}", "Key type: private".yellow());
        println!("Format: PKCS#8 PEM");
    } else {
        println!("{}", "Key type: public".green());
        println!("Format: SPKI PEM");
    }
    println!("Algorithm: {}", public_key.algorithm());
    println!("Key size: {} bits", public_key.size_bits());
    println!("SPKI SHA-256: {}", hex::encode(public_key.fingerprint_sha256()?));

    if exported.is_private() {
        println!();
        println!("{}", "⚠ Keep this private key file secret!".yellow().bold());
    }

    let metadata = fs::metadata(&key)?;
    println!();
    println!("{}", "File information:".cyan());
    println!("  File size: {} bytes", metadata.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{commands::generate, error::CliError};

    #[test]
    fn test_info_on_generated_keys() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        generate::handle("k".to_string(), "rsa".to_string(), Some(dir.to_path_buf())).unwrap();

        handle(dir.join("k_private.pem")).unwrap();
        handle(dir.join("k_public.pem")).unwrap();
    }

    #[test]
    fn test_info_on_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            handle(temp_dir.path().join("absent.pem")),
            Err(CliError::FileNotFound(_))
        ));
    }
}
