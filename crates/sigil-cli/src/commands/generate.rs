use std::path::PathBuf;

use colored::Colorize;
use sigil_key::{create_key_store, AlgorithmProfile, KeyPairGenerator, StoreConfig};

use crate::error::CliResult;

pub fn handle(name: String, algorithm: String, output: Option<PathBuf>) -> CliResult<()> {
    let profile: AlgorithmProfile = algorithm.parse()?;
    println!("{}", format!("Generating {profile} key pair...").cyan());

    let pair = KeyPairGenerator::new().generate(&profile)?;
    let store = create_key_store(StoreConfig::Filesystem);

    let output_dir = output.unwrap_or_else(|| PathBuf::from("."));

    let private_key_path = output_dir.join(format!("{name}_private.pem"));
    store.persist(&store.export_private(&pair)?, &private_key_path)?;
    println!("{} Private key saved to: {}", "✓".green(), private_key_path.display());

    let public_key_path = output_dir.join(format!("{name}_public.pem"));
    store.persist(&store.export_public(&pair)?, &public_key_path)?;
    println!("{} Public key saved to: {}", "✓".green(), public_key_path.display());

    println!();
    println!("{}", "Key information:".cyan());
    println!("  Algorithm: {}", pair.public_key().algorithm());
    println!("  Key size: {} bits", pair.public_key().size_bits());
    println!("  Digest: {}", profile.digest_algorithm);
    println!("  Key ID: {}", pair.key_id_hex());

    pair.discard();
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_generate_writes_both_keys() {
        let temp_dir = TempDir::new().unwrap();
        handle(
            "alice".to_string(),
            "ecdsa:secp384r1".to_string(),
            Some(temp_dir.path().to_path_buf()),
        )
        .unwrap();

        let private = std::fs::read_to_string(temp_dir.path().join("alice_private.pem")).unwrap();
        let public = std::fs::read_to_string(temp_dir.path().join("alice_public.pem")).unwrap();
        assert!(private.contains("BEGIN PRIVATE KEY"));
        assert!(public.contains("BEGIN PUBLIC KEY"));
    }

    #[test]
    fn test_generate_rejects_bad_profile() {
        let temp_dir = TempDir::new().unwrap();
        let result = handle(
            "bob".to_string(),
            "rsa:1024".to_string(),
            Some(temp_dir.path().to_path_buf()),
        );
        assert!(result.is_err());
        assert!(!temp_dir.path().join("bob_private.pem").exists());
    }
}
