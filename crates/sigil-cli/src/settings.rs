use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;
use sigil_key::{default_profiles, AlgorithmProfile, StoreConfig, DEFAULT_MESSAGE};

use crate::error::CliResult;

/// Demo settings.
///
/// Sources, later wins: built-in defaults, `sigil.toml` in the working
/// directory (or the `--config` file, which must exist), then `SIGIL_*`
/// environment variables with `__` between nested keys.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "std::env::temp_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub keep_artifacts: bool,
    #[serde(default = "default_message")]
    pub message: String,
    #[serde(default)]
    pub storage: StoreConfig,
    #[serde(default = "default_profiles")]
    pub profiles: Vec<AlgorithmProfile>,
}

fn default_message() -> String {
    DEFAULT_MESSAGE.to_string()
}

impl Settings {
    pub fn load(config_path: Option<&Path>) -> CliResult<Self> {
        let builder = Config::builder();
        let builder = match config_path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("sigil").required(false)),
        };

        let settings = builder
            .add_source(
                Environment::with_prefix("SIGIL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::error::CliError;

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sigil.toml");
        std::fs::write(
            &path,
            r#"
output_dir = "/var/tmp/sigil"
keep_artifacts = true
message = "hello"
storage = "memory"

[[profiles]]
kind = "ecdsa"
curve_name = "secp384r1"
digest_algorithm = "sha384"
"#,
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.output_dir, PathBuf::from("/var/tmp/sigil"));
        assert!(settings.keep_artifacts);
        assert_eq!(settings.message, "hello");
        assert_eq!(settings.storage, StoreConfig::Memory);
        assert_eq!(
            settings.profiles,
            vec![AlgorithmProfile::ecdsa("secp384r1").with_digest("sha384")]
        );
    }

    #[test]
    fn test_defaults_fill_missing_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.toml");
        std::fs::write(&path, "").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.message, DEFAULT_MESSAGE);
        assert_eq!(settings.storage, StoreConfig::Filesystem);
        assert_eq!(settings.profiles, default_profiles());
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        let err = Settings::load(Some(&temp_dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
