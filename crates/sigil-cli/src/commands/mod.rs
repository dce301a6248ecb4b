pub mod demo;
pub mod export;
pub mod generate;
pub mod info;
pub mod sign;
pub mod verify;

use std::{fs, path::Path};

use sigil_key::ExportedKey;

use crate::error::{CliError, CliResult};

/// Read a PEM key file, failing early when it does not exist
pub(crate) fn read_key_file(path: &Path) -> CliResult<ExportedKey> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    let pem = fs::read_to_string(path)?;
    Ok(ExportedKey::from_pem(pem)?)
}

pub(crate) fn read_input_file(path: &Path) -> CliResult<Vec<u8>> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    Ok(fs::read(path)?)
}
