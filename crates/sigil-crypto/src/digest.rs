//! Digest algorithm selection
//!
//! Payloads are hashed here before signing; the signature schemes in
//! [`crate::asymmetric`] only ever see the resulting prehash.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::error::{Error, Result};

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// SHA-256 (32-byte output)
    #[default]
    Sha256,
    /// SHA-384 (48-byte output)
    Sha384,
    /// SHA-512 (64-byte output)
    Sha512,
}

impl DigestAlgorithm {
    pub const ALL: [DigestAlgorithm; 3] = [Self::Sha256, Self::Sha384, Self::Sha512];

    /// Canonical lowercase name, as used in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha384 => "sha384",
            DigestAlgorithm::Sha512 => "sha512",
        }
    }

    /// Output length in bytes
    pub fn output_len(&self) -> usize {
        match self {
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
        }
    }

    /// Hash `data` with this algorithm
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            DigestAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
            DigestAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
            DigestAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = Error;

    /// Accepts `sha256`, `SHA-256`, `sha_256` and the like.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "sha256" => Ok(DigestAlgorithm::Sha256),
            "sha384" => Ok(DigestAlgorithm::Sha384),
            "sha512" => Ok(DigestAlgorithm::Sha512),
            _ => Err(Error::UnsupportedDigest(s.to_string())),
        }
    }
}

/// SHA-256 of `data`, used for key fingerprints
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("sha256".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha256);
        assert_eq!("SHA-384".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha384);
        assert_eq!("sha_512".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha512);
    }

    #[test]
    fn test_parse_unsupported() {
        let err = "md5".parse::<DigestAlgorithm>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedDigest(name) if name == "md5"));
    }

    #[test]
    fn test_output_lengths() {
        for alg in DigestAlgorithm::ALL {
            assert_eq!(alg.digest(b"abc").len(), alg.output_len());
        }
    }

    #[test]
    fn test_known_sha256_vector() {
        let digest = DigestAlgorithm::Sha256.digest(b"abc");
        assert_eq!(
            hex::encode(digest),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_display_round_trip() {
        for alg in DigestAlgorithm::ALL {
            assert_eq!(alg.to_string().parse::<DigestAlgorithm>().unwrap(), alg);
        }
    }
}
