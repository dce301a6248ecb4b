//! Algorithm profiles
//!
//! A profile names the key algorithm, its generation parameter (modulus size
//! or named curve) and the digest used when signing. Profiles are plain data;
//! [`AlgorithmProfile::validate`] is the only place their constraints are
//! checked.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sigil_crypto::{asymmetric::rsa::SUPPORTED_KEY_BITS, DigestAlgorithm, NamedCurve};

use crate::error::{Error, Result};

pub const DEFAULT_RSA_BITS: usize = 2048;
pub const DEFAULT_CURVE: &str = "prime256v1";
pub const DEFAULT_DIGEST: &str = "sha256";

/// Key algorithm family
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    Rsa,
    Ecdsa,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::Rsa => f.write_str("RSA"),
            KeyKind::Ecdsa => f.write_str("ECDSA"),
        }
    }
}

/// Generation and signing parameters for one key algorithm.
///
/// Exactly one of `key_bits` (RSA) or `curve_name` (ECDSA) must be set,
/// matching `kind`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmProfile {
    pub kind: KeyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_bits: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve_name: Option<String>,
    #[serde(default = "default_digest")]
    pub digest_algorithm: String,
}

fn default_digest() -> String {
    DEFAULT_DIGEST.to_string()
}

/// Validated generation parameter of a profile
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySpec {
    Rsa { bits: usize },
    Ecdsa { curve: NamedCurve },
}

impl AlgorithmProfile {
    pub fn rsa(bits: usize) -> Self {
        Self {
            kind: KeyKind::Rsa,
            key_bits: Some(bits),
            curve_name: None,
            digest_algorithm: default_digest(),
        }
    }

    pub fn ecdsa(curve_name: impl Into<String>) -> Self {
        Self {
            kind: KeyKind::Ecdsa,
            key_bits: None,
            curve_name: Some(curve_name.into()),
            digest_algorithm: default_digest(),
        }
    }

    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest_algorithm = digest.into();
        self
    }

    /// Check every constraint of the profile
    pub fn validate(&self) -> Result<()> {
        self.key_spec()?;
        self.digest()?;
        Ok(())
    }

    /// The generation parameter, after checking it against `kind`
    pub fn key_spec(&self) -> Result<KeySpec> {
        match (self.kind, self.key_bits, self.curve_name.as_deref()) {
            (KeyKind::Rsa, Some(bits), None) => {
                if SUPPORTED_KEY_BITS.contains(&bits) {
                    Ok(KeySpec::Rsa { bits })
                } else {
                    Err(Error::InvalidConfiguration(format!(
                        "RSA key size {bits} is not one of {SUPPORTED_KEY_BITS:?}"
                    )))
                }
            }
            (KeyKind::Ecdsa, None, Some(name)) => name
                .parse::<NamedCurve>()
                .map(|curve| KeySpec::Ecdsa { curve })
                .map_err(|_| {
                    Error::InvalidConfiguration(format!(
                        "unsupported curve '{name}', expected prime256v1 or secp384r1"
                    ))
                }),
            (KeyKind::Rsa, _, _) => Err(Error::InvalidConfiguration(
                "RSA profile needs key_bits and no curve_name".to_string(),
            )),
            (KeyKind::Ecdsa, _, _) => Err(Error::InvalidConfiguration(
                "ECDSA profile needs curve_name and no key_bits".to_string(),
            )),
        }
    }

    pub fn digest(&self) -> Result<DigestAlgorithm> {
        self.digest_algorithm.parse().map_err(|_| {
            Error::InvalidConfiguration(format!(
                "unsupported digest algorithm '{}'",
                self.digest_algorithm
            ))
        })
    }

    /// Filesystem-safe name, e.g. `rsa-2048` or `ecdsa-prime256v1`
    pub fn label(&self) -> String {
        let parameter = match self.kind {
            KeyKind::Rsa => self
                .key_bits
                .map(|bits| bits.to_string())
                .unwrap_or_else(|| "unsized".to_string()),
            KeyKind::Ecdsa => self
                .curve_name
                .as_deref()
                .map(|name| {
                    name.chars()
                        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
                        .collect()
                })
                .unwrap_or_else(|| "uncurved".to_string()),
        };
        format!("{}-{}", self.kind.to_string().to_lowercase(), parameter)
    }
}

impl fmt::Display for AlgorithmProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.key_bits, self.curve_name.as_deref()) {
            (Some(bits), _) => write!(f, "{} {} bits, {}", self.kind, bits, self.digest_algorithm),
            (None, Some(curve)) => write!(f, "{} {}, {}", self.kind, curve, self.digest_algorithm),
            (None, None) => write!(f, "{}, {}", self.kind, self.digest_algorithm),
        }
    }
}

impl FromStr for AlgorithmProfile {
    type Err = Error;

    /// Parses `rsa[:<bits>[:<digest>]]` or `ecdsa[:<curve>[:<digest>]]`.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().split(':');
        let kind = parts.next().unwrap_or_default().to_ascii_lowercase();
        let parameter = parts.next().filter(|p| !p.is_empty());
        let digest = parts.next().filter(|p| !p.is_empty());
        if parts.next().is_some() {
            return Err(Error::InvalidConfiguration(format!(
                "too many ':' separated fields in '{s}'"
            )));
        }

        let profile = match kind.as_str() {
            "rsa" => {
                let bits = match parameter {
                    Some(p) => p.parse::<usize>().map_err(|_| {
                        Error::InvalidConfiguration(format!("invalid RSA key size '{p}'"))
                    })?,
                    None => DEFAULT_RSA_BITS,
                };
                AlgorithmProfile::rsa(bits)
            }
            "ecdsa" | "ec" => AlgorithmProfile::ecdsa(parameter.unwrap_or(DEFAULT_CURVE)),
            other => {
                return Err(Error::InvalidConfiguration(format!(
                    "unknown key algorithm '{other}', expected rsa or ecdsa"
                )))
            }
        };

        let profile = match digest {
            Some(d) => profile.with_digest(d),
            None => profile,
        };
        profile.validate()?;
        Ok(profile)
    }
}

/// Profiles exercised when none are configured: RSA-2048 and ECDSA P-256,
/// both with SHA-256.
pub fn default_profiles() -> Vec<AlgorithmProfile> {
    vec![
        AlgorithmProfile::rsa(DEFAULT_RSA_BITS),
        AlgorithmProfile::ecdsa(DEFAULT_CURVE),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_profiles() {
        for bits in [2048, 3072, 4096] {
            assert_eq!(AlgorithmProfile::rsa(bits).key_spec().unwrap(), KeySpec::Rsa { bits });
        }
        assert_eq!(
            AlgorithmProfile::ecdsa("prime256v1").key_spec().unwrap(),
            KeySpec::Ecdsa { curve: NamedCurve::P256 }
        );
        assert_eq!(
            AlgorithmProfile::ecdsa("secp384r1").with_digest("sha384").key_spec().unwrap(),
            KeySpec::Ecdsa { curve: NamedCurve::P384 }
        );
    }

    #[test]
    fn test_invalid_profiles() {
        let cases = vec![
            AlgorithmProfile::rsa(1024),
            AlgorithmProfile::ecdsa("secp256k1"),
            AlgorithmProfile::rsa(2048).with_digest("md5"),
            AlgorithmProfile {
                kind: KeyKind::Rsa,
                key_bits: Some(2048),
                curve_name: Some("prime256v1".to_string()),
                digest_algorithm: default_digest(),
            },
            AlgorithmProfile {
                kind: KeyKind::Ecdsa,
                key_bits: Some(256),
                curve_name: None,
                digest_algorithm: default_digest(),
            },
            AlgorithmProfile {
                kind: KeyKind::Rsa,
                key_bits: None,
                curve_name: None,
                digest_algorithm: default_digest(),
            },
        ];

        for profile in cases {
            let err = profile.validate().unwrap_err();
            assert!(
                matches!(err, Error::InvalidConfiguration(_)),
                "{profile:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_parse_compact_form() {
        assert_eq!("rsa".parse::<AlgorithmProfile>().unwrap(), AlgorithmProfile::rsa(2048));
        assert_eq!(
            "rsa:4096:sha512".parse::<AlgorithmProfile>().unwrap(),
            AlgorithmProfile::rsa(4096).with_digest("sha512")
        );
        assert_eq!(
            "ecdsa".parse::<AlgorithmProfile>().unwrap(),
            AlgorithmProfile::ecdsa("prime256v1")
        );
        assert_eq!(
            "ECDSA:secp384r1:sha384".parse::<AlgorithmProfile>().unwrap(),
            AlgorithmProfile::ecdsa("secp384r1").with_digest("sha384")
        );
        assert!("dsa:1024".parse::<AlgorithmProfile>().is_err());
        assert!("rsa:big".parse::<AlgorithmProfile>().is_err());
        assert!("rsa:2048:sha256:extra".parse::<AlgorithmProfile>().is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(AlgorithmProfile::rsa(3072).label(), "rsa-3072");
        assert_eq!(AlgorithmProfile::ecdsa("P-384").label(), "ecdsa-p-384");
    }

    #[test]
    fn test_deserialize_defaults_digest() {
        let profile: AlgorithmProfile =
            serde_json::from_str(r#"{"kind":"ecdsa","curve_name":"secp384r1"}"#).unwrap();
        assert_eq!(profile.digest_algorithm, "sha256");
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_default_profiles_are_valid() {
        for profile in default_profiles() {
            profile.validate().unwrap();
        }
    }
}
