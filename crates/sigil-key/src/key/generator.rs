use sigil_crypto::{EcdsaKey, Rsa};

use super::{KeyPair, PrivateKey};
use crate::{
    error::{Error, Result},
    profile::{AlgorithmProfile, KeySpec},
};

/// Produces key pairs from algorithm profiles.
///
/// Generation is all-or-nothing and never retried: a failure is reported
/// for that profile and nothing partial is returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyPairGenerator;

impl KeyPairGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, profile: &AlgorithmProfile) -> Result<KeyPair> {
        let spec = profile.key_spec()?;
        profile.digest()?;

        tracing::debug!(profile = %profile, "generating key pair");

        let private_key = match spec {
            KeySpec::Rsa { bits } => Rsa::generate(bits)
                .map(PrivateKey::Rsa)
                .map_err(|e| Error::KeyGenerationFailed(format!("RSA-{bits}: {e}")))?,
            KeySpec::Ecdsa { curve } => EcdsaKey::generate(curve)
                .map(PrivateKey::Ecdsa)
                .map_err(|e| Error::KeyGenerationFailed(format!("ECDSA {curve}: {e}")))?,
        };

        let pair = KeyPair::new(profile.clone(), private_key)
            .map_err(|e| Error::KeyGenerationFailed(e.to_string()))?;

        tracing::info!(
            profile = %profile.label(),
            key_id = %pair.key_id_hex(),
            "generated key pair"
        );
        Ok(pair)
    }
}

#[cfg(test)]
mod tests {
    use sigil_crypto::{KeyAlgorithm, NamedCurve};

    use super::*;

    #[test]
    fn test_generate_rsa() {
        let pair = KeyPairGenerator::new()
            .generate(&AlgorithmProfile::rsa(2048))
            .unwrap();
        assert_eq!(pair.private_key().algorithm(), KeyAlgorithm::Rsa);
        assert_eq!(pair.public_key().size_bits(), 2048);
        assert_eq!(pair.profile(), &AlgorithmProfile::rsa(2048));
    }

    #[test]
    fn test_generate_ecdsa_curves() {
        let generator = KeyPairGenerator::new();
        let p256 = generator.generate(&AlgorithmProfile::ecdsa("prime256v1")).unwrap();
        assert_eq!(p256.public_key().algorithm(), KeyAlgorithm::Ecdsa(NamedCurve::P256));

        let p384 = generator.generate(&AlgorithmProfile::ecdsa("secp384r1")).unwrap();
        assert_eq!(p384.public_key().algorithm(), KeyAlgorithm::Ecdsa(NamedCurve::P384));
    }

    #[test]
    fn test_distinct_pairs() {
        let generator = KeyPairGenerator::new();
        let profile = AlgorithmProfile::ecdsa("prime256v1");
        let a = generator.generate(&profile).unwrap();
        let b = generator.generate(&profile).unwrap();
        assert_ne!(a.key_id_hex(), b.key_id_hex());
    }

    #[test]
    fn test_invalid_profile_is_configuration_error() {
        let generator = KeyPairGenerator::new();
        let err = generator.generate(&AlgorithmProfile::rsa(1000)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));

        let err = generator
            .generate(&AlgorithmProfile::ecdsa("brainpoolP256r1"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));

        let err = generator
            .generate(&AlgorithmProfile::ecdsa("prime256v1").with_digest("sha1"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }
}
