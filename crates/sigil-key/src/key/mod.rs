//! Key handles
//!
//! [`PrivateKey`] is the opaque signing handle: it is neither `Clone` nor
//! serializable and its `Debug` output is redacted. The only way to obtain
//! its bytes is an explicit export through [`crate::store::KeyStore`].

mod generator;

use std::fmt;

pub use generator::KeyPairGenerator;
use sigil_crypto::{
    asymmetric::rsa as rsa_ops,
    digest::sha256,
    encoding::{algorithm_from_pkcs8_der, algorithm_from_spki_der},
    DigestAlgorithm, EcdsaKey, EcdsaPublicKey, KeyAlgorithm, Rsa, RsaPublicKey,
};

use crate::{
    error::{Error, Result},
    profile::AlgorithmProfile,
};

// ============================================================================
// Private key handle
// ============================================================================

pub enum PrivateKey {
    Rsa(Rsa),
    Ecdsa(EcdsaKey),
}

impl PrivateKey {
    /// Import from PKCS#8 DER, detecting the algorithm from its OID
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let algorithm = algorithm_from_pkcs8_der(der)
            .map_err(|e| Error::ImportFailed(format!("unrecognised private key: {e}")))?;

        let key = match algorithm {
            KeyAlgorithm::Rsa => Rsa::from_pkcs8_der(der).map(PrivateKey::Rsa),
            KeyAlgorithm::Ecdsa(curve) => EcdsaKey::from_pkcs8_der(curve, der).map(PrivateKey::Ecdsa),
        };
        key.map_err(|e| Error::ImportFailed(format!("{algorithm} PKCS8 import failed: {e}")))
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            PrivateKey::Rsa(_) => KeyAlgorithm::Rsa,
            PrivateKey::Ecdsa(key) => KeyAlgorithm::Ecdsa(key.curve()),
        }
    }

    /// Derive the matching public key
    pub fn public_key(&self) -> PublicKey {
        match self {
            PrivateKey::Rsa(key) => PublicKey::Rsa(key.public_key()),
            PrivateKey::Ecdsa(key) => PublicKey::Ecdsa(key.public_key()),
        }
    }

    pub(crate) fn to_pkcs8_pem(&self) -> sigil_crypto::error::Result<String> {
        match self {
            PrivateKey::Rsa(key) => key.to_pkcs8_pem(),
            PrivateKey::Ecdsa(key) => key.to_pkcs8_pem(),
        }
    }

    pub(crate) fn sign(
        &self,
        digest: DigestAlgorithm,
        payload: &[u8],
    ) -> sigil_crypto::error::Result<Vec<u8>> {
        match self {
            PrivateKey::Rsa(key) => key.sign(digest, payload),
            PrivateKey::Ecdsa(key) => key.sign(digest, payload),
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("algorithm", &self.algorithm())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Public key
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum PublicKey {
    Rsa(RsaPublicKey),
    Ecdsa(EcdsaPublicKey),
}

impl PublicKey {
    /// Import from SPKI DER, detecting the algorithm from its OID
    pub fn from_spki_der(der: &[u8]) -> Result<Self> {
        let algorithm = algorithm_from_spki_der(der)
            .map_err(|e| Error::ImportFailed(format!("unrecognised public key: {e}")))?;

        let key = match algorithm {
            KeyAlgorithm::Rsa => rsa_ops::public_key_from_spki_der(der).map(PublicKey::Rsa),
            KeyAlgorithm::Ecdsa(curve) => {
                EcdsaPublicKey::from_spki_der(curve, der).map(PublicKey::Ecdsa)
            }
        };
        key.map_err(|e| Error::ImportFailed(format!("{algorithm} SPKI import failed: {e}")))
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            PublicKey::Rsa(_) => KeyAlgorithm::Rsa,
            PublicKey::Ecdsa(key) => KeyAlgorithm::Ecdsa(key.curve()),
        }
    }

    /// Modulus length for RSA, field size for EC keys
    pub fn size_bits(&self) -> usize {
        match self {
            PublicKey::Rsa(key) => rsa_ops::modulus_bits(key),
            PublicKey::Ecdsa(key) => key.curve().field_bits(),
        }
    }

    pub fn to_spki_der(&self) -> Result<Vec<u8>> {
        let der = match self {
            PublicKey::Rsa(key) => rsa_ops::public_key_to_spki_der(key),
            PublicKey::Ecdsa(key) => key.to_spki_der(),
        };
        der.map_err(|e| Error::ExportFailed(format!("SPKI DER export failed: {e}")))
    }

    pub fn to_spki_pem(&self) -> Result<String> {
        let pem = match self {
            PublicKey::Rsa(key) => rsa_ops::public_key_to_spki_pem(key),
            PublicKey::Ecdsa(key) => key.to_spki_pem(),
        };
        pem.map_err(|e| Error::ExportFailed(format!("SPKI PEM export failed: {e}")))
    }

    /// SHA-256 over the SPKI DER encoding
    pub fn fingerprint_sha256(&self) -> Result<[u8; 32]> {
        Ok(sha256(&self.to_spki_der()?))
    }

    pub(crate) fn verify(
        &self,
        digest: DigestAlgorithm,
        payload: &[u8],
        signature: &[u8],
    ) -> sigil_crypto::error::Result<bool> {
        match self {
            PublicKey::Rsa(key) => rsa_ops::verify(key, digest, payload, signature),
            PublicKey::Ecdsa(key) => key.verify(digest, payload, signature),
        }
    }
}

// ============================================================================
// Key pair
// ============================================================================

/// A generated key pair, exclusively owned by the pipeline that created it
#[derive(Debug)]
pub struct KeyPair {
    profile: AlgorithmProfile,
    private_key: PrivateKey,
    public_key: PublicKey,
    public_key_material: Vec<u8>,
}

impl KeyPair {
    pub(crate) fn new(profile: AlgorithmProfile, private_key: PrivateKey) -> Result<Self> {
        let public_key = private_key.public_key();
        let public_key_material = public_key.to_spki_der()?;
        Ok(Self {
            profile,
            private_key,
            public_key,
            public_key_material,
        })
    }

    pub fn profile(&self) -> &AlgorithmProfile {
        &self.profile
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Public key in SPKI DER form
    pub fn public_key_material(&self) -> &[u8] {
        &self.public_key_material
    }

    /// First 16 bytes of the SPKI SHA-256 fingerprint, hex encoded
    pub fn key_id_hex(&self) -> String {
        hex::encode(&sha256(&self.public_key_material)[.. 16])
    }

    /// Drop the key pair; secret material is zeroized by the underlying key types
    pub fn discard(self) {
        tracing::debug!(profile = %self.profile.label(), "discarding key pair");
    }
}
