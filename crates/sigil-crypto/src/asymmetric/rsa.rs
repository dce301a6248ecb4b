use pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{traits::PublicKeyParts, Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Sha256, Sha384, Sha512};

use crate::{
    digest::DigestAlgorithm,
    error::{Error, Result},
};

/// Modulus sizes accepted for generation
pub const SUPPORTED_KEY_BITS: [usize; 3] = [2048, 3072, 4096];

pub struct Rsa {
    inner: RsaPrivateKey,
}

impl From<RsaPrivateKey> for Rsa {
    fn from(value: RsaPrivateKey) -> Self {
        Self { inner: value }
    }
}

impl Rsa {
    /// Generate a new RSA key pair with specified bit length (2048, 3072, or 4096)
    pub fn generate(bits: usize) -> Result<Self> {
        if !SUPPORTED_KEY_BITS.contains(&bits) {
            return Err(Error::Other(format!("Unsupported RSA key size: {bits}")));
        }
        let mut rng = rand::thread_rng();
        let private_key = RsaPrivateKey::new(&mut rng, bits)?;
        Ok(private_key.into())
    }

    /// Import from PKCS8 DER format
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let private_key = RsaPrivateKey::from_pkcs8_der(der)?;
        Ok(private_key.into())
    }

    /// Import from PKCS8 PEM format
    pub fn from_pkcs8_pem(pem: &str) -> Result<Self> {
        let private_key = RsaPrivateKey::from_pkcs8_pem(pem)?;
        Ok(private_key.into())
    }
}

impl Rsa {
    /// Export private key to PKCS8 PEM format
    pub fn to_pkcs8_pem(&self) -> Result<String> {
        let pem = self.inner.to_pkcs8_pem(LineEnding::LF)?;
        Ok(pem.to_string())
    }

    /// Export public key to SPKI DER format
    pub fn to_spki_der(&self) -> Result<Vec<u8>> {
        let der = self.inner.to_public_key().to_public_key_der()?;
        Ok(der.as_bytes().to_vec())
    }

    /// Get the public key for this keypair
    pub fn public_key(&self) -> RsaPublicKey {
        self.inner.to_public_key()
    }

    /// Get key size in bits
    pub fn size(&self) -> usize {
        self.inner.size() * 8
    }

    /// Sign data using PKCS#1 v1.5 with the given digest
    pub fn sign(&self, digest: DigestAlgorithm, message: &[u8]) -> Result<Vec<u8>> {
        let mut rng = rand::thread_rng();
        let hashed = digest.digest(message);
        let signature = self
            .inner
            .sign_with_rng(&mut rng, pkcs1v15_scheme(digest), &hashed)?;
        Ok(signature)
    }
}

fn pkcs1v15_scheme(digest: DigestAlgorithm) -> Pkcs1v15Sign {
    match digest {
        DigestAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        DigestAlgorithm::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
        DigestAlgorithm::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
    }
}

/// Verify a PKCS#1 v1.5 signature.
///
/// `Ok(false)` means the signature is well formed but does not match;
/// a signature whose length differs from the modulus is rejected with
/// [`Error::MalformedSignature`].
pub fn verify(
    public_key: &RsaPublicKey,
    digest: DigestAlgorithm,
    message: &[u8],
    signature: &[u8],
) -> Result<bool> {
    if signature.len() != public_key.size() {
        return Err(Error::MalformedSignature(format!(
            "expected {} bytes for a {}-bit modulus, got {}",
            public_key.size(),
            public_key.size() * 8,
            signature.len()
        )));
    }

    let hashed = digest.digest(message);
    Ok(public_key
        .verify(pkcs1v15_scheme(digest), &hashed, signature)
        .is_ok())
}

/// Modulus length of a public key in bits
pub fn modulus_bits(public_key: &RsaPublicKey) -> usize {
    public_key.size() * 8
}

/// Import public key from SPKI DER format
pub fn public_key_from_spki_der(der: &[u8]) -> Result<RsaPublicKey> {
    RsaPublicKey::from_public_key_der(der).map_err(Into::into)
}

/// Export public key to SPKI DER format
pub fn public_key_to_spki_der(public_key: &RsaPublicKey) -> Result<Vec<u8>> {
    let der = public_key.to_public_key_der()?;
    Ok(der.as_bytes().to_vec())
}

/// Export public key to SPKI PEM format
pub fn public_key_to_spki_pem(public_key: &RsaPublicKey) -> Result<String> {
    let pem = public_key.to_public_key_pem(LineEnding::LF)?;
    Ok(pem)
}
