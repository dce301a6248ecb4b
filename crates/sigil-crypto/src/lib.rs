//! Sigil cryptography wrappers
//!
//! Typed access to the RustCrypto RSA and ECDSA implementations used by the
//! sigil key tooling: key generation, PKCS#8 / SPKI encoding, prehash signing
//! and verification, and algorithm detection from encoded key material.

pub mod asymmetric;
pub mod digest;
pub mod encoding;
pub mod error;

pub use asymmetric::{ecdsa::EcdsaKey, ecdsa::EcdsaPublicKey, ecdsa::NamedCurve, rsa::Rsa};
pub use digest::DigestAlgorithm;
pub use encoding::{KeyAlgorithm, PemKind};
// The RSA public key type is part of the public surface of `asymmetric::rsa`.
pub use ::rsa::RsaPublicKey;
