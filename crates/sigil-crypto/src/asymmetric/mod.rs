//! Asymmetric signature algorithms
//!
//! RSA (PKCS#1 v1.5) and ECDSA over NIST named curves. Key generation,
//! padding and curve arithmetic are delegated to the RustCrypto crates.

pub mod ecdsa;
pub mod rsa;

pub use self::ecdsa::{EcdsaKey, EcdsaPublicKey, NamedCurve};
pub use self::rsa::Rsa;
