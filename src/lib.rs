//! # sigil
//!
//! RSA and ECDSA key lifecycle toolkit
//!
//! ## Crates
//!
//! - `sigil_crypto` - RustCrypto wrappers: key generation, PKCS#8 / SPKI encoding, signing
//! - `sigil_key` - profiles, key store, signature service and the run pipeline
//!
//! The `sigil` binary lives in `sigil-cli`.

// Re-export all sub-crates
pub use sigil_crypto;
pub use sigil_key;
