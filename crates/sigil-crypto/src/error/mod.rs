use thiserror::Error;

/// Error type for the crypto wrappers
#[derive(Error, Debug)]
pub enum Error {
    #[error("PKCS8 error: {0}")]
    Pkcs8Error(#[from] pkcs8::Error),

    #[error("SPKI error: {0}")]
    SpkiError(#[from] pkcs8::spki::Error),

    #[error("DER error: {0}")]
    DerError(#[from] pkcs8::der::Error),

    #[error("RSA error: {0}")]
    RsaError(#[from] rsa::Error),

    #[error("Unsupported digest algorithm: {0}")]
    UnsupportedDigest(String),

    #[error("Unsupported curve: {0}")]
    UnsupportedCurve(String),

    /// Key material carries an algorithm OID this crate does not handle
    #[error("Unsupported key algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Signature bytes that cannot be interpreted for the given key
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
