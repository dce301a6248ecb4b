//! Signing and tri-state verification

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use sigil_crypto::DigestAlgorithm;

use crate::{
    error::{Error, Result},
    key::{PrivateKey, PublicKey},
    store::ExportedKey,
};

/// A detached signature together with the digest it was made over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureResult {
    pub payload_digest_alg: DigestAlgorithm,
    #[serde(with = "hex::serde")]
    pub signature_bytes: Vec<u8>,
}

impl SignatureResult {
    pub fn signature_hex(&self) -> String {
        hex::encode(&self.signature_bytes)
    }

    pub fn signature_base64(&self) -> String {
        BASE64.encode(&self.signature_bytes)
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    /// Deserialize from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }
}

/// Result of a verification attempt.
///
/// `Invalid` is a confirmed mismatch; `Error` means no verdict could be
/// reached. The two must never be treated alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    Valid,
    Invalid,
    Error(String),
}

impl VerificationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationOutcome::Valid)
    }

    /// `Ok(true)` for `Valid`, `Ok(false)` for `Invalid`,
    /// [`Error::VerificationError`] otherwise
    pub fn into_result(self) -> Result<bool> {
        match self {
            VerificationOutcome::Valid => Ok(true),
            VerificationOutcome::Invalid => Ok(false),
            VerificationOutcome::Error(reason) => Err(Error::VerificationError(reason)),
        }
    }
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationOutcome::Valid => f.write_str("VALID"),
            VerificationOutcome::Invalid => f.write_str("INVALID"),
            VerificationOutcome::Error(reason) => write!(f, "ERROR ({reason})"),
        }
    }
}

/// Stateless signer and verifier.
///
/// Verification operates on the exact payload bytes; callers own any text
/// encoding before bytes reach this service.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureService;

impl SignatureService {
    pub fn new() -> Self {
        Self
    }

    pub fn sign(
        &self,
        payload: &[u8],
        private_key: &PrivateKey,
        digest: DigestAlgorithm,
    ) -> Result<SignatureResult> {
        let signature_bytes = private_key.sign(digest, payload).map_err(|e| {
            Error::SigningFailed(format!("{} with {digest}: {e}", private_key.algorithm()))
        })?;
        tracing::debug!(
            algorithm = %private_key.algorithm(),
            digest = %digest,
            len = signature_bytes.len(),
            "signed payload"
        );
        Ok(SignatureResult {
            payload_digest_alg: digest,
            signature_bytes,
        })
    }

    /// Sign with a digest given by name, e.g. `sha384`
    pub fn sign_named(
        &self,
        payload: &[u8],
        private_key: &PrivateKey,
        digest: &str,
    ) -> Result<SignatureResult> {
        let digest = digest
            .parse::<DigestAlgorithm>()
            .map_err(|e| Error::SigningFailed(e.to_string()))?;
        self.sign(payload, private_key, digest)
    }

    pub fn verify(
        &self,
        payload: &[u8],
        signature: &SignatureResult,
        public_key: &PublicKey,
    ) -> VerificationOutcome {
        let outcome = match public_key.verify(
            signature.payload_digest_alg,
            payload,
            &signature.signature_bytes,
        ) {
            Ok(true) => VerificationOutcome::Valid,
            Ok(false) => VerificationOutcome::Invalid,
            Err(e) => VerificationOutcome::Error(e.to_string()),
        };

        if outcome.is_valid() {
            tracing::debug!(algorithm = %public_key.algorithm(), "signature verified");
        } else {
            tracing::warn!(algorithm = %public_key.algorithm(), outcome = %outcome, "signature not valid");
        }
        outcome
    }

    /// Verify against exported key material, public or private
    pub fn verify_exported(
        &self,
        payload: &[u8],
        signature: &SignatureResult,
        key: &ExportedKey,
    ) -> VerificationOutcome {
        match key.to_public_key() {
            Ok(public_key) => self.verify(payload, signature, &public_key),
            Err(e) => VerificationOutcome::Error(e.to_string()),
        }
    }
}
