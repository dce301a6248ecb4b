pub mod error;
pub mod key;
pub mod profile;
pub mod runner;
pub mod signature;
pub mod store;

// Re-export core functionality
pub use error::{Error, Result};
pub use key::{KeyPair, KeyPairGenerator, PrivateKey, PublicKey};
pub use profile::{default_profiles, AlgorithmProfile, KeyKind, KeySpec};
// Re-export pipeline types
pub use runner::{
    PipelineReport, PipelineStage, PipelineStatus, RunReport, Runner, RunnerConfig,
    DEFAULT_MESSAGE,
};
// Re-export signature types
pub use signature::{SignatureResult, SignatureService, VerificationOutcome};
pub use sigil_crypto::{DigestAlgorithm, KeyAlgorithm, NamedCurve};
// Re-export store types
pub use store::{
    create_key_store, ArtifactScope, BlobSink, CleanupSummary, ExportedKey, FileSink, KeyFormat,
    KeyStore, MemorySink, StoreConfig,
};
