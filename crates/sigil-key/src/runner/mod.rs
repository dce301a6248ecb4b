//! End-to-end key lifecycle pipeline
//!
//! For every [`AlgorithmProfile`] the runner validates, generates, exports,
//! persists, signs and verifies. A failure in one profile is recorded in its
//! [`PipelineReport`] and never aborts the others. Persisted artifacts live in
//! a per-run [`ArtifactScope`] that is cleaned up once all profiles ran.

use std::{fmt, path::PathBuf};

use uuid::Uuid;

use crate::{
    error::{Error, Result},
    key::KeyPairGenerator,
    profile::AlgorithmProfile,
    signature::{SignatureResult, SignatureService, VerificationOutcome},
    store::{ArtifactScope, CleanupSummary, KeyStore},
};

pub const DEFAULT_MESSAGE: &str =
    "This is a test message for the digital signature demonstration.";

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Exact bytes that are signed and verified
    pub payload: Vec<u8>,
    /// Parent of the per-run artifact directory
    pub base_dir: PathBuf,
    /// Skip cleanup at the end of the run
    pub keep_artifacts: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            payload: DEFAULT_MESSAGE.as_bytes().to_vec(),
            base_dir: std::env::temp_dir(),
            keep_artifacts: false,
        }
    }
}

/// Step at which a pipeline stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Configure,
    Generate,
    Export,
    Persist,
    Sign,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Configure => "configure",
            PipelineStage::Generate => "generate",
            PipelineStage::Export => "export",
            PipelineStage::Persist => "persist",
            PipelineStage::Sign => "sign",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineStatus {
    /// The pipeline reached verification
    Verified(VerificationOutcome),
    Failed { stage: PipelineStage, reason: String },
}

impl PipelineStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, PipelineStatus::Verified(outcome) if outcome.is_valid())
    }
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStatus::Verified(outcome) => write!(f, "{outcome}"),
            PipelineStatus::Failed { stage, reason } => write!(f, "FAILED at {stage}: {reason}"),
        }
    }
}

/// Outcome of one profile
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub label: String,
    pub profile: AlgorithmProfile,
    pub status: PipelineStatus,
    /// Locations actually written, private key first
    pub artifacts: Vec<PathBuf>,
    pub key_id: Option<String>,
    pub signature: Option<SignatureResult>,
}

/// Outcome of a whole run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub artifact_dir: PathBuf,
    pub pipelines: Vec<PipelineReport>,
    pub cleanup: CleanupSummary,
    pub artifacts_kept: bool,
}

impl RunReport {
    /// True when every pipeline verified as valid
    pub fn all_valid(&self) -> bool {
        !self.pipelines.is_empty() && self.pipelines.iter().all(|p| p.status.is_valid())
    }

    pub fn valid_count(&self) -> usize {
        self.pipelines.iter().filter(|p| p.status.is_valid()).count()
    }
}

type StageResult<T> = std::result::Result<T, (PipelineStage, String)>;

fn at(stage: PipelineStage) -> impl FnOnce(Error) -> (PipelineStage, String) {
    move |e| (stage, e.to_string())
}

pub struct Runner {
    generator: KeyPairGenerator,
    store: KeyStore,
    signer: SignatureService,
    config: RunnerConfig,
}

impl Runner {
    pub fn new(
        generator: KeyPairGenerator,
        store: KeyStore,
        signer: SignatureService,
        config: RunnerConfig,
    ) -> Self {
        Self {
            generator,
            store,
            signer,
            config,
        }
    }

    /// Run every profile in order, then clean up the run's artifacts.
    ///
    /// Fails only when there is nothing to run; per-profile failures are
    /// reported in the returned [`RunReport`].
    pub fn run(&self, profiles: &[AlgorithmProfile]) -> Result<RunReport> {
        if profiles.is_empty() {
            return Err(Error::InvalidConfiguration(
                "no algorithm profiles configured".to_string(),
            ));
        }

        let mut scope = ArtifactScope::create(&self.config.base_dir);
        let run_id = scope.run_id();
        let artifact_dir = scope.root().to_path_buf();
        tracing::info!(run_id = %run_id, profiles = profiles.len(), "starting run");

        let pipelines = profiles
            .iter()
            .map(|profile| self.run_profile(profile, &mut scope))
            .collect::<Vec<_>>();

        let cleanup = scope.close(&self.store, self.config.keep_artifacts);

        Ok(RunReport {
            run_id,
            artifact_dir,
            pipelines,
            cleanup,
            artifacts_kept: self.config.keep_artifacts,
        })
    }

    /// One complete pipeline. Never fails; errors become
    /// [`PipelineStatus::Failed`].
    pub fn run_profile(
        &self,
        profile: &AlgorithmProfile,
        scope: &mut ArtifactScope,
    ) -> PipelineReport {
        let mut report = PipelineReport {
            label: profile.label(),
            profile: profile.clone(),
            status: PipelineStatus::Verified(VerificationOutcome::Invalid),
            artifacts: Vec::new(),
            key_id: None,
            signature: None,
        };

        report.status = match self.pipeline(profile, scope, &mut report) {
            Ok(outcome) => {
                tracing::info!(profile = %report.label, outcome = %outcome, "pipeline finished");
                PipelineStatus::Verified(outcome)
            }
            Err((stage, reason)) => {
                tracing::warn!(profile = %report.label, stage = %stage, reason = %reason, "pipeline failed");
                PipelineStatus::Failed { stage, reason }
            }
        };
        report
    }

    fn pipeline(
        &self,
        profile: &AlgorithmProfile,
        scope: &mut ArtifactScope,
        report: &mut PipelineReport,
    ) -> StageResult<VerificationOutcome> {
        profile.validate().map_err(at(PipelineStage::Configure))?;
        let digest = profile.digest().map_err(at(PipelineStage::Configure))?;

        let pair = self
            .generator
            .generate(profile)
            .map_err(at(PipelineStage::Generate))?;
        report.key_id = Some(pair.key_id_hex());

        let private = self
            .store
            .export_private(&pair)
            .map_err(at(PipelineStage::Export))?;
        let public = self
            .store
            .export_public(&pair)
            .map_err(at(PipelineStage::Export))?;

        let stem = scope.claim_stem(&report.label);
        for key in [&private, &public] {
            let location = scope.location_for(&stem, key.is_private());
            self.store
                .persist(key, &location)
                .map_err(at(PipelineStage::Persist))?;
            report.artifacts.push(location);
        }

        let signature = self
            .signer
            .sign(&self.config.payload, pair.private_key(), digest)
            .map_err(at(PipelineStage::Sign))?;
        pair.discard();

        // Verify against what was written, not the in-memory handle
        let outcome = match report.artifacts.last().map(|location| self.store.load(location)) {
            Some(Ok(persisted)) => {
                self.signer
                    .verify_exported(&self.config.payload, &signature, &persisted)
            }
            Some(Err(e)) => VerificationOutcome::Error(e.to_string()),
            None => VerificationOutcome::Error("public key was not persisted".to_string()),
        };
        report.signature = Some(signature);
        Ok(outcome)
    }
}
