use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::{CleanupSummary, KeyStore};

/// Per-run artifact namespace.
///
/// Every location handed out is recorded so that [`ArtifactScope::close`]
/// can remove exactly what this run may have written, whether or not the
/// write happened.
#[derive(Debug)]
pub struct ArtifactScope {
    run_id: Uuid,
    root: PathBuf,
    stems: Vec<String>,
    locations: Vec<PathBuf>,
}

impl ArtifactScope {
    /// New scope rooted at `<base_dir>/sigil-run-<uuid>`
    pub fn create(base_dir: impl AsRef<Path>) -> Self {
        let run_id = Uuid::new_v4();
        let root = base_dir
            .as_ref()
            .join(format!("sigil-run-{}", run_id.simple()));
        tracing::debug!(run_id = %run_id, root = %root.display(), "opened artifact scope");
        Self {
            run_id,
            root,
            stems: Vec::new(),
            locations: Vec::new(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reserve a file stem for one pipeline.
    ///
    /// A label that was already claimed in this run gets a `-2`, `-3`, ...
    /// suffix so no two pipelines share artifact files.
    pub fn claim_stem(&mut self, label: &str) -> String {
        let mut stem = label.to_string();
        let mut n = 1;
        while self.stems.contains(&stem) {
            n += 1;
            stem = format!("{label}-{n}");
        }
        self.stems.push(stem.clone());
        stem
    }

    /// Location for one artifact, e.g. `rsa-2048_private.pem`
    pub fn location_for(&mut self, label: &str, is_private: bool) -> PathBuf {
        let suffix = if is_private { "private" } else { "public" };
        let location = self.root.join(format!("{label}_{suffix}.pem"));
        if !self.locations.contains(&location) {
            self.locations.push(location.clone());
        }
        location
    }

    pub fn locations(&self) -> &[PathBuf] {
        &self.locations
    }

    /// Remove every recorded location, then the run directory if empty.
    ///
    /// With `keep` set nothing is removed and an empty summary is returned.
    pub fn close(self, store: &KeyStore, keep: bool) -> CleanupSummary {
        if keep {
            tracing::info!(root = %self.root.display(), "keeping run artifacts");
            return CleanupSummary::default();
        }
        let summary = store.cleanup(&self.locations);
        store.remove_namespace(&self.root);
        tracing::info!(
            run_id = %self.run_id,
            removed = summary.removed,
            missing = summary.missing,
            failed = summary.failed,
            "cleaned up run artifacts"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{
        key::KeyPairGenerator,
        profile::AlgorithmProfile,
        store::{create_key_store, ExportedKey, StoreConfig},
    };

    fn public_key() -> ExportedKey {
        let pair = KeyPairGenerator::new()
            .generate(&AlgorithmProfile::ecdsa("prime256v1"))
            .unwrap();
        create_key_store(StoreConfig::Memory).export_public(&pair).unwrap()
    }

    #[test]
    fn test_locations_are_namespaced_and_recorded() {
        let temp_dir = TempDir::new().unwrap();
        let mut scope = ArtifactScope::create(temp_dir.path());
        let other = ArtifactScope::create(temp_dir.path());
        assert_ne!(scope.root(), other.root());

        let private = scope.location_for("rsa-2048", true);
        let public = scope.location_for("rsa-2048", false);
        assert!(private.starts_with(scope.root()));
        assert!(private.ends_with("rsa-2048_private.pem"));
        assert!(public.ends_with("rsa-2048_public.pem"));

        scope.location_for("rsa-2048", true);
        assert_eq!(scope.locations().len(), 2);
    }

    #[test]
    fn test_repeated_labels_get_distinct_stems() {
        let temp_dir = TempDir::new().unwrap();
        let mut scope = ArtifactScope::create(temp_dir.path());

        assert_eq!(scope.claim_stem("rsa-2048"), "rsa-2048");
        assert_eq!(scope.claim_stem("rsa-2048"), "rsa-2048-2");
        assert_eq!(scope.claim_stem("ecdsa-prime256v1"), "ecdsa-prime256v1");
        assert_eq!(scope.claim_stem("rsa-2048"), "rsa-2048-3");

        let first = scope.location_for("rsa-2048", false);
        let second = scope.location_for("rsa-2048-2", false);
        assert_ne!(first, second);
        assert_eq!(scope.locations().len(), 2);
    }

    #[test]
    fn test_close_removes_artifacts_and_run_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_key_store(StoreConfig::Filesystem);
        let mut scope = ArtifactScope::create(temp_dir.path());

        let key = public_key();
        let written = scope.location_for("ecdsa-prime256v1", false);
        store.persist(&key, &written).unwrap();
        let _never_written = scope.location_for("ecdsa-prime256v1", true);

        let root = scope.root().to_path_buf();
        let summary = scope.close(&store, false);
        assert_eq!(summary, CleanupSummary { removed: 1, missing: 1, failed: 0 });
        assert!(!written.exists());
        assert!(!root.exists());
    }

    #[test]
    fn test_close_with_keep() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_key_store(StoreConfig::Filesystem);
        let mut scope = ArtifactScope::create(temp_dir.path());

        let key = public_key();
        let written = scope.location_for("ecdsa-prime256v1", false);
        store.persist(&key, &written).unwrap();

        assert_eq!(scope.close(&store, true), CleanupSummary::default());
        assert!(written.exists());
    }
}
