use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use super::BlobSink;
use crate::error::{Error, Result};

/// Type alias for the blob map
type BlobStorage = Arc<RwLock<HashMap<PathBuf, Vec<u8>>>>;

/// In-memory sink, keyed by location
#[derive(Clone, Default)]
pub struct MemorySink {
    blobs: BlobStorage,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, location: &Path) -> bool {
        self.blobs
            .read()
            .map(|blobs| blobs.contains_key(location))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.blobs.read().map(|blobs| blobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlobSink for MemorySink {
    fn write(&self, location: &Path, bytes: &[u8]) -> Result<()> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|_| Error::EncodingError("Failed to acquire write lock".to_string()))?;
        blobs.insert(location.to_path_buf(), bytes.to_vec());
        Ok(())
    }

    fn read(&self, location: &Path) -> Result<Vec<u8>> {
        let blobs = self
            .blobs
            .read()
            .map_err(|_| Error::EncodingError("Failed to acquire read lock".to_string()))?;
        blobs.get(location).cloned().ok_or_else(|| {
            Error::io(
                location,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such blob"),
            )
        })
    }

    fn remove(&self, location: &Path) -> std::io::Result<bool> {
        let mut blobs = self.blobs.write().map_err(|_| {
            std::io::Error::new(std::io::ErrorKind::Other, "sink lock poisoned")
        })?;
        Ok(blobs.remove(location).is_some())
    }

    fn remove_namespace(&self, _namespace: &Path) -> std::io::Result<bool> {
        // Namespaces are implicit in the key space
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink() {
        let sink = MemorySink::new();
        let location = Path::new("/run/key.pem");
        assert!(sink.is_empty());

        sink.write(location, b"material").unwrap();
        assert!(sink.contains(location));
        assert_eq!(sink.read(location).unwrap(), b"material");

        assert!(sink.remove(location).unwrap());
        assert!(!sink.remove(location).unwrap());
        assert!(sink.read(location).is_err());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_clones_share_storage() {
        let sink = MemorySink::new();
        let view = sink.clone();
        sink.write(Path::new("k"), b"v").unwrap();
        assert_eq!(view.len(), 1);
    }
}
