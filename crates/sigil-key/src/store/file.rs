use std::{
    fs,
    io::ErrorKind,
    path::Path,
    sync::{Arc, RwLock},
};

use super::BlobSink;
use crate::error::{Error, Result};

/// Filesystem sink; parent directories are created on write
#[derive(Clone, Default)]
pub struct FileSink {
    lock: Arc<RwLock<()>>,
}

impl FileSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobSink for FileSink {
    fn write(&self, location: &Path, bytes: &[u8]) -> Result<()> {
        let _guard = self
            .lock
            .write()
            .map_err(|_| Error::EncodingError("Failed to acquire write lock".to_string()))?;

        if let Some(parent) = location.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(location, bytes).map_err(|e| Error::io(location, e))
    }

    fn read(&self, location: &Path) -> Result<Vec<u8>> {
        let _guard = self
            .lock
            .read()
            .map_err(|_| Error::EncodingError("Failed to acquire read lock".to_string()))?;
        fs::read(location).map_err(|e| Error::io(location, e))
    }

    fn remove(&self, location: &Path) -> std::io::Result<bool> {
        let _guard = self.lock.write().map_err(|_| poisoned())?;
        match fs::remove_file(location) {
            Ok(()) => Ok(true),
            Err(e) if is_absent(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn remove_namespace(&self, namespace: &Path) -> std::io::Result<bool> {
        let _guard = self.lock.write().map_err(|_| poisoned())?;
        let mut entries = match fs::read_dir(namespace) {
            Ok(entries) => entries,
            Err(e) if is_absent(&e) => return Ok(false),
            Err(e) => return Err(e),
        };
        if entries.next().is_some() {
            return Ok(false);
        }
        fs::remove_dir(namespace)?;
        Ok(true)
    }
}

/// A path under a regular file fails with ENOTDIR rather than NotFound;
/// any other error is a real failure
fn is_absent(error: &std::io::Error) -> bool {
    matches!(error.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}

fn poisoned() -> std::io::Error {
    std::io::Error::new(ErrorKind::Other, "sink lock poisoned")
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_file_sink() {
        let temp_dir = TempDir::new().unwrap();
        let sink = FileSink::new();
        let location = temp_dir.path().join("a").join("b").join("key.pem");

        sink.write(&location, b"material").unwrap();
        assert_eq!(sink.read(&location).unwrap(), b"material");

        // Overwrite replaces
        sink.write(&location, b"other").unwrap();
        assert_eq!(sink.read(&location).unwrap(), b"other");

        assert!(sink.remove(&location).unwrap());
        assert!(!sink.remove(&location).unwrap());
        assert!(matches!(sink.read(&location), Err(Error::IoError { .. })));
    }

    #[test]
    fn test_remove_namespace_only_when_empty() {
        let temp_dir = TempDir::new().unwrap();
        let sink = FileSink::new();
        let namespace = temp_dir.path().join("run");
        let location = namespace.join("key.pem");
        sink.write(&location, b"x").unwrap();

        assert!(!sink.remove_namespace(&namespace).unwrap());
        assert!(namespace.exists());

        sink.remove(&location).unwrap();
        assert!(sink.remove_namespace(&namespace).unwrap());
        assert!(!namespace.exists());
        assert!(!sink.remove_namespace(&namespace).unwrap());
    }

    #[test]
    fn test_remove_below_a_file_is_missing() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file");
        std::fs::write(&file, b"x").unwrap();

        let sink = FileSink::new();
        assert!(!sink.remove(&file.join("key.pem")).unwrap());
        assert!(!sink.remove_namespace(&file.join("run")).unwrap());
    }

    #[test]
    fn test_only_missing_paths_count_as_absent() {
        assert!(is_absent(&std::io::Error::from(ErrorKind::NotFound)));
        assert!(is_absent(&std::io::Error::from(ErrorKind::NotADirectory)));
        assert!(!is_absent(&std::io::Error::from(ErrorKind::PermissionDenied)));
    }

    #[test]
    fn test_remove_of_a_directory_is_a_failure() {
        let temp_dir = TempDir::new().unwrap();
        let location = temp_dir.path().join("dir.pem");
        std::fs::create_dir(&location).unwrap();

        let sink = FileSink::new();
        assert!(sink.remove(&location).is_err());
        assert!(location.exists());
    }
}
