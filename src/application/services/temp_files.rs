use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Process-local directory holding per-run temporary files.
#[derive(Debug, Clone)]
pub struct ScratchSpace {
    directory: PathBuf,
}

impl ScratchSpace {
    pub fn new(directory: PathBuf) -> io::Result<Self> {
        std::fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Returns a fresh, collision-free path. Nothing is created on disk.
    pub fn file_path(&self, extension: &str) -> PathBuf {
        self.directory
            .join(format!("{}.{}", Uuid::new_v4(), extension))
    }
}

/// Temporary files owned by a single consultation run.
///
/// Every allocated path is removed exactly once, either by an explicit
/// [`TempFiles::cleanup`] or when the guard is dropped.
#[derive(Debug)]
pub struct TempFiles {
    scratch: ScratchSpace,
    paths: Vec<PathBuf>,
}

impl TempFiles {
    pub fn new(scratch: &ScratchSpace) -> Self {
        Self {
            scratch: scratch.clone(),
            paths: Vec::new(),
        }
    }

    pub fn allocate(&mut self, extension: &str) -> PathBuf {
        let path = self.scratch.file_path(extension);
        self.paths.push(path.clone());
        path
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Deletes all tracked files and returns how many existed.
    pub fn cleanup(&mut self) -> usize {
        let mut removed = 0;
        for path in self.paths.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove temporary file");
                }
            }
        }
        removed
    }
}

impl Drop for TempFiles {
    fn drop(&mut self) {
        self.cleanup();
    }
}
