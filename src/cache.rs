//! Flat-file cache of repositories known to have no qualifying version tag
//!
//! Consulted before tag fetches so known-unversioned repositories cost no API
//! calls. Entries never expire on their own; a repository is re-checked only
//! by removing its line from the file.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to persist cache file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

pub struct UnversionedCache {
    path: PathBuf,
}

impl UnversionedCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the cached set. A missing file is an empty set, not an error.
    pub fn load(&self) -> Result<BTreeSet<String>, CacheError> {
        if !self.path.exists() {
            return Ok(BTreeSet::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let repos = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Ok(repos)
    }

    /// Writes the set sorted, one name per line with a trailing newline.
    ///
    /// The write goes to a temp file in the target directory and is renamed
    /// into place, so an interrupted run never leaves a truncated file.
    pub fn save(&self, repos: &BTreeSet<String>) -> Result<(), CacheError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        for repo in repos {
            writeln!(file, "{repo}")?;
        }
        file.persist(&self.path)?;

        debug!("Cached {} unversioned repos to {:?}", repos.len(), self.path);
        Ok(())
    }
}
