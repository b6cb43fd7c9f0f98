use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::fs_cleanup::remove_file_best_effort;

/// Name of the classpath file inside a storage location.
///
/// One file per storage location (not per build module), so every module of
/// a multi-module project shares it.
pub const CLASSPATH_FILE_NAME: &str = "classpath.txt";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to read classpath cache {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to create storage directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
}

/// The on-disk classpath written by the build tool.
///
/// The file holds entries joined by [`grove_core::PATH_SEPARATOR`] and
/// nothing else. It is only ever written by the build tool; this type reads
/// it and deletes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClasspathCache {
    path: PathBuf,
}

impl ClasspathCache {
    pub fn for_storage(storage_dir: &Path) -> Self {
        Self {
            path: storage_dir.join(CLASSPATH_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Make sure the storage directory exists so the build tool can write into it.
    pub fn prepare(&self) -> Result<(), CacheError> {
        let Some(dir) = self.path.parent() else {
            return Ok(());
        };
        fs::create_dir_all(dir).map_err(|source| CacheError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })
    }

    /// Read the cached entries, in file order.
    ///
    /// A missing file and a file without any entries both return `Ok(None)`:
    /// an empty file is never a valid "resolved but empty" classpath.
    pub fn read(&self) -> Result<Option<Vec<String>>, CacheError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CacheError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let entries = grove_core::split_classpath(&text);
        Ok((!entries.is_empty()).then_some(entries))
    }

    /// Delete the file. A missing file is not an error.
    #[track_caller]
    pub fn invalidate(&self, reason: &'static str) {
        remove_file_best_effort(&self.path, reason);
    }
}
