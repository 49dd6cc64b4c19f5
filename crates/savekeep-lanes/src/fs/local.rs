// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use savekeep_core::{FileStore, PersistenceError, PersistenceResult};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// [`FileStore`] backed by the local filesystem.
///
/// Writes go to a temp file in the target directory, are synced, then renamed
/// over the destination, so a reader never observes a half-written file.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileStore;

impl LocalFileStore {
    /// Creates a new local store.
    pub fn new() -> Self {
        Self
    }
}

impl FileStore for LocalFileStore {
    fn read(&self, path: &Path) -> PersistenceResult<Vec<u8>> {
        fs::read(path).map_err(|e| PersistenceError::from_io(path, e))
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> PersistenceResult<()> {
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        self.ensure_dir(parent)?;

        let mut file =
            NamedTempFile::new_in(parent).map_err(|e| PersistenceError::from_io(parent, e))?;
        file.write_all(bytes)
            .and_then(|_| file.as_file().sync_all())
            .map_err(|e| PersistenceError::from_io(path, e))?;
        file.persist(path)
            .map_err(|e| PersistenceError::from_io(path, e.error))?;

        log::trace!("Wrote {} byte(s) to {}", bytes.len(), path.display());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn list_by_suffix(&self, dir: &Path, suffix: &str) -> PersistenceResult<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| PersistenceError::from_io(dir, e))? {
            let entry = entry.map_err(|e| PersistenceError::from_io(dir, e))?;
            let path = entry.path();
            let matches = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(suffix));

            if matches && path.is_file() {
                files.push(path);
            }
        }

        Ok(files)
    }

    fn remove(&self, path: &Path) -> PersistenceResult<()> {
        fs::remove_file(path).map_err(|e| PersistenceError::from_io(path, e))?;
        log::trace!("Removed {}", path.display());
        Ok(())
    }

    fn ensure_dir(&self, dir: &Path) -> PersistenceResult<()> {
        fs::create_dir_all(dir).map_err(|e| PersistenceError::from_io(dir, e))
    }
}
