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

use crate::error::{PersistenceError, PersistenceResult};
use std::path::{Component, Path, PathBuf};

/// Suffix of the file holding a saved game's payload.
pub const SAVED_GAME_SUFFIX: &str = ".save";
/// Suffix of the file holding a saved game's metadata.
pub const METADATA_SUFFIX: &str = ".meta";

/// Pure mapping from logical records to paths under a storage root.
///
/// Saved games are stored flat in the root as `<name>.save` / `<name>.meta`
/// pairs. Generic keyed data lives at caller-supplied relative paths below the
/// same root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    root: PathBuf,
}

impl StoragePaths {
    /// Creates the mapping for `root`. Nothing is touched on disk.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the payload file for `file_base_name`.
    pub fn game_data_path(&self, file_base_name: &str) -> PathBuf {
        self.root.join(format!("{file_base_name}{SAVED_GAME_SUFFIX}"))
    }

    /// Path of the metadata file for `file_base_name`.
    pub fn metadata_path(&self, file_base_name: &str) -> PathBuf {
        self.root.join(format!("{file_base_name}{METADATA_SUFFIX}"))
    }

    /// Both files of a saved game, payload first.
    pub fn saved_game_pair(&self, file_base_name: &str) -> [PathBuf; 2] {
        [
            self.game_data_path(file_base_name),
            self.metadata_path(file_base_name),
        ]
    }

    /// Resolves a caller-supplied relative path against the root.
    ///
    /// ## Errors
    /// [`PersistenceError::Validation`] if `relative` is empty, absolute, or
    /// climbs out of the root with `..`.
    pub fn data_path(&self, relative: &Path) -> PersistenceResult<PathBuf> {
        if relative.as_os_str().is_empty() {
            return Err(PersistenceError::Validation("path can't be empty".to_string()));
        }

        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(PersistenceError::Validation(format!(
                        "path '{}' must not leave the storage root",
                        relative.display()
                    )))
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(PersistenceError::Validation(format!(
                        "path '{}' must be relative to the storage root",
                        relative.display()
                    )))
                }
            }
        }

        Ok(self.root.join(relative))
    }
}
