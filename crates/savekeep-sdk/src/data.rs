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

//! Keyed data stored at caller-chosen paths under the storage root.

use crate::manager::SaveManager;
use savekeep_core::{PersistenceError, PersistenceResult, Serializer};
use savekeep_lanes::Codec;
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

impl SaveManager {
    /// Writes `data` to `path`, relative to the storage root. Missing parent
    /// directories are created.
    ///
    /// ## Arguments
    /// * `path` - Destination, relative to the root.
    /// * `data` - The value to encode.
    /// * `callback` - Receives `Ok(())` once the file is written.
    ///
    /// ## Errors
    /// [`PersistenceError::Validation`] if `path` is empty, absolute, or leaves
    /// the root.
    pub fn save_data<T, F>(&self, path: impl AsRef<Path>, data: T, callback: F) -> PersistenceResult<()>
    where
        T: Serialize + Send + 'static,
        F: FnOnce(PersistenceResult<()>) + Send + 'static,
    {
        let settings = self.settings();
        let path = self.paths.data_path(path.as_ref())?;
        let store = Arc::clone(&self.store);

        self.execute("save_data", settings, callback, move || {
            let bytes = Codec::for_format(settings.format).encode(&data)?;
            if let Some(parent) = path.parent() {
                store.ensure_dir(parent)?;
            }
            store.write(&path, &bytes)
        })
    }

    /// Reads the value stored at `path`, relative to the storage root.
    ///
    /// ## Arguments
    /// * `path` - Source, relative to the root.
    /// * `callback` - Receives the decoded value, or the failure.
    ///
    /// ## Errors
    /// [`PersistenceError::Validation`] if `path` is not a valid relative path.
    pub fn load_data<T, F>(&self, path: impl AsRef<Path>, callback: F) -> PersistenceResult<()>
    where
        T: DeserializeOwned + Send + 'static,
        F: FnOnce(PersistenceResult<T>) + Send + 'static,
    {
        let settings = self.settings();
        let path = self.paths.data_path(path.as_ref())?;
        let store = Arc::clone(&self.store);

        self.execute("load_data", settings, callback, move || {
            Codec::for_format(settings.format).decode(&store.read(&path)?)
        })
    }

    /// Reads every file in `dir` whose name ends with `suffix`, in name order.
    ///
    /// An empty suffix matches every file. A missing directory yields an empty
    /// list. One undecodable file fails the whole operation.
    ///
    /// ## Arguments
    /// * `dir` - Directory relative to the root. It is not searched
    ///   recursively.
    /// * `suffix` - File name ending to match, such as `".score"`.
    /// * `callback` - Receives the decoded values.
    ///
    /// ## Errors
    /// [`PersistenceError::Validation`] if `dir` is not a valid relative path.
    pub fn load_data_multiple<T, F>(
        &self,
        dir: impl AsRef<Path>,
        suffix: &str,
        callback: F,
    ) -> PersistenceResult<()>
    where
        T: DeserializeOwned + Send + 'static,
        F: FnOnce(PersistenceResult<Vec<T>>) + Send + 'static,
    {
        let settings = self.settings();
        let dir = self.paths.data_path(dir.as_ref())?;
        let suffix = suffix.to_string();
        let store = Arc::clone(&self.store);

        self.execute("load_data_multiple", settings, callback, move || {
            let codec = Codec::for_format(settings.format);
            let mut files = store.list_by_suffix(&dir, &suffix)?;
            files.sort();
            files
                .iter()
                .map(|path| codec.decode(&store.read(path)?))
                .collect()
        })
    }

    /// Removes every file in `paths`, each relative to the storage root.
    ///
    /// Nothing is removed unless all of them exist; the first missing one is
    /// reported as [`PersistenceError::NotFound`]. An empty list succeeds
    /// without touching the disk.
    ///
    /// ## Errors
    /// [`PersistenceError::Validation`] if any path is not a valid relative
    /// path.
    pub fn delete_data<I, P, F>(&self, paths: I, callback: F) -> PersistenceResult<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
        F: FnOnce(PersistenceResult<()>) + Send + 'static,
    {
        let settings = self.settings();
        let targets = paths
            .into_iter()
            .map(|p| self.paths.data_path(p.as_ref()))
            .collect::<PersistenceResult<Vec<PathBuf>>>()?;
        let store = Arc::clone(&self.store);

        self.execute("delete_data", settings, callback, move || {
            if let Some(missing) = targets.iter().find(|p| !store.exists(p)) {
                return Err(PersistenceError::NotFound(missing.display().to_string()));
            }
            for path in &targets {
                store.remove(path)?;
            }
            log::debug!("Deleted {} data file(s).", targets.len());
            Ok(())
        })
    }
}
