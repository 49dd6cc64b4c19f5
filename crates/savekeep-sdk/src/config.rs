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

//! Construction-time configuration for a [`SaveManager`](crate::SaveManager).

use savekeep_core::{FailureMode, PersistenceError, PersistenceResult, SerializationFormat, SortMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory created under the application's data directory for saves.
pub const SAVED_GAMES_DIR: &str = "Saved Games";

/// Application directory name used by [`SaveManagerConfig::default`].
pub const DEFAULT_APP_NAME: &str = "savekeep";

/// Everything a [`SaveManager`](crate::SaveManager) needs at construction.
///
/// `format`, `sort_mode`, `async_mode` and `failure_mode` are only initial
/// values; the manager exposes setters for them. The root is fixed for the
/// lifetime of the manager.
///
/// Missing fields take their default when read from JSON:
///
/// ```
/// # use savekeep_sdk::SaveManagerConfig;
/// let config = SaveManagerConfig::from_json_str(r#"{ "root": "/tmp/saves", "async_mode": false }"#)?;
/// assert!(!config.async_mode);
/// # Ok::<(), savekeep_sdk::PersistenceError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveManagerConfig {
    /// Directory holding every `.save`/`.meta` pair and all keyed data.
    pub root: PathBuf,
    /// Payload and metadata encoding.
    pub format: SerializationFormat,
    /// Ordering applied to metadata lists.
    pub sort_mode: SortMode,
    /// Run operations on the background worker (`true`) or in-line.
    pub async_mode: bool,
    /// How run-time errors are surfaced.
    pub failure_mode: FailureMode,
}

impl Default for SaveManagerConfig {
    fn default() -> Self {
        Self::for_app(DEFAULT_APP_NAME)
    }
}

impl SaveManagerConfig {
    /// Defaults rooted at `<data_dir>/<app_name>/Saved Games`.
    ///
    /// Falls back to the working directory when the platform reports no data
    /// directory.
    pub fn for_app(app_name: &str) -> Self {
        let data_dir = dirs::data_dir().unwrap_or_else(|| {
            log::warn!("No platform data directory; saving under the working directory.");
            PathBuf::from(".")
        });
        Self {
            root: data_dir.join(app_name).join(SAVED_GAMES_DIR),
            format: SerializationFormat::default(),
            sort_mode: SortMode::default(),
            async_mode: true,
            failure_mode: FailureMode::default(),
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_format(mut self, format: SerializationFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_sort_mode(mut self, sort_mode: SortMode) -> Self {
        self.sort_mode = sort_mode;
        self
    }

    pub fn with_async(mut self, async_mode: bool) -> Self {
        self.async_mode = async_mode;
        self
    }

    pub fn with_failure_mode(mut self, failure_mode: FailureMode) -> Self {
        self.failure_mode = failure_mode;
        self
    }

    /// Parses a configuration from JSON.
    ///
    /// ## Errors
    /// [`PersistenceError::Validation`] if the text is not a valid
    /// configuration.
    pub fn from_json_str(json: &str) -> PersistenceResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| PersistenceError::Validation(format!("invalid configuration: {e}")))
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// ## Errors
    /// [`PersistenceError::NotFound`] or [`PersistenceError::Io`] if the file
    /// cannot be read, [`PersistenceError::Validation`] if it does not parse.
    pub fn from_json_file(path: impl AsRef<Path>) -> PersistenceResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| PersistenceError::from_io(path, e))?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded save configuration from {}.", path.display());
        Ok(config)
    }

    /// Renders the configuration as pretty-printed JSON.
    ///
    /// ## Errors
    /// [`PersistenceError::Serialization`] if encoding fails.
    pub fn to_json_string(&self) -> PersistenceResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PersistenceError::Serialization(e.to_string()))
    }
}
