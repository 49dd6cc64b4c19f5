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

use crate::error::PersistenceResult;
use std::path::{Path, PathBuf};

/// The filesystem operations the persistence layer relies on.
///
/// Implementations must make `write` durable by the time it returns, make
/// `list_by_suffix` return exactly the regular files whose name ends with the
/// suffix, and fail `remove` with [`crate::PersistenceError::NotFound`] when the
/// file is missing.
pub trait FileStore: Send + Sync {
    /// Reads the whole file at `path`.
    fn read(&self, path: &Path) -> PersistenceResult<Vec<u8>>;

    /// Replaces the file at `path` with `bytes`, creating parent directories.
    fn write(&self, path: &Path, bytes: &[u8]) -> PersistenceResult<()>;

    /// Returns `true` if a regular file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Lists the regular files directly inside `dir` whose name ends with
    /// `suffix`, in enumeration order. A missing directory yields an empty list.
    fn list_by_suffix(&self, dir: &Path, suffix: &str) -> PersistenceResult<Vec<PathBuf>>;

    /// Deletes the file at `path`.
    fn remove(&self, path: &Path) -> PersistenceResult<()>;

    /// Creates `dir` and its parents if they do not exist yet.
    fn ensure_dir(&self, dir: &Path) -> PersistenceResult<()>;
}
