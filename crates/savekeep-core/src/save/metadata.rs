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
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};
use std::time::{Duration, SystemTime};

/// Descriptive record stored next to every saved game.
///
/// `file_base_name` is the identity of the record: it names both files of the
/// pair on disk. `time_stamp` is owned by the persistence layer and is set on
/// every successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGameMetadata {
    file_base_name: String,
    slot: i32,
    time_played: Duration,
    time_stamp: Option<SystemTime>,
}

impl SavedGameMetadata {
    /// Creates metadata for `file_base_name` with slot `0` and no play time.
    ///
    /// ## Errors
    /// Returns [`PersistenceError::Validation`] if the name is empty, carries an
    /// extension, or is not a plain file name.
    pub fn new(file_base_name: impl Into<String>) -> PersistenceResult<Self> {
        let file_base_name = file_base_name.into();
        validate_file_base_name(&file_base_name)?;

        Ok(Self {
            file_base_name,
            slot: 0,
            time_played: Duration::ZERO,
            time_stamp: None,
        })
    }

    /// Creates metadata bound to a slot.
    pub fn with_slot(file_base_name: impl Into<String>, slot: i32) -> PersistenceResult<Self> {
        let mut metadata = Self::new(file_base_name)?;
        metadata.slot = slot;
        Ok(metadata)
    }

    /// Creates metadata with an accumulated play time.
    pub fn with_time_played(
        file_base_name: impl Into<String>,
        time_played: Duration,
    ) -> PersistenceResult<Self> {
        let mut metadata = Self::new(file_base_name)?;
        metadata.time_played = time_played;
        Ok(metadata)
    }

    /// Creates metadata with both a slot and an accumulated play time.
    pub fn with_slot_and_time_played(
        file_base_name: impl Into<String>,
        slot: i32,
        time_played: Duration,
    ) -> PersistenceResult<Self> {
        let mut metadata = Self::new(file_base_name)?;
        metadata.slot = slot;
        metadata.time_played = time_played;
        Ok(metadata)
    }

    /// The base name shared by the `.save` and `.meta` files of this record.
    pub fn file_base_name(&self) -> &str {
        &self.file_base_name
    }

    /// The caller-assigned slot.
    pub fn slot(&self) -> i32 {
        self.slot
    }

    /// Sets the caller-assigned slot.
    pub fn set_slot(&mut self, slot: i32) {
        self.slot = slot;
    }

    /// The caller-assigned play time.
    pub fn time_played(&self) -> Duration {
        self.time_played
    }

    /// Sets the caller-assigned play time.
    pub fn set_time_played(&mut self, time_played: Duration) {
        self.time_played = time_played;
    }

    /// When the record was last saved, or `None` if it never was.
    pub fn time_stamp(&self) -> Option<SystemTime> {
        self.time_stamp
    }

    /// Records the moment of a save. Called by the persistence layer, which
    /// overwrites the value on every save.
    pub fn mark_saved_at(&mut self, at: SystemTime) {
        self.time_stamp = Some(at);
    }

    /// Re-checks the invariants of a record that may have been deserialized
    /// from an untrusted source.
    pub fn validate(&self) -> PersistenceResult<()> {
        validate_file_base_name(&self.file_base_name)
    }
}

fn validate_file_base_name(name: &str) -> PersistenceResult<()> {
    if name.is_empty() {
        return Err(PersistenceError::Validation(
            "file name for the saved game is required".to_string(),
        ));
    }

    if name.contains(['/', '\\']) {
        return Err(PersistenceError::Validation(format!(
            "file name '{name}' must not contain path separators"
        )));
    }

    let path = Path::new(name);
    if !matches!(path.components().next(), Some(Component::Normal(_))) {
        return Err(PersistenceError::Validation(format!(
            "file name '{name}' is not a plain file name"
        )));
    }

    if name.ends_with('.') || path.extension().is_some() {
        return Err(PersistenceError::Validation(format!(
            "file name '{name}' must not carry an extension"
        )));
    }

    Ok(())
}
