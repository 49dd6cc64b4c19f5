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

use super::SavedGameMetadata;
use serde::{Deserialize, Serialize};

/// Ordering applied to the result of a metadata-list load.
///
/// The mode is a presentation policy: it is never written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortMode {
    /// Keep the order in which the filesystem enumerated the files.
    #[default]
    None,
    /// Most recently saved first. Records that were never stamped go last.
    LastPlayedFirst,
    /// Largest `time_played` first.
    LongestPlaytimeFirst,
    /// Smallest `slot` first.
    SmallestSlotFirst,
}

impl SortMode {
    /// Sorts `metadata` in place according to this mode.
    ///
    /// The sort is stable, so records that compare equal keep their
    /// enumeration order.
    pub fn apply(self, metadata: &mut [SavedGameMetadata]) {
        match self {
            SortMode::None => {}
            SortMode::LastPlayedFirst => {
                metadata.sort_by(|a, b| b.time_stamp().cmp(&a.time_stamp()))
            }
            SortMode::LongestPlaytimeFirst => {
                metadata.sort_by(|a, b| b.time_played().cmp(&a.time_played()))
            }
            SortMode::SmallestSlotFirst => metadata.sort_by_key(|m| m.slot()),
        }
    }

    /// Returns `metadata` sorted according to this mode.
    pub fn sorted(self, mut metadata: Vec<SavedGameMetadata>) -> Vec<SavedGameMetadata> {
        self.apply(&mut metadata);
        metadata
    }
}
