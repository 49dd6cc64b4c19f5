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

//! Storage layout and the filesystem capability.
//!
//! [`StoragePaths`] maps logical records to files under one storage root;
//! [`FileStore`] is the contract for the filesystem operations the
//! persistence layer performs on those files.

mod file_store;
mod paths;

pub use self::file_store::FileStore;
pub use self::paths::{StoragePaths, METADATA_SUFFIX, SAVED_GAME_SUFFIX};
