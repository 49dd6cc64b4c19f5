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

//! # Savekeep Core
//!
//! Foundational crate containing the save model, the error taxonomy and the
//! capability contracts (serializer, callback dispatch, file store) that the
//! rest of the workspace is built on.

#![warn(missing_docs)]

pub mod dispatch;
pub mod error;
pub mod save;
pub mod serialization;
pub mod storage;

pub use dispatch::{Callback, CallbackDispatcher, ImmediateDispatcher, QueuedDispatcher};
pub use error::{FailureMode, PersistenceError, PersistenceResult};
pub use save::{SavedGame, SavedGameMetadata, SortMode};
pub use serialization::{SerializationFormat, Serializer};
pub use storage::{FileStore, StoragePaths, METADATA_SUFFIX, SAVED_GAME_SUFFIX};
