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

//! The public-facing API of savekeep.
//!
//! [`SaveManager`] persists saved games (a metadata record plus an
//! application payload) and arbitrary keyed data under one storage root. Every
//! operation takes a completion callback. In asynchronous mode the work runs on
//! a single background worker, strictly one operation at a time, and the
//! callback is handed to the [`CallbackDispatcher`] supplied at construction;
//! in synchronous mode the work and the callback run on the calling thread.
//!
//! ```no_run
//! use savekeep_sdk::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> PersistenceResult<()> {
//! let dispatcher = Arc::new(QueuedDispatcher::new());
//! let manager = SaveManager::new(SaveManagerConfig::for_app("my-game"), dispatcher.clone())?;
//!
//! let metadata = SavedGameMetadata::with_slot("Save 1", 1)?;
//! manager.save_game_with(metadata, vec!["Axe", "Shield"], |result| match result {
//!     Ok(saved) => log::info!("Saved {}!", saved.file_base_name()),
//!     Err(e) => log::error!("Save failed: {e}"),
//! })?;
//!
//! // Once per frame, on the thread that owns the UI:
//! dispatcher.pump();
//! # Ok(())
//! # }
//! ```

pub mod config;
mod data;
mod manager;

pub use config::SaveManagerConfig;
pub use manager::SaveManager;
pub use savekeep_control::{QueueStats, QueueStatus};
pub use savekeep_core::{
    CallbackDispatcher, FailureMode, ImmediateDispatcher, PersistenceError, PersistenceResult,
    QueuedDispatcher, SavedGame, SavedGameMetadata, SerializationFormat, SortMode,
};

/// Everything a host usually needs, in one import.
pub mod prelude {
    pub use crate::config::SaveManagerConfig;
    pub use crate::manager::SaveManager;
    pub use savekeep_control::{QueueStats, QueueStatus};
    pub use savekeep_core::{
        CallbackDispatcher, FailureMode, ImmediateDispatcher, PersistenceError,
        PersistenceResult, QueuedDispatcher, SavedGame, SavedGameMetadata, SerializationFormat,
        SortMode,
    };
}
