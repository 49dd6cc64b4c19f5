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

//! The data model of a saved game.
//!
//! A saved game is made of two halves that live side by side on disk: a small
//! [`SavedGameMetadata`] record used to list and sort saves, and an opaque,
//! caller-typed payload. [`SavedGame`] pairs the two for the duration of a call.

mod metadata;
mod saved_game;
mod sort;

pub use self::metadata::SavedGameMetadata;
pub use self::saved_game::SavedGame;
pub use self::sort::SortMode;
