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
use crate::error::{PersistenceError, PersistenceResult};
use serde::{Deserialize, Serialize};

/// A metadata record paired with the game-specific payload it describes.
///
/// This is a transient value: it is built for a single save or returned by a
/// single load, and is not tracked afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedGame<T> {
    /// Descriptive record of the save.
    pub metadata: SavedGameMetadata,
    /// The application payload.
    pub game_specific_data: T,
}

impl<T> SavedGame<T> {
    /// Pairs `metadata` with its payload.
    pub fn new(metadata: SavedGameMetadata, game_specific_data: T) -> Self {
        Self {
            metadata,
            game_specific_data,
        }
    }

    /// Pairs two optional halves, failing if either is absent.
    ///
    /// Useful for hosts that track the current selection and current game
    /// state separately and may not have both at hand.
    pub fn from_parts(
        metadata: Option<SavedGameMetadata>,
        game_specific_data: Option<T>,
    ) -> PersistenceResult<Self> {
        let metadata = metadata.ok_or_else(|| {
            PersistenceError::Validation("metadata on a saved game can't be absent".to_string())
        })?;
        let game_specific_data = game_specific_data.ok_or_else(|| {
            PersistenceError::Validation(
                "game specific data on a saved game can't be absent".to_string(),
            )
        })?;

        Ok(Self::new(metadata, game_specific_data))
    }

    /// Splits the saved game back into its halves.
    pub fn into_parts(self) -> (SavedGameMetadata, T) {
        (self.metadata, self.game_specific_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_requires_both_halves() {
        let metadata = SavedGameMetadata::new("pair").unwrap();

        let missing_data = SavedGame::<u32>::from_parts(Some(metadata.clone()), None);
        assert!(missing_data.unwrap_err().is_validation());

        let missing_metadata = SavedGame::from_parts(None, Some(5_u32));
        assert!(missing_metadata.unwrap_err().is_validation());

        let saved_game = SavedGame::from_parts(Some(metadata.clone()), Some(5_u32)).unwrap();
        assert_eq!(saved_game.into_parts(), (metadata, 5));
    }
}
