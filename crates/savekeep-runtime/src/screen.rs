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

//! The state a save screen keeps between frames, fed by completion events.

use savekeep_sdk::prelude::*;
use serde::{Deserialize, Serialize};

/// Dummy game state persisted by the demo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub character_name: String,
    pub level: u32,
    pub upgrades: Upgrades,
    pub inventory: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upgrades {
    pub has_this_upgrade: bool,
    pub has_that_upgrade: bool,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            character_name: "Test".to_string(),
            level: 50,
            upgrades: Upgrades {
                has_this_upgrade: true,
                has_that_upgrade: false,
            },
            inventory: vec!["Axe".to_string(), "Shield".to_string()],
        }
    }
}

/// Completions delivered to the screen on the frame thread.
#[derive(Debug)]
pub enum ScreenEvent {
    MetadataLoaded(PersistenceResult<Vec<SavedGameMetadata>>),
    GameSaved(PersistenceResult<SavedGameMetadata>),
    GameLoaded(PersistenceResult<SavedGame<SaveData>>),
    SaveDeleted(SavedGameMetadata, PersistenceResult<()>),
    AllDeleted(PersistenceResult<()>),
}

/// What a save UI would render.
#[derive(Debug, Default)]
pub struct SaveScreen {
    pub status: String,
    pub saves: Vec<SavedGameMetadata>,
    pub selected: Option<usize>,
    pub largest_slot: i32,
    pub interactable: bool,
}

impl SaveScreen {
    pub fn new() -> Self {
        Self {
            interactable: true,
            ..Self::default()
        }
    }

    /// Marks an operation as in flight.
    pub fn busy(&mut self, status: &str) {
        self.status = status.to_string();
        self.interactable = false;
        log::info!("{status}");
    }

    pub fn apply(&mut self, event: ScreenEvent) {
        match event {
            ScreenEvent::MetadataLoaded(Ok(metadata)) => {
                self.largest_slot = metadata.iter().map(|m| m.slot()).fold(self.largest_slot, i32::max);
                self.status = if metadata.is_empty() {
                    "No save metadata found.".to_string()
                } else {
                    format!("Loaded {} metadata files!", metadata.len())
                };
                self.saves = metadata;
                self.selected = None;
            }
            ScreenEvent::GameSaved(Ok(metadata)) => {
                self.saves.push(metadata);
                self.status = "Game saved successfully!".to_string();
            }
            ScreenEvent::GameLoaded(Ok(game)) => {
                let data = &game.game_specific_data;
                self.status = "Save data loaded!".to_string();
                log::info!("Character name: {}", data.character_name);
                log::info!("Has that upgrade: {}", data.upgrades.has_that_upgrade);
                log::info!("Inventory: {}", data.inventory.join(", "));
            }
            ScreenEvent::SaveDeleted(metadata, Ok(())) => {
                self.saves.retain(|m| m.file_base_name() != metadata.file_base_name());
                self.selected = None;
                self.status = format!("Save on slot {} deleted!", metadata.slot());
            }
            ScreenEvent::AllDeleted(Ok(())) => {
                self.saves.clear();
                self.selected = None;
                self.largest_slot = 0;
                self.status = "All saves deleted!".to_string();
            }
            ScreenEvent::MetadataLoaded(Err(e))
            | ScreenEvent::GameSaved(Err(e))
            | ScreenEvent::GameLoaded(Err(e))
            | ScreenEvent::SaveDeleted(_, Err(e))
            | ScreenEvent::AllDeleted(Err(e)) => {
                log::error!("Save operation failed: {e}");
                self.status = format!("Error: {e}");
            }
        }
        log::info!("{}", self.status);
        self.interactable = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_listing_reports_no_metadata() {
        let mut screen = SaveScreen::new();
        screen.busy("Loading metadata...");

        screen.apply(ScreenEvent::MetadataLoaded(Ok(Vec::new())));

        assert_eq!(screen.status, "No save metadata found.");
        assert!(screen.interactable);
    }

    #[test]
    fn listing_tracks_the_largest_slot() {
        let mut screen = SaveScreen::new();
        let saves = vec![
            SavedGameMetadata::with_slot("SavedGame4", 4).unwrap(),
            SavedGameMetadata::with_slot("SavedGame2", 2).unwrap(),
        ];

        screen.apply(ScreenEvent::MetadataLoaded(Ok(saves)));

        assert_eq!(screen.largest_slot, 4);
        assert_eq!(screen.status, "Loaded 2 metadata files!");
    }

    #[test]
    fn clearing_resets_the_slot_counter() {
        let mut screen = SaveScreen::new();
        screen.largest_slot = 9;

        screen.apply(ScreenEvent::AllDeleted(Ok(())));

        assert_eq!(screen.largest_slot, 0);
        assert!(screen.saves.is_empty());
    }

    #[test]
    fn failures_are_shown_and_unlock_the_screen() {
        let mut screen = SaveScreen::new();
        screen.busy("Saving...");

        screen.apply(ScreenEvent::GameSaved(Err(PersistenceError::NotImplemented("JSON serialization"))));

        assert!(screen.status.starts_with("Error:"));
        assert!(screen.interactable);
    }
}
