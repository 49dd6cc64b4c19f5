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

// Savekeep demo host.
// Drives the save screen flow from a frame loop that pumps completions.

mod screen;

use anyhow::{Context, Result};
use savekeep_sdk::prelude::*;
use screen::{SaveData, SaveScreen, ScreenEvent};
use std::sync::Arc;
use std::time::{Duration, Instant};

const FRAME: Duration = Duration::from_millis(16);
const ACTION_TIMEOUT: Duration = Duration::from_secs(10);

/// The buttons a player would press, in order.
#[derive(Debug, Clone, Copy)]
enum Action {
    LoadGames,
    CreateSavedGame,
    SelectFirst,
    DeleteSelected,
    ClearSavedGames,
}

const SCRIPT: &[Action] = &[
    Action::LoadGames,
    Action::CreateSavedGame,
    Action::CreateSavedGame,
    Action::CreateSavedGame,
    Action::LoadGames,
    Action::SelectFirst,
    Action::DeleteSelected,
    Action::LoadGames,
    Action::ClearSavedGames,
    Action::LoadGames,
];

struct Host {
    manager: SaveManager,
    dispatcher: Arc<QueuedDispatcher>,
    events: flume::Sender<ScreenEvent>,
    inbox: flume::Receiver<ScreenEvent>,
    screen: SaveScreen,
}

impl Host {
    fn new(config: SaveManagerConfig) -> Result<Self> {
        let dispatcher = Arc::new(QueuedDispatcher::new());
        let manager = SaveManager::new(config, dispatcher.clone())
            .context("Failed to open the save directory")?;
        let (events, inbox) = flume::unbounded();
        Ok(Self {
            manager,
            dispatcher,
            events,
            inbox,
            screen: SaveScreen::new(),
        })
    }

    /// Starts `action`. Returns `false` if nothing was submitted.
    fn press(&mut self, action: Action) -> Result<bool> {
        let events = self.events.clone();
        match action {
            Action::LoadGames => {
                self.screen.busy("Loading metadata...");
                self.manager
                    .load_metadata(move |r| send(&events, ScreenEvent::MetadataLoaded(r)))?;
            }
            Action::CreateSavedGame => {
                self.screen.busy("Saving...");
                self.screen.largest_slot += 1;
                let slot = self.screen.largest_slot;
                let metadata = SavedGameMetadata::with_slot(format!("SavedGame{slot}"), slot)?;
                self.manager.save_game_with(metadata, SaveData::default(), move |r| {
                    send(&events, ScreenEvent::GameSaved(r))
                })?;
            }
            Action::SelectFirst => {
                let Some(metadata) = self.screen.saves.first().cloned() else {
                    log::warn!("No save element to select!");
                    return Ok(false);
                };
                self.screen.selected = Some(0);
                self.screen.busy("Loading save data...");
                self.manager.load_saved_game::<SaveData, _>(&metadata, move |r| {
                    send(&events, ScreenEvent::GameLoaded(r))
                })?;
            }
            Action::DeleteSelected => {
                let Some(metadata) = self.screen.selected.and_then(|i| self.screen.saves.get(i)).cloned()
                else {
                    self.screen.status = "No save element selected!".to_string();
                    log::warn!("{}", self.screen.status);
                    return Ok(false);
                };
                self.screen.busy("Deleting save...");
                let deleted = metadata.clone();
                self.manager.delete_save(&metadata, move |r| {
                    send(&events, ScreenEvent::SaveDeleted(deleted, r))
                })?;
            }
            Action::ClearSavedGames => {
                self.screen.busy("Deleting all saves...");
                self.manager
                    .delete_all_saved_games(move |r| send(&events, ScreenEvent::AllDeleted(r)))?;
            }
        }
        Ok(true)
    }

    /// One frame: run delivered callbacks, then apply their events.
    fn frame(&mut self) {
        self.dispatcher.pump();
        for event in self.inbox.try_iter() {
            self.screen.apply(event);
        }
    }

    fn run(&mut self, script: &[Action]) -> Result<()> {
        for &action in script {
            if !self.press(action)? {
                continue;
            }
            let started = Instant::now();
            while !self.screen.interactable {
                anyhow::ensure!(
                    started.elapsed() < ACTION_TIMEOUT,
                    "{action:?} did not complete within {ACTION_TIMEOUT:?}"
                );
                std::thread::sleep(FRAME);
                self.frame();
            }
        }
        Ok(())
    }
}

fn send(events: &flume::Sender<ScreenEvent>, event: ScreenEvent) {
    if events.send(event).is_err() {
        log::warn!("Save screen closed; dropping a completion.");
    }
}

fn load_config() -> Result<SaveManagerConfig> {
    match std::env::args_os().nth(1) {
        Some(path) => SaveManagerConfig::from_json_file(&path)
            .with_context(|| format!("Failed to read config {}", path.to_string_lossy())),
        None => Ok(SaveManagerConfig::default()
            .with_root(std::env::temp_dir().join("savekeep-demo").join("Saved Games"))
            .with_sort_mode(SortMode::SmallestSlotFirst)),
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let mut host = Host::new(config)?;
    log::info!("Saving under {}", host.manager.root().display());

    host.run(SCRIPT)?;

    let stats = host.manager.queue_stats();
    log::info!(
        "Done: {} operations, {} failed.",
        stats.submitted,
        stats.failed
    );
    host.manager.shutdown();
    Ok(())
}
