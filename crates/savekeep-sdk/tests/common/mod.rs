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

#![allow(dead_code)]

use savekeep_sdk::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};
use tempfile::TempDir;

pub const TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub character_name: String,
    pub level: u32,
    pub inventory: Vec<String>,
}

impl SaveData {
    pub fn sample(level: u32) -> Self {
        Self {
            character_name: "Test".to_string(),
            level,
            inventory: vec!["Axe".to_string(), "Shield".to_string()],
        }
    }
}

/// A manager over a fresh temporary root, with callbacks queued for the test
/// thread to pump.
pub struct Harness {
    pub dir: TempDir,
    pub dispatcher: Arc<QueuedDispatcher>,
    pub manager: SaveManager,
}

impl Harness {
    pub fn new(async_mode: bool) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = Arc::new(QueuedDispatcher::new());
        let config = SaveManagerConfig::default()
            .with_root(dir.path())
            .with_async(async_mode);
        let manager = SaveManager::new(config, dispatcher.clone()).unwrap();
        Self { dir, dispatcher, manager }
    }

    /// Pumps the dispatcher until `rx` yields a value.
    pub fn wait<T>(&self, rx: &mpsc::Receiver<T>) -> T {
        let deadline = Instant::now() + TIMEOUT;
        loop {
            if let Ok(value) = rx.try_recv() {
                return value;
            }
            assert!(Instant::now() < deadline, "timed out waiting for a callback");
            self.dispatcher.run_next(Duration::from_millis(20));
        }
    }

    pub fn save(&self, metadata: SavedGameMetadata, data: SaveData) -> SavedGameMetadata {
        let (tx, rx) = mpsc::channel();
        self.manager
            .save_game_with(metadata, data, move |r| tx.send(r).unwrap())
            .unwrap();
        self.wait(&rx).unwrap()
    }

    pub fn list(&self) -> Vec<SavedGameMetadata> {
        let (tx, rx) = mpsc::channel();
        self.manager
            .load_metadata(move |r| tx.send(r).unwrap())
            .unwrap();
        self.wait(&rx).unwrap()
    }

    pub fn files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
