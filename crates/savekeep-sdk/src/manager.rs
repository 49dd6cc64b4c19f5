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

use crate::config::SaveManagerConfig;
use savekeep_control::{QueueStats, QueueStatus, TaskQueue};
use savekeep_core::{
    CallbackDispatcher, FailureMode, FileStore, PersistenceError, PersistenceResult, SavedGame,
    SavedGameMetadata, SerializationFormat, Serializer, SortMode, StoragePaths, METADATA_SUFFIX,
};
use savekeep_lanes::{Codec, LocalFileStore};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, SystemTime};

/// Settings that can change while the manager is alive.
///
/// Each operation copies them once at submission, so a later change never
/// affects work that is already queued.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Settings {
    pub(crate) format: SerializationFormat,
    pub(crate) sort_mode: SortMode,
    pub(crate) async_mode: bool,
    pub(crate) failure_mode: FailureMode,
}

/// Saves, loads and deletes games and keyed data under one storage root.
///
/// All filesystem access of asynchronous operations runs on the manager's
/// single worker thread in submission order. Synchronous operations wait for
/// queued work to finish first, so the two modes can be mixed freely.
///
/// Validation failures are returned from the call itself and the callback is
/// not invoked. Every accepted operation invokes its callback exactly once,
/// unless [`FailureMode::Raise`] is selected and the operation fails.
pub struct SaveManager {
    pub(crate) paths: StoragePaths,
    pub(crate) store: Arc<dyn FileStore>,
    queue: TaskQueue,
    settings: RwLock<Settings>,
}

impl SaveManager {
    /// Creates a manager writing to the local filesystem.
    ///
    /// The storage root is created if it does not exist yet.
    ///
    /// ## Arguments
    /// * `config` - Storage root and the initial settings.
    /// * `dispatcher` - Where async completion callbacks are handed.
    ///
    /// ## Errors
    /// [`PersistenceError::Io`] if the root cannot be created or the worker
    /// thread cannot be spawned.
    pub fn new(
        config: SaveManagerConfig,
        dispatcher: Arc<dyn CallbackDispatcher>,
    ) -> PersistenceResult<Self> {
        Self::with_file_store(config, dispatcher, Arc::new(LocalFileStore::new()))
    }

    /// Creates a manager on top of a custom [`FileStore`].
    ///
    /// ## Arguments
    /// * `config` - Storage root and the initial settings.
    /// * `dispatcher` - Where async completion callbacks are handed.
    /// * `store` - The filesystem every operation goes through.
    ///
    /// ## Errors
    /// Whatever `store` reports while creating the root, or
    /// [`PersistenceError::Io`] if the worker thread cannot be spawned.
    pub fn with_file_store(
        config: SaveManagerConfig,
        dispatcher: Arc<dyn CallbackDispatcher>,
        store: Arc<dyn FileStore>,
    ) -> PersistenceResult<Self> {
        store.ensure_dir(&config.root)?;
        let queue = TaskQueue::new(dispatcher)?;

        log::info!(
            "SaveManager ready at {} ({}, {}).",
            config.root.display(),
            config.format,
            if config.async_mode { "async" } else { "sync" }
        );

        Ok(Self {
            paths: StoragePaths::new(config.root),
            store,
            queue,
            settings: RwLock::new(Settings {
                format: config.format,
                sort_mode: config.sort_mode,
                async_mode: config.async_mode,
                failure_mode: config.failure_mode,
            }),
        })
    }

    // --- Saved games ---

    /// Writes the payload and the metadata of `saved_game`, replacing any
    /// existing pair with the same base name.
    ///
    /// The metadata's `time_stamp` is set to the current time. The callback
    /// receives the metadata as it was written.
    ///
    /// ## Arguments
    /// * `saved_game` - The metadata and payload to write.
    /// * `callback` - Receives the stamped metadata, or the failure.
    ///
    /// ## Errors
    /// [`PersistenceError::Validation`] if the metadata is invalid.
    /// [`PersistenceError::WouldOvertake`] for a sync call made from a worker
    /// callback while other work is queued.
    pub fn save_game<T, F>(&self, saved_game: SavedGame<T>, callback: F) -> PersistenceResult<()>
    where
        T: Serialize + Send + 'static,
        F: FnOnce(PersistenceResult<SavedGameMetadata>) + Send + 'static,
    {
        let (mut metadata, data) = saved_game.into_parts();
        metadata.validate()?;

        let settings = self.settings();
        let [data_path, meta_path] = self.paths.saved_game_pair(metadata.file_base_name());
        let store = Arc::clone(&self.store);

        self.execute("save_game", settings, callback, move || {
            let codec = Codec::for_format(settings.format);
            metadata.mark_saved_at(SystemTime::now());
            // Encode both halves before touching the disk.
            let data_bytes = codec.encode(&data)?;
            let meta_bytes = codec.encode(&metadata)?;
            store.write(&data_path, &data_bytes)?;
            store.write(&meta_path, &meta_bytes)?;
            log::debug!("Saved game '{}'.", metadata.file_base_name());
            Ok(metadata)
        })
    }

    /// Shorthand for [`save_game`](Self::save_game) with a freshly paired
    /// [`SavedGame`].
    ///
    /// ## Errors
    /// [`PersistenceError::Validation`] if the metadata is invalid.
    pub fn save_game_with<T, F>(
        &self,
        metadata: SavedGameMetadata,
        game_specific_data: T,
        callback: F,
    ) -> PersistenceResult<()>
    where
        T: Serialize + Send + 'static,
        F: FnOnce(PersistenceResult<SavedGameMetadata>) + Send + 'static,
    {
        self.save_game(SavedGame::new(metadata, game_specific_data), callback)
    }

    /// Reads every metadata record under the root, ordered by the sort mode
    /// in effect when the call was made.
    ///
    /// An empty or missing root yields an empty list.
    ///
    /// ## Arguments
    /// * `callback` - Receives the sorted records, or the failure.
    ///
    /// ## Errors
    /// The same call-time errors as [`save_game`](Self::save_game), except
    /// validation.
    pub fn load_metadata<F>(&self, callback: F) -> PersistenceResult<()>
    where
        F: FnOnce(PersistenceResult<Vec<SavedGameMetadata>>) + Send + 'static,
    {
        let settings = self.settings();
        let root = self.paths.root().to_path_buf();
        let store = Arc::clone(&self.store);

        self.execute("load_metadata", settings, callback, move || {
            let codec = Codec::for_format(settings.format);
            let files = store.list_by_suffix(&root, METADATA_SUFFIX)?;

            let mut records = Vec::with_capacity(files.len());
            for path in files {
                let metadata: SavedGameMetadata = codec.decode(&store.read(&path)?)?;
                metadata.validate().map_err(|e| {
                    PersistenceError::Deserialization(format!("{}: {e}", path.display()))
                })?;
                records.push(metadata);
            }

            log::debug!("Loaded {} metadata record(s).", records.len());
            Ok(settings.sort_mode.sorted(records))
        })
    }

    /// Reads the payload saved under `metadata`'s base name.
    ///
    /// The callback receives a [`SavedGame`] pairing `metadata` with the
    /// decoded payload. A missing payload file is reported as
    /// [`PersistenceError::NotFound`]; a payload of another shape as
    /// [`PersistenceError::Deserialization`].
    ///
    /// ## Arguments
    /// * `metadata` - The record whose payload to read. It is cloned into the
    ///   result.
    /// * `callback` - Receives the paired game, or the failure.
    ///
    /// ## Errors
    /// [`PersistenceError::Validation`] if the metadata is invalid.
    pub fn load_saved_game<T, F>(
        &self,
        metadata: &SavedGameMetadata,
        callback: F,
    ) -> PersistenceResult<()>
    where
        T: DeserializeOwned + Send + 'static,
        F: FnOnce(PersistenceResult<SavedGame<T>>) + Send + 'static,
    {
        metadata.validate()?;

        let settings = self.settings();
        let metadata = metadata.clone();
        let data_path = self.paths.game_data_path(metadata.file_base_name());
        let store = Arc::clone(&self.store);

        self.execute("load_saved_game", settings, callback, move || {
            let codec = Codec::for_format(settings.format);
            let data: T = codec.decode(&store.read(&data_path)?)?;
            Ok(SavedGame::new(metadata, data))
        })
    }

    /// Removes the `.save`/`.meta` pair named by `metadata`.
    ///
    /// Fails with [`PersistenceError::NotFound`] when neither file exists. A
    /// half-present pair is removed with a warning.
    ///
    /// ## Arguments
    /// * `metadata` - Names the pair to remove.
    /// * `callback` - Receives `Ok(())` once both files are gone.
    ///
    /// ## Errors
    /// [`PersistenceError::Validation`] if the metadata is invalid.
    pub fn delete_save<F>(&self, metadata: &SavedGameMetadata, callback: F) -> PersistenceResult<()>
    where
        F: FnOnce(PersistenceResult<()>) + Send + 'static,
    {
        metadata.validate()?;

        let settings = self.settings();
        let name = metadata.file_base_name().to_string();
        let pair = self.paths.saved_game_pair(&name);
        let store = Arc::clone(&self.store);

        self.execute("delete_save", settings, callback, move || {
            let present: Vec<_> = pair.iter().filter(|p| store.exists(p)).collect();
            match present.len() {
                0 => return Err(PersistenceError::NotFound(format!("saved game '{name}'"))),
                1 => log::warn!("Saved game '{name}' was incomplete; removing the remaining file."),
                _ => {}
            }
            for path in present {
                store.remove(path)?;
            }
            log::debug!("Deleted saved game '{name}'.");
            Ok(())
        })
    }

    /// [`delete_save`](Self::delete_save) using the metadata of `saved_game`.
    ///
    /// ## Errors
    /// [`PersistenceError::Validation`] if the metadata is invalid.
    pub fn delete_saved_game<T, F>(
        &self,
        saved_game: &SavedGame<T>,
        callback: F,
    ) -> PersistenceResult<()>
    where
        F: FnOnce(PersistenceResult<()>) + Send + 'static,
    {
        self.delete_save(&saved_game.metadata, callback)
    }

    /// Removes every file directly under the root.
    ///
    /// Subdirectories written by [`save_data`](Self::save_data) are left
    /// alone. An empty or missing root is not an error.
    pub fn delete_all_saved_games<F>(&self, callback: F) -> PersistenceResult<()>
    where
        F: FnOnce(PersistenceResult<()>) + Send + 'static,
    {
        let settings = self.settings();
        let root = self.paths.root().to_path_buf();
        let store = Arc::clone(&self.store);

        self.execute("delete_all_saved_games", settings, callback, move || {
            let files = store.list_by_suffix(&root, "")?;
            let count = files.len();
            for path in files {
                store.remove(&path)?;
            }
            log::debug!("Deleted {count} file(s) under {}.", root.display());
            Ok(())
        })
    }

    // --- Settings ---

    /// Returns `true` while operations run on the worker.
    pub fn is_async(&self) -> bool {
        self.settings().async_mode
    }

    /// Switches between background and in-line execution.
    ///
    /// Only operations issued after the switch are affected. Work already
    /// queued still runs on the worker, and a synchronous operation waits for
    /// it before running. A synchronous operation issued from a callback on
    /// the worker cannot wait; it fails with
    /// [`PersistenceError::WouldOvertake`] while earlier work is queued.
    ///
    /// ## Arguments
    /// * `async_mode` - `true` for background execution.
    pub fn set_async(&self, async_mode: bool) {
        self.update_settings(|s| s.async_mode = async_mode);
        log::info!("SaveManager switched to {} mode.", if async_mode { "async" } else { "sync" });
    }

    /// The ordering the next [`load_metadata`](Self::load_metadata) applies.
    pub fn sort_mode(&self) -> SortMode {
        self.settings().sort_mode
    }

    /// Changes the ordering of later metadata loads. Loads already queued keep
    /// the mode they were issued with.
    ///
    /// ## Arguments
    /// * `sort_mode` - The new ordering.
    pub fn set_sort_mode(&self, sort_mode: SortMode) {
        self.update_settings(|s| s.sort_mode = sort_mode);
    }

    /// The encoding used by the next operation.
    pub fn format(&self) -> SerializationFormat {
        self.settings().format
    }

    /// Selects the encoding for subsequent operations. Existing files are not
    /// converted.
    pub fn set_format(&self, format: SerializationFormat) {
        self.update_settings(|s| s.format = format);
        log::info!("SaveManager format set to {format}.");
    }

    /// How failures of the next operation are surfaced.
    pub fn failure_mode(&self) -> FailureMode {
        self.settings().failure_mode
    }

    /// Changes how failures of later operations are surfaced.
    ///
    /// ## Arguments
    /// * `failure_mode` - [`FailureMode::Callback`] or [`FailureMode::Raise`].
    pub fn set_failure_mode(&self, failure_mode: FailureMode) {
        self.update_settings(|s| s.failure_mode = failure_mode);
    }

    // --- Queue ---

    /// The storage root.
    pub fn root(&self) -> &Path {
        self.paths.root()
    }

    /// The path layout under the root.
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// A snapshot of the worker's counters.
    pub fn queue_stats(&self) -> QueueStats {
        self.queue.stats()
    }

    pub fn queue_status(&self) -> QueueStatus {
        self.queue.status()
    }

    /// Takes failures that were re-raised on the worker thread itself.
    ///
    /// With [`FailureMode::Raise`] and a dispatcher that runs callbacks in
    /// place, a failed operation panics on the worker. The queue catches that
    /// panic and parks its error here. Hosts using such a dispatcher should
    /// poll this, for example once per frame.
    ///
    /// ## Returns
    /// The parked errors, oldest first.
    pub fn take_unobserved_failures(&self) -> Vec<PersistenceError> {
        self.queue.take_unobserved_failures()
    }

    /// Blocks until all queued operations completed and their callbacks were
    /// handed to the dispatcher.
    pub fn wait_idle(&self) {
        self.queue.wait_idle();
    }

    /// Like [`wait_idle`](Self::wait_idle), giving up after `timeout`.
    ///
    /// ## Returns
    /// `true` if the queue became idle in time.
    pub fn wait_idle_timeout(&self, timeout: Duration) -> bool {
        self.queue.wait_idle_timeout(timeout)
    }

    /// Drains queued work and stops the worker. Later operations fail with
    /// [`PersistenceError::BackgroundTask`] in async mode.
    pub fn shutdown(&mut self) {
        self.queue.shutdown();
    }

    pub(crate) fn settings(&self) -> Settings {
        *self.settings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn update_settings(&self, update: impl FnOnce(&mut Settings)) {
        update(&mut self.settings.write().unwrap_or_else(PoisonError::into_inner));
    }

    /// Runs `work` on the worker or in-line, according to `settings`.
    ///
    /// In sync mode with [`FailureMode::Raise`] a failure is returned instead
    /// of reaching `callback`. A sync call refused by the queue is returned
    /// without running `work` or `callback`.
    pub(crate) fn execute<T, W, F>(
        &self,
        operation: &'static str,
        settings: Settings,
        callback: F,
        work: W,
    ) -> PersistenceResult<()>
    where
        T: Send + 'static,
        W: FnOnce() -> PersistenceResult<T> + Send + 'static,
        F: FnOnce(PersistenceResult<T>) + Send + 'static,
    {
        if settings.async_mode {
            let id = self.queue.submit(settings.failure_mode, work, callback)?;
            log::debug!("{operation} queued as task #{id}.");
            return Ok(());
        }

        log::debug!("{operation} running in-line.");
        match self.queue.run_inline(work)? {
            Err(err) if settings.failure_mode == FailureMode::Raise => Err(err),
            result => {
                callback(result);
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for SaveManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveManager")
            .field("root", &self.paths.root())
            .field("settings", &self.settings())
            .field("queue", &self.queue)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use savekeep_core::ImmediateDispatcher;
    use std::sync::mpsc;

    fn sync_manager(root: &Path) -> SaveManager {
        let config = SaveManagerConfig::default().with_root(root).with_async(false);
        SaveManager::new(config, Arc::new(ImmediateDispatcher)).unwrap()
    }

    #[test]
    fn construction_creates_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("Saved Games");

        let manager = sync_manager(&root);

        assert!(root.is_dir());
        assert_eq!(manager.root(), root);
    }

    #[test]
    fn sync_operations_call_back_before_returning() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let manager = sync_manager(dir.path());
        let (tx, rx) = mpsc::channel();

        // Act
        manager
            .save_game_with(SavedGameMetadata::new("inline").unwrap(), 7u32, move |r| {
                tx.send(r).unwrap();
            })
            .unwrap();

        // Assert
        let saved = rx.try_recv().unwrap().unwrap();
        assert!(saved.time_stamp().is_some());
        assert!(dir.path().join("inline.save").is_file());
        assert!(dir.path().join("inline.meta").is_file());
    }

    #[test]
    fn invalid_metadata_is_rejected_without_a_callback() {
        let dir = tempfile::tempdir().unwrap();
        let manager = sync_manager(dir.path());
        let invalid = SavedGameMetadata::new("ok").unwrap();
        // Deserializing lets an invalid record exist; validate is re-run on use.
        let invalid: SavedGameMetadata = {
            let mut json = serde_json::to_value(&invalid).unwrap();
            json["file_base_name"] = serde_json::Value::String("../escape".into());
            serde_json::from_value(json).unwrap()
        };

        let result = manager.delete_save(&invalid, |_| panic!("callback must not run"));

        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn setters_update_the_settings_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let manager = sync_manager(dir.path());

        manager.set_async(true);
        manager.set_sort_mode(SortMode::LongestPlaytimeFirst);
        manager.set_format(SerializationFormat::Json);
        manager.set_failure_mode(FailureMode::Raise);

        assert!(manager.is_async());
        assert_eq!(manager.sort_mode(), SortMode::LongestPlaytimeFirst);
        assert_eq!(manager.format(), SerializationFormat::Json);
        assert_eq!(manager.failure_mode(), FailureMode::Raise);
    }

    #[test]
    fn sync_raise_mode_returns_the_error() {
        let dir = tempfile::tempdir().unwrap();
        let manager = sync_manager(dir.path());
        manager.set_failure_mode(FailureMode::Raise);
        let metadata = SavedGameMetadata::new("missing").unwrap();

        let result = manager.load_saved_game::<u32, _>(&metadata, |_| panic!("callback must not run"));

        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    fn async_operations_after_shutdown_fail() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = sync_manager(dir.path());
        manager.set_async(true);
        manager.shutdown();

        let result = manager.delete_all_saved_games(|_| {});

        assert!(matches!(result, Err(PersistenceError::BackgroundTask { .. })));
    }
}
