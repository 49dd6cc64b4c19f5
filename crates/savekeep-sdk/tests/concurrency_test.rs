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

mod common;

use common::{Harness, SaveData, TIMEOUT};
use savekeep_sdk::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn concurrent_saves_from_many_threads_all_complete_once() {
    // --- 1. ARRANGE ---
    let h = Harness::new(true);
    let manager = Arc::new(h.manager);
    let callbacks = Arc::new(AtomicUsize::new(0));

    // --- 2. ACT ---
    let producers: Vec<_> = (0..4)
        .map(|producer| {
            let manager = Arc::clone(&manager);
            let callbacks = Arc::clone(&callbacks);
            thread::spawn(move || {
                for n in 0..25 {
                    let slot = producer * 25 + n;
                    let metadata = SavedGameMetadata::with_slot(format!("save-{slot}"), slot).unwrap();
                    let callbacks = Arc::clone(&callbacks);
                    manager
                        .save_game_with(metadata, SaveData::sample(slot as u32), move |result| {
                            assert_eq!(result.unwrap().slot(), slot);
                            callbacks.fetch_add(1, Ordering::SeqCst);
                        })
                        .unwrap();
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().expect("Producer thread panicked");
    }

    let deadline = Instant::now() + TIMEOUT;
    while callbacks.load(Ordering::SeqCst) < 100 && Instant::now() < deadline {
        h.dispatcher.run_next(Duration::from_millis(50));
    }

    // The last callback can run before the worker records its completion.
    manager.wait_idle();

    // --- 3. ASSERT ---
    assert_eq!(callbacks.load(Ordering::SeqCst), 100);
    assert!(h.dispatcher.is_empty(), "No callback may be delivered twice");

    let stats = manager.queue_stats();
    assert_eq!(stats.submitted, 100);
    assert_eq!(stats.completed, 100);
    assert_eq!(stats.failed, 0);

    let entries: Vec<String> = std::fs::read_dir(h.dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries.len(), 200);
    for slot in 0..100 {
        assert!(entries.contains(&format!("save-{slot}.save")));
        assert!(entries.contains(&format!("save-{slot}.meta")));
    }
}

#[test]
fn switching_to_sync_sees_all_earlier_async_work() {
    // Arrange
    let h = Harness::new(true);
    for n in 0..20 {
        let metadata = SavedGameMetadata::with_slot(format!("queued-{n}"), n).unwrap();
        h.manager
            .save_game_with(metadata, SaveData::sample(n as u32), |r| {
                r.unwrap();
            })
            .unwrap();
    }

    // Act
    h.manager.set_async(false);
    let (tx, rx) = mpsc::channel();
    h.manager
        .load_metadata(move |r| tx.send(r).unwrap())
        .unwrap();

    // Assert
    let listed = rx.try_recv().expect("sync callbacks run before the call returns");
    assert_eq!(listed.unwrap().len(), 20);
    assert_eq!(h.manager.queue_status(), QueueStatus::Idle);
    assert_eq!(h.dispatcher.pump(), 20);
}

#[test]
fn raise_mode_panics_on_the_dispatcher_context_instead_of_calling_back() {
    // Arrange
    let h = Harness::new(true);
    h.manager.set_failure_mode(FailureMode::Raise);
    let metadata = SavedGameMetadata::new("absent").unwrap();
    let called = Arc::new(AtomicUsize::new(0));
    let called_in_callback = Arc::clone(&called);

    // Act
    h.manager
        .load_saved_game::<SaveData, _>(&metadata, move |_| {
            called_in_callback.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    h.manager.wait_idle();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| h.dispatcher.pump()));

    // Assert
    assert!(outcome.is_err());
    assert_eq!(called.load(Ordering::SeqCst), 0);
    assert_eq!(h.manager.queue_stats().failed, 1);
}

#[test]
fn callback_mode_keeps_the_queue_going_after_a_failure() {
    let h = Harness::new(true);
    let (tx_fail, rx_fail) = mpsc::channel();
    h.manager
        .delete_save(&SavedGameMetadata::new("nope").unwrap(), move |r| tx_fail.send(r).unwrap())
        .unwrap();

    let saved = h.save(SavedGameMetadata::new("after").unwrap(), SaveData::sample(9));

    assert!(h.wait(&rx_fail).unwrap_err().is_not_found());
    assert_eq!(saved.file_base_name(), "after");
}

fn immediate_manager(dir: &std::path::Path) -> Arc<SaveManager> {
    let config = SaveManagerConfig::default().with_root(dir);
    Arc::new(SaveManager::new(config, Arc::new(ImmediateDispatcher::new())).unwrap())
}

#[test]
fn sync_call_from_a_worker_callback_cannot_overtake_queued_saves() {
    // --- 1. ARRANGE ---
    let dir = tempfile::tempdir().unwrap();
    let manager = immediate_manager(dir.path());
    let (order_tx, order_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::sync_channel::<()>(0);

    // --- 2. ACT ---
    // The gate's callback holds the worker until A and B are both queued.
    // A's callback then issues a sync listing while B is still waiting.
    manager
        .save_data("gate.dat", 0u8, move |_| {
            let _ = release_rx.recv();
        })
        .unwrap();
    let inner = Arc::clone(&manager);
    let a_order = order_tx.clone();
    manager
        .save_game_with(SavedGameMetadata::new("A").unwrap(), 1u8, move |r| {
            r.unwrap();
            a_order.send("A-cb".to_string()).unwrap();
            inner.set_async(false);
            let listing = inner.load_metadata(|_| panic!("callback must not run"));
            inner.set_async(true);
            a_order.send(format!("sync: {listing:?}")).unwrap();
        })
        .unwrap();
    manager
        .save_game_with(SavedGameMetadata::new("B").unwrap(), 2u8, move |r| {
            r.unwrap();
            order_tx.send("B-cb".to_string()).unwrap();
        })
        .unwrap();
    release_tx.send(()).unwrap();
    manager.wait_idle();

    // --- 3. ASSERT ---
    let order: Vec<String> = order_rx.try_iter().collect();
    assert_eq!(order.len(), 3);
    assert_eq!(order[0], "A-cb");
    assert!(order[1].contains("WouldOvertake"), "got {}", order[1]);
    assert_eq!(order[2], "B-cb");
}

#[test]
fn raise_mode_with_an_in_place_dispatcher_is_collected_by_the_host() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let manager = immediate_manager(dir.path());
    manager.set_failure_mode(FailureMode::Raise);
    let missing = SavedGameMetadata::new("missing").unwrap();

    // Act
    manager
        .load_saved_game::<SaveData, _>(&missing, |_| panic!("callback must not run"))
        .unwrap();
    manager.set_failure_mode(FailureMode::Callback);
    let (tx, rx) = mpsc::channel();
    manager
        .save_game_with(SavedGameMetadata::new("next").unwrap(), SaveData::sample(1), move |r| {
            tx.send(r.is_ok()).unwrap()
        })
        .unwrap();
    manager.wait_idle();

    // Assert
    assert!(rx.recv_timeout(TIMEOUT).unwrap());
    assert_eq!(manager.queue_stats().unobserved, 1);
    let failures = manager.take_unobserved_failures();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].to_string().contains("missing"));
    assert!(manager.take_unobserved_failures().is_empty());
}
