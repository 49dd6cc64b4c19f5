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

use common::{Harness, SaveData};
use savekeep_sdk::prelude::*;
use std::sync::mpsc;

fn delete(h: &Harness, metadata: &SavedGameMetadata) -> PersistenceResult<()> {
    let (tx, rx) = mpsc::channel();
    h.manager
        .delete_save(metadata, move |r| tx.send(r).unwrap())
        .unwrap();
    h.wait(&rx)
}

#[test]
fn deleting_twice_fails_the_second_time() {
    // Arrange
    let h = Harness::new(true);
    let saved = h.save(SavedGameMetadata::new("doomed").unwrap(), SaveData::sample(1));

    // Act
    let first = delete(&h, &saved);
    let second = delete(&h, &saved);

    // Assert
    assert!(first.is_ok());
    assert!(second.unwrap_err().is_not_found());
    assert!(h.files().is_empty());
}

#[test]
fn deleting_an_unsaved_record_is_not_found() {
    let h = Harness::new(false);

    let result = delete(&h, &SavedGameMetadata::new("never").unwrap());

    assert!(result.unwrap_err().is_not_found());
}

#[test]
fn delete_removes_only_the_named_pair() {
    let h = Harness::new(true);
    let keep = h.save(SavedGameMetadata::new("keep").unwrap(), SaveData::sample(1));
    let drop = h.save(SavedGameMetadata::new("drop").unwrap(), SaveData::sample(2));

    delete(&h, &drop).unwrap();

    assert_eq!(h.list(), vec![keep]);
}

#[test]
fn a_half_present_pair_is_still_deleted() {
    let h = Harness::new(true);
    let saved = h.save(SavedGameMetadata::new("half").unwrap(), SaveData::sample(1));
    std::fs::remove_file(h.dir.path().join("half.save")).unwrap();

    let result = delete(&h, &saved);

    assert!(result.is_ok());
    assert!(h.files().is_empty());
}

#[test]
fn delete_by_saved_game_uses_its_metadata() {
    let h = Harness::new(true);
    let metadata = h.save(SavedGameMetadata::new("whole").unwrap(), SaveData::sample(4));
    let game = SavedGame::new(metadata, SaveData::sample(4));
    let (tx, rx) = mpsc::channel();

    h.manager
        .delete_saved_game(&game, move |r| tx.send(r).unwrap())
        .unwrap();

    assert!(h.wait(&rx).is_ok());
    assert!(h.files().is_empty());
}

#[test]
fn delete_all_clears_the_root_and_tolerates_an_empty_one() {
    // Arrange
    let h = Harness::new(true);
    for name in ["one", "two", "three"] {
        h.save(SavedGameMetadata::new(name).unwrap(), SaveData::sample(1));
    }
    let delete_all = || {
        let (tx, rx) = mpsc::channel();
        h.manager
            .delete_all_saved_games(move |r| tx.send(r).unwrap())
            .unwrap();
        h.wait(&rx)
    };

    // Act
    let first = delete_all();
    let second = delete_all();

    // Assert
    assert!(first.is_ok());
    assert!(second.is_ok());
    assert!(h.files().is_empty());
    assert!(h.list().is_empty());
}

#[test]
fn validation_errors_are_returned_before_queueing() {
    let h = Harness::new(true);

    let missing_half = SavedGame::<u8>::from_parts(None, Some(1));
    let escaping = h.manager.save_data("../outside", 1u8, |_| panic!("callback must not run"));

    assert!(missing_half.unwrap_err().is_validation());
    assert!(escaping.unwrap_err().is_validation());
    assert!(SavedGameMetadata::new("").unwrap_err().is_validation());
    assert!(SavedGameMetadata::new("a/b").unwrap_err().is_validation());
    assert_eq!(h.manager.queue_stats().submitted, 0);
}
