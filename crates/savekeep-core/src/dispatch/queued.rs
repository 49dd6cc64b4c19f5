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

use super::{Callback, CallbackDispatcher};
use std::time::Duration;

/// A dispatcher that parks callbacks until the owning context pumps them.
///
/// Any thread may dispatch; the host calls [`QueuedDispatcher::pump`] from its
/// own loop (once per frame, for instance) and the callbacks run there, in
/// dispatch order.
#[derive(Debug)]
pub struct QueuedDispatcher {
    sender: flume::Sender<Callback>,
    receiver: flume::Receiver<Callback>,
}

impl QueuedDispatcher {
    /// Creates a new dispatcher backed by an unbounded channel.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        log::info!("QueuedDispatcher initialized.");
        Self { sender, receiver }
    }

    /// Runs every callback that was pending when the call started.
    ///
    /// Callbacks dispatched while pumping wait for the next pump. If a
    /// callback panics, the panic propagates to the caller and the callbacks
    /// behind it stay queued.
    ///
    /// ## Returns
    /// The number of callbacks that ran.
    pub fn pump(&self) -> usize {
        let pending = self.receiver.len();
        let mut ran = 0;

        for _ in 0..pending {
            match self.receiver.try_recv() {
                Ok(callback) => {
                    callback();
                    ran += 1;
                }
                Err(_) => break,
            }
        }

        if ran > 0 {
            log::trace!("Pumped {ran} callback(s).");
        }
        ran
    }

    /// Waits up to `timeout` for one callback and runs it.
    ///
    /// ## Returns
    /// `true` if a callback ran.
    pub fn run_next(&self, timeout: Duration) -> bool {
        match self.receiver.recv_timeout(timeout) {
            Ok(callback) => {
                callback();
                true
            }
            Err(_) => false,
        }
    }

    /// The number of callbacks waiting to be pumped.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Returns `true` when no callback is waiting.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl CallbackDispatcher for QueuedDispatcher {
    fn dispatch(&self, callback: Callback) {
        log::trace!("Queueing a callback for the owning context.");

        // The receiver lives in `self`, so this can only fail while the
        // dispatcher is being torn down.
        if let Err(e) = self.sender.send(callback) {
            log::error!("Failed to queue callback: {e}. Dispatcher is shutting down.");
        }
    }
}

impl Default for QueuedDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
