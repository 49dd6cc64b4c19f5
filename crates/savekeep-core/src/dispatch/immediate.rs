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

/// A dispatcher that runs callbacks right away, on the thread that completed
/// the work.
///
/// Fits hosts without a main loop of their own. Callbacks run on the
/// background worker, so they should stay short.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateDispatcher;

impl ImmediateDispatcher {
    /// Creates a new `ImmediateDispatcher`.
    pub fn new() -> Self {
        Self
    }
}

impl CallbackDispatcher for ImmediateDispatcher {
    fn dispatch(&self, callback: Callback) {
        callback();
    }
}
