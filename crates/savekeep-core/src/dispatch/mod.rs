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

//! The callback dispatch bridge.
//!
//! Work finishes on a background thread, but its result usually has to be
//! consumed on a specific context (a game loop, a UI thread). A
//! [`CallbackDispatcher`] is the capability that moves a finished callback
//! back onto that context. The persistence layer only depends on the trait.

mod immediate;
mod queued;

pub use self::immediate::ImmediateDispatcher;
pub use self::queued::QueuedDispatcher;

use std::sync::Arc;

/// A boxed completion closure ready to be run on the caller's context.
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Runs completion callbacks on a designated execution context.
///
/// Implementations must run every dispatched callback exactly once, in the
/// order they were dispatched.
pub trait CallbackDispatcher: Send + Sync {
    /// Schedules `callback` to run on the dispatcher's context.
    fn dispatch(&self, callback: Callback);
}

impl<D: CallbackDispatcher + ?Sized> CallbackDispatcher for Arc<D> {
    fn dispatch(&self, callback: Callback) {
        (**self).dispatch(callback)
    }
}
