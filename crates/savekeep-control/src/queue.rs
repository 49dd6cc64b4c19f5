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

//! The single-worker FIFO executor behind every asynchronous operation.

use crate::stats::{QueueStats, QueueStatus};
use crossbeam_channel::{Receiver, Sender};
use savekeep_core::{
    Callback, CallbackDispatcher, FailureMode, PersistenceError, PersistenceResult,
};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;

/// What a finished unit of work hands back to the worker loop.
struct Completion {
    failed: bool,
    deliver: Callback,
}

type Job = Box<dyn FnOnce() -> Completion + Send + 'static>;

#[derive(Debug, Default)]
struct QueueState {
    pending: usize,
    submitted: u64,
    completed: u64,
    failed: u64,
    /// Delivery panics caught on the worker, oldest first.
    unobserved: Vec<PersistenceError>,
}

/// State shared between the queue handle and its worker thread.
#[derive(Debug, Default)]
struct Shared {
    state: Mutex<QueueState>,
    idle: Condvar,
    /// Held while a unit of work touches storage, on the worker or in-line.
    execution: Mutex<()>,
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_execution(&self) -> MutexGuard<'_, ()> {
        self.execution.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn finish(&self, failed: bool) {
        let mut state = self.lock_state();
        state.pending -= 1;
        state.completed += 1;
        if failed {
            state.failed += 1;
        }
        if state.pending == 0 {
            self.idle.notify_all();
        }
    }
}

/// A single-worker, FIFO, run-to-completion executor.
///
/// Every unit of work submitted to the queue runs on one dedicated background
/// thread, after all units submitted before it and never at the same time as
/// another one. [`TaskQueue::submit`] never blocks; the result of each unit
/// reaches its completion callback through the queue's
/// [`CallbackDispatcher`], exactly once.
///
/// Dropping the queue lets the worker drain everything already submitted
/// before the thread exits.
pub struct TaskQueue {
    sender: Option<Sender<Job>>,
    shared: Arc<Shared>,
    dispatcher: Arc<dyn CallbackDispatcher>,
    handle: Option<JoinHandle<()>>,
    worker_id: ThreadId,
}

impl TaskQueue {
    /// Spawns the worker thread and returns a handle to the queue.
    ///
    /// ## Arguments
    /// * `dispatcher` - Runs completion callbacks on the owner's context.
    ///
    /// ## Errors
    /// [`PersistenceError::Io`] if the operating system refuses to spawn the
    /// worker thread.
    pub fn new(dispatcher: Arc<dyn CallbackDispatcher>) -> PersistenceResult<Self> {
        let (sender, receiver) = crossbeam_channel::unbounded::<Job>();
        let shared = Arc::new(Shared::default());

        let worker_shared = Arc::clone(&shared);
        let worker_dispatcher = Arc::clone(&dispatcher);
        let handle = thread::Builder::new()
            .name("savekeep-worker".to_string())
            .spawn(move || worker_loop(receiver, worker_shared, worker_dispatcher))
            .map_err(|e| PersistenceError::Io {
                context: "spawning the task queue worker".to_string(),
                source: e,
            })?;
        let worker_id = handle.thread().id();

        log::info!("TaskQueue worker started.");

        Ok(Self {
            sender: Some(sender),
            shared,
            dispatcher,
            handle: Some(handle),
            worker_id,
        })
    }

    /// Queues `work` behind everything submitted earlier.
    ///
    /// Returns as soon as the unit is queued, with its sequence number. When
    /// the unit has run, `on_complete` receives its result on the dispatcher's
    /// context. A unit that panics counts as failed with a
    /// [`PersistenceError::BackgroundTask`] error.
    ///
    /// With [`FailureMode::Raise`] a failed unit does not call `on_complete`;
    /// its error is wrapped as `BackgroundTask` and re-raised as a panic on the
    /// dispatcher's context instead.
    ///
    /// ## Arguments
    /// * `failure_mode` - How a failed result is surfaced.
    /// * `work` - The unit to run on the worker.
    /// * `on_complete` - Receives the unit's result.
    ///
    /// ## Returns
    /// The unit's sequence number, starting at 1.
    ///
    /// ## Errors
    /// [`PersistenceError::BackgroundTask`] if the queue was shut down.
    pub fn submit<T, W, C>(
        &self,
        failure_mode: FailureMode,
        work: W,
        on_complete: C,
    ) -> PersistenceResult<u64>
    where
        T: Send + 'static,
        W: FnOnce() -> PersistenceResult<T> + Send + 'static,
        C: FnOnce(PersistenceResult<T>) + Send + 'static,
    {
        let sender = self.sender.as_ref().ok_or_else(shut_down_error)?;

        let mut state = self.shared.lock_state();
        let id = state.submitted + 1;

        let job: Job = Box::new(move || {
            log::trace!("Running task #{id}.");
            let result = panic::catch_unwind(AssertUnwindSafe(work))
                .unwrap_or_else(|payload| Err(PersistenceError::from_panic(payload)));

            match result {
                Err(err) if failure_mode == FailureMode::Raise => {
                    let err = err.into_background();
                    log::error!("Task #{id} failed: {err}");
                    Completion {
                        failed: true,
                        deliver: Box::new(move || panic!("{err}")),
                    }
                }
                result => {
                    if let Err(err) = &result {
                        log::warn!("Task #{id} failed: {err}");
                    }
                    Completion {
                        failed: result.is_err(),
                        deliver: Box::new(move || on_complete(result)),
                    }
                }
            }
        });

        sender.send(job).map_err(|_| shut_down_error())?;
        state.submitted = id;
        state.pending += 1;
        log::debug!("Queued task #{id} ({} pending).", state.pending);

        Ok(id)
    }

    /// Runs `work` on the calling thread without overlapping queued work.
    ///
    /// Waits until every previously submitted unit has completed, then runs
    /// `work` while holding the queue's execution lock, so the worker cannot
    /// start a unit submitted meanwhile until `work` returns. `work` must not
    /// submit to this queue.
    ///
    /// Called from the worker thread itself (from a callback run by an
    /// in-place dispatcher), `work` runs right away if nothing else is queued.
    ///
    /// ## Returns
    /// What `work` returned, or an error if `work` was refused.
    ///
    /// ## Errors
    /// [`PersistenceError::WouldOvertake`] if called on the worker thread while
    /// units submitted earlier are still waiting. `work` does not run.
    pub fn run_inline<T>(&self, work: impl FnOnce() -> T) -> PersistenceResult<T> {
        if self.is_worker_thread() {
            // The unit whose callback is running still counts as pending.
            let queued = self.shared.lock_state().pending.saturating_sub(1);
            if queued > 0 {
                return Err(PersistenceError::WouldOvertake { queued });
            }
            return Ok(work());
        }

        let state = self
            .shared
            .idle
            .wait_while(self.shared.lock_state(), |s| s.pending > 0)
            .unwrap_or_else(PoisonError::into_inner);
        let _execution = self.shared.lock_execution();
        drop(state);

        Ok(work())
    }

    /// Blocks until every submitted unit has completed and its result was
    /// handed to the dispatcher.
    pub fn wait_idle(&self) {
        if self.is_worker_thread() {
            return;
        }

        let _state = self
            .shared
            .idle
            .wait_while(self.shared.lock_state(), |s| s.pending > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Like [`TaskQueue::wait_idle`], giving up after `timeout`.
    ///
    /// ## Returns
    /// `true` if the queue became idle in time.
    pub fn wait_idle_timeout(&self, timeout: Duration) -> bool {
        if self.is_worker_thread() {
            return self.shared.lock_state().pending == 0;
        }

        let (state, _) = self
            .shared
            .idle
            .wait_timeout_while(self.shared.lock_state(), timeout, |s| s.pending > 0)
            .unwrap_or_else(PoisonError::into_inner);
        state.pending == 0
    }

    /// The current position in the `Idle → Running → Draining` cycle.
    pub fn status(&self) -> QueueStatus {
        QueueStatus::from_pending(self.shared.lock_state().pending)
    }

    /// A snapshot of the queue counters.
    pub fn stats(&self) -> QueueStats {
        let state = self.shared.lock_state();
        QueueStats {
            submitted: state.submitted,
            completed: state.completed,
            failed: state.failed,
            pending: state.pending,
            unobserved: state.unobserved.len(),
        }
    }

    /// Takes the errors of completions that panicked on the worker thread.
    ///
    /// This only happens with a dispatcher that runs callbacks in place, for
    /// instance a [`FailureMode::Raise`] failure re-raised by
    /// [`savekeep_core::ImmediateDispatcher`]. A pumped dispatcher raises on
    /// the host's own thread instead.
    ///
    /// ## Returns
    /// The parked errors, oldest first. The queue forgets them.
    pub fn take_unobserved_failures(&self) -> Vec<PersistenceError> {
        std::mem::take(&mut self.shared.lock_state().unobserved)
    }

    /// The dispatcher completions are delivered through.
    pub fn dispatcher(&self) -> &Arc<dyn CallbackDispatcher> {
        &self.dispatcher
    }

    /// Returns `true` once [`TaskQueue::shutdown`] has run.
    pub fn is_shut_down(&self) -> bool {
        self.sender.is_none()
    }

    /// Stops accepting work, lets the worker drain what was already queued,
    /// and joins it.
    pub fn shutdown(&mut self) {
        let Some(sender) = self.sender.take() else {
            return;
        };
        drop(sender);

        if let Some(handle) = self.handle.take() {
            if self.is_worker_thread() {
                log::warn!("TaskQueue shut down from its own worker; not joining.");
                return;
            }
            if handle.join().is_err() {
                log::error!("TaskQueue worker terminated abnormally.");
            }
        }

        log::info!("TaskQueue shut down.");
    }

    fn is_worker_thread(&self) -> bool {
        thread::current().id() == self.worker_id
    }
}

impl Drop for TaskQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("stats", &self.stats())
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}

fn shut_down_error() -> PersistenceError {
    PersistenceError::BackgroundTask {
        message: "the task queue is shut down".to_string(),
        source: None,
    }
}

fn worker_loop(
    receiver: Receiver<Job>,
    shared: Arc<Shared>,
    dispatcher: Arc<dyn CallbackDispatcher>,
) {
    log::debug!("TaskQueue worker waiting for work.");

    // Ends once every sender is dropped and the channel is drained.
    for job in receiver.iter() {
        let completion = {
            let _execution = shared.lock_execution();
            job()
        };

        let deliver = completion.deliver;
        let delivered = panic::catch_unwind(AssertUnwindSafe(|| dispatcher.dispatch(deliver)));
        if let Err(payload) = delivered {
            let err = PersistenceError::from_panic(payload);
            log::error!("Completion panicked on the worker thread: {err}");
            shared.lock_state().unobserved.push(err);
        }

        shared.finish(completion.failed);
    }

    log::debug!("TaskQueue worker exiting.");
}
