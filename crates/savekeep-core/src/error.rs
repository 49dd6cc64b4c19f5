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

//! The error taxonomy shared by every persistence operation.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::io;
use std::path::Path;
use thiserror::Error;

/// A convenient alias for results produced by persistence operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// An error that can occur while saving, loading or deleting persisted data.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// A required value was missing or malformed. Raised synchronously,
    /// before any work is queued.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The targeted record or file does not exist in storage.
    #[error("not found: {0}")]
    NotFound(String),

    /// A value could not be encoded by the active serializer.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Stored bytes were empty, truncated, or did not match the requested shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The requested capability is declared but has no implementation.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// A unit of work running on the background worker failed.
    #[error("background task failed: {message}")]
    BackgroundTask {
        /// Human readable description of the failure.
        message: String,
        /// The typed error raised by the unit of work, if there was one.
        #[source]
        source: Option<Box<PersistenceError>>,
    },

    /// A synchronous operation was issued from a completion callback running
    /// on the worker while earlier units were still queued. Running it would
    /// overtake them and waiting would deadlock, so it is refused.
    #[error("synchronous operation would overtake {queued} queued unit(s)")]
    WouldOvertake {
        /// Units submitted earlier that have not run yet.
        queued: usize,
    },

    /// Any other filesystem failure.
    #[error("I/O error on '{context}': {source}")]
    Io {
        /// The path or operation the failure relates to.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl PersistenceError {
    /// Builds an error from an I/O failure on `path`.
    ///
    /// `ErrorKind::NotFound` becomes [`PersistenceError::NotFound`] so callers can
    /// match on missing records without inspecting I/O kinds.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::NotFound(path.display().to_string())
        } else {
            Self::Io {
                context: path.display().to_string(),
                source: err,
            }
        }
    }

    /// Wraps an error raised inside a unit of work into a `BackgroundTask` error.
    ///
    /// Errors that already are `BackgroundTask` are returned unchanged.
    pub fn into_background(self) -> Self {
        match self {
            err @ Self::BackgroundTask { .. } => err,
            err => Self::BackgroundTask {
                message: err.to_string(),
                source: Some(Box::new(err)),
            },
        }
    }

    /// Converts a panic payload caught on the worker into a `BackgroundTask` error.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unit of work panicked".to_string()
        };

        Self::BackgroundTask {
            message: format!("panic: {message}"),
            source: None,
        }
    }

    /// Returns `true` for [`PersistenceError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns `true` for [`PersistenceError::Validation`].
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// How failures of queued work reach the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FailureMode {
    /// The operation's callback receives `Err(PersistenceError)`.
    #[default]
    Callback,
    /// Fail loud: the error is wrapped as `BackgroundTask` and re-raised as a
    /// panic on the dispatcher's context. The operation's callback is not
    /// invoked. Synchronous operations return the error to the caller instead.
    ///
    /// With a dispatcher that runs callbacks in place, the panic happens on
    /// the worker itself; the queue catches it and parks the error for the
    /// host to collect.
    Raise,
}
