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

//! Defines the abstract contract for payload codecs.
//!
//! The [`Serializer`] trait is the seam between the persistence layer and the
//! byte format it writes. Which implementation backs it is chosen at run time
//! through a [`SerializationFormat`] value; concrete codecs live in
//! `savekeep-lanes`.

use crate::error::PersistenceResult;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Selects which codec encodes stored files.
///
/// Switching formats affects the next operation only. Files that were written
/// with another format are not migrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SerializationFormat {
    /// Compact binary encoding.
    #[default]
    Binary,
    /// JSON text encoding. Declared, not implemented yet.
    Json,
}

impl SerializationFormat {
    /// A short, stable name for logs and configuration files.
    pub fn name(self) -> &'static str {
        match self {
            SerializationFormat::Binary => "binary",
            SerializationFormat::Json => "json",
        }
    }
}

impl fmt::Display for SerializationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The contract every codec implements.
///
/// The shape to decode is the type parameter of [`Serializer::decode`]; callers
/// state what they expect and the codec either produces exactly that or fails.
pub trait Serializer: Send + Sync {
    /// The format this codec implements.
    fn format(&self) -> SerializationFormat;

    /// Encodes `value` into bytes.
    ///
    /// ## Errors
    /// [`crate::PersistenceError::Serialization`] if the value cannot be encoded,
    /// [`crate::PersistenceError::NotImplemented`] for stubbed formats.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> PersistenceResult<Vec<u8>>;

    /// Decodes a value of type `T` from `bytes`.
    ///
    /// ## Errors
    /// [`crate::PersistenceError::Deserialization`] if `bytes` is empty, truncated,
    /// has trailing data, or does not describe a `T`.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> PersistenceResult<T>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_is_the_default_format() {
        assert_eq!(SerializationFormat::default(), SerializationFormat::Binary);
        assert_eq!(SerializationFormat::Json.to_string(), "json");
    }
}
