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

use savekeep_core::{PersistenceError, PersistenceResult, SerializationFormat, Serializer};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Placeholder for a JSON text codec.
///
/// The format can be selected, but every call fails with
/// [`PersistenceError::NotImplemented`].
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializer;

impl JsonSerializer {
    /// Creates the JSON codec placeholder.
    pub fn new() -> Self {
        Self
    }
}

impl Serializer for JsonSerializer {
    fn format(&self) -> SerializationFormat {
        SerializationFormat::Json
    }

    fn encode<T: Serialize + ?Sized>(&self, _value: &T) -> PersistenceResult<Vec<u8>> {
        Err(PersistenceError::NotImplemented("JSON serialization"))
    }

    fn decode<T: DeserializeOwned>(&self, _bytes: &[u8]) -> PersistenceResult<T> {
        Err(PersistenceError::NotImplemented("JSON deserialization"))
    }
}
