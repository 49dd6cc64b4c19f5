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

use bincode::config;
use savekeep_core::{PersistenceError, PersistenceResult, SerializationFormat, Serializer};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Binary codec backed by `bincode` with its standard configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct BinarySerializer;

impl BinarySerializer {
    /// Creates a new binary codec.
    pub fn new() -> Self {
        Self
    }
}

impl Serializer for BinarySerializer {
    fn format(&self) -> SerializationFormat {
        SerializationFormat::Binary
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> PersistenceResult<Vec<u8>> {
        bincode::serde::encode_to_vec(value, config::standard())
            .map_err(|e| PersistenceError::Serialization(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> PersistenceResult<T> {
        if bytes.is_empty() {
            return Err(PersistenceError::Deserialization("data can't be empty".to_string()));
        }

        let (value, consumed): (T, usize) =
            bincode::serde::decode_from_slice(bytes, config::standard())
                .map_err(|e| PersistenceError::Deserialization(e.to_string()))?;

        // Leftover bytes mean the stored value has a different shape.
        if consumed != bytes.len() {
            return Err(PersistenceError::Deserialization(format!(
                "{} trailing byte(s) after the decoded value",
                bytes.len() - consumed
            )));
        }

        Ok(value)
    }
}
