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

//! Payload codecs and the format dispatch that picks one of them.

mod binary;
mod json;

pub use self::binary::BinarySerializer;
pub use self::json::JsonSerializer;

use savekeep_core::{PersistenceResult, SerializationFormat, Serializer};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// The codec selected for an operation.
///
/// Built from the configured [`SerializationFormat`] when an operation is
/// submitted, so a format change only affects later operations.
#[derive(Debug, Clone, Copy)]
pub enum Codec {
    /// The bincode-backed binary codec.
    Binary(BinarySerializer),
    /// The declared-but-stubbed JSON codec.
    Json(JsonSerializer),
}

impl Codec {
    /// Returns the codec implementing `format`.
    pub fn for_format(format: SerializationFormat) -> Self {
        match format {
            SerializationFormat::Binary => Codec::Binary(BinarySerializer::new()),
            SerializationFormat::Json => Codec::Json(JsonSerializer::new()),
        }
    }
}

impl Serializer for Codec {
    fn format(&self) -> SerializationFormat {
        match self {
            Codec::Binary(codec) => codec.format(),
            Codec::Json(codec) => codec.format(),
        }
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> PersistenceResult<Vec<u8>> {
        match self {
            Codec::Binary(codec) => codec.encode(value),
            Codec::Json(codec) => codec.encode(value),
        }
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> PersistenceResult<T> {
        match self {
            Codec::Binary(codec) => codec.decode(bytes),
            Codec::Json(codec) => codec.decode(bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use savekeep_core::PersistenceError;

    #[test]
    fn dispatches_on_format() {
        assert_eq!(
            Codec::for_format(SerializationFormat::Binary).format(),
            SerializationFormat::Binary
        );
        assert_eq!(
            Codec::for_format(SerializationFormat::Json).format(),
            SerializationFormat::Json
        );
    }

    #[test]
    fn binary_codec_round_trips_through_dispatch() {
        let codec = Codec::for_format(SerializationFormat::Binary);
        let bytes = codec.encode(&vec![1_u16, 2, 3]).unwrap();
        let decoded: Vec<u16> = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, vec![1, 2, 3]);
    }

    #[test]
    fn json_codec_is_not_implemented() {
        let codec = Codec::for_format(SerializationFormat::Json);
        assert!(matches!(
            codec.encode(&1_u8),
            Err(PersistenceError::NotImplemented(_))
        ));
        assert!(matches!(
            codec.decode::<u8>(b"1"),
            Err(PersistenceError::NotImplemented(_))
        ));
    }
}
