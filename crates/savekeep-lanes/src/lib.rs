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

//! # Savekeep Lanes
//!
//! Concrete implementations of the capabilities declared in `savekeep-core`:
//! the payload codecs selected by [`SerializationFormat`] and the local
//! filesystem store.
//!
//! [`SerializationFormat`]: savekeep_core::SerializationFormat

#![warn(missing_docs)]

pub mod codec;
pub mod fs;

pub use codec::{BinarySerializer, Codec, JsonSerializer};
pub use fs::LocalFileStore;
