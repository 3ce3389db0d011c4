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

//! The contract shared by every scene encoding, and its errors.
//!
//! A [`SerializationStrategy`] turns a [`SceneDefinition`] into a byte
//! payload and back. Strategies never touch a live world: building the
//! definition and spawning it are the capture and spawner lanes' job, so
//! every encoding carries exactly the same content.

mod binary_lane;
mod definition_lane;

pub use binary_lane::*;
pub use definition_lane::*;

use strata_data::scene::SceneDefinition;
use thiserror::Error;

/// An error that can occur while encoding a scene definition.
#[derive(Debug, Error)]
pub enum SerializationError {
    /// The encoder rejected the definition.
    #[error("Serialization failed: {0}")]
    ProcessingFailed(String),
}

/// An error that can occur while decoding a scene payload.
#[derive(Debug, Error)]
pub enum DeserializationError {
    /// The data is corrupted or does not match the expected format.
    #[error("Deserialization failed: invalid format - {0}")]
    InvalidFormat(String),
}

/// A scene encoding.
pub trait SerializationStrategy: Send + Sync {
    /// Returns the unique, versioned identifier of this strategy.
    ///
    /// The id is written to the scene header and used on load to pick the
    /// strategy that decodes the payload. Example: `"ST_DEFINITION_RON_V1"`.
    fn get_strategy_id(&self) -> &'static str;

    /// Encodes `definition` into a payload.
    fn encode(&self, definition: &SceneDefinition) -> Result<Vec<u8>, SerializationError>;

    /// Decodes a payload produced by [`encode`](Self::encode).
    ///
    /// The header is assumed to be already validated; `data` is the payload alone.
    fn decode(&self, data: &[u8]) -> Result<SceneDefinition, DeserializationError>;
}
