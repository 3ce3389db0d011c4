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

//! The container format shared by every persisted scene.
//!
//! A scene file is a fixed-size [`SceneHeader`] followed by the payload. The
//! header names the strategy that encoded the payload so the loader can pick
//! the matching decoder without guessing.

use thiserror::Error;

/// Identifies Strata scene files ("STRATSCN").
pub const HEADER_MAGIC_BYTES: [u8; 8] = *b"STRATSCN";
/// The current version of the header layout.
pub const HEADER_FORMAT_VERSION: u8 = 1;
const STRATEGY_ID_LEN: usize = 32;
const HEADER_LEN: usize = 8 + 1 + STRATEGY_ID_LEN + 8;

/// A scene container that could not be parsed or built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The input is shorter than a header.
    #[error("not enough bytes for a scene header: {0} < {size}", size = SceneHeader::SIZE)]
    Truncated(usize),
    /// The magic bytes do not match.
    #[error("invalid magic bytes; not a Strata scene file")]
    InvalidMagic,
    /// The header was written by a newer layout.
    #[error("unsupported header version {0}")]
    UnsupportedVersion(u8),
    /// The strategy id does not fit in the header.
    #[error("strategy id '{0}' is longer than {max} bytes", max = STRATEGY_ID_LEN)]
    StrategyIdTooLong(String),
    /// The strategy id is not valid UTF-8.
    #[error("strategy id is not valid UTF-8")]
    InvalidStrategyId,
    /// The payload length recorded in the header does not match the data.
    #[error("header announces {expected} payload bytes, found {found}")]
    PayloadLength {
        /// The length recorded in the header.
        expected: u64,
        /// The number of bytes that follow the header.
        found: u64,
    },
}

/// The fixed-size header at the beginning of every scene file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneHeader {
    /// Must be [`HEADER_MAGIC_BYTES`].
    pub magic_bytes: [u8; 8],
    /// The version of the header layout.
    pub format_version: u8,
    /// A null-padded UTF-8 string naming the strategy, e.g. "ST_DEFINITION_RON_V1".
    pub strategy_id: [u8; STRATEGY_ID_LEN],
    /// The length of the payload that follows, in bytes.
    pub payload_length: u64,
}

// The header is a fixed byte layout and is written by hand rather than through serde.
impl SceneHeader {
    /// The total size of the header in bytes.
    pub const SIZE: usize = HEADER_LEN;

    /// Builds a header for a payload encoded by `strategy_id`.
    pub fn new(strategy_id: &str, payload_length: u64) -> Result<Self, HeaderError> {
        let bytes = strategy_id.as_bytes();
        if bytes.len() > STRATEGY_ID_LEN {
            return Err(HeaderError::StrategyIdTooLong(strategy_id.to_owned()));
        }
        let mut id = [0u8; STRATEGY_ID_LEN];
        id[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            magic_bytes: HEADER_MAGIC_BYTES,
            format_version: HEADER_FORMAT_VERSION,
            strategy_id: id,
            payload_length,
        })
    }

    /// Parses a header from the beginning of a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HeaderError> {
        if bytes.len() < Self::SIZE {
            return Err(HeaderError::Truncated(bytes.len()));
        }

        let mut magic_bytes = [0u8; 8];
        magic_bytes.copy_from_slice(&bytes[0..8]);
        if magic_bytes != HEADER_MAGIC_BYTES {
            return Err(HeaderError::InvalidMagic);
        }

        let format_version = bytes[8];
        if format_version > HEADER_FORMAT_VERSION {
            return Err(HeaderError::UnsupportedVersion(format_version));
        }

        let mut strategy_id = [0u8; STRATEGY_ID_LEN];
        strategy_id.copy_from_slice(&bytes[9..9 + STRATEGY_ID_LEN]);

        let mut length = [0u8; 8];
        length.copy_from_slice(&bytes[9 + STRATEGY_ID_LEN..Self::SIZE]);

        Ok(Self {
            magic_bytes,
            format_version,
            strategy_id,
            payload_length: u64::from_le_bytes(length),
        })
    }

    /// Serializes the header into its fixed byte layout.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..8].copy_from_slice(&self.magic_bytes);
        out[8] = self.format_version;
        out[9..9 + STRATEGY_ID_LEN].copy_from_slice(&self.strategy_id);
        out[9 + STRATEGY_ID_LEN..].copy_from_slice(&self.payload_length.to_le_bytes());
        out
    }

    /// The strategy id with its null padding removed.
    pub fn strategy_id_str(&self) -> Result<&str, HeaderError> {
        let end = self
            .strategy_id
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(STRATEGY_ID_LEN);
        std::str::from_utf8(&self.strategy_id[..end]).map_err(|_| HeaderError::InvalidStrategyId)
    }
}

/// A full scene file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneFile {
    /// The parsed header.
    pub header: SceneHeader,
    /// The encoded payload.
    pub payload: Vec<u8>,
}

impl SceneFile {
    /// Wraps a payload produced by `strategy_id`.
    pub fn new(strategy_id: &str, payload: Vec<u8>) -> Result<Self, HeaderError> {
        let header = SceneHeader::new(strategy_id, payload.len() as u64)?;
        Ok(Self { header, payload })
    }

    /// Serializes the header followed by the payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SceneHeader::SIZE + self.payload.len());
        out.extend_from_slice(&self.header.to_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    /// Parses a file, checking the payload length announced by the header.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HeaderError> {
        let header = SceneHeader::from_bytes(bytes)?;
        let payload = &bytes[SceneHeader::SIZE..];
        if payload.len() as u64 != header.payload_length {
            return Err(HeaderError::PayloadLength {
                expected: header.payload_length,
                found: payload.len() as u64,
            });
        }
        Ok(Self {
            header,
            payload: payload.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_survives_a_byte_round_trip() {
        let file = SceneFile::new("ST_DEFINITION_RON_V1", b"(entities: [])".to_vec()).unwrap();
        let bytes = file.to_bytes();

        assert_eq!(&bytes[0..8], b"STRATSCN");
        let parsed = SceneFile::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, file);
        assert_eq!(parsed.header.strategy_id_str().unwrap(), "ST_DEFINITION_RON_V1");
    }

    #[test]
    fn rejects_foreign_and_truncated_input() {
        assert_eq!(
            SceneHeader::from_bytes(b"short"),
            Err(HeaderError::Truncated(5))
        );
        let mut bytes = SceneFile::new("X", Vec::new()).unwrap().to_bytes();
        bytes[0] = b'K';
        assert_eq!(SceneFile::from_bytes(&bytes), Err(HeaderError::InvalidMagic));
    }

    #[test]
    fn payload_length_must_match() {
        let mut bytes = SceneFile::new("X", vec![1, 2, 3]).unwrap().to_bytes();
        bytes.pop();
        assert_eq!(
            SceneFile::from_bytes(&bytes),
            Err(HeaderError::PayloadLength {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn strategy_id_is_bounded() {
        let long = "S".repeat(STRATEGY_ID_LEN + 1);
        assert!(matches!(
            SceneHeader::new(&long, 0),
            Err(HeaderError::StrategyIdTooLong(_))
        ));
        let exact = "S".repeat(STRATEGY_ID_LEN);
        let header = SceneHeader::new(&exact, 0).unwrap();
        assert_eq!(header.strategy_id_str().unwrap(), exact);
    }
}
