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

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// What a caller wants out of a save, rather than which encoding to use.
///
/// The serialization agent maps each goal to one of its registered strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SerializationGoal {
    /// The fastest possible load. The output is binary.
    FastestLoad,
    /// The smallest file on disk.
    SmallestFileSize,
    /// A text format that can be read and diffed.
    #[default]
    HumanReadableDebug,
    /// A format decoupled from in-memory layouts, readable by future versions.
    LongTermStability,
}

impl FromStr for SerializationGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fastest-load" | "fast" => Ok(Self::FastestLoad),
            "smallest" | "smallest-file-size" => Ok(Self::SmallestFileSize),
            "debug" | "human-readable" => Ok(Self::HumanReadableDebug),
            "stable" | "long-term" => Ok(Self::LongTermStability),
            other => Err(format!("unknown serialization goal '{other}'")),
        }
    }
}

impl fmt::Display for SerializationGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FastestLoad => "fastest-load",
            Self::SmallestFileSize => "smallest-file-size",
            Self::HumanReadableDebug => "human-readable",
            Self::LongTermStability => "long-term",
        };
        f.write_str(name)
    }
}
