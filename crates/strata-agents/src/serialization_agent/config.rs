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

//! Settings for scene saving, read from a RON file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use strata_core::scene::SerializationGoal;
use thiserror::Error;

/// An error raised while reading a [`SceneIoConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config file '{}'", path.display())]
    Io {
        /// The file that was read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid configuration.
    #[error("invalid scene I/O config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// How scenes are saved when the caller does not say otherwise.
///
/// Every field is optional in the file; missing fields keep their default.
///
/// ```ron
/// (default_goal: LongTermStability, indent: "    ")
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneIoConfig {
    /// The goal used by [`SerializationAgent::save`](crate::SerializationAgent::save).
    pub default_goal: SerializationGoal,
    /// One level of indentation in text output.
    pub indent: String,
    /// Whether text output names every struct.
    pub struct_names: bool,
}

impl Default for SceneIoConfig {
    fn default() -> Self {
        Self {
            default_goal: SerializationGoal::default(),
            indent: "  ".to_owned(),
            struct_names: false,
        }
    }
}

impl SceneIoConfig {
    /// Parses a configuration from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::de::from_str(text)?)
    }

    /// Reads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron_str(&text)?;
        log::debug!("Loaded scene I/O config from '{}'", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_keep_their_defaults() {
        let config = SceneIoConfig::from_ron_str("(default_goal: FastestLoad)").unwrap();
        assert_eq!(config.default_goal, SerializationGoal::FastestLoad);
        assert_eq!(config.indent, "  ");
        assert!(!config.struct_names);

        assert_eq!(SceneIoConfig::from_ron_str("()").unwrap(), SceneIoConfig::default());
    }

    #[test]
    fn unknown_goals_are_rejected() {
        assert!(matches!(
            SceneIoConfig::from_ron_str("(default_goal: Quickest)"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn a_missing_file_names_its_path() {
        let error = SceneIoConfig::load("/nonexistent/strata.ron").unwrap_err();
        assert!(error.to_string().contains("/nonexistent/strata.ron"));
    }
}
