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

use strata_core::asset::Asset;

/// A loaded font face.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    /// The font family name.
    pub family: String,
}

impl Asset for Font {}

/// A script source file.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptAsset {
    /// The script source code.
    pub source: String,
}

impl Asset for ScriptAsset {}

/// A six-face environment texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cubemap {
    /// The edge length of each face, in pixels.
    pub resolution: u32,
}

impl Asset for Cubemap {}
