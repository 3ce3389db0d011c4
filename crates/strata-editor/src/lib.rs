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

//! Generic object editing on top of the capability registry.
//!
//! The [`ObjectEditorContainer`] maps concrete types to their editors, the
//! [`Inspector`] walks the components attached to an entity, a camera or the
//! scene and renders each through the container, and [`TextUi`] is a
//! read-only [`PropertyUi`](strata_core::editor::PropertyUi) for terminals
//! and tests.

#![warn(missing_docs)]

mod container;
mod inspector;
mod ui;

pub use container::*;
pub use inspector::*;
pub use ui::*;
