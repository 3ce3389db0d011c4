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

//! Groups the data contracts of scene persistence.
//!
//! A persisted scene is a tree of [`DefinitionNode`]s, one per component,
//! tagged with the [`TypeKey`] of the type that produced it. Relations that
//! cannot be expressed with local data are written as [`ReferenceToken`]s and
//! patched back into live relations after the whole tree has been consumed.

mod format;
mod key;
mod node;
mod reference;
mod serialization;

pub use format::*;
pub use key::*;
pub use node::*;
pub use reference::*;
pub use serialization::*;
