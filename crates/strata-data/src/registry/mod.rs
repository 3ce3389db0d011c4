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

//! The Capability Registry.
//!
//! Modules describe each of their types once with a [`TypeDescriptor`]: which
//! containers it can be attached to, whether it persists itself, whether it
//! can be built on its own and which editor presents it. Everything else in
//! Strata branches on those capabilities through the [`CapabilityRegistry`]
//! instead of naming concrete types.

mod capability;
mod channel;
mod context;
mod descriptor;
mod global;

pub use capability::*;
pub use channel::*;
pub use context::*;
pub use descriptor::*;
pub use global::*;
