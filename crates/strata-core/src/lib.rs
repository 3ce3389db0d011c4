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

//! Foundational contracts shared by every Strata crate.
//!
//! Nothing in here knows about concrete component types. The crate only defines
//! the vocabulary the registry, the scene lanes and the editor use to talk to
//! each other: entity and camera identities, shared asset handles, the
//! persisted definition tree, reference tokens and the generic editing contract.

#![warn(missing_docs)]

pub mod asset;
pub mod ecs;
pub mod editor;
pub mod scene;

pub use ecs::{AttachTarget, CameraId, EntityId, InstanceRef};
pub use scene::{DefinitionNode, TypeKey, Value};
