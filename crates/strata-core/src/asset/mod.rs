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

//! Shared, reference-counted assets and the loader contract used to find them again.

mod handle;
mod source;

pub use handle::*;
pub use source::*;

/// A marker trait for types that can be loaded and shared as assets.
///
/// Assets are immutable once loaded and are shared through [`AssetHandle`]s.
pub trait Asset: Send + Sync + 'static {}
