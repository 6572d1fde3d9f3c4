// Copyright 2025 John Brosnihan
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
//! Native behavior scripts
//!
//! Scripts are plain Rust types implementing [`NativeScript`], attached to
//! an entity with [`Scene::attach_script`](crate::scene::Scene::attach_script)
//! and driven by [`Scene::update`](crate::scene::Scene::update).
//!
//! # Lifecycle
//!
//! 1. Attach: the API version is checked and duplicate names are rejected
//! 2. First update: `on_create`, then `on_update`
//! 3. Later updates: `on_update`
//! 4. Entity destroyed through the scene: `on_destroy`
//!
//! Scripts whose entity disappears without going through the scene are
//! dropped on the next update without `on_destroy`.

mod api;
mod registry;

pub use api::{NativeScript, SCRIPT_API_VERSION};
pub(crate) use registry::ScriptSlot;
pub use registry::{is_version_compatible, ScriptRegistry};
