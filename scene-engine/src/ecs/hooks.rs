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
//! Destroy hooks
//!
//! A destroy hook is registered per component type and runs synchronously,
//! immediately before a component of that type is physically removed from
//! an entity, whether through an explicit removal or entity destruction.
//! The component is still readable while the hook runs.

use crate::ecs::{Entity, World};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

/// Callback invoked with the world and the entity losing the component
pub type DestroyHook = Arc<dyn Fn(&mut World, Entity) + Send + Sync>;

/// Hook table keyed by component `TypeId`
#[derive(Default)]
pub(crate) struct DestroyHooks {
    hooks: HashMap<TypeId, Vec<DestroyHook>>,
}

impl DestroyHooks {
    pub fn register(&mut self, component: TypeId, hook: DestroyHook) {
        self.hooks.entry(component).or_default().push(hook);
    }

    /// Snapshot of the hooks for `component`.
    ///
    /// Handles are cloned out so a hook can receive `&mut World` (which owns
    /// this table) without aliasing it.
    pub fn hooks_for(&self, component: TypeId) -> Option<Vec<DestroyHook>> {
        self.hooks.get(&component).cloned()
    }

    pub fn count(&self, component: TypeId) -> usize {
        self.hooks.get(&component).map_or(0, Vec::len)
    }
}
