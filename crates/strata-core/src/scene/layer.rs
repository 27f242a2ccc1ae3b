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

//! A composite node that owns named children and fans every call out to them.

use super::entity::{lock_entity, share, Entity, EntityHandle};
use super::ids::{IdGenerator, ObjectId};
use super::object::{Object, ObjectState};
use crate::event::{EventHandlers, InputEvent};
use crate::graphics::Canvas;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

struct Child {
    handle: EntityHandle,
    name: String,
}

/// A node that owns other nodes.
///
/// Children are kept by id (ascending, which is creation order) and by a
/// unique name. Every call is forwarded to the live children first; the first
/// child returning `false` stops the fan-out, and neither the remaining
/// children nor the layer's own handler see the call. Dead children are
/// dropped from the layer when a fan-out reaches them.
pub struct Layer {
    object: Object,
    children: BTreeMap<ObjectId, Child>,
    names: HashMap<String, ObjectId>,
}

impl Layer {
    /// Creates an empty layer driven by `handlers`.
    pub fn new(ids: &IdGenerator, handlers: Arc<dyn EventHandlers>) -> Self {
        Self {
            object: Object::new(ids, handlers),
            children: BTreeMap::new(),
            names: HashMap::new(),
        }
    }

    /// Creates an empty layer whose own handlers override nothing.
    pub fn with_default_handlers(ids: &IdGenerator) -> Self {
        Self::new(ids, crate::event::default_handlers())
    }

    /// The layer's own object (identity, transform and handlers).
    pub fn object(&self) -> &Object {
        &self.object
    }

    /// Mutable access to the layer's own object.
    pub fn object_mut(&mut self) -> &mut Object {
        &mut self.object
    }

    /// The generator used for clones of this layer and its children.
    pub fn id_generator(&self) -> &IdGenerator {
        self.object.id_generator()
    }

    /// Adds a child under `name` and returns the name actually used.
    ///
    /// If the same node is already a child of this layer, a clone of it is
    /// added instead. If `name` is taken, a numeric suffix is appended or
    /// incremented until it is free.
    ///
    /// ## Arguments
    /// * `handle` - The node to add. It must not be locked by the caller.
    /// * `name` - The requested name.
    ///
    /// ## Returns
    /// The unique name the child was registered under.
    pub fn add_object(&mut self, handle: EntityHandle, name: &str) -> String {
        let mut handle = handle;
        let mut id = lock_entity(&handle).id();
        if self.children.contains_key(&id) {
            let copy = lock_entity(&handle).clone_handle();
            id = lock_entity(&copy).id();
            log::debug!("Layer {}: object already present, adding clone {id}.", self.id());
            handle = copy;
        }

        let name = self.unique_name(name);
        self.names.insert(name.clone(), id);
        self.children.insert(
            id,
            Child {
                handle,
                name: name.clone(),
            },
        );
        log::trace!("Layer {}: added object {id} as '{name}'.", self.id());
        name
    }

    /// Looks a child up by id.
    pub fn get_object(&self, id: ObjectId) -> Option<EntityHandle> {
        self.children.get(&id).map(|child| Arc::clone(&child.handle))
    }

    /// Looks a child up by name.
    pub fn get_object_by_name(&self, name: &str) -> Option<EntityHandle> {
        self.names.get(name).and_then(|id| self.get_object(*id))
    }

    /// The name a child is registered under.
    pub fn name_of(&self, id: ObjectId) -> Option<&str> {
        self.children.get(&id).map(|child| child.name.as_str())
    }

    /// The id registered under `name`.
    pub fn id_of(&self, name: &str) -> Option<ObjectId> {
        self.names.get(name).copied()
    }

    /// Removes a child by id. Does nothing if it is not present.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<EntityHandle> {
        let child = self.children.remove(&id)?;
        self.names.remove(&child.name);
        log::trace!("Layer {}: removed object {id} ('{}').", self.id(), child.name);
        Some(child.handle)
    }

    /// Removes a child by name. Does nothing if it is not present.
    pub fn remove_object_by_name(&mut self, name: &str) -> Option<EntityHandle> {
        let id = self.names.get(name).copied()?;
        self.remove_object(id)
    }

    /// Removes the child behind `handle`. Does nothing if it is not present.
    pub fn remove_handle(&mut self, handle: &EntityHandle) -> Option<EntityHandle> {
        let id = self
            .children
            .iter()
            .find(|(_, child)| Arc::ptr_eq(&child.handle, handle))
            .map(|(id, _)| *id)?;
        self.remove_object(id)
    }

    /// The number of children, dead ones not yet reaped included.
    pub fn num_objects(&self) -> usize {
        self.children.len()
    }

    /// `true` when the layer has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterates over `(id, name, handle)` for every child in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &str, &EntityHandle)> + '_ {
        self.children
            .iter()
            .map(|(id, child)| (*id, child.name.as_str(), &child.handle))
    }

    /// Drops every child without destroying shared ones.
    pub fn clear(&mut self) {
        self.children.clear();
        self.names.clear();
    }

    /// Calls `forward` on each live child until one returns `false`, reaping dead ones.
    ///
    /// Children are snapshotted first so `forward` may not observe children
    /// added during the pass.
    fn fan_out(&mut self, mut forward: impl FnMut(&mut dyn Entity) -> bool) -> bool {
        let snapshot: Vec<(ObjectId, EntityHandle)> = self
            .children
            .iter()
            .map(|(id, child)| (*id, Arc::clone(&child.handle)))
            .collect();

        for (id, handle) in snapshot {
            let mut child = lock_entity(&handle);
            if child.is_dead() {
                drop(child);
                self.remove_object(id);
                continue;
            }
            if !forward(&mut *child) {
                return false;
            }
        }
        true
    }

    /// Returns the next candidate after `name` collides.
    ///
    /// A trailing run of digits is parsed and incremented (`"a9"` -> `"a10"`,
    /// `"a007"` -> `"a8"`); a name without one gets `"0"` appended.
    fn next_candidate(name: &str) -> String {
        let stem = name.trim_end_matches(|c: char| c.is_ascii_digit());
        if stem.len() == name.len() {
            return format!("{name}0");
        }
        format!("{stem}{}", increment_decimal(&name[stem.len()..]))
    }

    fn unique_name(&self, requested: &str) -> String {
        let mut candidate = requested.to_owned();
        while self.names.contains_key(&candidate) {
            candidate = Self::next_candidate(&candidate);
        }
        candidate
    }
}

/// Adds one to a non-empty string of ASCII digits, dropping leading zeros.
fn increment_decimal(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    let mut bytes: Vec<u8> = trimmed.bytes().collect();
    for byte in bytes.iter_mut().rev() {
        if *byte == b'9' {
            *byte = b'0';
        } else {
            *byte += 1;
            return String::from_utf8_lossy(&bytes).into_owned();
        }
    }
    // all nines, or zero
    bytes.insert(0, b'1');
    String::from_utf8_lossy(&bytes).into_owned()
}

impl Clone for Layer {
    /// Deep-copies every child under its original name into a new layer.
    fn clone(&self) -> Self {
        let mut layer = Self {
            object: self.object.clone(),
            children: BTreeMap::new(),
            names: HashMap::new(),
        };
        for child in self.children.values() {
            let copy = lock_entity(&child.handle).clone_handle();
            layer.add_object(copy, &child.name);
        }
        layer
    }
}

impl Entity for Layer {
    fn state(&self) -> &ObjectState {
        self.object.state()
    }

    fn state_mut(&mut self) -> &mut ObjectState {
        self.object.state_mut()
    }

    /// Renders children offset by the layer's position, then the layer itself.
    ///
    /// Offsets saturate at the `i32` range.
    fn render(&mut self, target: &mut dyn Canvas, offset_x: i32, offset_y: i32, offset_z: i32) {
        let position = self.object.state().position;
        let (cx, cy, cz) = (
            offset_x.saturating_add(position.x as i32),
            offset_y.saturating_add(position.y as i32),
            offset_z.saturating_add(position.z as i32),
        );
        self.fan_out(|child| {
            child.render(target, cx, cy, cz);
            true
        });
        self.object.render(target, offset_x, offset_y, offset_z);
    }

    fn update(&mut self, elapsed: f64) -> bool {
        self.fan_out(|child| child.update(elapsed)) && self.object.update(elapsed)
    }

    fn dispatch(&mut self, event: &InputEvent) -> bool {
        self.fan_out(|child| child.dispatch(event)) && self.object.dispatch(event)
    }

    fn destroy(&mut self) {
        if self.object.is_dead() {
            return;
        }
        self.clear();
        self.object.destroy();
    }

    fn clone_handle(&self) -> EntityHandle {
        share(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("id", &self.id())
            .field(
                "children",
                &self
                    .children
                    .iter()
                    .map(|(id, child)| (*id, child.name.as_str()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
