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

//! The basic scene node: identity, transform state and a handler table.

use super::entity::{share, Entity, EntityHandle};
use super::ids::{IdGenerator, ObjectId};
use crate::event::{default_handlers, EventHandlers, InputEvent};
use crate::graphics::Canvas;
use crate::math::Vec3;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Frame rate the per-tick motion vectors are expressed against.
const REFERENCE_FRAME_RATE: f64 = 60.0;

/// The data part of an object, handed to every handler call.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectState {
    id: ObjectId,
    dead: bool,
    destroy_requested: bool,
    /// Position in the parent's space.
    pub position: Vec3,
    /// Normalized pivot, `(0.5, 0.5, 0.5)` is the center.
    pub anchor_point: Vec3,
    /// Extra translation applied at render time.
    pub offset: Vec3,
    /// Rotation in degrees around each axis.
    pub rotation: Vec3,
    /// Scale factors.
    pub scale: Vec3,
    /// Translation applied per reference frame on update.
    pub move_vector: Vec3,
    /// Rotation applied per reference frame on update.
    pub angle_vector: Vec3,
}

impl ObjectState {
    /// Creates a fresh, alive state with the default transform.
    pub fn new(id: ObjectId) -> Self {
        Self {
            id,
            dead: false,
            destroy_requested: false,
            position: Vec3::ZERO,
            anchor_point: Vec3::splat(0.5),
            offset: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ZERO,
            move_vector: Vec3::ZERO,
            angle_vector: Vec3::ZERO,
        }
    }

    /// The object's numeric identity.
    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// `true` once the object has been destroyed.
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Asks for the object to be destroyed as soon as the current handler returns.
    ///
    /// Handlers only see the state, so this is how an object removes itself
    /// from its parent.
    pub fn request_destroy(&mut self) {
        self.destroy_requested = true;
    }

    /// `true` if [`request_destroy`](Self::request_destroy) was called and not yet honored.
    pub fn destroy_requested(&self) -> bool {
        self.destroy_requested
    }

    /// Copies every transform attribute from `other`, keeping identity and lifecycle.
    pub fn copy_transform_from(&mut self, other: &ObjectState) {
        self.position = other.position;
        self.anchor_point = other.anchor_point;
        self.offset = other.offset;
        self.rotation = other.rotation;
        self.scale = other.scale;
        self.move_vector = other.move_vector;
        self.angle_vector = other.angle_vector;
    }

    /// Applies the motion vectors for a frame that took `elapsed` seconds.
    ///
    /// Returns `false`, leaving the state untouched, when `elapsed` is not a
    /// positive finite number or the step would produce a non-finite transform.
    pub fn integrate(&mut self, elapsed: f64) -> bool {
        if !(elapsed.is_finite() && elapsed > 0.0) {
            log::warn!(
                "Object {}: ignoring motion for invalid frame time {elapsed}",
                self.id
            );
            return false;
        }

        let factor = REFERENCE_FRAME_RATE / elapsed;
        let position = self.position + self.move_vector * factor;
        let rotation = self.rotation + self.angle_vector * factor;
        if !(position.is_finite() && rotation.is_finite()) {
            log::warn!(
                "Object {}: motion for frame time {elapsed} overflows, skipping",
                self.id
            );
            return false;
        }

        self.position = position;
        self.rotation = rotation;
        true
    }
}

/// A plain scene node driven by an [`EventHandlers`] table.
///
/// Dropping an object destroys it if that has not happened yet.
pub struct Object {
    state: ObjectState,
    handlers: Arc<dyn EventHandlers>,
    ids: IdGenerator,
}

impl Object {
    /// Creates an object with a fresh id from `ids` and runs its init handler.
    pub fn new(ids: &IdGenerator, handlers: Arc<dyn EventHandlers>) -> Self {
        let mut object = Self {
            state: ObjectState::new(ids.next_id()),
            handlers,
            ids: ids.clone(),
        };
        object.handlers.on_init(&mut object.state);
        log::trace!("Object {} initialized.", object.state.id);
        object
    }

    /// Creates an object whose handlers override nothing.
    pub fn with_default_handlers(ids: &IdGenerator) -> Self {
        Self::new(ids, default_handlers())
    }

    /// The handler table.
    pub fn handlers(&self) -> &Arc<dyn EventHandlers> {
        &self.handlers
    }

    /// Replaces the handler table.
    pub fn set_handlers(&mut self, handlers: Arc<dyn EventHandlers>) {
        self.handlers = handlers;
    }

    /// The generator this object (and its clones) draw ids from.
    pub fn id_generator(&self) -> &IdGenerator {
        &self.ids
    }

    /// Destroys the object if a handler asked for it during the last call.
    fn honor_destroy_request(&mut self) {
        if self.state.destroy_requested && !self.state.dead {
            self.destroy();
        }
    }
}

impl Clone for Object {
    /// Copies the transform and handlers under a fresh id, then runs init.
    fn clone(&self) -> Self {
        let mut state = ObjectState::new(self.ids.next_id());
        state.copy_transform_from(&self.state);
        let mut object = Self {
            state,
            handlers: Arc::clone(&self.handlers),
            ids: self.ids.clone(),
        };
        object.handlers.on_init(&mut object.state);
        object
    }
}

impl Entity for Object {
    fn state(&self) -> &ObjectState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ObjectState {
        &mut self.state
    }

    fn render(&mut self, target: &mut dyn Canvas, offset_x: i32, offset_y: i32, offset_z: i32) {
        self.handlers
            .render(&self.state, target, offset_x, offset_y, offset_z);
    }

    fn update(&mut self, elapsed: f64) -> bool {
        self.state.integrate(elapsed);
        let keep_running = self.handlers.update(&mut self.state, elapsed);
        self.honor_destroy_request();
        keep_running
    }

    fn dispatch(&mut self, event: &InputEvent) -> bool {
        let keep_running = self.handlers.dispatch(&mut self.state, event);
        self.honor_destroy_request();
        keep_running
    }

    fn destroy(&mut self) {
        if self.state.dead {
            return;
        }
        self.state.dead = true;
        self.handlers.on_destroy(&mut self.state);
        log::trace!("Object {} destroyed.", self.state.id);
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

impl Drop for Object {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object").field("state", &self.state).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KeyMod, Keycode, Scancode};
    use crate::scene::Dispatch;
    use approx::assert_relative_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Lifecycle {
        inits: AtomicUsize,
        destroys: AtomicUsize,
    }

    impl EventHandlers for Lifecycle {
        fn on_init(&self, _obj: &mut ObjectState) {
            self.inits.fetch_add(1, Ordering::SeqCst);
        }

        fn on_destroy(&self, _obj: &mut ObjectState) {
            self.destroys.fetch_add(1, Ordering::SeqCst);
        }

        fn key_down(
            &self,
            obj: &mut ObjectState,
            key: Keycode,
            _scancode: Scancode,
            _modifiers: KeyMod,
            _repeat: bool,
        ) -> bool {
            if key == Keycode::DELETE {
                obj.request_destroy();
            }
            true
        }
    }

    #[test]
    fn new_object_has_default_transform() {
        let ids = IdGenerator::new();
        let obj = Object::with_default_handlers(&ids);
        assert_eq!(obj.id(), ObjectId(0));
        assert!(!obj.is_dead());
        assert_eq!(obj.state().anchor_point, Vec3::splat(0.5));
        assert_eq!(obj.state().position, Vec3::ZERO);
        assert_eq!(obj.state().scale, Vec3::ZERO);
    }

    #[test]
    fn destroy_is_idempotent() {
        let ids = IdGenerator::new();
        let handlers = Arc::new(Lifecycle::default());
        let mut obj = Object::new(&ids, handlers.clone());

        obj.destroy();
        obj.destroy();
        assert!(obj.is_dead());
        drop(obj);

        assert_eq!(handlers.inits.load(Ordering::SeqCst), 1);
        assert_eq!(handlers.destroys.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_destroys_live_objects() {
        let ids = IdGenerator::new();
        let handlers = Arc::new(Lifecycle::default());
        drop(Object::new(&ids, handlers.clone()));
        assert_eq!(handlers.destroys.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clone_gets_fresh_identity_and_same_transform() {
        let ids = IdGenerator::new();
        let handlers = Arc::new(Lifecycle::default());
        let mut original = Object::new(&ids, handlers.clone());
        original.state_mut().position = Vec3::new(1.0, 2.0, 3.0);
        original.state_mut().rotation = Vec3::new(0.0, 0.0, 45.0);

        let copy = original.clone();
        assert_ne!(copy.id(), original.id());
        assert!(copy.id() > original.id());
        assert_eq!(copy.state().position, original.state().position);
        assert_eq!(copy.state().rotation, original.state().rotation);
        assert_eq!(handlers.inits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn update_integrates_motion_per_reference_frame() {
        let ids = IdGenerator::new();
        let mut obj = Object::with_default_handlers(&ids);
        obj.state_mut().move_vector = Vec3::new(1.0, 0.0, 0.0);
        obj.state_mut().angle_vector = Vec3::new(0.0, 0.0, 0.5);

        assert!(obj.update(60.0));
        assert_relative_eq!(obj.state().position.x, 1.0);
        assert_relative_eq!(obj.state().rotation.z, 0.5);

        assert!(obj.update(30.0));
        assert_relative_eq!(obj.state().position.x, 3.0);
    }

    #[test]
    fn invalid_elapsed_skips_integration_but_runs_handler() {
        let ids = IdGenerator::new();
        let mut obj = Object::with_default_handlers(&ids);
        obj.state_mut().move_vector = Vec3::ONE;

        for elapsed in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e-320] {
            assert!(obj.update(elapsed));
            assert_eq!(obj.state().position, Vec3::ZERO, "elapsed {elapsed}");
        }
    }

    #[test]
    fn handler_can_request_its_own_destruction() {
        let ids = IdGenerator::new();
        let handlers = Arc::new(Lifecycle::default());
        let mut obj = Object::new(&ids, handlers.clone());

        assert!(obj.key_down(Keycode::SPACE, Scancode::SPACE, KeyMod::empty(), false));
        assert!(!obj.is_dead());
        assert!(obj.key_down(Keycode::DELETE, Scancode::DELETE, KeyMod::empty(), false));
        assert!(obj.is_dead());
        assert_eq!(handlers.destroys.load(Ordering::SeqCst), 1);
    }
}
