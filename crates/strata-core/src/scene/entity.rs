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

//! The polymorphic scene-node interface and shared handles to nodes.

#![allow(clippy::too_many_arguments)]

use super::ids::ObjectId;
use super::object::ObjectState;
use crate::event::{
    InputEvent, KeyMod, Keycode, MouseButton, Scancode, UserPayload, WheelDirection,
    WindowEventId,
};
use crate::graphics::Canvas;
use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Anything that can live in a scene tree: plain objects, layers and windows.
pub trait Entity: Send + Any {
    /// The node's identity, transform and lifecycle flags.
    fn state(&self) -> &ObjectState;

    /// Mutable access to the node's state.
    fn state_mut(&mut self) -> &mut ObjectState;

    /// Draws the node (and, for containers, its children) into `target`.
    fn render(&mut self, target: &mut dyn Canvas, offset_x: i32, offset_y: i32, offset_z: i32);

    /// Advances the node by `elapsed` seconds. `false` asks the owner to stop.
    fn update(&mut self, elapsed: f64) -> bool;

    /// Delivers one event. `false` asks the owner to stop.
    fn dispatch(&mut self, event: &InputEvent) -> bool;

    /// Marks the node dead and runs its destroy handler. Calling it again does nothing.
    fn destroy(&mut self);

    /// Deep-copies the node under fresh identities and wraps it in a new handle.
    fn clone_handle(&self) -> EntityHandle;

    /// Upcast for downcasting to the concrete node type.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete node type.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// The node's numeric identity.
    fn id(&self) -> ObjectId {
        self.state().id()
    }

    /// `true` once the node has been destroyed.
    fn is_dead(&self) -> bool {
        self.state().is_dead()
    }
}

/// A shared, lockable handle to a scene node.
pub type EntityHandle = Arc<Mutex<dyn Entity>>;

/// Wraps a node in a new shared handle.
pub fn share<E: Entity>(entity: E) -> EntityHandle {
    Arc::new(Mutex::new(entity))
}

/// Locks a handle, recovering the node if a previous holder panicked.
pub fn lock_entity(handle: &EntityHandle) -> MutexGuard<'_, dyn Entity> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One convenience method per event kind, each building the matching
/// [`InputEvent`] and sending it through [`Entity::dispatch`].
pub trait Dispatch: Entity {
    /// Delivers a render-target reset.
    fn target_reset(&mut self) -> bool {
        self.dispatch(&InputEvent::TargetReset)
    }

    /// Delivers a window state change.
    fn window_event(&mut self, event: WindowEventId, data1: i32, data2: i32) -> bool {
        self.dispatch(&InputEvent::Window {
            event,
            data1,
            data2,
        })
    }

    /// Delivers a key press.
    fn key_down(&mut self, key: Keycode, scancode: Scancode, modifiers: KeyMod, repeat: bool) -> bool {
        self.dispatch(&InputEvent::KeyDown {
            key,
            scancode,
            modifiers,
            repeat,
        })
    }

    /// Delivers a key release.
    fn key_up(&mut self, key: Keycode, scancode: Scancode, modifiers: KeyMod, repeat: bool) -> bool {
        self.dispatch(&InputEvent::KeyUp {
            key,
            scancode,
            modifiers,
            repeat,
        })
    }

    /// Delivers an IME composition update.
    fn text_editing(&mut self, text: &str, start: i32, length: i32) -> bool {
        self.dispatch(&InputEvent::TextEditing {
            text: text.to_owned(),
            start,
            length,
        })
    }

    /// Delivers committed text.
    fn text_input(&mut self, text: &str) -> bool {
        self.dispatch(&InputEvent::TextInput {
            text: text.to_owned(),
        })
    }

    /// Delivers a mouse button press.
    fn mouse_down(&mut self, x: i32, y: i32, button: MouseButton, clicks: u8, which: u32) -> bool {
        self.dispatch(&InputEvent::MouseDown {
            x,
            y,
            button,
            clicks,
            which,
        })
    }

    /// Delivers a mouse button release.
    fn mouse_up(&mut self, x: i32, y: i32, button: MouseButton, clicks: u8, which: u32) -> bool {
        self.dispatch(&InputEvent::MouseUp {
            x,
            y,
            button,
            clicks,
            which,
        })
    }

    /// Delivers mouse motion.
    fn mouse_motion(
        &mut self,
        x: i32,
        y: i32,
        xrel: i32,
        yrel: i32,
        buttons: [bool; 5],
        which: u32,
    ) -> bool {
        self.dispatch(&InputEvent::MouseMotion {
            x,
            y,
            xrel,
            yrel,
            buttons,
            which,
        })
    }

    /// Delivers a wheel movement.
    fn mouse_wheel(&mut self, direction: WheelDirection, x: i32, y: i32, which: u32) -> bool {
        self.dispatch(&InputEvent::MouseWheel {
            direction,
            x,
            y,
            which,
        })
    }

    /// Delivers new clipboard text.
    fn clipboard_update(&mut self, text: &str) -> bool {
        self.dispatch(&InputEvent::ClipboardUpdate {
            text: text.to_owned(),
        })
    }

    /// Delivers a dropped file path.
    fn file_drop(&mut self, path: &str) -> bool {
        self.dispatch(&InputEvent::FileDrop {
            path: path.to_owned(),
        })
    }

    /// Delivers dropped text.
    fn text_drop(&mut self, text: &str) -> bool {
        self.dispatch(&InputEvent::TextDrop {
            text: text.to_owned(),
        })
    }

    /// Delivers the start of a multi-item drop.
    fn drop_begin(&mut self) -> bool {
        self.dispatch(&InputEvent::DropBegin)
    }

    /// Delivers the end of a multi-item drop.
    fn drop_complete(&mut self) -> bool {
        self.dispatch(&InputEvent::DropComplete)
    }

    /// Delivers joystick axis motion.
    fn joy_axis(&mut self, which: i32, axis: u8, value: i16) -> bool {
        self.dispatch(&InputEvent::JoyAxis { which, axis, value })
    }

    /// Delivers joystick trackball motion.
    fn joy_ball(&mut self, which: i32, ball: u8, xrel: i16, yrel: i16) -> bool {
        self.dispatch(&InputEvent::JoyBall {
            which,
            ball,
            xrel,
            yrel,
        })
    }

    /// Delivers a joystick hat change.
    fn joy_hat(&mut self, which: i32, hat: u8, value: u8) -> bool {
        self.dispatch(&InputEvent::JoyHat { which, hat, value })
    }

    /// Delivers a joystick button press.
    fn joy_button_down(&mut self, which: i32, button: u8) -> bool {
        self.dispatch(&InputEvent::JoyButtonDown { which, button })
    }

    /// Delivers a joystick button release.
    fn joy_button_up(&mut self, which: i32, button: u8) -> bool {
        self.dispatch(&InputEvent::JoyButtonUp { which, button })
    }

    /// Delivers controller axis motion.
    fn controller_axis(&mut self, which: i32, axis: u8, value: i16) -> bool {
        self.dispatch(&InputEvent::ControllerAxis { which, axis, value })
    }

    /// Delivers a controller button press.
    fn controller_button_down(&mut self, which: i32, button: u8) -> bool {
        self.dispatch(&InputEvent::ControllerButtonDown { which, button })
    }

    /// Delivers a controller button release.
    fn controller_button_up(&mut self, which: i32, button: u8) -> bool {
        self.dispatch(&InputEvent::ControllerButtonUp { which, button })
    }

    /// Delivers a finger touch.
    fn finger_down(&mut self, touch_id: i64, finger_id: i64, x: f32, y: f32, pressure: f32) -> bool {
        self.dispatch(&InputEvent::FingerDown {
            touch_id,
            finger_id,
            x,
            y,
            pressure,
        })
    }

    /// Delivers a finger lift.
    fn finger_up(&mut self, touch_id: i64, finger_id: i64, x: f32, y: f32, pressure: f32) -> bool {
        self.dispatch(&InputEvent::FingerUp {
            touch_id,
            finger_id,
            x,
            y,
            pressure,
        })
    }

    /// Delivers finger motion.
    fn finger_motion(
        &mut self,
        touch_id: i64,
        finger_id: i64,
        x: f32,
        y: f32,
        dx: f32,
        dy: f32,
        pressure: f32,
    ) -> bool {
        self.dispatch(&InputEvent::FingerMotion {
            touch_id,
            finger_id,
            x,
            y,
            dx,
            dy,
            pressure,
        })
    }

    /// Delivers a recorded gesture template.
    fn gesture_record(
        &mut self,
        touch_id: i64,
        gesture_id: i64,
        num_fingers: u32,
        x: f32,
        y: f32,
    ) -> bool {
        self.dispatch(&InputEvent::GestureRecord {
            touch_id,
            gesture_id,
            num_fingers,
            x,
            y,
        })
    }

    /// Delivers a recognized gesture.
    fn gesture_perform(
        &mut self,
        touch_id: i64,
        gesture_id: i64,
        num_fingers: u32,
        x: f32,
        y: f32,
        error: f32,
    ) -> bool {
        self.dispatch(&InputEvent::GesturePerform {
            touch_id,
            gesture_id,
            num_fingers,
            x,
            y,
            error,
        })
    }

    /// Delivers a multi-finger gesture.
    fn multi_gesture(
        &mut self,
        touch_id: i64,
        num_fingers: u16,
        x: f32,
        y: f32,
        d_theta: f32,
        d_dist: f32,
    ) -> bool {
        self.dispatch(&InputEvent::MultiGesture {
            touch_id,
            num_fingers,
            x,
            y,
            d_theta,
            d_dist,
        })
    }

    /// Delivers an application-defined event.
    fn user_event(
        &mut self,
        code: i32,
        data1: Option<UserPayload>,
        data2: Option<UserPayload>,
    ) -> bool {
        self.dispatch(&InputEvent::User { code, data1, data2 })
    }
}

impl<E: Entity + ?Sized> Dispatch for E {}
