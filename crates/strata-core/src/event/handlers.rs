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

//! The event-handler contract every object is driven through.

#![allow(clippy::too_many_arguments)]

use super::codes::{
    KeyMod, Keycode, MouseButton, Scancode, UserPayload, WheelDirection, WindowEventId,
};
use super::input::InputEvent;
use crate::graphics::Canvas;
use crate::scene::ObjectState;
use std::sync::Arc;

/// Behavior attached to an object, one method per event kind.
///
/// Every method has a default body that leaves the object untouched and
/// returns `true` ("keep running"), so an implementation overrides only what
/// it cares about. The first argument is always the state of the object the
/// event is being delivered to, which lets one handler value be shared by
/// many objects.
///
/// Returning `false` from any boolean method vetoes further processing: a
/// [`Layer`](crate::scene::Layer) stops its fan-out at that point and a window
/// stops its loop.
pub trait EventHandlers: Send + Sync {
    /// Called once when an object is constructed or cloned.
    fn on_init(&self, _obj: &mut ObjectState) {}

    /// Called exactly once when an object is destroyed.
    fn on_destroy(&self, _obj: &mut ObjectState) {}

    /// Draws the object into `target`, translated by the parent offsets.
    fn render(
        &self,
        _obj: &ObjectState,
        _target: &mut dyn Canvas,
        _offset_x: i32,
        _offset_y: i32,
        _offset_z: i32,
    ) {
    }

    /// Advances the object by `elapsed` seconds.
    fn update(&self, _obj: &mut ObjectState, _elapsed: f64) -> bool {
        true
    }

    /// The render target was reset.
    fn target_reset(&self, _obj: &mut ObjectState) -> bool {
        true
    }

    /// A window state change.
    fn window_event(
        &self,
        _obj: &mut ObjectState,
        _event: WindowEventId,
        _data1: i32,
        _data2: i32,
    ) -> bool {
        true
    }

    /// A key was pressed.
    fn key_down(
        &self,
        _obj: &mut ObjectState,
        _key: Keycode,
        _scancode: Scancode,
        _modifiers: KeyMod,
        _repeat: bool,
    ) -> bool {
        true
    }

    /// A key was released.
    fn key_up(
        &self,
        _obj: &mut ObjectState,
        _key: Keycode,
        _scancode: Scancode,
        _modifiers: KeyMod,
        _repeat: bool,
    ) -> bool {
        true
    }

    /// IME composition in progress.
    fn text_editing(&self, _obj: &mut ObjectState, _text: &str, _start: i32, _length: i32) -> bool {
        true
    }

    /// Committed text input.
    fn text_input(&self, _obj: &mut ObjectState, _text: &str) -> bool {
        true
    }

    /// A mouse button was pressed.
    fn mouse_down(
        &self,
        _obj: &mut ObjectState,
        _x: i32,
        _y: i32,
        _button: MouseButton,
        _clicks: u8,
        _which: u32,
    ) -> bool {
        true
    }

    /// A mouse button was released.
    fn mouse_up(
        &self,
        _obj: &mut ObjectState,
        _x: i32,
        _y: i32,
        _button: MouseButton,
        _clicks: u8,
        _which: u32,
    ) -> bool {
        true
    }

    /// The mouse moved; `buttons` is `[left, middle, right, x1, x2]`.
    fn mouse_motion(
        &self,
        _obj: &mut ObjectState,
        _x: i32,
        _y: i32,
        _xrel: i32,
        _yrel: i32,
        _buttons: [bool; 5],
        _which: u32,
    ) -> bool {
        true
    }

    /// The mouse wheel moved.
    fn mouse_wheel(
        &self,
        _obj: &mut ObjectState,
        _direction: WheelDirection,
        _x: i32,
        _y: i32,
        _which: u32,
    ) -> bool {
        true
    }

    /// The clipboard contents changed.
    fn clipboard_update(&self, _obj: &mut ObjectState, _text: &str) -> bool {
        true
    }

    /// A file was dropped.
    fn file_drop(&self, _obj: &mut ObjectState, _path: &str) -> bool {
        true
    }

    /// Text was dropped.
    fn text_drop(&self, _obj: &mut ObjectState, _text: &str) -> bool {
        true
    }

    /// A multi-item drop started.
    fn drop_begin(&self, _obj: &mut ObjectState) -> bool {
        true
    }

    /// A multi-item drop finished.
    fn drop_complete(&self, _obj: &mut ObjectState) -> bool {
        true
    }

    /// A joystick axis moved.
    fn joy_axis(&self, _obj: &mut ObjectState, _which: i32, _axis: u8, _value: i16) -> bool {
        true
    }

    /// A joystick trackball moved.
    fn joy_ball(
        &self,
        _obj: &mut ObjectState,
        _which: i32,
        _ball: u8,
        _xrel: i16,
        _yrel: i16,
    ) -> bool {
        true
    }

    /// A joystick hat changed position.
    fn joy_hat(&self, _obj: &mut ObjectState, _which: i32, _hat: u8, _value: u8) -> bool {
        true
    }

    /// A joystick button was pressed.
    fn joy_button_down(&self, _obj: &mut ObjectState, _which: i32, _button: u8) -> bool {
        true
    }

    /// A joystick button was released.
    fn joy_button_up(&self, _obj: &mut ObjectState, _which: i32, _button: u8) -> bool {
        true
    }

    /// A controller axis moved.
    fn controller_axis(&self, _obj: &mut ObjectState, _which: i32, _axis: u8, _value: i16) -> bool {
        true
    }

    /// A controller button was pressed.
    fn controller_button_down(&self, _obj: &mut ObjectState, _which: i32, _button: u8) -> bool {
        true
    }

    /// A controller button was released.
    fn controller_button_up(&self, _obj: &mut ObjectState, _which: i32, _button: u8) -> bool {
        true
    }

    /// A finger touched down.
    fn finger_down(
        &self,
        _obj: &mut ObjectState,
        _touch_id: i64,
        _finger_id: i64,
        _x: f32,
        _y: f32,
        _pressure: f32,
    ) -> bool {
        true
    }

    /// A finger lifted.
    fn finger_up(
        &self,
        _obj: &mut ObjectState,
        _touch_id: i64,
        _finger_id: i64,
        _x: f32,
        _y: f32,
        _pressure: f32,
    ) -> bool {
        true
    }

    /// A finger moved.
    fn finger_motion(
        &self,
        _obj: &mut ObjectState,
        _touch_id: i64,
        _finger_id: i64,
        _x: f32,
        _y: f32,
        _dx: f32,
        _dy: f32,
        _pressure: f32,
    ) -> bool {
        true
    }

    /// A gesture template was recorded.
    fn gesture_record(
        &self,
        _obj: &mut ObjectState,
        _touch_id: i64,
        _gesture_id: i64,
        _num_fingers: u32,
        _x: f32,
        _y: f32,
    ) -> bool {
        true
    }

    /// A recorded gesture was recognized.
    fn gesture_perform(
        &self,
        _obj: &mut ObjectState,
        _touch_id: i64,
        _gesture_id: i64,
        _num_fingers: u32,
        _x: f32,
        _y: f32,
        _error: f32,
    ) -> bool {
        true
    }

    /// A multi-finger gesture.
    fn multi_gesture(
        &self,
        _obj: &mut ObjectState,
        _touch_id: i64,
        _num_fingers: u16,
        _x: f32,
        _y: f32,
        _d_theta: f32,
        _d_dist: f32,
    ) -> bool {
        true
    }

    /// An application-defined event.
    fn user_event(
        &self,
        _obj: &mut ObjectState,
        _code: i32,
        _data1: Option<&UserPayload>,
        _data2: Option<&UserPayload>,
    ) -> bool {
        true
    }

    /// Routes `event` to the method handling its kind and returns that method's result.
    fn dispatch(&self, obj: &mut ObjectState, event: &InputEvent) -> bool {
        match event {
            InputEvent::TargetReset => self.target_reset(obj),
            InputEvent::Window {
                event,
                data1,
                data2,
            } => self.window_event(obj, *event, *data1, *data2),
            InputEvent::KeyDown {
                key,
                scancode,
                modifiers,
                repeat,
            } => self.key_down(obj, *key, *scancode, *modifiers, *repeat),
            InputEvent::KeyUp {
                key,
                scancode,
                modifiers,
                repeat,
            } => self.key_up(obj, *key, *scancode, *modifiers, *repeat),
            InputEvent::TextEditing {
                text,
                start,
                length,
            } => self.text_editing(obj, text, *start, *length),
            InputEvent::TextInput { text } => self.text_input(obj, text),
            InputEvent::MouseDown {
                x,
                y,
                button,
                clicks,
                which,
            } => self.mouse_down(obj, *x, *y, *button, *clicks, *which),
            InputEvent::MouseUp {
                x,
                y,
                button,
                clicks,
                which,
            } => self.mouse_up(obj, *x, *y, *button, *clicks, *which),
            InputEvent::MouseMotion {
                x,
                y,
                xrel,
                yrel,
                buttons,
                which,
            } => self.mouse_motion(obj, *x, *y, *xrel, *yrel, *buttons, *which),
            InputEvent::MouseWheel {
                direction,
                x,
                y,
                which,
            } => self.mouse_wheel(obj, *direction, *x, *y, *which),
            InputEvent::ClipboardUpdate { text } => self.clipboard_update(obj, text),
            InputEvent::FileDrop { path } => self.file_drop(obj, path),
            InputEvent::TextDrop { text } => self.text_drop(obj, text),
            InputEvent::DropBegin => self.drop_begin(obj),
            InputEvent::DropComplete => self.drop_complete(obj),
            InputEvent::JoyAxis { which, axis, value } => self.joy_axis(obj, *which, *axis, *value),
            InputEvent::JoyBall {
                which,
                ball,
                xrel,
                yrel,
            } => self.joy_ball(obj, *which, *ball, *xrel, *yrel),
            InputEvent::JoyHat { which, hat, value } => self.joy_hat(obj, *which, *hat, *value),
            InputEvent::JoyButtonDown { which, button } => {
                self.joy_button_down(obj, *which, *button)
            }
            InputEvent::JoyButtonUp { which, button } => self.joy_button_up(obj, *which, *button),
            InputEvent::ControllerAxis { which, axis, value } => {
                self.controller_axis(obj, *which, *axis, *value)
            }
            InputEvent::ControllerButtonDown { which, button } => {
                self.controller_button_down(obj, *which, *button)
            }
            InputEvent::ControllerButtonUp { which, button } => {
                self.controller_button_up(obj, *which, *button)
            }
            InputEvent::FingerDown {
                touch_id,
                finger_id,
                x,
                y,
                pressure,
            } => self.finger_down(obj, *touch_id, *finger_id, *x, *y, *pressure),
            InputEvent::FingerUp {
                touch_id,
                finger_id,
                x,
                y,
                pressure,
            } => self.finger_up(obj, *touch_id, *finger_id, *x, *y, *pressure),
            InputEvent::FingerMotion {
                touch_id,
                finger_id,
                x,
                y,
                dx,
                dy,
                pressure,
            } => self.finger_motion(obj, *touch_id, *finger_id, *x, *y, *dx, *dy, *pressure),
            InputEvent::GestureRecord {
                touch_id,
                gesture_id,
                num_fingers,
                x,
                y,
            } => self.gesture_record(obj, *touch_id, *gesture_id, *num_fingers, *x, *y),
            InputEvent::GesturePerform {
                touch_id,
                gesture_id,
                num_fingers,
                x,
                y,
                error,
            } => self.gesture_perform(obj, *touch_id, *gesture_id, *num_fingers, *x, *y, *error),
            InputEvent::MultiGesture {
                touch_id,
                num_fingers,
                x,
                y,
                d_theta,
                d_dist,
            } => self.multi_gesture(obj, *touch_id, *num_fingers, *x, *y, *d_theta, *d_dist),
            InputEvent::User { code, data1, data2 } => {
                self.user_event(obj, *code, data1.as_ref(), data2.as_ref())
            }
        }
    }
}

/// A handler table that overrides nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHandlers;

impl EventHandlers for DefaultHandlers {}

/// Returns a shareable, fully defaulted handler table.
pub fn default_handlers() -> Arc<dyn EventHandlers> {
    Arc::new(DefaultHandlers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::IdGenerator;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn state() -> ObjectState {
        ObjectState::new(IdGenerator::new().next_id())
    }

    #[test]
    fn defaults_always_continue() {
        let handlers = DefaultHandlers;
        let mut obj = state();
        let events = [
            InputEvent::TargetReset,
            InputEvent::DropBegin,
            InputEvent::TextInput {
                text: "hi".to_string(),
            },
            InputEvent::Window {
                event: WindowEventId::Close,
                data1: 0,
                data2: 0,
            },
            InputEvent::User {
                code: 7,
                data1: None,
                data2: None,
            },
        ];
        for event in &events {
            assert!(handlers.dispatch(&mut obj, event), "{} vetoed", event.kind());
        }
        assert!(handlers.update(&mut obj, 1.0 / 60.0));
    }

    #[derive(Default)]
    struct KeyCounter {
        downs: AtomicUsize,
    }

    impl EventHandlers for KeyCounter {
        fn key_down(
            &self,
            obj: &mut ObjectState,
            key: Keycode,
            _scancode: Scancode,
            _modifiers: KeyMod,
            _repeat: bool,
        ) -> bool {
            self.downs.fetch_add(1, Ordering::SeqCst);
            obj.position.x += 1.0;
            key != Keycode::ESCAPE
        }
    }

    #[test]
    fn dispatch_routes_to_the_matching_slot() {
        let handlers = KeyCounter::default();
        let mut obj = state();
        let key = |key| InputEvent::KeyDown {
            key,
            scancode: Scancode::UNKNOWN,
            modifiers: KeyMod::empty(),
            repeat: false,
        };

        assert!(handlers.dispatch(&mut obj, &key(Keycode::SPACE)));
        assert!(!handlers.dispatch(&mut obj, &key(Keycode::ESCAPE)));
        // other kinds fall through to the defaults
        assert!(handlers.dispatch(&mut obj, &InputEvent::DropComplete));

        assert_eq!(handlers.downs.load(Ordering::SeqCst), 2);
        assert_eq!(obj.position.x, 2.0);
    }
}
