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

//! The closed set of events that can be dispatched through an object tree.

use super::codes::{
    KeyMod, Keycode, MouseButton, Scancode, UserPayload, WheelDirection, WindowEventId,
};

/// A single dispatchable event.
///
/// Each variant maps to exactly one method of
/// [`EventHandlers`](super::EventHandlers); lifecycle hooks (init, destroy,
/// render, update) are not events and are invoked directly.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// The render target or device was reset and textures must be recreated.
    TargetReset,
    /// A window state change.
    Window {
        /// What changed.
        event: WindowEventId,
        /// Event dependent (x position or width).
        data1: i32,
        /// Event dependent (y position or height).
        data2: i32,
    },
    /// A key was pressed.
    KeyDown {
        /// Layout-dependent key code.
        key: Keycode,
        /// Physical key position.
        scancode: Scancode,
        /// Modifier state.
        modifiers: KeyMod,
        /// `true` for auto-repeat.
        repeat: bool,
    },
    /// A key was released.
    KeyUp {
        /// Layout-dependent key code.
        key: Keycode,
        /// Physical key position.
        scancode: Scancode,
        /// Modifier state.
        modifiers: KeyMod,
        /// `true` for auto-repeat.
        repeat: bool,
    },
    /// IME composition in progress.
    TextEditing {
        /// The composition string.
        text: String,
        /// Cursor position within the composition.
        start: i32,
        /// Length of the selection.
        length: i32,
    },
    /// Committed text input.
    TextInput {
        /// The entered text.
        text: String,
    },
    /// A mouse button was pressed.
    MouseDown {
        /// Cursor x, window relative.
        x: i32,
        /// Cursor y, window relative.
        y: i32,
        /// The button.
        button: MouseButton,
        /// 1 for single click, 2 for double click, ...
        clicks: u8,
        /// Mouse instance id.
        which: u32,
    },
    /// A mouse button was released.
    MouseUp {
        /// Cursor x, window relative.
        x: i32,
        /// Cursor y, window relative.
        y: i32,
        /// The button.
        button: MouseButton,
        /// 1 for single click, 2 for double click, ...
        clicks: u8,
        /// Mouse instance id.
        which: u32,
    },
    /// The mouse moved.
    MouseMotion {
        /// Cursor x, window relative.
        x: i32,
        /// Cursor y, window relative.
        y: i32,
        /// Relative motion along x.
        xrel: i32,
        /// Relative motion along y.
        yrel: i32,
        /// Held buttons as `[left, middle, right, x1, x2]`.
        buttons: [bool; 5],
        /// Mouse instance id.
        which: u32,
    },
    /// The mouse wheel moved.
    MouseWheel {
        /// Direction convention of the deltas.
        direction: WheelDirection,
        /// Horizontal scroll amount.
        x: i32,
        /// Vertical scroll amount.
        y: i32,
        /// Mouse instance id.
        which: u32,
    },
    /// The clipboard contents changed.
    ClipboardUpdate {
        /// The new clipboard text.
        text: String,
    },
    /// A file was dropped on the window.
    FileDrop {
        /// Path of the dropped file.
        path: String,
    },
    /// Text was dropped on the window.
    TextDrop {
        /// The dropped text.
        text: String,
    },
    /// A multi-item drop started.
    DropBegin,
    /// A multi-item drop finished.
    DropComplete,
    /// A joystick axis moved.
    JoyAxis {
        /// Joystick instance id.
        which: i32,
        /// Axis index.
        axis: u8,
        /// Axis value.
        value: i16,
    },
    /// A joystick trackball moved.
    JoyBall {
        /// Joystick instance id.
        which: i32,
        /// Ball index.
        ball: u8,
        /// Relative motion along x.
        xrel: i16,
        /// Relative motion along y.
        yrel: i16,
    },
    /// A joystick hat changed position.
    JoyHat {
        /// Joystick instance id.
        which: i32,
        /// Hat index.
        hat: u8,
        /// Hat position bitmask.
        value: u8,
    },
    /// A joystick button was pressed.
    JoyButtonDown {
        /// Joystick instance id.
        which: i32,
        /// Button index.
        button: u8,
    },
    /// A joystick button was released.
    JoyButtonUp {
        /// Joystick instance id.
        which: i32,
        /// Button index.
        button: u8,
    },
    /// A game controller axis moved.
    ControllerAxis {
        /// Controller instance id.
        which: i32,
        /// Axis index.
        axis: u8,
        /// Axis value.
        value: i16,
    },
    /// A game controller button was pressed.
    ControllerButtonDown {
        /// Controller instance id.
        which: i32,
        /// Button index.
        button: u8,
    },
    /// A game controller button was released.
    ControllerButtonUp {
        /// Controller instance id.
        which: i32,
        /// Button index.
        button: u8,
    },
    /// A finger touched a touch device.
    FingerDown {
        /// Touch device id.
        touch_id: i64,
        /// Finger id.
        finger_id: i64,
        /// Normalized x in `[0, 1]`.
        x: f32,
        /// Normalized y in `[0, 1]`.
        y: f32,
        /// Normalized pressure.
        pressure: f32,
    },
    /// A finger left a touch device.
    FingerUp {
        /// Touch device id.
        touch_id: i64,
        /// Finger id.
        finger_id: i64,
        /// Normalized x in `[0, 1]`.
        x: f32,
        /// Normalized y in `[0, 1]`.
        y: f32,
        /// Normalized pressure.
        pressure: f32,
    },
    /// A finger moved on a touch device.
    FingerMotion {
        /// Touch device id.
        touch_id: i64,
        /// Finger id.
        finger_id: i64,
        /// Normalized x in `[0, 1]`.
        x: f32,
        /// Normalized y in `[0, 1]`.
        y: f32,
        /// Normalized motion along x.
        dx: f32,
        /// Normalized motion along y.
        dy: f32,
        /// Normalized pressure.
        pressure: f32,
    },
    /// A gesture template was recorded.
    GestureRecord {
        /// Touch device id.
        touch_id: i64,
        /// Recorded gesture id.
        gesture_id: i64,
        /// Number of fingers used.
        num_fingers: u32,
        /// Normalized gesture center x.
        x: f32,
        /// Normalized gesture center y.
        y: f32,
    },
    /// A recorded gesture was recognized.
    GesturePerform {
        /// Touch device id.
        touch_id: i64,
        /// Recognized gesture id.
        gesture_id: i64,
        /// Number of fingers used.
        num_fingers: u32,
        /// Normalized gesture center x.
        x: f32,
        /// Normalized gesture center y.
        y: f32,
        /// Difference from the recorded template.
        error: f32,
    },
    /// Several fingers moved together (pinch, rotate).
    MultiGesture {
        /// Touch device id.
        touch_id: i64,
        /// Number of fingers used.
        num_fingers: u16,
        /// Normalized gesture center x.
        x: f32,
        /// Normalized gesture center y.
        y: f32,
        /// Rotation amount, radians.
        d_theta: f32,
        /// Pinch amount.
        d_dist: f32,
    },
    /// An application-defined event.
    User {
        /// Application-defined code.
        code: i32,
        /// First payload.
        data1: Option<UserPayload>,
        /// Second payload.
        data2: Option<UserPayload>,
    },
}

impl InputEvent {
    /// A short, stable name for the event kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            InputEvent::TargetReset => "target_reset",
            InputEvent::Window { .. } => "window_event",
            InputEvent::KeyDown { .. } => "key_down",
            InputEvent::KeyUp { .. } => "key_up",
            InputEvent::TextEditing { .. } => "text_editing",
            InputEvent::TextInput { .. } => "text_input",
            InputEvent::MouseDown { .. } => "mouse_down",
            InputEvent::MouseUp { .. } => "mouse_up",
            InputEvent::MouseMotion { .. } => "mouse_motion",
            InputEvent::MouseWheel { .. } => "mouse_wheel",
            InputEvent::ClipboardUpdate { .. } => "clipboard_update",
            InputEvent::FileDrop { .. } => "file_drop",
            InputEvent::TextDrop { .. } => "text_drop",
            InputEvent::DropBegin => "drop_begin",
            InputEvent::DropComplete => "drop_complete",
            InputEvent::JoyAxis { .. } => "joy_axis",
            InputEvent::JoyBall { .. } => "joy_ball",
            InputEvent::JoyHat { .. } => "joy_hat",
            InputEvent::JoyButtonDown { .. } => "joy_button_down",
            InputEvent::JoyButtonUp { .. } => "joy_button_up",
            InputEvent::ControllerAxis { .. } => "controller_axis",
            InputEvent::ControllerButtonDown { .. } => "controller_button_down",
            InputEvent::ControllerButtonUp { .. } => "controller_button_up",
            InputEvent::FingerDown { .. } => "finger_down",
            InputEvent::FingerUp { .. } => "finger_up",
            InputEvent::FingerMotion { .. } => "finger_motion",
            InputEvent::GestureRecord { .. } => "gesture_record",
            InputEvent::GesturePerform { .. } => "gesture_perform",
            InputEvent::MultiGesture { .. } => "multi_gesture",
            InputEvent::User { .. } => "user_event",
        }
    }
}
