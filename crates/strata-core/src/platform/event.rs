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

//! The discriminated event records a platform backend produces.

use super::window::WindowSettings;
use crate::event::{
    EventHandlers, KeyMod, Keycode, MouseButton, MouseButtons, Scancode, UserPayload,
    WheelDirection, WindowEventId,
};
use std::fmt;
use std::sync::Arc;

/// A request, usable from any thread, to open a new window on the polling thread.
#[derive(Clone)]
pub struct WindowRequest {
    /// How to create the native window.
    pub settings: WindowSettings,
    /// The handlers driving the new window's own object.
    pub handlers: Arc<dyn EventHandlers>,
}

impl fmt::Debug for WindowRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowRequest")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// One event polled from the platform.
///
/// Window and mouse events carry the id of the window they belong to; every
/// other kind is global.
#[allow(missing_docs)]
#[derive(Debug, Clone)]
pub enum PlatformEvent {
    Quit,
    AppTerminating,
    RenderTargetsReset,
    RenderDeviceReset,
    Window {
        window_id: u32,
        event: WindowEventId,
        data1: i32,
        data2: i32,
    },
    KeyDown {
        key: Keycode,
        scancode: Scancode,
        modifiers: KeyMod,
        repeat: bool,
    },
    KeyUp {
        key: Keycode,
        scancode: Scancode,
        modifiers: KeyMod,
        repeat: bool,
    },
    TextEditing {
        text: String,
        start: i32,
        length: i32,
    },
    TextInput {
        text: String,
    },
    MouseButtonDown {
        window_id: u32,
        which: u32,
        button: MouseButton,
        clicks: u8,
        x: i32,
        y: i32,
    },
    MouseButtonUp {
        window_id: u32,
        which: u32,
        button: MouseButton,
        clicks: u8,
        x: i32,
        y: i32,
    },
    MouseMotion {
        window_id: u32,
        which: u32,
        state: MouseButtons,
        x: i32,
        y: i32,
        xrel: i32,
        yrel: i32,
    },
    MouseWheel {
        window_id: u32,
        which: u32,
        x: i32,
        y: i32,
        direction: WheelDirection,
    },
    ClipboardUpdate {
        text: String,
    },
    DropFile {
        path: String,
    },
    DropText {
        text: String,
    },
    DropBegin,
    DropComplete,
    JoyAxisMotion {
        which: i32,
        axis: u8,
        value: i16,
    },
    JoyBallMotion {
        which: i32,
        ball: u8,
        xrel: i16,
        yrel: i16,
    },
    JoyHatMotion {
        which: i32,
        hat: u8,
        value: u8,
    },
    JoyButtonDown {
        which: i32,
        button: u8,
    },
    JoyButtonUp {
        which: i32,
        button: u8,
    },
    ControllerAxisMotion {
        which: i32,
        axis: u8,
        value: i16,
    },
    ControllerButtonDown {
        which: i32,
        button: u8,
    },
    ControllerButtonUp {
        which: i32,
        button: u8,
    },
    FingerDown {
        touch_id: i64,
        finger_id: i64,
        x: f32,
        y: f32,
        pressure: f32,
    },
    FingerUp {
        touch_id: i64,
        finger_id: i64,
        x: f32,
        y: f32,
        pressure: f32,
    },
    FingerMotion {
        touch_id: i64,
        finger_id: i64,
        x: f32,
        y: f32,
        dx: f32,
        dy: f32,
        pressure: f32,
    },
    DollarRecord {
        touch_id: i64,
        gesture_id: i64,
        num_fingers: u32,
        x: f32,
        y: f32,
    },
    DollarGesture {
        touch_id: i64,
        gesture_id: i64,
        num_fingers: u32,
        x: f32,
        y: f32,
        error: f32,
    },
    MultiGesture {
        touch_id: i64,
        num_fingers: u16,
        x: f32,
        y: f32,
        d_theta: f32,
        d_dist: f32,
    },
    User {
        code: i32,
        data1: Option<UserPayload>,
        data2: Option<UserPayload>,
    },
    /// Consumed by the polling loop; never reaches a window.
    CreateWindow(WindowRequest),
    /// A platform event this crate has no mapping for.
    Unknown {
        kind: u32,
    },
}

impl PlatformEvent {
    /// The window a window or mouse event is addressed to; `None` for global events.
    pub fn window_id(&self) -> Option<u32> {
        match self {
            PlatformEvent::Window { window_id, .. }
            | PlatformEvent::MouseButtonDown { window_id, .. }
            | PlatformEvent::MouseButtonUp { window_id, .. }
            | PlatformEvent::MouseMotion { window_id, .. }
            | PlatformEvent::MouseWheel { window_id, .. } => Some(*window_id),
            _ => None,
        }
    }

    /// `true` for the events that end the application.
    pub fn is_quit(&self) -> bool {
        matches!(self, PlatformEvent::Quit | PlatformEvent::AppTerminating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_window_and_mouse_events_are_addressed() {
        let motion = PlatformEvent::MouseMotion {
            window_id: 10,
            which: 0,
            state: MouseButtons::empty(),
            x: 1,
            y: 2,
            xrel: 0,
            yrel: 0,
        };
        let key = PlatformEvent::KeyDown {
            key: Keycode::SPACE,
            scancode: Scancode::SPACE,
            modifiers: KeyMod::empty(),
            repeat: false,
        };
        assert_eq!(motion.window_id(), Some(10));
        assert_eq!(key.window_id(), None);
        assert_eq!(PlatformEvent::DropBegin.window_id(), None);
        assert!(PlatformEvent::AppTerminating.is_quit());
        assert!(!key.is_quit());
    }
}
