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

//! Backend-agnostic codes carried by input events: keys, modifiers, mouse
//! buttons, window event identifiers and opaque user payloads.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A virtual key code, layout dependent.
///
/// Printable keys use the Unicode scalar of the unshifted character they
/// produce; everything else uses one of the named constants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Keycode(pub u32);

impl Keycode {
    /// No known key.
    pub const UNKNOWN: Self = Self(0);
    /// Backspace.
    pub const BACKSPACE: Self = Self(0x08);
    /// Tab.
    pub const TAB: Self = Self(0x09);
    /// Return / Enter.
    pub const RETURN: Self = Self(0x0D);
    /// Escape.
    pub const ESCAPE: Self = Self(0x1B);
    /// Space bar.
    pub const SPACE: Self = Self(0x20);
    /// Delete.
    pub const DELETE: Self = Self(0x7F);

    const SCANCODE_MASK: u32 = 1 << 30;

    /// Right arrow.
    pub const RIGHT: Self = Self::from_scancode(Scancode::RIGHT);
    /// Left arrow.
    pub const LEFT: Self = Self::from_scancode(Scancode::LEFT);
    /// Down arrow.
    pub const DOWN: Self = Self::from_scancode(Scancode::DOWN);
    /// Up arrow.
    pub const UP: Self = Self::from_scancode(Scancode::UP);
    /// Function key F1; F2..F12 follow contiguously.
    pub const F1: Self = Self::from_scancode(Scancode::F1);

    /// Builds the key code produced by a printable character.
    pub fn from_char(c: char) -> Self {
        Self(c.to_lowercase().next().unwrap_or(c) as u32)
    }

    /// Builds the key code for a key that has no printable character.
    pub const fn from_scancode(scancode: Scancode) -> Self {
        Self(scancode.0 | Self::SCANCODE_MASK)
    }

    /// Returns the printable character for this key, if any.
    pub fn as_char(&self) -> Option<char> {
        if self.0 & Self::SCANCODE_MASK != 0 {
            return None;
        }
        char::from_u32(self.0).filter(|c| !c.is_control())
    }
}

/// A physical key position, layout independent (USB HID usage ids).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Scancode(pub u32);

#[allow(missing_docs)]
impl Scancode {
    pub const UNKNOWN: Self = Self(0);
    pub const A: Self = Self(4);
    pub const Z: Self = Self(29);
    pub const DIGIT1: Self = Self(30);
    pub const DIGIT0: Self = Self(39);
    pub const RETURN: Self = Self(40);
    pub const ESCAPE: Self = Self(41);
    pub const BACKSPACE: Self = Self(42);
    pub const TAB: Self = Self(43);
    pub const SPACE: Self = Self(44);
    pub const F1: Self = Self(58);
    pub const F12: Self = Self(69);
    pub const DELETE: Self = Self(76);
    pub const RIGHT: Self = Self(79);
    pub const LEFT: Self = Self(80);
    pub const DOWN: Self = Self(81);
    pub const UP: Self = Self(82);
    pub const LCTRL: Self = Self(224);
    pub const LSHIFT: Self = Self(225);
    pub const LALT: Self = Self(226);
    pub const LGUI: Self = Self(227);
    pub const RCTRL: Self = Self(228);
    pub const RSHIFT: Self = Self(229);
    pub const RALT: Self = Self(230);
    pub const RGUI: Self = Self(231);
}

bitflags! {
    /// Keyboard modifier state at the time of a key event.
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct KeyMod: u16 {
        /// Left shift.
        const LSHIFT = 0x0001;
        /// Right shift.
        const RSHIFT = 0x0002;
        /// Left control.
        const LCTRL = 0x0040;
        /// Right control.
        const RCTRL = 0x0080;
        /// Left alt.
        const LALT = 0x0100;
        /// Right alt.
        const RALT = 0x0200;
        /// Left "super" (Windows / Command).
        const LGUI = 0x0400;
        /// Right "super".
        const RGUI = 0x0800;
        /// Num lock is on.
        const NUM = 0x1000;
        /// Caps lock is on.
        const CAPS = 0x2000;

        /// Either shift.
        const SHIFT = Self::LSHIFT.bits() | Self::RSHIFT.bits();
        /// Either control.
        const CTRL = Self::LCTRL.bits() | Self::RCTRL.bits();
        /// Either alt.
        const ALT = Self::LALT.bits() | Self::RALT.bits();
        /// Either super.
        const GUI = Self::LGUI.bits() | Self::RGUI.bits();
    }
}

/// A single mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// The left mouse button.
    Left,
    /// The middle mouse button (wheel click).
    Middle,
    /// The right mouse button.
    Right,
    /// The first extra button (usually "back").
    X1,
    /// The second extra button (usually "forward").
    X2,
    /// Any other button, identified by a numeric code.
    Other(u16),
}

bitflags! {
    /// Which mouse buttons are held during a motion event.
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct MouseButtons: u32 {
        /// Left button held.
        const LEFT = 1 << 0;
        /// Middle button held.
        const MIDDLE = 1 << 1;
        /// Right button held.
        const RIGHT = 1 << 2;
        /// First extra button held.
        const X1 = 1 << 3;
        /// Second extra button held.
        const X2 = 1 << 4;
    }
}

impl MouseButtons {
    /// Unpacks the state into `[left, middle, right, x1, x2]`.
    pub fn to_array(self) -> [bool; 5] {
        [
            self.contains(Self::LEFT),
            self.contains(Self::MIDDLE),
            self.contains(Self::RIGHT),
            self.contains(Self::X1),
            self.contains(Self::X2),
        ]
    }

    /// The flag matching a single button; `Other` buttons have none.
    pub fn from_button(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::LEFT,
            MouseButton::Middle => Self::MIDDLE,
            MouseButton::Right => Self::RIGHT,
            MouseButton::X1 => Self::X1,
            MouseButton::X2 => Self::X2,
            MouseButton::Other(_) => Self::empty(),
        }
    }
}

/// Direction convention of a wheel event.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WheelDirection {
    /// Positive values scroll away from the user.
    #[default]
    Normal,
    /// Values are inverted ("natural" scrolling).
    Flipped,
}

/// The kind of a window state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowEventId {
    /// The window became visible.
    Shown,
    /// The window was hidden.
    Hidden,
    /// Part of the window must be redrawn.
    Exposed,
    /// The window moved to `(data1, data2)`.
    Moved,
    /// The window was resized by the user to `data1 x data2`.
    Resized,
    /// The window size changed for any reason.
    SizeChanged,
    /// The window was minimized.
    Minimized,
    /// The window was maximized.
    Maximized,
    /// The window was restored from minimized or maximized state.
    Restored,
    /// The cursor entered the window.
    Enter,
    /// The cursor left the window.
    Leave,
    /// The window gained keyboard focus.
    FocusGained,
    /// The window lost keyboard focus.
    FocusLost,
    /// The window manager asked the window to close.
    Close,
}

/// An opaque, shareable value attached to a user event.
#[derive(Clone)]
pub struct UserPayload(pub Arc<dyn Any + Send + Sync>);

impl UserPayload {
    /// Wraps any shareable value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Borrows the payload as `T`, if that is its concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for UserPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserPayload(..)")
    }
}

impl PartialEq for UserPayload {
    /// Payloads compare by identity.
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keycode_from_char_is_lowercase() {
        assert_eq!(Keycode::from_char('A'), Keycode::from_char('a'));
        assert_eq!(Keycode::from_char('a').as_char(), Some('a'));
        assert_eq!(Keycode::ESCAPE.as_char(), None);
        assert_eq!(Keycode::LEFT.as_char(), None);
    }

    #[test]
    fn test_mouse_buttons_unpack_order() {
        let held = MouseButtons::LEFT | MouseButtons::RIGHT | MouseButtons::X2;
        assert_eq!(held.to_array(), [true, false, true, false, true]);
        assert_eq!(MouseButtons::empty().to_array(), [false; 5]);
    }

    #[test]
    fn test_key_mod_groups() {
        assert!(KeyMod::SHIFT.contains(KeyMod::RSHIFT));
        assert!(KeyMod::LCTRL.intersects(KeyMod::CTRL));
        assert!(!KeyMod::LALT.intersects(KeyMod::GUI));
    }

    #[test]
    fn test_user_payload_downcast_and_identity() {
        let payload = UserPayload::new(42_u32);
        assert_eq!(payload.downcast_ref::<u32>(), Some(&42));
        assert!(payload.downcast_ref::<String>().is_none());
        assert_eq!(payload.clone(), payload);
        assert_ne!(UserPayload::new(42_u32), payload);
    }
}
