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

//! Translation from `winit` window events to platform events.
//!
//! `winit` reports positions and buttons per event, while platform events carry
//! relative motion, held-button state and modifiers. [`InputTracker`] keeps the
//! per-window state needed to fill those in.

use std::collections::HashMap;
use strata_core::event::{KeyMod, Keycode, MouseButton, MouseButtons, Scancode, WheelDirection, WindowEventId};
use strata_core::platform::PlatformEvent;
use winit::event::{
    ElementState, Ime, MouseButton as WinitMouseButton, MouseScrollDelta, Touch, TouchPhase,
    WindowEvent,
};
use winit::keyboard::{Key, KeyCode, ModifiersState, NamedKey, PhysicalKey};

/// The only mouse device `winit` distinguishes.
const MOUSE_ID: u32 = 0;

#[derive(Debug, Default, Clone, Copy)]
struct Pointer {
    position: Option<(f64, f64)>,
    buttons: MouseButtons,
}

/// Per-window input state carried between `winit` events.
#[derive(Debug, Default)]
pub struct InputTracker {
    pointers: HashMap<u32, Pointer>,
    touches: HashMap<u64, (f32, f32)>,
    modifiers: KeyMod,
}

impl InputTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// The modifier keys currently held.
    pub fn modifiers(&self) -> KeyMod {
        self.modifiers
    }

    /// Forgets everything known about a window.
    pub fn forget(&mut self, window_id: u32) {
        self.pointers.remove(&window_id);
    }

    /// Translates one `winit` window event.
    ///
    /// ## Arguments
    /// * `window_id` - The platform id of the window the event belongs to.
    /// * `event` - The raw `winit` event.
    /// * `window_size` - The window's inner size, used to normalize touch input.
    ///
    /// ## Returns
    /// The platform events produced, in order. Many `winit` events produce none.
    pub fn translate(
        &mut self,
        window_id: u32,
        event: &WindowEvent,
        window_size: (u32, u32),
    ) -> Vec<PlatformEvent> {
        let window = |event: WindowEventId, data1: i32, data2: i32| PlatformEvent::Window {
            window_id,
            event,
            data1,
            data2,
        };

        match event {
            WindowEvent::CloseRequested => vec![window(WindowEventId::Close, 0, 0)],
            WindowEvent::Resized(size) => vec![
                window(WindowEventId::SizeChanged, size.width as i32, size.height as i32),
                window(WindowEventId::Resized, size.width as i32, size.height as i32),
            ],
            WindowEvent::Moved(position) => vec![window(WindowEventId::Moved, position.x, position.y)],
            WindowEvent::Focused(true) => vec![window(WindowEventId::FocusGained, 0, 0)],
            WindowEvent::Focused(false) => vec![window(WindowEventId::FocusLost, 0, 0)],
            WindowEvent::CursorEntered { .. } => vec![window(WindowEventId::Enter, 0, 0)],
            WindowEvent::CursorLeft { .. } => vec![window(WindowEventId::Leave, 0, 0)],
            WindowEvent::Occluded(true) => vec![window(WindowEventId::Hidden, 0, 0)],
            WindowEvent::Occluded(false) => vec![window(WindowEventId::Exposed, 0, 0)],
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = map_modifiers(modifiers.state());
                Vec::new()
            }
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                let scancode = map_scancode(key_event.physical_key);
                let key = map_keycode(&key_event.logical_key, scancode);
                let modifiers = self.modifiers;
                let repeat = key_event.repeat;
                match key_event.state {
                    ElementState::Pressed => {
                        let mut out = vec![PlatformEvent::KeyDown {
                            key,
                            scancode,
                            modifiers,
                            repeat,
                        }];
                        if let Some(text) = key_event.text.as_ref().filter(|t| is_printable(t)) {
                            out.push(PlatformEvent::TextInput {
                                text: text.to_string(),
                            });
                        }
                        out
                    }
                    ElementState::Released => vec![PlatformEvent::KeyUp {
                        key,
                        scancode,
                        modifiers,
                        repeat,
                    }],
                }
            }
            WindowEvent::Ime(Ime::Preedit(text, cursor)) => {
                let (start, end) = cursor.unwrap_or((text.len(), text.len()));
                vec![PlatformEvent::TextEditing {
                    text: text.clone(),
                    start: start as i32,
                    length: end.saturating_sub(start) as i32,
                }]
            }
            WindowEvent::Ime(Ime::Commit(text)) => vec![PlatformEvent::TextInput { text: text.clone() }],
            WindowEvent::Ime(_) => Vec::new(),
            WindowEvent::CursorMoved { position, .. } => {
                let pointer = self.pointers.entry(window_id).or_default();
                let (prev_x, prev_y) = pointer.position.unwrap_or((position.x, position.y));
                pointer.position = Some((position.x, position.y));
                vec![PlatformEvent::MouseMotion {
                    window_id,
                    which: MOUSE_ID,
                    state: pointer.buttons,
                    x: position.x as i32,
                    y: position.y as i32,
                    xrel: (position.x - prev_x) as i32,
                    yrel: (position.y - prev_y) as i32,
                }]
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = map_mouse_button(*button);
                let pointer = self.pointers.entry(window_id).or_default();
                let (x, y) = pointer.position.unwrap_or_default();
                let (x, y) = (x as i32, y as i32);
                match state {
                    ElementState::Pressed => {
                        pointer.buttons |= MouseButtons::from_button(button);
                        vec![PlatformEvent::MouseButtonDown {
                            window_id,
                            which: MOUSE_ID,
                            button,
                            clicks: 1,
                            x,
                            y,
                        }]
                    }
                    ElementState::Released => {
                        pointer.buttons -= MouseButtons::from_button(button);
                        vec![PlatformEvent::MouseButtonUp {
                            window_id,
                            which: MOUSE_ID,
                            button,
                            clicks: 1,
                            x,
                            y,
                        }]
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (x.round() as i32, y.round() as i32),
                    MouseScrollDelta::PixelDelta(pos) => (pos.x.round() as i32, pos.y.round() as i32),
                };
                if dx == 0 && dy == 0 {
                    return Vec::new();
                }
                vec![PlatformEvent::MouseWheel {
                    window_id,
                    which: MOUSE_ID,
                    x: dx,
                    y: dy,
                    direction: WheelDirection::Normal,
                }]
            }
            WindowEvent::DroppedFile(path) => vec![
                PlatformEvent::DropBegin,
                PlatformEvent::DropFile {
                    path: path.display().to_string(),
                },
                PlatformEvent::DropComplete,
            ],
            WindowEvent::Touch(touch) => self.translate_touch(touch, window_size),
            WindowEvent::PinchGesture { delta, .. } => {
                vec![self.gesture(window_size, 0.0, *delta as f32)]
            }
            WindowEvent::RotationGesture { delta, .. } => {
                vec![self.gesture(window_size, delta.to_radians(), 0.0)]
            }
            WindowEvent::Destroyed => {
                self.forget(window_id);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn translate_touch(&mut self, touch: &Touch, (width, height): (u32, u32)) -> Vec<PlatformEvent> {
        let x = (touch.location.x / f64::from(width.max(1))) as f32;
        let y = (touch.location.y / f64::from(height.max(1))) as f32;
        let pressure = touch.force.map_or(1.0, |f| f.normalized() as f32);
        let finger_id = touch.id as i64;
        let touch_id = 0;

        let event = match touch.phase {
            TouchPhase::Started => {
                self.touches.insert(touch.id, (x, y));
                PlatformEvent::FingerDown {
                    touch_id,
                    finger_id,
                    x,
                    y,
                    pressure,
                }
            }
            TouchPhase::Moved => {
                let (px, py) = self.touches.insert(touch.id, (x, y)).unwrap_or((x, y));
                PlatformEvent::FingerMotion {
                    touch_id,
                    finger_id,
                    x,
                    y,
                    dx: x - px,
                    dy: y - py,
                    pressure,
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touches.remove(&touch.id);
                PlatformEvent::FingerUp {
                    touch_id,
                    finger_id,
                    x,
                    y,
                    pressure,
                }
            }
        };
        vec![event]
    }

    fn gesture(&self, (width, height): (u32, u32), d_theta: f32, d_dist: f32) -> PlatformEvent {
        let (cx, cy) = self
            .pointers
            .values()
            .find_map(|p| p.position)
            .unwrap_or_default();
        PlatformEvent::MultiGesture {
            touch_id: 0,
            num_fingers: 2,
            x: (cx / f64::from(width.max(1))) as f32,
            y: (cy / f64::from(height.max(1))) as f32,
            d_theta,
            d_dist,
        }
    }
}

fn is_printable(text: &str) -> bool {
    !text.is_empty() && !text.chars().any(char::is_control)
}

// --- Private Helper Functions ---

/// (Internal) Maps `winit` modifier state to key modifier flags.
fn map_modifiers(state: ModifiersState) -> KeyMod {
    let mut modifiers = KeyMod::empty();
    modifiers.set(KeyMod::LSHIFT, state.shift_key());
    modifiers.set(KeyMod::LCTRL, state.control_key());
    modifiers.set(KeyMod::LALT, state.alt_key());
    modifiers.set(KeyMod::LGUI, state.super_key());
    modifiers
}

const LETTERS: [KeyCode; 26] = [
    KeyCode::KeyA,
    KeyCode::KeyB,
    KeyCode::KeyC,
    KeyCode::KeyD,
    KeyCode::KeyE,
    KeyCode::KeyF,
    KeyCode::KeyG,
    KeyCode::KeyH,
    KeyCode::KeyI,
    KeyCode::KeyJ,
    KeyCode::KeyK,
    KeyCode::KeyL,
    KeyCode::KeyM,
    KeyCode::KeyN,
    KeyCode::KeyO,
    KeyCode::KeyP,
    KeyCode::KeyQ,
    KeyCode::KeyR,
    KeyCode::KeyS,
    KeyCode::KeyT,
    KeyCode::KeyU,
    KeyCode::KeyV,
    KeyCode::KeyW,
    KeyCode::KeyX,
    KeyCode::KeyY,
    KeyCode::KeyZ,
];

const DIGITS: [KeyCode; 10] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
    KeyCode::Digit0,
];

const FUNCTION_KEYS: [KeyCode; 12] = [
    KeyCode::F1,
    KeyCode::F2,
    KeyCode::F3,
    KeyCode::F4,
    KeyCode::F5,
    KeyCode::F6,
    KeyCode::F7,
    KeyCode::F8,
    KeyCode::F9,
    KeyCode::F10,
    KeyCode::F11,
    KeyCode::F12,
];

fn offset_in(table: &[KeyCode], code: KeyCode, base: Scancode) -> Option<Scancode> {
    table
        .iter()
        .position(|k| *k == code)
        .map(|i| Scancode(base.0 + i as u32))
}

/// (Internal) Maps a physical key to its USB HID usage id.
fn map_scancode(key: PhysicalKey) -> Scancode {
    let PhysicalKey::Code(code) = key else {
        return Scancode::UNKNOWN;
    };
    if let Some(s) = offset_in(&LETTERS, code, Scancode::A)
        .or_else(|| offset_in(&DIGITS, code, Scancode::DIGIT1))
        .or_else(|| offset_in(&FUNCTION_KEYS, code, Scancode::F1))
    {
        return s;
    }
    match code {
        KeyCode::Enter => Scancode::RETURN,
        KeyCode::Escape => Scancode::ESCAPE,
        KeyCode::Backspace => Scancode::BACKSPACE,
        KeyCode::Tab => Scancode::TAB,
        KeyCode::Space => Scancode::SPACE,
        KeyCode::Delete => Scancode::DELETE,
        KeyCode::ArrowRight => Scancode::RIGHT,
        KeyCode::ArrowLeft => Scancode::LEFT,
        KeyCode::ArrowDown => Scancode::DOWN,
        KeyCode::ArrowUp => Scancode::UP,
        KeyCode::ControlLeft => Scancode::LCTRL,
        KeyCode::ShiftLeft => Scancode::LSHIFT,
        KeyCode::AltLeft => Scancode::LALT,
        KeyCode::SuperLeft => Scancode::LGUI,
        KeyCode::ControlRight => Scancode::RCTRL,
        KeyCode::ShiftRight => Scancode::RSHIFT,
        KeyCode::AltRight => Scancode::RALT,
        KeyCode::SuperRight => Scancode::RGUI,
        _ => Scancode::UNKNOWN,
    }
}

/// (Internal) Maps a logical key to a virtual key code.
///
/// Keys without a character fall back to the code derived from their scancode.
fn map_keycode(key: &Key, scancode: Scancode) -> Keycode {
    let named = match key {
        Key::Character(s) => {
            return s.chars().next().map_or(Keycode::UNKNOWN, Keycode::from_char);
        }
        Key::Named(named) => named,
        _ => return fallback_keycode(scancode),
    };
    match named {
        NamedKey::Escape => Keycode::ESCAPE,
        NamedKey::Enter => Keycode::RETURN,
        NamedKey::Tab => Keycode::TAB,
        NamedKey::Backspace => Keycode::BACKSPACE,
        NamedKey::Space => Keycode::SPACE,
        NamedKey::Delete => Keycode::DELETE,
        NamedKey::ArrowRight => Keycode::RIGHT,
        NamedKey::ArrowLeft => Keycode::LEFT,
        NamedKey::ArrowDown => Keycode::DOWN,
        NamedKey::ArrowUp => Keycode::UP,
        _ => fallback_keycode(scancode),
    }
}

fn fallback_keycode(scancode: Scancode) -> Keycode {
    if scancode == Scancode::UNKNOWN {
        Keycode::UNKNOWN
    } else {
        Keycode::from_scancode(scancode)
    }
}

/// (Internal) Maps a `winit` mouse button to a platform mouse button.
fn map_mouse_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::X1,
        WinitMouseButton::Forward => MouseButton::X2,
        WinitMouseButton::Other(id) => MouseButton::Other(id),
    }
}
