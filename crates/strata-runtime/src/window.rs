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

//! A layer that owns a native window and renderer.

use crate::error::RuntimeError;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use strata_core::event::{EventHandlers, InputEvent, WindowEventId};
use strata_core::graphics::Canvas;
use strata_core::math::Color;
use strata_core::platform::{NativeResources, NativeWindow, Platform, PlatformEvent, WindowSettings};
use strata_core::{share, Entity, EntityHandle, FrameClock, IdGenerator, Layer, MonotonicClock, ObjectState, TimeSource};

/// Background color every frame starts from.
pub const CLEAR_COLOR: Color = Color::GREY;

/// What the switchboard does with one platform event.
enum Route {
    Deliver(InputEvent),
    Stop,
    Ignore,
}

/// A [`Layer`] bound to a native window, a renderer and optionally an
/// acceleration context.
///
/// The native resources are released exactly once, by [`Entity::destroy`] or
/// on drop, in the order acceleration context, renderer, window.
pub struct Window {
    layer: Layer,
    settings: WindowSettings,
    native: Option<NativeResources>,
    native_id: u32,
    clock: FrameClock,
}

impl Window {
    /// Opens a window with its own empty object tree.
    ///
    /// ## Arguments
    /// * `platform` - The backend providing the native resources.
    /// * `ids` - The id generator shared by the whole scene.
    /// * `settings` - Title, geometry, flags and framerate.
    /// * `handlers` - The window layer's own handlers.
    ///
    /// ## Returns
    /// * `Result<Self, RuntimeError>` - The window, or the platform's creation error.
    pub fn new<P: Platform + ?Sized>(
        platform: &mut P,
        ids: &IdGenerator,
        settings: WindowSettings,
        handlers: Arc<dyn EventHandlers>,
    ) -> Result<Self, RuntimeError> {
        Self::with_time_source(platform, ids, settings, handlers, Arc::new(MonotonicClock::new()))
    }

    /// Like [`Window::new`], with frame times read from `source`.
    pub fn with_time_source<P: Platform + ?Sized>(
        platform: &mut P,
        ids: &IdGenerator,
        settings: WindowSettings,
        handlers: Arc<dyn EventHandlers>,
        source: Arc<dyn TimeSource>,
    ) -> Result<Self, RuntimeError> {
        let layer = Layer::new(ids, handlers);
        Self::assemble(platform, layer, settings, FrameClock::new(source))
    }

    /// Opens a new window that shares `other`'s children.
    ///
    /// The new window takes `settings` except for its size, which is `other`'s
    /// current size. Children are shared, not copied: the same handles end up
    /// in both windows under the same names.
    pub fn from_existing<P: Platform + ?Sized>(
        platform: &mut P,
        other: &Window,
        mut settings: WindowSettings,
    ) -> Result<Self, RuntimeError> {
        let (width, height) = other.size();
        settings.width = width;
        settings.height = height;

        let mut layer = Layer::new(other.layer.id_generator(), Arc::clone(other.layer.object().handlers()));
        for (_, name, handle) in other.layer.iter() {
            layer.add_object(Arc::clone(handle), name);
        }
        let clock = FrameClock::new(Arc::clone(other.clock.source()));
        Self::assemble(platform, layer, settings, clock)
    }

    /// Opens a new window holding a deep copy of this window's tree.
    pub fn duplicate<P: Platform + ?Sized>(&self, platform: &mut P) -> Result<Self, RuntimeError> {
        let clock = FrameClock::new(Arc::clone(self.clock.source()));
        Self::assemble(platform, self.layer.clone(), self.settings.clone(), clock)
    }

    fn assemble<P: Platform + ?Sized>(
        platform: &mut P,
        layer: Layer,
        settings: WindowSettings,
        clock: FrameClock,
    ) -> Result<Self, RuntimeError> {
        let native = platform.create_window(&settings)?;
        let native_id = native.window.id();
        log::info!(
            "Window {} opened on '{}' backend as native window {native_id}.",
            layer.id(),
            platform.name()
        );
        Ok(Self {
            layer,
            settings,
            native: Some(native),
            native_id,
            clock,
        })
    }

    /// The window's object tree.
    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    /// Mutable access to the window's object tree.
    pub fn layer_mut(&mut self) -> &mut Layer {
        &mut self.layer
    }

    /// The settings the window was created with.
    pub fn settings(&self) -> &WindowSettings {
        &self.settings
    }

    /// The platform's id for this window, used to route addressed events.
    pub fn native_id(&self) -> u32 {
        self.native_id
    }

    /// The native window, until the window is destroyed.
    pub fn native_window(&self) -> Option<&dyn NativeWindow> {
        self.native.as_ref().map(|n| n.window.as_ref())
    }

    /// Mutable access to the native window, until the window is destroyed.
    pub fn native_window_mut(&mut self) -> Option<&mut (dyn NativeWindow + 'static)> {
        self.native.as_mut().map(|n| n.window.as_mut())
    }

    /// Current inner size; the creation size once destroyed.
    pub fn size(&self) -> (u32, u32) {
        self.native_window()
            .map_or((self.settings.width, self.settings.height), |w| w.size())
    }

    /// Seconds between event deliveries, from the configured framerate.
    pub fn frame_period(&self) -> f64 {
        self.settings.frame_period()
    }

    /// Label of the acceleration context, if the window has one.
    pub fn acceleration_label(&self) -> Option<String> {
        self.native
            .as_ref()
            .and_then(|n| n.acceleration.as_ref())
            .map(|a| a.label())
    }

    /// Clears the renderer, draws the whole tree into it and presents.
    pub fn draw_frame(&mut self) {
        let Some(native) = self.native.as_mut() else {
            return;
        };
        if let Some(acceleration) = native.acceleration.as_mut() {
            if let Err(e) = acceleration.make_current() {
                log::error!("Window {}: cannot make context current: {e}", self.layer.id());
            }
        }
        let canvas: &mut dyn Canvas = native.canvas.as_mut();
        canvas.set_draw_color(CLEAR_COLOR);
        canvas.clear();
        self.layer.render(canvas, 0, 0, 0);
        canvas.present();
    }

    /// Measures the time since the previous tick and updates the tree with it.
    ///
    /// ## Returns
    /// `false` if any node asked the window to stop.
    pub fn tick(&mut self) -> bool {
        let elapsed = self.clock.tick();
        self.layer.update(elapsed)
    }

    /// Delivers one platform event to the tree.
    ///
    /// Quit and terminate requests return `false` without reaching any
    /// handler. Kinds with no handler slot return `true`.
    pub fn handle_event(&mut self, event: &PlatformEvent) -> bool {
        match translate(event) {
            Route::Deliver(input) => {
                log::trace!("Window {}: dispatching {}", self.layer.id(), input.kind());
                self.dispatch(&input)
            }
            Route::Stop => false,
            Route::Ignore => true,
        }
    }

    fn release_native(&mut self) {
        let Some(NativeResources {
            window,
            canvas,
            acceleration,
        }) = self.native.take()
        else {
            return;
        };
        drop(acceleration);
        drop(canvas);
        drop(window);
        log::info!("Window {} released native window {}.", self.layer.id(), self.native_id);
    }
}

fn translate(event: &PlatformEvent) -> Route {
    use PlatformEvent as P;
    let input = match event.clone() {
        P::Quit | P::AppTerminating => return Route::Stop,
        P::CreateWindow(_) | P::Unknown { .. } => return Route::Ignore,
        P::RenderTargetsReset | P::RenderDeviceReset => InputEvent::TargetReset,
        P::Window {
            event,
            data1,
            data2,
            ..
        } => InputEvent::Window {
            event,
            data1,
            data2,
        },
        P::KeyDown {
            key,
            scancode,
            modifiers,
            repeat,
        } => InputEvent::KeyDown {
            key,
            scancode,
            modifiers,
            repeat,
        },
        P::KeyUp {
            key,
            scancode,
            modifiers,
            repeat,
        } => InputEvent::KeyUp {
            key,
            scancode,
            modifiers,
            repeat,
        },
        P::TextEditing {
            text,
            start,
            length,
        } => InputEvent::TextEditing {
            text,
            start,
            length,
        },
        P::TextInput { text } => InputEvent::TextInput { text },
        P::MouseButtonDown {
            which,
            button,
            clicks,
            x,
            y,
            ..
        } => InputEvent::MouseDown {
            x,
            y,
            button,
            clicks,
            which,
        },
        P::MouseButtonUp {
            which,
            button,
            clicks,
            x,
            y,
            ..
        } => InputEvent::MouseUp {
            x,
            y,
            button,
            clicks,
            which,
        },
        P::MouseMotion {
            which,
            state,
            x,
            y,
            xrel,
            yrel,
            ..
        } => InputEvent::MouseMotion {
            x,
            y,
            xrel,
            yrel,
            buttons: state.to_array(),
            which,
        },
        P::MouseWheel {
            which,
            x,
            y,
            direction,
            ..
        } => InputEvent::MouseWheel {
            direction,
            x,
            y,
            which,
        },
        P::ClipboardUpdate { text } => InputEvent::ClipboardUpdate { text },
        P::DropFile { path } => InputEvent::FileDrop { path },
        P::DropText { text } => InputEvent::TextDrop { text },
        P::DropBegin => InputEvent::DropBegin,
        P::DropComplete => InputEvent::DropComplete,
        P::JoyAxisMotion { which, axis, value } => InputEvent::JoyAxis { which, axis, value },
        P::JoyBallMotion {
            which,
            ball,
            xrel,
            yrel,
        } => InputEvent::JoyBall {
            which,
            ball,
            xrel,
            yrel,
        },
        P::JoyHatMotion { which, hat, value } => InputEvent::JoyHat { which, hat, value },
        P::JoyButtonDown { which, button } => InputEvent::JoyButtonDown { which, button },
        P::JoyButtonUp { which, button } => InputEvent::JoyButtonUp { which, button },
        P::ControllerAxisMotion { which, axis, value } => {
            InputEvent::ControllerAxis { which, axis, value }
        }
        P::ControllerButtonDown { which, button } => {
            InputEvent::ControllerButtonDown { which, button }
        }
        P::ControllerButtonUp { which, button } => InputEvent::ControllerButtonUp { which, button },
        P::FingerDown {
            touch_id,
            finger_id,
            x,
            y,
            pressure,
        } => InputEvent::FingerDown {
            touch_id,
            finger_id,
            x,
            y,
            pressure,
        },
        P::FingerUp {
            touch_id,
            finger_id,
            x,
            y,
            pressure,
        } => InputEvent::FingerUp {
            touch_id,
            finger_id,
            x,
            y,
            pressure,
        },
        P::FingerMotion {
            touch_id,
            finger_id,
            x,
            y,
            dx,
            dy,
            pressure,
        } => InputEvent::FingerMotion {
            touch_id,
            finger_id,
            x,
            y,
            dx,
            dy,
            pressure,
        },
        P::DollarRecord {
            touch_id,
            gesture_id,
            num_fingers,
            x,
            y,
        } => InputEvent::GestureRecord {
            touch_id,
            gesture_id,
            num_fingers,
            x,
            y,
        },
        P::DollarGesture {
            touch_id,
            gesture_id,
            num_fingers,
            x,
            y,
            error,
        } => InputEvent::GesturePerform {
            touch_id,
            gesture_id,
            num_fingers,
            x,
            y,
            error,
        },
        P::MultiGesture {
            touch_id,
            num_fingers,
            x,
            y,
            d_theta,
            d_dist,
        } => InputEvent::MultiGesture {
            touch_id,
            num_fingers,
            x,
            y,
            d_theta,
            d_dist,
        },
        P::User { code, data1, data2 } => InputEvent::User { code, data1, data2 },
    };
    Route::Deliver(input)
}

impl Entity for Window {
    fn state(&self) -> &ObjectState {
        self.layer.state()
    }

    fn state_mut(&mut self) -> &mut ObjectState {
        self.layer.state_mut()
    }

    fn render(&mut self, target: &mut dyn Canvas, offset_x: i32, offset_y: i32, offset_z: i32) {
        self.layer.render(target, offset_x, offset_y, offset_z);
    }

    fn update(&mut self, elapsed: f64) -> bool {
        self.layer.update(elapsed)
    }

    /// A close request stops the window before any handler sees it.
    fn dispatch(&mut self, event: &InputEvent) -> bool {
        if let InputEvent::Window {
            event: WindowEventId::Close,
            ..
        } = event
        {
            log::info!("Window {} received a close request.", self.layer.id());
            return false;
        }
        self.layer.dispatch(event)
    }

    fn destroy(&mut self) {
        self.layer.destroy();
        self.release_native();
    }

    /// Copies the tree into a window with no native resources.
    ///
    /// Opening a real second window needs a platform; see [`Window::duplicate`].
    fn clone_handle(&self) -> EntityHandle {
        share(Window {
            layer: self.layer.clone(),
            settings: self.settings.clone(),
            native: None,
            native_id: self.native_id,
            clock: self.clock.clone(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.layer.id())
            .field("native_id", &self.native_id)
            .field("title", &self.settings.title)
            .field("open", &self.native.is_some())
            .field("children", &self.layer.num_objects())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use strata_core::event::{default_handlers, KeyMod, Keycode, MouseButtons, Scancode};
    use strata_core::{lock_entity, ManualClock, Object};
    use strata_infra::{HeadlessPlatform, Teardown};

    type Seen = Arc<Mutex<Vec<InputEvent>>>;

    struct Recorder(Seen);

    impl EventHandlers for Recorder {
        fn key_down(
            &self,
            _obj: &mut ObjectState,
            key: Keycode,
            scancode: Scancode,
            modifiers: KeyMod,
            repeat: bool,
        ) -> bool {
            self.0.lock().expect("seen").push(InputEvent::KeyDown {
                key,
                scancode,
                modifiers,
                repeat,
            });
            true
        }

        fn mouse_motion(
            &self,
            _obj: &mut ObjectState,
            x: i32,
            y: i32,
            xrel: i32,
            yrel: i32,
            buttons: [bool; 5],
            which: u32,
        ) -> bool {
            self.0.lock().expect("seen").push(InputEvent::MouseMotion {
                x,
                y,
                xrel,
                yrel,
                buttons,
                which,
            });
            true
        }

        fn window_event(&self, _obj: &mut ObjectState, event: WindowEventId, data1: i32, data2: i32) -> bool {
            self.0.lock().expect("seen").push(InputEvent::Window { event, data1, data2 });
            true
        }
    }

    fn open(platform: &mut HeadlessPlatform, ids: &IdGenerator, seen: &Seen) -> Window {
        Window::new(
            platform,
            ids,
            WindowSettings::titled("test").with_size(32, 16),
            Arc::new(Recorder(Arc::clone(seen))),
        )
        .expect("headless window")
    }

    #[test]
    fn close_request_stops_before_handlers() {
        let mut platform = HeadlessPlatform::new();
        let seen = Seen::default();
        let mut window = open(&mut platform, &IdGenerator::new(), &seen);

        let resized = PlatformEvent::Window {
            window_id: window.native_id(),
            event: WindowEventId::Resized,
            data1: 10,
            data2: 20,
        };
        assert!(window.handle_event(&resized));
        let close = PlatformEvent::Window {
            window_id: window.native_id(),
            event: WindowEventId::Close,
            data1: 0,
            data2: 0,
        };
        assert!(!window.handle_event(&close));
        assert_eq!(seen.lock().expect("seen").len(), 1);
    }

    #[test]
    fn quit_and_unknown_events() {
        let mut platform = HeadlessPlatform::new();
        let seen = Seen::default();
        let mut window = open(&mut platform, &IdGenerator::new(), &seen);

        assert!(window.handle_event(&PlatformEvent::Unknown { kind: 0x9000 }));
        assert!(!window.handle_event(&PlatformEvent::AppTerminating));
        assert!(!window.handle_event(&PlatformEvent::Quit));
        assert!(seen.lock().expect("seen").is_empty());
    }

    #[test]
    fn mouse_motion_state_is_unpacked() {
        let mut platform = HeadlessPlatform::new();
        let seen = Seen::default();
        let mut window = open(&mut platform, &IdGenerator::new(), &seen);

        assert!(window.handle_event(&PlatformEvent::MouseMotion {
            window_id: window.native_id(),
            which: 0,
            state: MouseButtons::LEFT | MouseButtons::X2,
            x: 3,
            y: 4,
            xrel: 1,
            yrel: -1,
        }));
        match &seen.lock().expect("seen")[0] {
            InputEvent::MouseMotion { buttons, x, y, .. } => {
                assert_eq!(*buttons, [true, false, false, false, true]);
                assert_eq!((*x, *y), (3, 4));
            }
            other => panic!("unexpected event {other:?}"),
        };
    }

    #[test]
    fn children_see_events_before_the_window() {
        let mut platform = HeadlessPlatform::new();
        let ids = IdGenerator::new();
        let seen = Seen::default();
        let mut window = open(&mut platform, &ids, &seen);
        let child_seen = Seen::default();
        window.layer_mut().add_object(
            share(Object::new(&ids, Arc::new(Recorder(Arc::clone(&child_seen))))),
            "child",
        );

        let key = PlatformEvent::KeyDown {
            key: Keycode::SPACE,
            scancode: Scancode::SPACE,
            modifiers: KeyMod::empty(),
            repeat: false,
        };
        assert!(window.handle_event(&key));
        assert_eq!(child_seen.lock().expect("seen").len(), 1);
        assert_eq!(seen.lock().expect("seen").len(), 1);
    }

    #[test]
    fn draw_frame_presents_once() {
        let mut platform = HeadlessPlatform::new();
        let mut window = open(&mut platform, &IdGenerator::new(), &Seen::default());
        window.draw_frame();
        window.draw_frame();
        assert_eq!(platform.presents(window.native_id()), 2);
    }

    #[test]
    fn tick_uses_the_injected_clock() {
        let mut platform = HeadlessPlatform::new();
        let clock = ManualClock::new(0.0);
        let ids = IdGenerator::new();
        let mut window = Window::with_time_source(
            &mut platform,
            &ids,
            WindowSettings::titled("clock"),
            default_handlers(),
            Arc::new(clock.clone()),
        )
        .expect("headless window");
        let child = share(Object::with_default_handlers(&ids));
        lock_entity(&child).state_mut().move_vector.x = 1.0;
        window.layer_mut().add_object(Arc::clone(&child), "mover");

        clock.advance(2.0);
        assert!(window.tick());
        approx::assert_relative_eq!(lock_entity(&child).state().position.x, 30.0);
    }

    #[test]
    fn destroy_releases_in_order_once() {
        let mut platform = HeadlessPlatform::new();
        let log = platform.teardown_log();
        let mut window = Window::new(
            &mut platform,
            &IdGenerator::new(),
            WindowSettings::titled("gl").with_flags(strata_core::platform::WindowFlags::ACCELERATED),
            default_handlers(),
        )
        .expect("headless window");
        let id = window.native_id();
        assert!(window.acceleration_label().is_some());

        window.destroy();
        window.destroy();
        drop(window);
        assert_eq!(
            *log.lock().expect("log"),
            vec![Teardown::Acceleration(id), Teardown::Renderer(id), Teardown::Window(id)]
        );
    }

    #[test]
    fn from_existing_shares_children_and_size() {
        let mut platform = HeadlessPlatform::new();
        let ids = IdGenerator::new();
        let mut first = open(&mut platform, &ids, &Seen::default());
        let child = share(Object::with_default_handlers(&ids));
        first.layer_mut().add_object(Arc::clone(&child), "shared");
        first
            .native_window_mut()
            .expect("open window")
            .resize(50, 60);

        let second = Window::from_existing(&mut platform, &first, WindowSettings::titled("second"))
            .expect("headless window");
        assert_eq!(second.size(), (50, 60));
        assert_eq!(second.settings().title, "second");
        let shared = second.layer().get_object_by_name("shared").expect("shared child");
        assert!(Arc::ptr_eq(&shared, &child));
        assert_ne!(second.id(), first.id());
    }

    #[test]
    fn duplicate_deep_copies_children() {
        let mut platform = HeadlessPlatform::new();
        let ids = IdGenerator::new();
        let mut first = open(&mut platform, &ids, &Seen::default());
        let child = share(Object::with_default_handlers(&ids));
        first.layer_mut().add_object(Arc::clone(&child), "copied");

        let second = first.duplicate(&mut platform).expect("headless window");
        let copy = second.layer().get_object_by_name("copied").expect("copied child");
        assert!(!Arc::ptr_eq(&copy, &child));
        assert_ne!(second.native_id(), first.native_id());
    }

    #[test]
    fn creation_failure_is_an_error() {
        let mut platform = HeadlessPlatform::new();
        platform.fail_next_window("no display");
        let result = Window::new(
            &mut platform,
            &IdGenerator::new(),
            WindowSettings::titled("broken"),
            default_handlers(),
        );
        assert!(matches!(result, Err(RuntimeError::Platform(_))));
    }
}
