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

//! An in-memory platform backend.
//!
//! Windows are plain records, renderers are [`SoftwareCanvas`]es, and events
//! only arrive when a test injects them. Every native release is written to a
//! shared [`TeardownLog`] so the release order can be checked.

use crate::software::SoftwareCanvas;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use strata_core::graphics::{BlendMode, Canvas};
use strata_core::math::Color;
use strata_core::platform::{
    AccelerationContext, EventQueue, EventSender, NativeResources, NativeWindow, Platform,
    PlatformError, PlatformEvent, WindowFlags, WindowSettings,
};

/// One native release, tagged with the window id it belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    /// An acceleration context was released.
    Acceleration(u32),
    /// A renderer was released.
    Renderer(u32),
    /// A window was released.
    Window(u32),
}

/// Shared, append-only record of native releases.
pub type TeardownLog = Arc<Mutex<Vec<Teardown>>>;

fn record(log: &TeardownLog, entry: Teardown) {
    log.lock().unwrap_or_else(PoisonError::into_inner).push(entry);
}

/// Observable properties of a headless window.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessWindowState {
    /// Title bar text.
    pub title: String,
    /// Inner size.
    pub size: (u32, u32),
    /// Screen position.
    pub position: (i32, i32),
    /// Minimum size, if set.
    pub min_size: Option<(u32, u32)>,
    /// Maximum size, if set.
    pub max_size: Option<(u32, u32)>,
    /// Whether decorations are shown.
    pub bordered: bool,
    /// Whether the window is fullscreen.
    pub fullscreen: bool,
    /// Whole-window opacity.
    pub opacity: f32,
    /// Whether the window is visible.
    pub visible: bool,
}

type SharedState = Arc<Mutex<HeadlessWindowState>>;

struct HeadlessWindow {
    id: u32,
    state: SharedState,
    log: TeardownLog,
}

impl HeadlessWindow {
    fn with_state<R>(&self, f: impl FnOnce(&mut HeadlessWindowState) -> R) -> R {
        f(&mut self.state.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl NativeWindow for HeadlessWindow {
    fn id(&self) -> u32 {
        self.id
    }

    fn title(&self) -> String {
        self.with_state(|s| s.title.clone())
    }

    fn set_title(&mut self, title: &str) {
        self.with_state(|s| s.title = title.to_owned());
    }

    fn size(&self) -> (u32, u32) {
        self.with_state(|s| s.size)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.with_state(|s| s.size = (width, height));
    }

    fn position(&self) -> (i32, i32) {
        self.with_state(|s| s.position)
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.with_state(|s| s.position = (x, y));
    }

    fn set_min_size(&mut self, width: u32, height: u32) {
        self.with_state(|s| s.min_size = Some((width, height)));
    }

    fn set_max_size(&mut self, width: u32, height: u32) {
        self.with_state(|s| s.max_size = Some((width, height)));
    }

    fn set_bordered(&mut self, bordered: bool) {
        self.with_state(|s| s.bordered = bordered);
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        self.with_state(|s| s.fullscreen = fullscreen);
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.with_state(|s| s.opacity = opacity.clamp(0.0, 1.0));
    }

    fn opacity(&self) -> f32 {
        self.with_state(|s| s.opacity)
    }

    fn set_visible(&mut self, visible: bool) {
        self.with_state(|s| s.visible = visible);
    }
}

impl Drop for HeadlessWindow {
    fn drop(&mut self) {
        record(&self.log, Teardown::Window(self.id));
    }
}

struct HeadlessRenderer {
    window_id: u32,
    canvas: SoftwareCanvas,
    presents: Arc<AtomicU64>,
    log: TeardownLog,
}

impl Canvas for HeadlessRenderer {
    fn set_draw_color(&mut self, color: Color) {
        self.canvas.set_draw_color(color);
    }

    fn draw_color(&self) -> Color {
        self.canvas.draw_color()
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.canvas.set_blend_mode(mode);
    }

    fn blend_mode(&self) -> BlendMode {
        self.canvas.blend_mode()
    }

    fn clear(&mut self) {
        self.canvas.clear();
    }

    fn draw_point(&mut self, x: i32, y: i32) {
        self.canvas.draw_point(x, y);
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.canvas.fill_rect(x, y, width, height);
    }

    fn present(&mut self) {
        self.canvas.present();
        self.presents.fetch_add(1, Ordering::Relaxed);
    }

    fn output_size(&self) -> (u32, u32) {
        self.canvas.output_size()
    }
}

impl Drop for HeadlessRenderer {
    fn drop(&mut self) {
        record(&self.log, Teardown::Renderer(self.window_id));
    }
}

struct HeadlessAcceleration {
    window_id: u32,
    log: TeardownLog,
}

impl AccelerationContext for HeadlessAcceleration {
    fn make_current(&mut self) -> Result<(), PlatformError> {
        Ok(())
    }

    fn label(&self) -> String {
        format!("headless context for window {}", self.window_id)
    }
}

impl Drop for HeadlessAcceleration {
    fn drop(&mut self) {
        record(&self.log, Teardown::Acceleration(self.window_id));
    }
}

struct WindowRecord {
    state: SharedState,
    presents: Arc<AtomicU64>,
}

/// A scriptable platform with no real windows.
pub struct HeadlessPlatform {
    queue: EventQueue,
    injected: Vec<PlatformEvent>,
    planned_ids: VecDeque<u32>,
    next_id: u32,
    failures: VecDeque<String>,
    windows: HashMap<u32, WindowRecord>,
    created: Vec<u32>,
    log: TeardownLog,
    shut_down: bool,
}

impl HeadlessPlatform {
    /// Creates a platform whose windows are numbered from 1.
    pub fn new() -> Self {
        Self {
            queue: EventQueue::new(),
            injected: Vec::new(),
            planned_ids: VecDeque::new(),
            next_id: 1,
            failures: VecDeque::new(),
            windows: HashMap::new(),
            created: Vec::new(),
            log: Arc::new(Mutex::new(Vec::new())),
            shut_down: false,
        }
    }

    /// Uses the given ids, in order, for the next windows created.
    pub fn with_window_ids(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.planned_ids.extend(ids);
        self
    }

    /// Queues an event for the next poll, ahead of anything sent through an [`EventSender`].
    pub fn inject(&mut self, event: PlatformEvent) {
        self.injected.push(event);
    }

    /// Makes the next window creation fail with `reason`.
    pub fn fail_next_window(&mut self, reason: impl Into<String>) {
        self.failures.push_back(reason.into());
    }

    /// The shared release log.
    pub fn teardown_log(&self) -> TeardownLog {
        Arc::clone(&self.log)
    }

    /// Ids of every window created so far, in creation order.
    pub fn created_windows(&self) -> &[u32] {
        &self.created
    }

    /// How many frames window `id` has presented.
    pub fn presents(&self, id: u32) -> u64 {
        self.windows
            .get(&id)
            .map_or(0, |w| w.presents.load(Ordering::Relaxed))
    }

    /// A snapshot of window `id`'s properties.
    pub fn window_state(&self, id: u32) -> Option<HeadlessWindowState> {
        self.windows
            .get(&id)
            .map(|w| w.state.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn allocate_id(&mut self) -> u32 {
        if let Some(id) = self.planned_ids.pop_front() {
            return id;
        }
        while self.windows.contains_key(&self.next_id) {
            self.next_id += 1;
        }
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for HeadlessPlatform {
    fn name(&self) -> &str {
        "headless"
    }

    fn create_window(&mut self, settings: &WindowSettings) -> Result<NativeResources, PlatformError> {
        if self.shut_down {
            return Err(PlatformError::ShutDown);
        }
        if let Some(reason) = self.failures.pop_front() {
            log::warn!("Headless window '{}' refused: {reason}", settings.title);
            return Err(PlatformError::WindowCreation {
                title: settings.title.clone(),
                reason,
            });
        }

        let id = self.allocate_id();
        let state = Arc::new(Mutex::new(HeadlessWindowState {
            title: settings.title.clone(),
            size: (settings.width, settings.height),
            position: (settings.x.unwrap_or(0), settings.y.unwrap_or(0)),
            min_size: None,
            max_size: None,
            bordered: !settings.flags.contains(WindowFlags::BORDERLESS),
            fullscreen: settings.flags.contains(WindowFlags::FULLSCREEN),
            opacity: 1.0,
            visible: !settings.flags.contains(WindowFlags::HIDDEN),
        }));
        let presents = Arc::new(AtomicU64::new(0));

        let window = HeadlessWindow {
            id,
            state: Arc::clone(&state),
            log: Arc::clone(&self.log),
        };
        let canvas = HeadlessRenderer {
            window_id: id,
            canvas: SoftwareCanvas::new(settings.width, settings.height),
            presents: Arc::clone(&presents),
            log: Arc::clone(&self.log),
        };
        let acceleration = settings.flags.contains(WindowFlags::ACCELERATED).then(|| {
            Box::new(HeadlessAcceleration {
                window_id: id,
                log: Arc::clone(&self.log),
            }) as Box<dyn AccelerationContext>
        });

        self.windows.insert(id, WindowRecord { state, presents });
        self.created.push(id);
        log::info!(
            "Headless window {id} created: '{}' {}x{}",
            settings.title,
            settings.width,
            settings.height
        );

        Ok(NativeResources {
            window: Box::new(window),
            canvas: Box::new(canvas),
            acceleration,
        })
    }

    fn poll_events(&mut self, out: &mut Vec<PlatformEvent>) {
        out.append(&mut self.injected);
        self.queue.drain_into(out);
    }

    fn event_sender(&self) -> EventSender {
        self.queue.sender()
    }

    fn shutdown(&mut self) {
        self.shut_down = true;
        log::info!("Headless platform shut down.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planned_ids_then_counter() {
        let mut platform = HeadlessPlatform::new().with_window_ids([10, 20]);
        let settings = WindowSettings::titled("t").with_size(8, 8);
        let ids: Vec<u32> = (0..3)
            .map(|_| {
                platform
                    .create_window(&settings)
                    .expect("headless windows never fail unasked")
                    .window
                    .id()
            })
            .collect();
        assert_eq!(ids, vec![10, 20, 1]);
        assert_eq!(platform.created_windows(), &[10, 20, 1]);
    }

    #[test]
    fn injected_events_precede_sent_ones() {
        let mut platform = HeadlessPlatform::new();
        platform.event_sender().quit();
        platform.inject(PlatformEvent::DropBegin);

        let mut out = Vec::new();
        platform.poll_events(&mut out);
        assert!(matches!(out[0], PlatformEvent::DropBegin));
        assert!(out[1].is_quit());

        out.clear();
        platform.poll_events(&mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn failure_injection_and_shutdown() {
        let mut platform = HeadlessPlatform::new();
        platform.fail_next_window("no display");
        let err = platform
            .create_window(&WindowSettings::titled("x"))
            .err()
            .expect("first creation fails");
        assert!(err.to_string().contains("no display"));
        assert!(platform.create_window(&WindowSettings::titled("x")).is_ok());

        platform.shutdown();
        assert!(matches!(
            platform.create_window(&WindowSettings::titled("x")),
            Err(PlatformError::ShutDown)
        ));
    }

    #[test]
    fn releases_are_logged_per_object() {
        let mut platform = HeadlessPlatform::new();
        let settings = WindowSettings::titled("gl").with_flags(WindowFlags::ACCELERATED);
        let NativeResources {
            window,
            canvas,
            acceleration,
        } = platform.create_window(&settings).expect("created");
        let id = window.id();

        drop(acceleration);
        drop(canvas);
        drop(window);
        assert_eq!(
            *platform.teardown_log().lock().expect("log"),
            vec![
                Teardown::Acceleration(id),
                Teardown::Renderer(id),
                Teardown::Window(id)
            ]
        );
    }

    #[test]
    fn window_properties_are_observable() {
        let mut platform = HeadlessPlatform::new();
        let mut res = platform
            .create_window(&WindowSettings::titled("before").with_size(100, 50))
            .expect("created");
        let id = res.window.id();
        res.window.set_title("after");
        res.window.resize(20, 10);
        res.window.set_opacity(3.0);

        let state = platform.window_state(id).expect("known window");
        assert_eq!(state.title, "after");
        assert_eq!(state.size, (20, 10));
        assert_eq!(state.opacity, 1.0);

        res.canvas.present();
        assert_eq!(platform.presents(id), 1);
    }
}
