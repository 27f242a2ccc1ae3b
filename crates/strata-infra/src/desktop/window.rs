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

//! A `winit`-based implementation of the `NativeWindow` trait.

use std::sync::Arc;
use strata_core::platform::{NativeWindow, WindowFlags, WindowSettings};
use winit::dpi::{LogicalPosition, LogicalSize, PhysicalPosition, PhysicalSize};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowLevel};

/// A wrapper around a `winit::window::Window` that implements `NativeWindow`.
///
/// `winit` windows are thread-safe, so the wrapper can live on a window thread
/// while the event loop keeps running on the main thread.
#[derive(Debug)]
pub struct WinitWindow {
    id: u32,
    inner: Arc<Window>,
    opacity: f32,
}

impl WinitWindow {
    pub(crate) fn new(id: u32, inner: Arc<Window>) -> Self {
        Self {
            id,
            inner,
            opacity: 1.0,
        }
    }

    /// The shared `winit` handle, for surface creation.
    pub fn handle(&self) -> Arc<Window> {
        Arc::clone(&self.inner)
    }
}

/// Translates window settings into `winit` window attributes.
///
/// ## Arguments
/// * `settings` - The requested window configuration.
///
/// ## Returns
/// The attributes to pass to `ActiveEventLoop::create_window`.
pub fn window_attributes(settings: &WindowSettings) -> WindowAttributes {
    log::info!(
        "Building window with title: '{}' and size: {}x{}",
        settings.title,
        settings.width,
        settings.height
    );

    let flags = settings.flags;
    let mut attributes = Window::default_attributes()
        .with_title(settings.title.clone())
        .with_inner_size(LogicalSize::new(settings.width, settings.height))
        .with_visible(!flags.contains(WindowFlags::HIDDEN))
        .with_resizable(flags.contains(WindowFlags::RESIZABLE))
        .with_decorations(!flags.contains(WindowFlags::BORDERLESS))
        .with_maximized(flags.contains(WindowFlags::MAXIMIZED));

    if let (Some(x), Some(y)) = (settings.x, settings.y) {
        attributes = attributes.with_position(LogicalPosition::new(x, y));
    }
    if flags.contains(WindowFlags::FULLSCREEN) {
        attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    if flags.contains(WindowFlags::ALWAYS_ON_TOP) {
        attributes = attributes.with_window_level(WindowLevel::AlwaysOnTop);
    }
    attributes
}

impl NativeWindow for WinitWindow {
    fn id(&self) -> u32 {
        self.id
    }

    fn title(&self) -> String {
        self.inner.title()
    }

    fn set_title(&mut self, title: &str) {
        self.inner.set_title(title);
    }

    fn size(&self) -> (u32, u32) {
        let size = self.inner.inner_size();
        (size.width, size.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self
            .inner
            .request_inner_size(PhysicalSize::new(width, height))
            .is_none()
        {
            log::debug!("Window {}: resize to {width}x{height} is pending.", self.id);
        }
    }

    fn position(&self) -> (i32, i32) {
        match self.inner.outer_position() {
            Ok(p) => (p.x, p.y),
            Err(e) => {
                log::debug!("Window {}: position unavailable ({e}).", self.id);
                (0, 0)
            }
        }
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.inner.set_outer_position(PhysicalPosition::new(x, y));
    }

    fn set_min_size(&mut self, width: u32, height: u32) {
        self.inner
            .set_min_inner_size(Some(PhysicalSize::new(width, height)));
    }

    fn set_max_size(&mut self, width: u32, height: u32) {
        self.inner
            .set_max_inner_size(Some(PhysicalSize::new(width, height)));
    }

    fn set_bordered(&mut self, bordered: bool) {
        self.inner.set_decorations(bordered);
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        self.inner
            .set_fullscreen(fullscreen.then_some(Fullscreen::Borderless(None)));
    }

    fn set_opacity(&mut self, opacity: f32) {
        // winit only exposes an on/off transparency hint.
        self.opacity = opacity.clamp(0.0, 1.0);
        self.inner.set_transparent(self.opacity < 1.0);
    }

    fn opacity(&self) -> f32 {
        self.opacity
    }

    fn set_visible(&mut self, visible: bool) {
        self.inner.set_visible(visible);
    }
}
