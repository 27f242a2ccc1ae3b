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

//! Native window contracts and the settings a window is created from.

use super::PlatformError;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Target frame rate of a window when none is given.
pub const DEFAULT_FRAMERATE: f64 = 144.0;

bitflags! {
    /// Creation flags for a native window.
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct WindowFlags: u32 {
        /// Start fullscreen.
        const FULLSCREEN = 1 << 0;
        /// Create a hardware acceleration context alongside the window.
        const ACCELERATED = 1 << 1;
        /// Start visible.
        const SHOWN = 1 << 2;
        /// Start hidden.
        const HIDDEN = 1 << 3;
        /// No decorations.
        const BORDERLESS = 1 << 4;
        /// The user may resize the window.
        const RESIZABLE = 1 << 5;
        /// Start minimized.
        const MINIMIZED = 1 << 6;
        /// Start maximized.
        const MAXIMIZED = 1 << 7;
        /// Keep above other windows.
        const ALWAYS_ON_TOP = 1 << 8;
    }
}

bitflags! {
    /// Creation flags for a window's renderer.
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct RendererFlags: u32 {
        /// Prefer a software renderer.
        const SOFTWARE = 1 << 0;
        /// Prefer a GPU-backed renderer.
        const ACCELERATED = 1 << 1;
        /// Synchronize present with the display refresh.
        const PRESENT_VSYNC = 1 << 2;
    }
}

/// Everything needed to create a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Title bar text.
    pub title: String,
    /// Horizontal screen position; `None` lets the platform choose.
    pub x: Option<i32>,
    /// Vertical screen position; `None` lets the platform choose.
    pub y: Option<i32>,
    /// Inner width in pixels.
    pub width: u32,
    /// Inner height in pixels.
    pub height: u32,
    /// Window creation flags.
    pub flags: WindowFlags,
    /// Renderer creation flags.
    pub renderer_flags: RendererFlags,
    /// How many times per second the window is handed new events.
    pub framerate: f64,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Strata".to_string(),
            x: None,
            y: None,
            width: 1280,
            height: 720,
            flags: WindowFlags::SHOWN | WindowFlags::RESIZABLE,
            renderer_flags: RendererFlags::ACCELERATED | RendererFlags::PRESENT_VSYNC,
            framerate: DEFAULT_FRAMERATE,
        }
    }
}

impl WindowSettings {
    /// Default settings with the given title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the inner size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the screen position.
    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Replaces the window flags.
    pub fn with_flags(mut self, flags: WindowFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the event delivery rate.
    pub fn with_framerate(mut self, framerate: f64) -> Self {
        self.framerate = framerate;
        self
    }

    /// The minimum time between two event deliveries, in seconds.
    ///
    /// A non-positive or non-finite frame rate means "no limit".
    pub fn frame_period(&self) -> f64 {
        if self.framerate.is_finite() && self.framerate > 0.0 {
            1.0 / self.framerate
        } else {
            0.0
        }
    }
}

/// A native window, owned by exactly one runtime window.
pub trait NativeWindow: Send {
    /// The platform's numeric id, used to route events.
    fn id(&self) -> u32;

    /// The title bar text.
    fn title(&self) -> String;

    /// Changes the title bar text.
    fn set_title(&mut self, title: &str);

    /// Inner size in pixels.
    fn size(&self) -> (u32, u32);

    /// Requests a new inner size.
    fn resize(&mut self, width: u32, height: u32);

    /// Screen position of the top-left corner.
    fn position(&self) -> (i32, i32);

    /// Moves the window.
    fn set_position(&mut self, x: i32, y: i32);

    /// Sets the smallest size the user may resize to.
    fn set_min_size(&mut self, width: u32, height: u32);

    /// Sets the largest size the user may resize to.
    fn set_max_size(&mut self, width: u32, height: u32);

    /// Shows or hides decorations.
    fn set_bordered(&mut self, bordered: bool);

    /// Enters or leaves fullscreen.
    fn set_fullscreen(&mut self, fullscreen: bool);

    /// Sets whole-window opacity in `[0, 1]`.
    fn set_opacity(&mut self, opacity: f32);

    /// The whole-window opacity.
    fn opacity(&self) -> f32;

    /// Shows or hides the window.
    fn set_visible(&mut self, visible: bool);
}

/// A hardware acceleration context bound to a window.
pub trait AccelerationContext: Send {
    /// Makes this context current on the calling thread.
    fn make_current(&mut self) -> Result<(), PlatformError>;

    /// A human readable description (adapter name, API).
    fn label(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_period_from_framerate() {
        assert_eq!(WindowSettings::default().framerate, DEFAULT_FRAMERATE);
        assert_eq!(
            WindowSettings::default().with_framerate(50.0).frame_period(),
            0.02
        );
        assert_eq!(WindowSettings::default().with_framerate(0.0).frame_period(), 0.0);
        assert_eq!(
            WindowSettings::default()
                .with_framerate(f64::NAN)
                .frame_period(),
            0.0
        );
    }

    #[test]
    fn builder_methods_compose() {
        let settings = WindowSettings::titled("tool")
            .with_size(320, 200)
            .with_position(10, 20)
            .with_flags(WindowFlags::HIDDEN | WindowFlags::ACCELERATED);
        assert_eq!(settings.title, "tool");
        assert_eq!((settings.width, settings.height), (320, 200));
        assert_eq!((settings.x, settings.y), (Some(10), Some(20)));
        assert!(settings.flags.contains(WindowFlags::ACCELERATED));
    }
}
