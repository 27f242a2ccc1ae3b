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

//! The boundary to the native windowing, rendering and input layer.
//!
//! Core code only sees the traits defined here; concrete backends live in
//! `strata-infra`.

pub mod event;
pub mod sender;
pub mod window;

pub use event::{PlatformEvent, WindowRequest};
pub use sender::{EventQueue, EventSender};
pub use window::{
    AccelerationContext, NativeWindow, RendererFlags, WindowFlags, WindowSettings,
    DEFAULT_FRAMERATE,
};

use crate::graphics::Canvas;
use thiserror::Error;

/// Errors reported by platform backends.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The native window could not be created.
    #[error("failed to create window '{title}': {reason}")]
    WindowCreation {
        /// Title of the requested window.
        title: String,
        /// Backend supplied reason.
        reason: String,
    },
    /// The window was created but its renderer could not be.
    #[error("failed to create renderer for window {window_id}: {reason}")]
    CanvasCreation {
        /// Id of the window the renderer was for.
        window_id: u32,
        /// Backend supplied reason.
        reason: String,
    },
    /// A hardware acceleration context was requested and is not available.
    #[error("acceleration context unavailable: {0}")]
    AccelerationUnavailable(String),
    /// The backend has been shut down.
    #[error("platform backend is shut down")]
    ShutDown,
    /// Any other backend failure.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// The native objects backing one window.
///
/// Owners must release them as acceleration context, then renderer, then window.
pub struct NativeResources {
    /// The native window.
    pub window: Box<dyn NativeWindow>,
    /// The window's renderer.
    pub canvas: Box<dyn Canvas>,
    /// The optional acceleration context.
    pub acceleration: Option<Box<dyn AccelerationContext>>,
}

/// A windowing and input backend.
///
/// A platform is owned by the thread that polls it; window creation and
/// polling both happen there. Other threads talk to it through an
/// [`EventSender`].
pub trait Platform {
    /// A short backend name for logs.
    fn name(&self) -> &str;

    /// Creates a native window with its renderer (and acceleration context
    /// when [`WindowFlags::ACCELERATED`] is set).
    ///
    /// ## Errors
    /// Returns a [`PlatformError`] if any of the native objects cannot be
    /// created; nothing is leaked in that case.
    fn create_window(&mut self, settings: &WindowSettings) -> Result<NativeResources, PlatformError>;

    /// Appends every pending event to `out` without blocking.
    fn poll_events(&mut self, out: &mut Vec<PlatformEvent>);

    /// Returns a handle other threads can push custom events through.
    fn event_sender(&self) -> EventSender;

    /// Releases the backend. Further calls are not expected to succeed.
    fn shutdown(&mut self);
}
