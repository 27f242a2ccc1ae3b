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

//! The desktop backend: `winit` windows presented through `wgpu`.
//!
//! The event loop must be driven from the thread that created it, so
//! [`DesktopPlatform`] pumps it on demand: once per `poll_events` and once more
//! whenever a window has to be created through the active event loop.

mod gpu;
mod input;
mod window;

pub use gpu::{GpuAcceleration, WgpuPresenter};
pub use input::InputTracker;
pub use window::{window_attributes, WinitWindow};

use crate::software::SoftwareCanvas;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use strata_core::platform::{
    AccelerationContext, EventQueue, EventSender, NativeResources, Platform, PlatformError,
    PlatformEvent, WindowFlags, WindowSettings,
};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

/// How many pumps a window creation may take before it is reported as failed.
const CREATE_ATTEMPTS: usize = 8;

type Created = Result<Arc<Window>, String>;

#[derive(Default)]
struct DesktopState {
    pending: Option<WindowSettings>,
    created: Option<Created>,
    ids: HashMap<WindowId, u32>,
    windows: HashMap<u32, std::sync::Weak<Window>>,
    next_id: u32,
    tracker: InputTracker,
    events: Vec<PlatformEvent>,
}

impl DesktopState {
    fn create_pending(&mut self, event_loop: &ActiveEventLoop) {
        let Some(settings) = self.pending.take() else {
            return;
        };
        let result = event_loop
            .create_window(window_attributes(&settings))
            .map(Arc::new)
            .map_err(|e| e.to_string());
        if let Ok(window) = &result {
            if settings.flags.contains(WindowFlags::MINIMIZED) {
                window.set_minimized(true);
            }
            self.next_id += 1;
            self.ids.insert(window.id(), self.next_id);
            self.windows.insert(self.next_id, Arc::downgrade(window));
            log::info!(
                "Winit window created successfully (id: {:?} -> {}).",
                window.id(),
                self.next_id
            );
        }
        self.created = Some(result);
    }
}

impl ApplicationHandler for DesktopState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.create_pending(event_loop);
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.events.push(PlatformEvent::RenderTargetsReset);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        let Some(&window_id) = self.ids.get(&id) else {
            log::trace!("Ignoring event for unknown window {id:?}.");
            return;
        };
        let size = self
            .windows
            .get(&window_id)
            .and_then(std::sync::Weak::upgrade)
            .map_or((1, 1), |w| {
                let s = w.inner_size();
                (s.width, s.height)
            });
        if matches!(event, WindowEvent::Destroyed) {
            self.ids.remove(&id);
            self.windows.remove(&window_id);
        }
        let translated = self.tracker.translate(window_id, &event, size);
        self.events.extend(translated);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.create_pending(event_loop);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.events.push(PlatformEvent::AppTerminating);
    }

    fn memory_warning(&mut self, _event_loop: &ActiveEventLoop) {
        log::warn!("The system reports low memory.");
    }
}

/// A platform backed by a `winit` event loop and `wgpu` presentation.
pub struct DesktopPlatform {
    event_loop: EventLoop<()>,
    state: DesktopState,
    queue: EventQueue,
    instance: wgpu::Instance,
    exited: bool,
}

impl DesktopPlatform {
    /// Opens the connection to the display server.
    ///
    /// ## Returns
    /// * `Result<Self, PlatformError>` - The platform, or an error if no event loop can be created.
    pub fn new() -> Result<Self, PlatformError> {
        let event_loop = EventLoop::new()
            .map_err(|e| PlatformError::Backend(anyhow::anyhow!("Failed to create event loop: {e}")))?;
        log::info!("Desktop platform initialized.");
        Ok(Self {
            event_loop,
            state: DesktopState::default(),
            queue: EventQueue::new(),
            instance: wgpu::Instance::new(&wgpu::InstanceDescriptor::default()),
            exited: false,
        })
    }

    fn pump(&mut self) {
        if self.exited {
            return;
        }
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.state);
        if let PumpStatus::Exit(code) = status {
            log::info!("Event loop exited with code {code}.");
            self.exited = true;
            self.state.events.push(PlatformEvent::Quit);
        }
    }

    fn open_window(&mut self, settings: &WindowSettings) -> Result<Arc<Window>, PlatformError> {
        self.state.pending = Some(settings.clone());
        self.state.created = None;
        for _ in 0..CREATE_ATTEMPTS {
            self.pump();
            if let Some(result) = self.state.created.take() {
                return result.map_err(|reason| PlatformError::WindowCreation {
                    title: settings.title.clone(),
                    reason,
                });
            }
            if self.exited {
                break;
            }
        }
        self.state.pending = None;
        Err(PlatformError::WindowCreation {
            title: settings.title.clone(),
            reason: "the event loop never became active".to_owned(),
        })
    }
}

impl Platform for DesktopPlatform {
    fn name(&self) -> &str {
        "desktop"
    }

    fn create_window(&mut self, settings: &WindowSettings) -> Result<NativeResources, PlatformError> {
        if self.exited {
            return Err(PlatformError::ShutDown);
        }
        let handle = self.open_window(settings)?;
        let id = self
            .state
            .ids
            .get(&handle.id())
            .copied()
            .ok_or_else(|| PlatformError::WindowCreation {
                title: settings.title.clone(),
                reason: "window vanished during creation".to_owned(),
            })?;

        let presenter = WgpuPresenter::new(&self.instance, Arc::clone(&handle)).map_err(|e| {
            PlatformError::CanvasCreation {
                window_id: id,
                reason: e.to_string(),
            }
        })?;
        let acceleration = settings.flags.contains(WindowFlags::ACCELERATED).then(|| {
            Box::new(GpuAcceleration::new(presenter.adapter_name())) as Box<dyn AccelerationContext>
        });
        let size = handle.inner_size();
        let canvas = SoftwareCanvas::with_presenter(
            size.width.max(1),
            size.height.max(1),
            Box::new(presenter),
        );

        Ok(NativeResources {
            window: Box::new(WinitWindow::new(id, handle)),
            canvas: Box::new(canvas),
            acceleration,
        })
    }

    fn poll_events(&mut self, out: &mut Vec<PlatformEvent>) {
        self.pump();
        out.append(&mut self.state.events);
        self.queue.drain_into(out);
    }

    fn event_sender(&self) -> EventSender {
        self.queue.sender()
    }

    fn shutdown(&mut self) {
        self.exited = true;
        self.state.ids.clear();
        self.state.windows.clear();
        log::info!("Desktop platform shut down.");
    }
}
