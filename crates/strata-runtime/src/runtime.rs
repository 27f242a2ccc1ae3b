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

//! The orchestration loop: poll once, route per window, tear down finished windows.

use crate::config::RuntimeConfig;
use crate::error::RuntimeError;
use crate::routing::route_events;
use crate::thread::WindowThread;
use crate::window::Window;
use std::sync::Arc;
use std::time::{Duration, Instant};
use strata_core::event::EventHandlers;
use strata_core::platform::{EventSender, Platform, PlatformEvent, WindowSettings};
use strata_core::{IdGenerator, Layer, MonotonicClock, ObjectId, TimeSource};

/// Pause between iterations of [`Runtime::run`].
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Owns the platform, the root layer and every window thread.
///
/// Only the thread that owns the runtime touches the root layer; windows run
/// on their own threads and only see the events routed to them.
pub struct Runtime<P: Platform> {
    platform: P,
    config: RuntimeConfig,
    ids: IdGenerator,
    root: Layer,
    threads: Vec<WindowThread>,
    buffer: Vec<PlatformEvent>,
    time_source: Arc<dyn TimeSource>,
    quit: bool,
    shut_down: bool,
}

impl<P: Platform> Runtime<P> {
    /// Creates a runtime with an empty root layer.
    ///
    /// ## Arguments
    /// * `platform` - The backend to poll and create windows on.
    /// * `config` - Mailbox capacity and initial window settings.
    pub fn new(platform: P, config: RuntimeConfig) -> Self {
        let ids = IdGenerator::new();
        let root = Layer::with_default_handlers(&ids);
        log::info!("Runtime created on '{}' platform.", platform.name());
        Self {
            platform,
            config,
            ids,
            root,
            threads: Vec::new(),
            buffer: Vec::new(),
            time_source: Arc::new(MonotonicClock::new()),
            quit: false,
            shut_down: false,
        }
    }

    /// Makes every window created from now on read frame times from `source`.
    pub fn with_time_source(mut self, source: Arc<dyn TimeSource>) -> Self {
        self.time_source = source;
        self
    }

    /// A sender for pushing events, including window requests, from any thread.
    pub fn sender(&self) -> EventSender {
        self.platform.event_sender()
    }

    /// Asks the polling loop to open a window on its next iteration.
    ///
    /// ## Returns
    /// `true` if the request was queued.
    pub fn request_window(&self, settings: WindowSettings, handlers: Arc<dyn EventHandlers>) -> bool {
        self.sender().request_window(settings, handlers)
    }

    /// Queues a window using the configured initial settings.
    pub fn request_initial_window(&self, handlers: Arc<dyn EventHandlers>) -> bool {
        self.request_window(self.config.window.clone(), handlers)
    }

    /// Opens a window immediately and starts its thread.
    ///
    /// ## Returns
    /// * `Result<ObjectId, RuntimeError>` - The new window's object id.
    pub fn open_window(
        &mut self,
        settings: WindowSettings,
        handlers: Arc<dyn EventHandlers>,
    ) -> Result<ObjectId, RuntimeError> {
        let title = settings.title.clone();
        let window = Window::with_time_source(
            &mut self.platform,
            &self.ids,
            settings,
            handlers,
            Arc::clone(&self.time_source),
        )?;
        let thread = WindowThread::spawn(window, self.config.mailbox_capacity)?;
        let id = thread.object_id();
        let name = self.root.add_object(thread.handle(), &title);
        log::info!("Window '{name}' registered (thread '{}').", thread.name());
        self.threads.push(thread);
        Ok(id)
    }

    /// Runs one orchestration iteration.
    ///
    /// Polls the platform once, opens requested windows, tears down windows
    /// whose threads finished, and hands each remaining window the events
    /// routed to it once its framerate period has passed.
    ///
    /// ## Returns
    /// `false` once a quit was seen or no windows remain.
    pub fn run_once(&mut self) -> bool {
        if self.shut_down {
            return false;
        }

        let mut polled = Vec::new();
        self.platform.poll_events(&mut polled);
        self.buffer.clear();
        for event in polled {
            match event {
                PlatformEvent::CreateWindow(request) => {
                    let title = request.settings.title.clone();
                    if let Err(e) = self.open_window(request.settings, request.handlers) {
                        log::error!("Failed to open window '{title}': {e}");
                    }
                }
                other => self.buffer.push(other),
            }
        }

        self.reap_finished();

        let now = Instant::now();
        for thread in &mut self.threads {
            let routed = route_events(&self.buffer, thread.native_id());
            if routed.quit {
                self.quit = true;
            }
            let deliver = routed.quit || thread.is_due(now);
            thread.enqueue(routed.events, deliver, now);
        }

        !self.quit && !self.root.is_empty()
    }

    /// Runs until a quit is seen or every window has closed, then shuts down.
    pub fn run(&mut self) {
        log::info!("Entering the main loop.");
        while self.run_once() {
            std::thread::sleep(POLL_INTERVAL);
        }
        log::info!("Main loop finished.");
        self.shutdown();
    }

    /// Stops every window, joins its thread, destroys it and shuts the platform down.
    ///
    /// Windows get a final quit event first. Calling this again does nothing.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.quit = true;

        let now = Instant::now();
        for thread in &mut self.threads {
            if !thread.is_complete() {
                thread.enqueue(vec![PlatformEvent::Quit], true, now);
            }
        }
        for thread in std::mem::take(&mut self.threads) {
            self.teardown(thread);
        }
        self.platform.shutdown();
        log::info!("Runtime shut down.");
    }

    fn reap_finished(&mut self) {
        let (finished, running): (Vec<_>, Vec<_>) = std::mem::take(&mut self.threads)
            .into_iter()
            .partition(WindowThread::is_complete);
        self.threads = running;
        for thread in finished {
            self.teardown(thread);
        }
    }

    fn teardown(&mut self, thread: WindowThread) {
        let id = thread.object_id();
        thread.finish();
        if self.root.remove_object(id).is_none() {
            log::warn!("Window {id} was not registered in the root layer.");
        }
    }

    /// The layer every window is registered in.
    pub fn root_layer(&self) -> &Layer {
        &self.root
    }

    /// Number of windows whose threads have not been torn down.
    pub fn window_count(&self) -> usize {
        self.threads.len()
    }

    /// The running window threads.
    pub fn window_threads(&self) -> &[WindowThread] {
        &self.threads
    }

    /// `true` once a quit request has been routed.
    pub fn is_quit(&self) -> bool {
        self.quit
    }

    /// The id generator shared by every window.
    pub fn id_generator(&self) -> &IdGenerator {
        &self.ids
    }

    /// The configuration the runtime was created with.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// The backend.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Mutable access to the backend.
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}

impl<P: Platform> Drop for Runtime<P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
