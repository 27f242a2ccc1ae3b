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

//! One dedicated thread per window, fed through a bounded mailbox.

use crate::error::RuntimeError;
use crate::window::Window;
use flume::{Receiver, Sender, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use strata_core::platform::PlatformEvent;
use strata_core::{EntityHandle, ObjectId};

/// A batch of events handed to a window thread in one delivery.
pub type Batch = Vec<PlatformEvent>;

/// The orchestrator's record of one running window thread.
///
/// The main thread owns the sending side of the mailbox; the window thread
/// owns the receiving side and is the only writer of the completion flag.
pub struct WindowThread {
    window: Arc<Mutex<Window>>,
    object_id: ObjectId,
    native_id: u32,
    name: String,
    mailbox: Option<Sender<Batch>>,
    carry: Batch,
    period: Duration,
    last_delivery: Option<Instant>,
    complete: Arc<AtomicBool>,
    join: Option<thread::JoinHandle<()>>,
}

/// Sets the completion flag when the thread body ends, however it ends.
struct CompleteOnExit(Arc<AtomicBool>);

impl Drop for CompleteOnExit {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

fn lock_window(window: &Mutex<Window>) -> MutexGuard<'_, Window> {
    window.lock().unwrap_or_else(PoisonError::into_inner)
}

impl WindowThread {
    /// Starts a thread running `window`.
    ///
    /// ## Arguments
    /// * `window` - The window to run; it moves to the new thread behind a mutex.
    /// * `mailbox_capacity` - How many batches may wait before deliveries carry over.
    ///
    /// ## Returns
    /// * `Result<Self, RuntimeError>` - The thread record, or the spawn error.
    pub fn spawn(window: Window, mailbox_capacity: usize) -> Result<Self, RuntimeError> {
        let object_id = strata_core::Entity::id(&window);
        let native_id = window.native_id();
        let period = Duration::from_secs_f64(window.frame_period());
        let name = format!("win{object_id}");

        let window = Arc::new(Mutex::new(window));
        let (sender, receiver) = flume::bounded(mailbox_capacity.max(1));
        let complete = Arc::new(AtomicBool::new(false));

        let join = {
            let window = Arc::clone(&window);
            let complete = Arc::clone(&complete);
            thread::Builder::new()
                .name(name.clone())
                .spawn(move || run_window(&window, &receiver, complete))
                .map_err(|source| RuntimeError::ThreadSpawn {
                    name: name.clone(),
                    source,
                })?
        };
        log::info!("Window thread '{name}' started for native window {native_id}.");

        Ok(Self {
            window,
            object_id,
            native_id,
            name,
            mailbox: Some(sender),
            carry: Vec::new(),
            period,
            last_delivery: None,
            complete,
            join: Some(join),
        })
    }

    /// The window's object id.
    pub fn object_id(&self) -> ObjectId {
        self.object_id
    }

    /// The platform id used to route addressed events to this window.
    pub fn native_id(&self) -> u32 {
        self.native_id
    }

    /// The thread's name, `win{object_id}`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The window as a scene node, for registration in a parent layer.
    pub fn handle(&self) -> EntityHandle {
        let handle: EntityHandle = self.window.clone();
        handle
    }

    /// `true` once the window thread has finished.
    pub fn is_complete(&self) -> bool {
        self.complete.load(Ordering::Acquire)
    }

    /// Number of events waiting for a free mailbox slot.
    pub fn carried_over(&self) -> usize {
        self.carry.len()
    }

    /// `true` if the framerate period has passed since the last delivery.
    pub fn is_due(&self, now: Instant) -> bool {
        self.last_delivery
            .map_or(true, |last| now.saturating_duration_since(last) >= self.period)
    }

    /// Queues `events` and, if `deliver` is set, hands everything queued to the window.
    ///
    /// A delivery is sent even when nothing is queued, since the empty batch
    /// is what wakes the window for its next frame. A full mailbox never
    /// blocks: the batch stays queued and goes out with the next delivery.
    pub fn enqueue(&mut self, events: Vec<PlatformEvent>, deliver: bool, now: Instant) {
        self.carry.extend(events);
        if !deliver {
            return;
        }
        let Some(mailbox) = self.mailbox.as_ref() else {
            self.carry.clear();
            return;
        };
        let batch = std::mem::take(&mut self.carry);
        match mailbox.try_send(batch) {
            Ok(()) => {
                self.last_delivery = Some(now);
            }
            Err(TrySendError::Full(batch)) => {
                log::debug!(
                    "Mailbox of '{}' is full; carrying {} events over.",
                    self.name,
                    batch.len()
                );
                self.carry = batch;
            }
            Err(TrySendError::Disconnected(_)) => {
                log::debug!("Window thread '{}' stopped receiving.", self.name);
            }
        }
    }

    /// Closes the mailbox, waits for the thread and destroys the window.
    ///
    /// ## Returns
    /// The window's handle, for removal from its parent layer.
    pub fn finish(mut self) -> EntityHandle {
        self.mailbox = None;
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                log::error!("Window thread '{}' panicked.", self.name);
            }
        }
        strata_core::Entity::destroy(&mut *lock_window(&self.window));
        log::info!("Window thread '{}' torn down.", self.name);
        self.handle()
    }
}

impl std::fmt::Debug for WindowThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowThread")
            .field("name", &self.name)
            .field("native_id", &self.native_id)
            .field("complete", &self.is_complete())
            .field("carried_over", &self.carry.len())
            .finish()
    }
}

/// The window thread body: draw, tick, then wait for and dispatch the next batch.
fn run_window(window: &Mutex<Window>, mailbox: &Receiver<Batch>, complete: Arc<AtomicBool>) {
    let _complete = CompleteOnExit(complete);
    loop {
        let running = {
            let mut window = lock_window(window);
            window.draw_frame();
            window.tick()
        };
        if !running {
            log::debug!("Window update asked to stop.");
            break;
        }

        let Ok(batch) = mailbox.recv() else {
            log::debug!("Mailbox closed.");
            break;
        };
        let mut window = lock_window(window);
        if !batch.iter().all(|event| window.handle_event(event)) {
            log::debug!("Event handler asked to stop.");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use strata_core::event::EventHandlers;
    use strata_core::graphics::Canvas;
    use strata_core::platform::WindowSettings;
    use strata_core::{lock_entity, IdGenerator, ObjectState};
    use strata_infra::HeadlessPlatform;

    /// Blocks every render until the test releases the gate.
    struct Gated(Arc<Mutex<()>>);

    impl EventHandlers for Gated {
        fn render(&self, _obj: &ObjectState, _target: &mut dyn Canvas, _x: i32, _y: i32, _z: i32) {
            let _open = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Counts update calls.
    struct Counting(Arc<AtomicUsize>);

    impl EventHandlers for Counting {
        fn update(&self, _obj: &mut ObjectState, _elapsed: f64) -> bool {
            self.0.fetch_add(1, Ordering::AcqRel);
            true
        }
    }

    struct StopsAtOnce;

    impl EventHandlers for StopsAtOnce {
        fn update(&self, _obj: &mut ObjectState, _elapsed: f64) -> bool {
            false
        }
    }

    fn spawn(handlers: Arc<dyn EventHandlers>, capacity: usize) -> WindowThread {
        let mut platform = HeadlessPlatform::new();
        let window = Window::new(
            &mut platform,
            &IdGenerator::new(),
            WindowSettings::titled("threaded"),
            handlers,
        )
        .expect("headless window");
        WindowThread::spawn(window, capacity).expect("thread spawned")
    }

    #[test]
    fn full_mailbox_carries_events_over() {
        let gate = Arc::new(Mutex::new(()));
        let held = gate.lock().expect("gate");
        let mut thread = spawn(Arc::new(Gated(Arc::clone(&gate))), 1);
        assert_eq!(thread.name(), format!("win{}", thread.object_id()));

        let now = Instant::now();
        assert!(thread.is_due(now));
        thread.enqueue(vec![PlatformEvent::DropBegin], true, now);
        assert_eq!(thread.carried_over(), 0);
        assert!(!thread.is_due(now));

        thread.enqueue(vec![PlatformEvent::DropComplete], true, now);
        assert_eq!(thread.carried_over(), 1);

        thread.enqueue(vec![PlatformEvent::DropBegin], false, now);
        assert_eq!(thread.carried_over(), 2);

        drop(held);
        let handle = thread.finish();
        assert!(lock_entity(&handle).is_dead());
    }

    #[test]
    fn empty_deliveries_wake_the_window() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let mut worker = spawn(Arc::new(Counting(Arc::clone(&ticks))), 2);
        let deadline = Instant::now() + Duration::from_secs(5);
        while ticks.load(Ordering::Acquire) < 4 {
            assert!(Instant::now() < deadline, "idle window stopped ticking");
            worker.enqueue(Vec::new(), true, Instant::now());
            thread::sleep(Duration::from_millis(2));
        }
        assert_eq!(worker.carried_over(), 0);
        worker.finish();
    }

    #[test]
    fn stopped_thread_completes_and_drops_deliveries() {
        let mut worker = spawn(Arc::new(StopsAtOnce), 2);
        let deadline = Instant::now() + Duration::from_secs(5);
        while !worker.is_complete() {
            assert!(Instant::now() < deadline, "window thread never completed");
            thread::sleep(Duration::from_millis(1));
        }

        worker.enqueue(vec![PlatformEvent::DropBegin], true, Instant::now());
        assert_eq!(worker.carried_over(), 0);
        worker.finish();
    }
}
