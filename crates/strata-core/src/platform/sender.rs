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

//! Cross-thread injection of custom platform events.

use super::event::{PlatformEvent, WindowRequest};
use super::window::WindowSettings;
use crate::event::{EventHandlers, UserPayload};
use std::sync::Arc;

/// The cross-thread injection queue every backend drains during polling.
///
/// Anything sent through an [`EventSender`] shows up in the backend's next
/// poll, after the native events of that poll.
#[derive(Debug)]
pub struct EventQueue {
    sender: flume::Sender<PlatformEvent>,
    receiver: flume::Receiver<PlatformEvent>,
}

impl EventQueue {
    /// Creates a new queue with an unbounded channel.
    ///
    /// ## Returns
    /// A new, empty queue.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        log::debug!("Platform event queue initialized.");
        Self { sender, receiver }
    }

    /// Returns a sender that pushes into this queue from any thread.
    pub fn sender(&self) -> EventSender {
        EventSender {
            inner: self.sender.clone(),
        }
    }

    /// Moves every queued event into `out`, in send order.
    ///
    /// ## Arguments
    /// * `out` - The buffer to append to.
    pub fn drain_into(&self, out: &mut Vec<PlatformEvent>) {
        out.extend(self.receiver.try_iter());
    }

    /// Number of events waiting.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// `true` if nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// A cloneable, thread-safe handle for pushing custom events to the platform.
#[derive(Debug, Clone)]
pub struct EventSender {
    inner: flume::Sender<PlatformEvent>,
}

impl EventSender {
    /// Pushes an event, logging an error if the platform is gone.
    ///
    /// ## Returns
    /// `true` if the event was queued.
    pub fn push(&self, event: PlatformEvent) -> bool {
        log::trace!("Pushing a custom platform event.");
        if let Err(e) = self.inner.send(event) {
            log::error!("Failed to push platform event: {e}. Platform likely shut down.");
            return false;
        }
        true
    }

    /// Asks the polling thread to open a new window.
    pub fn request_window(&self, settings: WindowSettings, handlers: Arc<dyn EventHandlers>) -> bool {
        self.push(PlatformEvent::CreateWindow(WindowRequest { settings, handlers }))
    }

    /// Broadcasts an application-defined event to every window.
    pub fn user_event(
        &self,
        code: i32,
        data1: Option<UserPayload>,
        data2: Option<UserPayload>,
    ) -> bool {
        self.push(PlatformEvent::User { code, data1, data2 })
    }

    /// Asks the application to quit.
    pub fn quit(&self) -> bool {
        self.push(PlatformEvent::Quit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::default_handlers;
    use std::thread;

    #[test]
    fn events_arrive_in_send_order() {
        let queue = EventQueue::new();
        let sender = queue.sender();
        assert!(sender.user_event(1, None, None));
        assert!(sender.request_window(WindowSettings::titled("second"), default_handlers()));
        assert!(sender.quit());

        let mut out = Vec::new();
        queue.drain_into(&mut out);
        assert_eq!(out.len(), 3);
        assert!(matches!(out[0], PlatformEvent::User { code: 1, .. }));
        match &out[1] {
            PlatformEvent::CreateWindow(request) => assert_eq!(request.settings.title, "second"),
            other => panic!("unexpected event {other:?}"),
        }
        assert!(out[2].is_quit());
        assert!(queue.is_empty());
    }

    #[test]
    fn send_from_thread() {
        let queue = EventQueue::new();
        let sender = queue.sender();
        thread::spawn(move || {
            sender.quit();
        })
        .join()
        .expect("sender thread panicked");

        let mut out = Vec::new();
        queue.drain_into(&mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn push_after_shutdown_reports_failure() {
        let queue = EventQueue::new();
        let sender = queue.sender();
        drop(queue);
        assert!(!sender.quit());
    }
}
