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

//! Splitting one polled batch into per-window batches.

use strata_core::platform::PlatformEvent;

/// The events one window should see from a polled batch.
#[derive(Debug, Default)]
pub struct Routed {
    /// Events for the window, in polled order.
    pub events: Vec<PlatformEvent>,
    /// `true` if the batch contained a quit request.
    pub quit: bool,
}

/// Filters `buffer` down to what window `window_id` should receive.
///
/// Addressed events (window and mouse) pass only when they name this window;
/// everything else passes. A quit request is included and ends the pass, so
/// nothing after it is delivered.
///
/// ## Arguments
/// * `buffer` - Everything polled this iteration, in order.
/// * `window_id` - The platform id of the receiving window.
///
/// ## Returns
/// The filtered events and whether a quit was seen.
pub fn route_events(buffer: &[PlatformEvent], window_id: u32) -> Routed {
    let mut routed = Routed::default();
    for event in buffer {
        if event.is_quit() {
            routed.events.push(event.clone());
            routed.quit = true;
            break;
        }
        match event.window_id() {
            Some(target) if target != window_id => {
                log::trace!("Event for window {target} skipped by window {window_id}.");
            }
            _ => routed.events.push(event.clone()),
        }
    }
    routed
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::event::{KeyMod, Keycode, MouseButtons, Scancode, WindowEventId};

    fn motion(window_id: u32) -> PlatformEvent {
        PlatformEvent::MouseMotion {
            window_id,
            which: 0,
            state: MouseButtons::empty(),
            x: 1,
            y: 1,
            xrel: 0,
            yrel: 0,
        }
    }

    fn key() -> PlatformEvent {
        PlatformEvent::KeyDown {
            key: Keycode::from_char('a'),
            scancode: Scancode::A,
            modifiers: KeyMod::empty(),
            repeat: false,
        }
    }

    #[test]
    fn addressed_events_reach_only_their_window() {
        let buffer = vec![motion(10), key()];
        let first = route_events(&buffer, 10);
        let second = route_events(&buffer, 20);

        assert_eq!(first.events.len(), 2);
        assert_eq!(second.events.len(), 1);
        assert!(matches!(second.events[0], PlatformEvent::KeyDown { .. }));
        assert!(!first.quit && !second.quit);
    }

    #[test]
    fn quit_is_delivered_and_ends_the_pass() {
        let buffer = vec![
            key(),
            PlatformEvent::Quit,
            PlatformEvent::Window {
                window_id: 1,
                event: WindowEventId::Shown,
                data1: 0,
                data2: 0,
            },
        ];
        let routed = route_events(&buffer, 1);
        assert!(routed.quit);
        assert_eq!(routed.events.len(), 2);
        assert!(routed.events[1].is_quit());
    }

    #[test]
    fn empty_buffer_routes_nothing() {
        let routed = route_events(&[], 3);
        assert!(routed.events.is_empty());
        assert!(!routed.quit);
    }
}
