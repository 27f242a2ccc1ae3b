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

//! End-to-end runs of the orchestration loop on the headless backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use strata_core::event::{EventHandlers, InputEvent, KeyMod, Keycode, MouseButtons, Scancode, WindowEventId};
use strata_core::platform::{PlatformEvent, WindowFlags, WindowSettings};
use strata_core::ObjectState;
use strata_infra::{HeadlessPlatform, Teardown};
use strata_runtime::{Runtime, RuntimeConfig};

type Seen = Arc<Mutex<Vec<&'static str>>>;

/// Records the kind of every event it receives; vetoes one key if asked.
struct Recorder {
    seen: Seen,
    veto: Option<Keycode>,
    stop_updating: bool,
}

impl EventHandlers for Recorder {
    fn update(&self, _obj: &mut ObjectState, _elapsed: f64) -> bool {
        !self.stop_updating
    }

    fn dispatch(&self, _obj: &mut ObjectState, event: &InputEvent) -> bool {
        self.seen.lock().expect("seen").push(event.kind());
        !matches!(event, InputEvent::KeyDown { key, .. } if Some(*key) == self.veto)
    }
}

/// Counts update calls and nothing else.
struct Ticker(Arc<AtomicUsize>);

impl EventHandlers for Ticker {
    fn update(&self, _obj: &mut ObjectState, _elapsed: f64) -> bool {
        self.0.fetch_add(1, Ordering::AcqRel);
        true
    }
}

fn recorder(seen: &Seen) -> Arc<dyn EventHandlers> {
    Arc::new(Recorder {
        seen: Arc::clone(seen),
        veto: None,
        stop_updating: false,
    })
}

fn runtime(ids: &[u32]) -> Runtime<HeadlessPlatform> {
    let platform = HeadlessPlatform::new().with_window_ids(ids.iter().copied());
    Runtime::new(platform, RuntimeConfig::default())
}

fn settings(title: &str) -> WindowSettings {
    WindowSettings::titled(title).with_size(64, 48)
}

fn key(key: Keycode, scancode: Scancode) -> PlatformEvent {
    PlatformEvent::KeyDown {
        key,
        scancode,
        modifiers: KeyMod::empty(),
        repeat: false,
    }
}

/// Keeps iterating the loop until `done` holds, failing after a few seconds.
fn run_until(rt: &mut Runtime<HeadlessPlatform>, mut done: impl FnMut(&Runtime<HeadlessPlatform>) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done(rt) {
        assert!(Instant::now() < deadline, "condition not reached in time");
        rt.run_once();
        thread::sleep(Duration::from_millis(2));
    }
}

fn count(seen: &Seen) -> usize {
    seen.lock().expect("seen").len()
}

#[test]
fn mouse_motion_reaches_only_its_window_and_keys_reach_both() {
    let mut rt = runtime(&[10, 20]);
    let (first, second) = (Seen::default(), Seen::default());
    rt.open_window(settings("W1"), recorder(&first)).expect("W1");
    rt.open_window(settings("W2"), recorder(&second)).expect("W2");

    rt.platform_mut().inject(PlatformEvent::MouseMotion {
        window_id: 10,
        which: 0,
        state: MouseButtons::empty(),
        x: 5,
        y: 5,
        xrel: 1,
        yrel: 1,
    });
    rt.platform_mut().inject(key(Keycode::from_char('a'), Scancode::A));
    assert!(rt.run_once());

    run_until(&mut rt, |_| count(&first) >= 2 && count(&second) >= 1);
    assert_eq!(*first.lock().expect("seen"), vec!["mouse_motion", "key_down"]);
    assert_eq!(*second.lock().expect("seen"), vec!["key_down"]);
}

#[test]
fn a_window_without_input_keeps_ticking() {
    let mut rt = runtime(&[10]);
    let ticks = Arc::new(AtomicUsize::new(0));
    rt.open_window(
        settings("idle").with_framerate(500.0),
        Arc::new(Ticker(Arc::clone(&ticks))),
    )
    .expect("idle window");

    run_until(&mut rt, |_| ticks.load(Ordering::Acquire) >= 10);
    assert_eq!(rt.window_count(), 1);
}

#[test]
fn close_request_tears_down_only_that_window() {
    let mut rt = runtime(&[10, 20]);
    let log = rt.platform().teardown_log();
    rt.open_window(settings("W1"), recorder(&Seen::default())).expect("W1");
    rt.open_window(settings("W2"), recorder(&Seen::default())).expect("W2");
    assert_eq!(rt.root_layer().num_objects(), 2);

    rt.platform_mut().inject(PlatformEvent::Window {
        window_id: 10,
        event: WindowEventId::Close,
        data1: 0,
        data2: 0,
    });
    run_until(&mut rt, |rt| rt.window_count() == 1);

    assert_eq!(rt.root_layer().num_objects(), 1);
    assert!(rt.root_layer().get_object_by_name("W2").is_some());
    assert_eq!(
        *log.lock().expect("log"),
        vec![Teardown::Renderer(10), Teardown::Window(10)]
    );
    assert!(rt.run_once());
}

#[test]
fn quit_ends_the_loop_and_releases_every_window() {
    let mut rt = runtime(&[10, 20]);
    let log = rt.platform().teardown_log();
    rt.open_window(
        settings("accelerated").with_flags(WindowFlags::SHOWN | WindowFlags::ACCELERATED),
        recorder(&Seen::default()),
    )
    .expect("W1");
    rt.open_window(settings("plain"), recorder(&Seen::default())).expect("W2");

    rt.platform_mut().inject(PlatformEvent::Quit);
    assert!(!rt.run_once());
    assert!(rt.is_quit());

    rt.shutdown();
    assert_eq!(rt.window_count(), 0);
    assert!(rt.root_layer().is_empty());

    let log = log.lock().expect("log");
    let of = |id: u32| -> Vec<Teardown> {
        log.iter()
            .copied()
            .filter(|t| matches!(t, Teardown::Acceleration(i) | Teardown::Renderer(i) | Teardown::Window(i) if *i == id))
            .collect()
    };
    assert_eq!(
        of(10),
        vec![Teardown::Acceleration(10), Teardown::Renderer(10), Teardown::Window(10)]
    );
    assert_eq!(of(20), vec![Teardown::Renderer(20), Teardown::Window(20)]);
}

#[test]
fn window_requests_from_other_threads_are_opened_by_the_loop() {
    let mut rt = runtime(&[]);
    let sender = rt.sender();
    thread::spawn(move || {
        assert!(sender.request_window(settings("remote"), strata_core::default_handlers()));
    })
    .join()
    .expect("requesting thread panicked");

    assert!(rt.run_once());
    assert_eq!(rt.window_count(), 1);
    assert!(rt.root_layer().get_object_by_name("remote").is_some());
    assert_eq!(rt.window_threads()[0].name(), format!("win{}", rt.window_threads()[0].object_id()));
}

#[test]
fn the_initial_window_is_opened_from_the_configured_settings() {
    let config = RuntimeConfig {
        window: settings("from config").with_framerate(30.0),
        ..RuntimeConfig::default()
    };
    let platform = HeadlessPlatform::new().with_window_ids([7]);
    let mut rt = Runtime::new(platform, config);

    assert!(rt.request_initial_window(strata_core::default_handlers()));
    assert_eq!(rt.window_count(), 0);
    assert!(rt.run_once());

    assert_eq!(rt.window_count(), 1);
    assert_eq!(rt.window_threads()[0].native_id(), 7);
    assert!(rt.root_layer().get_object_by_name("from config").is_some());
    let state = rt.platform().window_state(7).expect("headless window state");
    assert_eq!(state.size, (64, 48));
}

#[test]
fn failed_creation_is_logged_and_not_registered() {
    let mut rt = runtime(&[]);
    rt.platform_mut().fail_next_window("no display");
    assert!(rt.request_window(settings("broken"), strata_core::default_handlers()));

    assert!(!rt.run_once());
    assert_eq!(rt.window_count(), 0);
    assert!(rt.root_layer().is_empty());
}

#[test]
fn a_veto_stops_only_the_vetoing_window() {
    let mut rt = runtime(&[10, 20]);
    let stays = Seen::default();
    rt.open_window(
        settings("vetoes"),
        Arc::new(Recorder {
            seen: Seen::default(),
            veto: Some(Keycode::ESCAPE),
            stop_updating: false,
        }),
    )
    .expect("W1");
    rt.open_window(settings("stays"), recorder(&stays)).expect("W2");

    rt.platform_mut().inject(key(Keycode::ESCAPE, Scancode::ESCAPE));
    run_until(&mut rt, |rt| rt.window_count() == 1);
    assert!(rt.root_layer().get_object_by_name("stays").is_some());
    run_until(&mut rt, |_| count(&stays) >= 1);
}

#[test]
fn run_returns_once_every_window_has_stopped() {
    let mut rt = runtime(&[]);
    let done = Arc::new(Recorder {
        seen: Seen::default(),
        veto: None,
        stop_updating: true,
    });
    rt.request_window(settings("one-shot"), done.clone());
    rt.request_window(settings("one-shot"), done);

    rt.run();
    assert!(rt.root_layer().is_empty());
    assert_eq!(rt.platform().created_windows().len(), 2);
}

#[test]
fn an_empty_runtime_stops_immediately() {
    let mut rt = runtime(&[]);
    assert!(!rt.run_once());
    rt.shutdown();
    rt.shutdown();
}
