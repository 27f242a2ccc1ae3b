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

// Strata Sandbox
// Opens one demo window: a Bezier path, a drifting circle, Escape to close.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use strata_core::event::{EventHandlers, KeyMod, Keycode, Scancode};
use strata_core::graphics::{draw_circle, draw_path, Canvas};
use strata_core::math::{Bezier, BezierPath, Color, Vec2, DEFAULT_SAMPLES};
use strata_core::{lock_entity, share, Object, ObjectState};
use strata_infra::DesktopPlatform;
use strata_runtime::{Runtime, RuntimeConfig, Window};

/// The window's own behavior: draws a path and closes on Escape.
struct SandboxWindow {
    path: BezierPath,
}

impl SandboxWindow {
    fn new() -> Self {
        let mut path = BezierPath::new();
        path.add_curve(
            Bezier::new(
                Vec2::new(80.0, 400.0),
                Vec2::new(200.0, 80.0),
                Vec2::new(360.0, 520.0),
                Vec2::new(480.0, 240.0),
            ),
            DEFAULT_SAMPLES,
        );
        path.add_curve(
            Bezier::new(
                Vec2::new(480.0, 240.0),
                Vec2::new(560.0, 80.0),
                Vec2::new(680.0, 120.0),
                Vec2::new(720.0, 400.0),
            ),
            DEFAULT_SAMPLES,
        );
        Self { path }
    }
}

impl EventHandlers for SandboxWindow {
    fn render(&self, _obj: &ObjectState, target: &mut dyn Canvas, _ox: i32, _oy: i32, _oz: i32) {
        draw_path(target, Color::WHITE, &self.path);
    }

    fn key_down(
        &self,
        _obj: &mut ObjectState,
        key: Keycode,
        _scancode: Scancode,
        _modifiers: KeyMod,
        _repeat: bool,
    ) -> bool {
        if key == Keycode::ESCAPE {
            log::info!("Escape pressed, closing the sandbox window.");
            return false;
        }
        true
    }
}

/// A circle drifting to the right, wrapping at the window edge.
struct Drifter;

impl EventHandlers for Drifter {
    fn render(&self, obj: &ObjectState, target: &mut dyn Canvas, ox: i32, oy: i32, _oz: i32) {
        let x = ox.saturating_add(obj.position.x as i32);
        let y = oy.saturating_add(obj.position.y as i32);
        draw_circle(target, Color::rgb(255, 160, 0), x, y, 24);
    }

    fn update(&self, obj: &mut ObjectState, _elapsed: f64) -> bool {
        if obj.position.x > 800.0 {
            obj.position.x = 0.0;
        }
        true
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = RuntimeConfig::load_or_default(config_path.as_deref())
        .context("Failed to load the sandbox configuration")?;

    Builder::from_env(Env::default().default_filter_or(config.log_filter.as_str()))
        .filter_module("wgpu_hal", log::LevelFilter::Error)
        .init();

    let platform = DesktopPlatform::new().context("Failed to initialize the desktop platform")?;
    let mut runtime = Runtime::new(platform, config.clone());

    if !runtime.request_initial_window(Arc::new(SandboxWindow::new())) {
        bail!("The event queue refused the initial window request");
    }
    // The request is served by the first loop iteration.
    if !runtime.run_once() || runtime.window_count() == 0 {
        bail!("Failed to open the sandbox window");
    }

    let ids = runtime.id_generator().clone();
    let window_id = runtime.window_threads()[0].object_id();
    if let Some(handle) = runtime.root_layer().get_object(window_id) {
        let mut entity = lock_entity(&handle);
        if let Some(window) = entity.as_any_mut().downcast_mut::<Window>() {
            let drifter = share(Object::new(&ids, Arc::new(Drifter)));
            {
                let mut drifter = lock_entity(&drifter);
                let state = drifter.state_mut();
                state.position.y = 300.0;
                state.move_vector.x = 0.001;
            }
            window.layer_mut().add_object(drifter, "drifter");
        }
    }

    runtime.run();
    Ok(())
}
