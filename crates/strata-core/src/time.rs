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

//! Time sources and the per-window frame clock.
//!
//! Windows measure their own frame delta. The source of "now" is injected so
//! the runtime can be driven deterministically in tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A capability that reports the current time in seconds.
///
/// Only differences between two readings are meaningful; the epoch is
/// implementation defined.
pub trait TimeSource: Send + Sync {
    /// Returns the current time, in seconds.
    fn now_secs(&self) -> f64;
}

/// A monotonic wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Creates a clock whose epoch is the moment of construction.
    #[inline]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicClock {
    #[inline]
    fn now_secs(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same underlying time, so a test can keep one handle and
/// advance the clock seen by a window running on another thread.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock reading `start` seconds.
    pub fn new(start: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(start.to_bits())),
        }
    }

    /// Moves the clock forward by `secs`.
    pub fn advance(&self, secs: f64) {
        let mut current = self.bits.load(Ordering::Acquire);
        loop {
            let next = (f64::from_bits(current) + secs).to_bits();
            match self
                .bits
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }

    /// Sets the clock to an absolute reading.
    pub fn set(&self, secs: f64) {
        self.bits.store(secs.to_bits(), Ordering::Release);
    }
}

impl TimeSource for ManualClock {
    fn now_secs(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }
}

/// Measures the time between consecutive ticks.
#[derive(Clone)]
pub struct FrameClock {
    source: Arc<dyn TimeSource>,
    prev: f64,
}

impl FrameClock {
    /// Creates a frame clock whose first tick is measured from now.
    pub fn new(source: Arc<dyn TimeSource>) -> Self {
        let prev = source.now_secs();
        Self { source, prev }
    }

    /// Returns the seconds elapsed since the previous tick and restarts the measurement.
    pub fn tick(&mut self) -> f64 {
        let now = self.source.now_secs();
        let elapsed = now - self.prev;
        self.prev = now;
        elapsed
    }

    /// Returns the seconds elapsed since the previous tick without restarting.
    pub fn peek(&self) -> f64 {
        self.source.now_secs() - self.prev
    }

    /// The time source this clock reads from.
    pub fn source(&self) -> &Arc<dyn TimeSource> {
        &self.source
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(Arc::new(MonotonicClock::new()))
    }
}

impl std::fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameClock").field("prev", &self.prev).finish()
    }
}
