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

//! # Strata Core
//!
//! Foundational crate containing the object model, the event-handler contract,
//! small math and drawing utilities, and the trait boundary that platform
//! backends implement.

#![warn(missing_docs)]

pub mod error;
pub mod event;
pub mod graphics;
pub mod math;
pub mod platform;
pub mod scene;
pub mod time;

pub use error::{Error, Result};
pub use event::{default_handlers, DefaultHandlers, EventHandlers, InputEvent};
pub use scene::{
    lock_entity, share, Dispatch, Entity, EntityHandle, IdGenerator, Layer, Object, ObjectId,
    ObjectState,
};
pub use time::{FrameClock, ManualClock, MonotonicClock, TimeSource};
