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

//! The event model: input codes, the dispatchable event set and the handler
//! contract objects are driven through.

pub mod codes;
pub mod handlers;
pub mod input;

pub use codes::{
    KeyMod, Keycode, MouseButton, MouseButtons, Scancode, UserPayload, WheelDirection,
    WindowEventId,
};
pub use handlers::{default_handlers, DefaultHandlers, EventHandlers};
pub use input::InputEvent;
