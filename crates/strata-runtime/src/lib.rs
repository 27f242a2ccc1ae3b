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

//! # Strata Runtime
//!
//! Windows that own a native window and renderer, the dedicated thread each
//! window runs on, and the single polling loop that routes platform events to
//! those threads.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod routing;
pub mod runtime;
pub mod thread;
pub mod window;

pub use config::RuntimeConfig;
pub use error::{ConfigError, RuntimeError};
pub use routing::{route_events, Routed};
pub use runtime::Runtime;
pub use thread::WindowThread;
pub use window::Window;
