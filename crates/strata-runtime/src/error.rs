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

//! Error types for the runtime crate.

use strata_core::platform::PlatformError;
use thiserror::Error;

/// Failures while loading a [`RuntimeConfig`](crate::RuntimeConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config '{path}': {source}")]
    Io {
        /// The path that was read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid RON for the configuration schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// A value parsed but is out of range.
    #[error("Invalid config value for '{field}': {reason}")]
    Invalid {
        /// The offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Errors surfaced by windows and the orchestration loop.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The platform could not provide a window, renderer or context.
    #[error("Window creation failed: {0}")]
    Platform(#[from] PlatformError),
    /// The operating system refused to start a window thread.
    #[error("Failed to spawn window thread '{name}': {source}")]
    ThreadSpawn {
        /// The thread name that was requested.
        name: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
