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

//! Error types shared by the core crate.

use thiserror::Error;

/// The error type for fallible operations in `strata-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// An index outside a fixed-size vector was requested.
    #[error("Invalid index into vector: {index}")]
    InvalidIndex {
        /// The offending index.
        index: usize,
    },
    /// A Bezier path was built from curve and sample-count lists of different lengths.
    #[error("curve & sample lists for a bezier path must be the same size ({curves} != {samples})")]
    PathMismatch {
        /// Number of curves supplied.
        curves: usize,
        /// Number of sample counts supplied.
        samples: usize,
    },
}

/// A convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;
