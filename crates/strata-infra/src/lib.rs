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

//! # Strata Infra
//!
//! Concrete implementations of the `strata-core` platform boundary.
//!
//! * [`headless`] keeps everything in memory and is scriptable, for tests and CI.
//! * [`desktop`] opens real windows with `winit` and presents with `wgpu`.

pub mod headless;
pub mod software;

#[cfg(feature = "desktop")]
pub mod desktop;

pub use headless::{HeadlessPlatform, HeadlessWindowState, Teardown, TeardownLog};
pub use software::{FramePresenter, SoftwareCanvas};

#[cfg(feature = "desktop")]
pub use desktop::DesktopPlatform;
