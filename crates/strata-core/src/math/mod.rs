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

//! Provides the small set of math primitives used by the object model and the
//! drawing helpers.
//!
//! All angular values stored on objects are in **degrees**; use
//! [`degrees_to_radians`] when feeding them to trigonometric functions.

/// A small constant for floating-point comparisons.
pub const EPSILON: f64 = f32::EPSILON as f64;

pub use std::f64::consts::PI;

/// The factor to convert degrees to radians (PI / 180.0).
pub const DEG_TO_RAD: f64 = PI / 180.0;
/// The factor to convert radians to degrees (180.0 / PI).
pub const RAD_TO_DEG: f64 = 180.0 / PI;

pub mod bezier;
pub mod color;
pub mod transform;
pub mod vector;

pub use self::bezier::{Bezier, BezierPath, DEFAULT_SAMPLES, RECURSE_SAMPLING};
pub use self::color::Color;
pub use self::vector::{Vec2, Vec3};

/// Converts an angle from degrees to radians.
#[inline]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * DEG_TO_RAD
}

/// Converts an angle from radians to degrees.
#[inline]
pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * RAD_TO_DEG
}

/// Returns the point a fraction `t` of the way from `a` to `b` (unclamped).
#[inline]
pub fn midpoint(a: Vec2, b: Vec2, t: f64) -> Vec2 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_angle_conversion_round_trip() {
        assert_relative_eq!(degrees_to_radians(180.0), PI);
        assert_relative_eq!(radians_to_degrees(PI / 2.0), 90.0);
    }

    #[test]
    fn test_midpoint_is_interpolation() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, -4.0);
        assert_eq!(midpoint(a, b, 0.5), Vec2::new(5.0, -2.0));
        assert_eq!(midpoint(a, b, 0.0), a);
        assert_eq!(midpoint(a, b, 1.0), b);
    }
}
