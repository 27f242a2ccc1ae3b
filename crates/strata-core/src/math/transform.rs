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
//! In-place transforms for sets of 2D and 3D points.
//!
//! Every operation works around a center point; pass the origin to transform
//! around `(0, 0)` / `(0, 0, 0)`. Angles are in radians.

use super::{Vec2, Vec3};

/// Moves every point by `offset`.
pub fn translate_2d(points: &mut [Vec2], offset: Vec2) {
    for point in points {
        *point += offset;
    }
}

/// Moves every point by `offset`.
pub fn translate_3d(points: &mut [Vec3], offset: Vec3) {
    for point in points {
        *point += offset;
    }
}

/// Rotates every point counter-clockwise by `angle` around `center`.
///
/// # Example
///
/// ```rust
/// use strata_core::math::transform::rotate_2d;
/// use strata_core::math::Vec2;
///
/// let mut points = [Vec2::new(2.0, 1.0)];
/// rotate_2d(&mut points, std::f64::consts::PI, Vec2::new(1.0, 1.0));
/// assert!(points[0].approx_eq(&Vec2::new(0.0, 1.0)));
/// ```
pub fn rotate_2d(points: &mut [Vec2], angle: f64, center: Vec2) {
    let (sin, cos) = angle.sin_cos();
    for point in points {
        let p = *point - center;
        *point = Vec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos) + center;
    }
}

/// Rotates every point around `center`: roll about X, then pitch about Y,
/// then yaw about Z.
pub fn rotate_3d(points: &mut [Vec3], pitch: f64, roll: f64, yaw: f64, center: Vec3) {
    let (sin_a, cos_a) = yaw.sin_cos();
    let (sin_b, cos_b) = pitch.sin_cos();
    let (sin_c, cos_c) = roll.sin_cos();

    let rows = [
        Vec3::new(
            cos_a * cos_b,
            cos_a * sin_b * sin_c - sin_a * cos_c,
            cos_a * sin_b * cos_c + sin_a * sin_c,
        ),
        Vec3::new(
            sin_a * cos_b,
            sin_a * sin_b * sin_c + cos_a * cos_c,
            sin_a * sin_b * cos_c - cos_a * sin_c,
        ),
        Vec3::new(-sin_b, cos_b * sin_c, cos_b * cos_c),
    ];

    for point in points {
        let p = *point - center;
        *point = Vec3::new(rows[0].dot(p), rows[1].dot(p), rows[2].dot(p)) + center;
    }
}

/// Scales every point's distance from `center` by `factor`.
pub fn scale_2d(points: &mut [Vec2], factor: f64, center: Vec2) {
    for point in points {
        *point = (*point - center) * factor + center;
    }
}

/// Scales every point's distance from `center` by `factor`.
pub fn scale_3d(points: &mut [Vec3], factor: f64, center: Vec3) {
    for point in points {
        *point = (*point - center) * factor + center;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_translate_moves_every_point() {
        let mut flat = [Vec2::new(0.0, 0.0), Vec2::new(1.0, -1.0)];
        translate_2d(&mut flat, Vec2::new(3.0, 2.0));
        assert_eq!(flat, [Vec2::new(3.0, 2.0), Vec2::new(4.0, 1.0)]);

        let mut deep = [Vec3::new(1.0, 1.0, 1.0)];
        translate_3d(&mut deep, Vec3::new(-1.0, 0.0, 2.0));
        assert_eq!(deep, [Vec3::new(0.0, 1.0, 3.0)]);
    }

    #[test]
    fn test_rotate_2d_quarter_turn_around_center() {
        let mut points = [Vec2::new(3.0, 1.0), Vec2::new(1.0, 1.0)];
        rotate_2d(&mut points, FRAC_PI_2, Vec2::new(1.0, 1.0));
        assert_relative_eq!(points[0].x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(points[0].y, 3.0, epsilon = 1e-12);
        // the center itself does not move
        assert_eq!(points[1], Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_rotate_3d_single_axes() {
        let mut yawed = [Vec3::new(1.0, 0.0, 0.0)];
        rotate_3d(&mut yawed, 0.0, 0.0, FRAC_PI_2, Vec3::ZERO);
        assert!(yawed[0].approx_eq(&Vec3::new(0.0, 1.0, 0.0)));

        let mut pitched = [Vec3::new(1.0, 0.0, 0.0)];
        rotate_3d(&mut pitched, FRAC_PI_2, 0.0, 0.0, Vec3::ZERO);
        assert!(pitched[0].approx_eq(&Vec3::new(0.0, 0.0, -1.0)));

        let mut rolled = [Vec3::new(0.0, 1.0, 0.0)];
        rotate_3d(&mut rolled, 0.0, FRAC_PI_2, 0.0, Vec3::ZERO);
        assert!(rolled[0].approx_eq(&Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_rotate_3d_preserves_distance_from_center() {
        let center = Vec3::new(1.0, -2.0, 0.5);
        let start = Vec3::new(4.0, 2.0, -1.0);
        let mut points = [start];
        rotate_3d(&mut points, 0.3, -1.1, 2.0, center);
        assert_relative_eq!((points[0] - center).length(), (start - center).length(), epsilon = 1e-12);
    }

    #[test]
    fn test_scale_from_center() {
        let mut flat = [Vec2::new(3.0, 3.0)];
        scale_2d(&mut flat, 2.0, Vec2::new(1.0, 1.0));
        assert_eq!(flat, [Vec2::new(5.0, 5.0)]);

        let mut deep = [Vec3::new(2.0, 4.0, 6.0)];
        scale_3d(&mut deep, 0.5, Vec3::ZERO);
        assert_eq!(deep, [Vec3::new(1.0, 2.0, 3.0)]);
    }
}
