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

//! The drawing surface contract backends expose to objects.

use crate::math::Color;

/// How new pixels are combined with what is already on the surface.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Pixels are overwritten.
    #[default]
    None,
    /// Straight-alpha "source over" blending.
    Blend,
}

/// A 2D render target owned by a window.
///
/// The draw color and blend mode are sticky state, as in most immediate-mode
/// 2D APIs; helpers that change them restore the previous values.
pub trait Canvas: Send {
    /// Sets the color used by subsequent draw calls.
    fn set_draw_color(&mut self, color: Color);

    /// The current draw color.
    fn draw_color(&self) -> Color;

    /// Sets the blend mode used by subsequent draw calls.
    fn set_blend_mode(&mut self, mode: BlendMode);

    /// The current blend mode.
    fn blend_mode(&self) -> BlendMode;

    /// Fills the whole target with the draw color, ignoring the blend mode.
    fn clear(&mut self);

    /// Plots a single pixel. Out-of-bounds coordinates are ignored.
    fn draw_point(&mut self, x: i32, y: i32);

    /// Plots several pixels.
    fn draw_points(&mut self, points: &[(i32, i32)]) {
        for &(x, y) in points {
            self.draw_point(x, y);
        }
    }

    /// Draws an aliased one-pixel line (Bresenham), clipped to the target.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let Some((x0, y0, x1, y1)) = clip_segment(self.output_size(), 0, x0, y0, x1, y1) else {
            return;
        };
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.draw_point(x, y);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Fills the part of an axis-aligned rectangle that lies on the target.
    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        let (out_width, out_height) = self.output_size();
        let span = |start: i32, len: u32, limit: u32| {
            let start = i64::from(start);
            let limit = i64::from(limit);
            start.clamp(0, limit)..(start + i64::from(len)).clamp(0, limit)
        };
        for row in span(y, height, out_height) {
            for col in span(x, width, out_width) {
                self.draw_point(col as i32, row as i32);
            }
        }
    }

    /// Makes everything drawn since the last present visible.
    fn present(&mut self);

    /// The size of the target in pixels.
    fn output_size(&self) -> (u32, u32);
}

/// Clips the segment `(x0, y0)`-`(x1, y1)` to a `size` target grown by
/// `margin` pixels on every side (Liang-Barsky).
///
/// Endpoints already inside are returned unchanged. Returns `None` when the
/// segment misses the target or the target is empty.
pub fn clip_segment(
    size: (u32, u32),
    margin: i32,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
) -> Option<(i32, i32, i32, i32)> {
    let (width, height) = size;
    if width == 0 || height == 0 {
        return None;
    }
    let margin = f64::from(margin);
    let (min_x, min_y) = (-margin, -margin);
    let max_x = f64::from(width) - 1.0 + margin;
    let max_y = f64::from(height) - 1.0 + margin;

    let (fx0, fy0) = (f64::from(x0), f64::from(y0));
    let (dx, dy) = (f64::from(x1) - fx0, f64::from(y1) - fy0);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-dx, fx0 - min_x),
        (dx, max_x - fx0),
        (-dy, fy0 - min_y),
        (dy, max_y - fy0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }

    let at = |t: f64| ((fx0 + dx * t).round() as i32, (fy0 + dy * t).round() as i32);
    let (ax, ay) = if t0 > 0.0 { at(t0) } else { (x0, y0) };
    let (bx, by) = if t1 < 1.0 { at(t1) } else { (x1, y1) };
    Some((ax, ay, bx, by))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts plotted pixels on a fixed-size target.
    #[derive(Default)]
    struct Counter {
        color: Color,
        blend: BlendMode,
        plotted: usize,
        outside: usize,
    }

    impl Canvas for Counter {
        fn set_draw_color(&mut self, color: Color) {
            self.color = color;
        }
        fn draw_color(&self) -> Color {
            self.color
        }
        fn set_blend_mode(&mut self, mode: BlendMode) {
            self.blend = mode;
        }
        fn blend_mode(&self) -> BlendMode {
            self.blend
        }
        fn clear(&mut self) {}
        fn draw_point(&mut self, x: i32, y: i32) {
            self.plotted += 1;
            if !(0..32).contains(&x) || !(0..16).contains(&y) {
                self.outside += 1;
            }
        }
        fn present(&mut self) {}
        fn output_size(&self) -> (u32, u32) {
            (32, 16)
        }
    }

    #[test]
    fn inside_segments_are_untouched() {
        assert_eq!(clip_segment((32, 16), 0, 1, 2, 30, 9), Some((1, 2, 30, 9)));
    }

    #[test]
    fn segments_are_cut_at_the_edges() {
        assert_eq!(clip_segment((32, 16), 0, -10, 5, 40, 5), Some((0, 5, 31, 5)));
        assert_eq!(clip_segment((32, 16), 1, -10, 5, 40, 5), Some((-1, 5, 32, 5)));
        assert_eq!(clip_segment((32, 16), 0, 5, -100, 5, -1), None);
        assert_eq!(clip_segment((0, 16), 0, 0, 0, 1, 1), None);
    }

    #[test]
    fn far_apart_endpoints_only_walk_the_target() {
        let mut canvas = Counter::default();
        canvas.draw_line(i32::MIN, 3, i32::MAX, 3);
        assert_eq!(canvas.plotted, 32);
        assert_eq!(canvas.outside, 0);
    }

    #[test]
    fn huge_rects_fill_only_the_target() {
        let mut canvas = Counter::default();
        canvas.fill_rect(-2_000_000_000, -5, u32::MAX, 8);
        assert_eq!(canvas.plotted, 32 * 3);
        assert_eq!(canvas.outside, 0);
    }
}
