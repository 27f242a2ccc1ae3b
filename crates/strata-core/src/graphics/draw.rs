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

//! Primitive drawing helpers that work on any [`Canvas`].

use super::canvas::{clip_segment, BlendMode, Canvas};
use crate::math::{Bezier, BezierPath, Color, Vec2};
use std::collections::BTreeMap;

/// Restores a canvas's color and blend mode when dropped.
struct SavedState<'a> {
    canvas: &'a mut dyn Canvas,
    color: Color,
    blend: BlendMode,
}

impl<'a> SavedState<'a> {
    fn new(canvas: &'a mut dyn Canvas) -> Self {
        let color = canvas.draw_color();
        let blend = canvas.blend_mode();
        Self {
            canvas,
            color,
            blend,
        }
    }
}

impl Drop for SavedState<'_> {
    fn drop(&mut self) {
        self.canvas.set_draw_color(self.color);
        self.canvas.set_blend_mode(self.blend);
    }
}

/// Draws an anti-aliased line.
///
/// Coverage is computed per pixel (Xiaolin Wu) and pixels are batched by
/// alpha so each coverage level costs one color change. The segment is
/// clipped to the canvas first, keeping a one-pixel border for the
/// partially covered neighbors.
pub fn draw_line_aa(canvas: &mut dyn Canvas, color: Color, x0: i32, y0: i32, x1: i32, y1: i32) {
    let Some((mut x0, mut y0, mut x1, mut y1)) =
        clip_segment(canvas.output_size(), 1, x0, y0, x1, y1)
    else {
        return;
    };
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }
    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }

    let dx = (x1 - x0) as f32;
    let dy = (y1 - y0) as f32;
    let gradient = if dx == 0.0 { 1.0 } else { dy / dx };

    let mut alpha_map: BTreeMap<u8, Vec<(i32, i32)>> = BTreeMap::new();
    let mut intersect_y = y0 as f32;
    for x in x0..=x1 {
        let base = intersect_y.floor();
        let frac = intersect_y - base;
        let (near, far) = if steep {
            ((base as i32, x), (base as i32 + 1, x))
        } else {
            ((x, base as i32), (x, base as i32 + 1))
        };
        alpha_map
            .entry((255.0 * (1.0 - frac)) as u8)
            .or_default()
            .push(near);
        alpha_map.entry((255.0 * frac) as u8).or_default().push(far);
        intersect_y += gradient;
    }

    let saved = SavedState::new(canvas);
    saved.canvas.set_blend_mode(BlendMode::Blend);
    for (alpha, points) in alpha_map.iter().filter(|(alpha, _)| **alpha > 0) {
        saved
            .canvas
            .set_draw_color(color.with_alpha_scaled(*alpha as f32 / 255.0));
        saved.canvas.draw_points(points);
    }
}

/// Draws connected anti-aliased segments through `points`. Fewer than two points draw nothing.
pub fn draw_lines(canvas: &mut dyn Canvas, color: Color, points: &[Vec2]) {
    for pair in points.windows(2) {
        let (x0, y0) = pair[0].to_point();
        let (x1, y1) = pair[1].to_point();
        draw_line_aa(canvas, color, x0, y0, x1, y1);
    }
}

/// Draws a circle outline.
///
/// Circles that fit comfortably around the canvas use the midpoint algorithm.
/// Larger ones are scanned column by column and row by row over the canvas,
/// so the work never exceeds the canvas size. Circles entirely off the
/// canvas, or enclosing it without touching it, draw nothing.
pub fn draw_circle(canvas: &mut dyn Canvas, color: Color, cx: i32, cy: i32, radius: i32) {
    if radius < 0 {
        return;
    }
    let (width, height) = canvas.output_size();
    let (w, h) = (i64::from(width), i64::from(height));
    let (cx, cy, r) = (i64::from(cx), i64::from(cy), i64::from(radius));
    if w == 0 || h == 0 || cx + r < 0 || cy + r < 0 || cx - r >= w || cy - r >= h {
        return;
    }
    let corners = [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)];
    let reach = |(x, y): (i64, i64)| ((x - cx) as f64).hypot((y - cy) as f64);
    if corners.iter().all(|&corner| reach(corner) < r as f64 - 1.0) {
        return;
    }

    let mut points = if r <= w + h {
        midpoint_circle(cx, cy, r)
    } else {
        scanned_circle(cx, cy, r, w, h)
    };
    points.retain(|&(x, y)| (0..w).contains(&x) && (0..h).contains(&y));
    points.sort_unstable();
    points.dedup();
    let points: Vec<(i32, i32)> = points
        .into_iter()
        .map(|(x, y)| (x as i32, y as i32))
        .collect();

    let saved = SavedState::new(canvas);
    saved.canvas.set_draw_color(color);
    saved.canvas.draw_points(&points);
}

fn midpoint_circle(cx: i64, cy: i64, radius: i64) -> Vec<(i64, i64)> {
    let mut points = Vec::with_capacity(radius as usize * 8 + 8);
    let (mut x, mut y, mut err) = (radius, 0, 1 - radius);
    while x >= y {
        points.extend_from_slice(&[
            (cx + x, cy + y),
            (cx + y, cy + x),
            (cx - y, cy + x),
            (cx - x, cy + y),
            (cx - x, cy - y),
            (cx - y, cy - x),
            (cx + y, cy - x),
            (cx + x, cy - y),
        ]);
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
    points
}

fn scanned_circle(cx: i64, cy: i64, radius: i64, width: i64, height: i64) -> Vec<(i64, i64)> {
    let r = radius as f64;
    let offset = |d: i64| {
        let d = d as f64;
        (d.abs() <= r).then(|| (r * r - d * d).sqrt().round() as i64)
    };
    let mut points = Vec::new();
    for x in 0..width {
        if let Some(dy) = offset(x - cx) {
            points.extend_from_slice(&[(x, cy - dy), (x, cy + dy)]);
        }
    }
    for y in 0..height {
        if let Some(dx) = offset(y - cy) {
            points.extend_from_slice(&[(cx - dx, y), (cx + dx, y)]);
        }
    }
    points
}

/// Samples `curve` and draws it as a polyline.
pub fn draw_bezier(canvas: &mut dyn Canvas, color: Color, curve: &Bezier, samples: u32) {
    let mut points = Vec::new();
    curve.sample(&mut points, samples);
    draw_lines(canvas, color, &points);
}

/// Samples every curve of `path` and draws the result as one polyline.
pub fn draw_path(canvas: &mut dyn Canvas, color: Color, path: &BezierPath) {
    let mut points = Vec::new();
    path.sample(&mut points);
    draw_lines(canvas, color, &points);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// A sparse canvas that records the last color written per pixel.
    #[derive(Default)]
    struct Recorder {
        color: Color,
        blend: BlendMode,
        pixels: HashMap<(i32, i32), Color>,
    }

    impl Canvas for Recorder {
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
        fn clear(&mut self) {
            self.pixels.clear();
        }
        fn draw_point(&mut self, x: i32, y: i32) {
            self.pixels.insert((x, y), self.color);
        }
        fn present(&mut self) {}
        fn output_size(&self) -> (u32, u32) {
            (64, 64)
        }
    }

    #[test]
    fn aa_line_restores_canvas_state() {
        let mut canvas = Recorder::default();
        canvas.set_draw_color(Color::GREY);
        draw_line_aa(&mut canvas, Color::WHITE, 0, 0, 10, 3);
        assert_eq!(canvas.draw_color(), Color::GREY);
        assert_eq!(canvas.blend_mode(), BlendMode::None);
    }

    #[test]
    fn horizontal_aa_line_is_fully_covered() {
        let mut canvas = Recorder::default();
        draw_line_aa(&mut canvas, Color::WHITE, 2, 5, 8, 5);
        for x in 2..=8 {
            assert_eq!(canvas.pixels.get(&(x, 5)), Some(&Color::WHITE));
            // the zero-coverage neighbor row is skipped
            assert!(!canvas.pixels.contains_key(&(x, 6)));
        }
    }

    #[test]
    fn steep_line_covers_every_row() {
        let mut canvas = Recorder::default();
        draw_line_aa(&mut canvas, Color::WHITE, 1, 0, 3, 12);
        for y in 0..=12 {
            assert!(canvas.pixels.keys().any(|&(_, py)| py == y), "row {y} missing");
        }
    }

    #[test]
    fn circle_points_lie_on_radius() {
        let mut canvas = Recorder::default();
        draw_circle(&mut canvas, Color::WHITE, 20, 20, 10);
        assert!(canvas.pixels.contains_key(&(30, 20)));
        assert!(canvas.pixels.contains_key(&(20, 10)));
        for &(x, y) in canvas.pixels.keys() {
            let d = (((x - 20).pow(2) + (y - 20).pow(2)) as f64).sqrt();
            assert!((d - 10.0).abs() < 1.0, "({x}, {y}) is {d} from center");
        }
    }

    #[test]
    fn far_apart_aa_endpoints_stay_near_the_canvas() {
        let mut canvas = Recorder::default();
        draw_line_aa(&mut canvas, Color::WHITE, -2_000_000_000, 0, 2_000_000_000, 1);
        assert!(!canvas.pixels.is_empty());
        for &(x, y) in canvas.pixels.keys() {
            assert!((-1..=64).contains(&x) && (-1..=64).contains(&y), "({x}, {y})");
        }
    }

    #[test]
    fn lines_that_miss_the_canvas_draw_nothing() {
        let mut canvas = Recorder::default();
        draw_line_aa(&mut canvas, Color::WHITE, 100, -50, 900, -400);
        assert!(canvas.pixels.is_empty());
    }

    #[test]
    fn off_canvas_and_enclosing_circles_draw_nothing() {
        let mut canvas = Recorder::default();
        draw_circle(&mut canvas, Color::WHITE, 5_000, 5_000, 10);
        draw_circle(&mut canvas, Color::WHITE, 32, 32, i32::MAX);
        assert!(canvas.pixels.is_empty());
    }

    #[test]
    fn huge_circle_crossing_the_canvas_is_scanned() {
        let mut canvas = Recorder::default();
        let radius = 1_000_000_000;
        draw_circle(&mut canvas, Color::WHITE, 32, 32 - radius, radius);
        assert!(canvas.pixels.contains_key(&(32, 32)));
        assert!(canvas.pixels.len() <= 64 * 4);
        for &(x, y) in canvas.pixels.keys() {
            assert!((0..64).contains(&x) && (0..64).contains(&y), "({x}, {y})");
        }
    }

    #[test]
    fn single_point_draws_no_lines() {
        let mut canvas = Recorder::default();
        draw_lines(&mut canvas, Color::WHITE, &[Vec2::new(3.0, 3.0)]);
        assert!(canvas.pixels.is_empty());
    }
}
