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

//! A CPU framebuffer implementing the core [`Canvas`] contract.

use strata_core::graphics::{BlendMode, Canvas};
use strata_core::math::Color;

/// Receives finished frames from a [`SoftwareCanvas`].
pub trait FramePresenter: Send {
    /// Shows a frame of tightly packed RGBA8 rows.
    fn present(&mut self, width: u32, height: u32, rgba: &[u8]);

    /// Called when the target surface changed size.
    fn resize(&mut self, _width: u32, _height: u32) {}
}

/// An RGBA8 framebuffer with immediate-mode drawing state.
pub struct SoftwareCanvas {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    color: Color,
    blend: BlendMode,
    presenter: Option<Box<dyn FramePresenter>>,
    presents: u64,
    clear_color: Color,
}

impl SoftwareCanvas {
    /// Creates a black canvas of the given size that presents nowhere.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width as usize * height as usize],
            color: Color::BLACK,
            blend: BlendMode::None,
            presenter: None,
            presents: 0,
            clear_color: Color::BLACK,
        }
    }

    /// Creates a canvas that hands every presented frame to `presenter`.
    pub fn with_presenter(width: u32, height: u32, presenter: Box<dyn FramePresenter>) -> Self {
        Self {
            presenter: Some(presenter),
            ..Self::new(width, height)
        }
    }

    /// Reallocates the framebuffer, discarding its contents.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![self.clear_color; width as usize * height as usize];
        if let Some(presenter) = self.presenter.as_mut() {
            presenter.resize(width, height);
        }
    }

    /// The color at `(x, y)`, or `None` outside the framebuffer.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// The framebuffer as packed RGBA8 rows.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_bytes()).collect()
    }

    /// How many frames have been presented.
    pub fn present_count(&self) -> u64 {
        self.presents
    }

    /// The color of the last clear.
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

impl Canvas for SoftwareCanvas {
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
        self.clear_color = self.color;
        self.pixels.fill(self.color);
    }

    fn draw_point(&mut self, x: i32, y: i32) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        self.pixels[i] = match self.blend {
            BlendMode::None => self.color,
            BlendMode::Blend => self.color.blend_over(self.pixels[i]),
        };
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x.saturating_add(width as i32)).min(self.width as i32);
        let y1 = (y.saturating_add(height as i32)).min(self.height as i32);
        for row in y0..y1 {
            for col in x0..x1 {
                self.draw_point(col, row);
            }
        }
    }

    fn present(&mut self) {
        self.presents += 1;
        if self.presenter.is_none() {
            return;
        }
        let frame = self.to_rgba_bytes();
        if let Some(presenter) = self.presenter.as_mut() {
            presenter.present(self.width, self.height, &frame);
        }
    }

    fn output_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Capture(Arc<Mutex<Vec<(u32, u32, usize)>>>);

    impl FramePresenter for Capture {
        fn present(&mut self, width: u32, height: u32, rgba: &[u8]) {
            self.0.lock().expect("capture").push((width, height, rgba.len()));
        }
    }

    #[test]
    fn clear_and_plot() {
        let mut canvas = SoftwareCanvas::new(4, 3);
        canvas.set_draw_color(Color::GREY);
        canvas.clear();
        canvas.set_draw_color(Color::WHITE);
        canvas.draw_point(1, 2);
        canvas.draw_point(-1, 0);
        canvas.draw_point(4, 0);

        assert_eq!(canvas.pixel(1, 2), Some(Color::WHITE));
        assert_eq!(canvas.pixel(0, 0), Some(Color::GREY));
        assert_eq!(canvas.pixel(4, 0), None);
        assert_eq!(canvas.clear_color(), Color::GREY);
    }

    #[test]
    fn blend_mode_mixes_with_background() {
        let mut canvas = SoftwareCanvas::new(2, 2);
        canvas.set_draw_color(Color::BLACK);
        canvas.clear();
        canvas.set_blend_mode(BlendMode::Blend);
        canvas.set_draw_color(Color::WHITE.with_alpha_scaled(0.5));
        canvas.draw_point(0, 0);
        assert_eq!(canvas.pixel(0, 0).map(|c| c.r), Some(128));
    }

    #[test]
    fn fill_rect_is_clipped() {
        let mut canvas = SoftwareCanvas::new(3, 3);
        canvas.set_draw_color(Color::WHITE);
        canvas.fill_rect(-5, 1, 100, 1);
        assert!((0..3).all(|x| canvas.pixel(x, 1) == Some(Color::WHITE)));
        assert_eq!(canvas.pixel(0, 0), Some(Color::BLACK));
    }

    #[test]
    fn present_forwards_packed_frames() {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let mut canvas = SoftwareCanvas::with_presenter(5, 2, Box::new(Capture(frames.clone())));
        canvas.present();
        canvas.resize(2, 2);
        canvas.present();

        assert_eq!(canvas.present_count(), 2);
        assert_eq!(*frames.lock().expect("frames"), vec![(5, 2, 40), (2, 2, 16)]);
    }
}
