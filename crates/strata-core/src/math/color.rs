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

//! An 8-bit-per-channel RGBA color, the unit the drawing helpers work in.

use serde::{Deserialize, Serialize};

/// A color with 8-bit red, green, blue and alpha channels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// The red channel.
    pub r: u8,
    /// The green channel.
    pub g: u8,
    /// The blue channel.
    pub b: u8,
    /// The alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque mid grey.
    pub const GREY: Self = Self::rgb(128, 128, 128);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Creates a new color from all four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Returns the same color with its alpha scaled by `factor` in `[0, 1]`.
    pub fn with_alpha_scaled(self, factor: f32) -> Self {
        let a = (self.a as f32 * factor.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Blends `self` over `dst` using straight alpha ("source over").
    pub fn blend_over(self, dst: Color) -> Color {
        let sa = self.a as u32;
        let inv = 255 - sa;
        let mix = |s: u8, d: u8| ((s as u32 * sa + d as u32 * inv + 127) / 255) as u8;
        Color {
            r: mix(self.r, dst.r),
            g: mix(self.g, dst.g),
            b: mix(self.b, dst.b),
            a: (sa + (dst.a as u32 * inv + 127) / 255).min(255) as u8,
        }
    }

    /// Packs the color as `[r, g, b, a]` bytes.
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_extremes() {
        let red = Color::rgb(255, 0, 0);
        assert_eq!(red.blend_over(Color::WHITE), red);
        assert_eq!(Color::TRANSPARENT.blend_over(Color::GREY), Color::GREY);
    }

    #[test]
    fn test_half_alpha_blend() {
        let half_white = Color::WHITE.with_alpha_scaled(0.5);
        assert_eq!(half_white.a, 128);
        let out = half_white.blend_over(Color::BLACK);
        assert_eq!(out.r, 128);
        assert_eq!(out.a, 255);
    }
}
