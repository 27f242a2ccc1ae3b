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

//! Provides 2D and 3D vector types with `f64` components.

use super::EPSILON;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

// --- Vec2 ---

/// A 2-dimensional vector with `f64` components.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// The x component of the vector.
    pub x: f64,
    /// The y component of the vector.
    pub y: f64,
}

impl Vec2 {
    /// A vector with all components set to `0.0`.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    /// A vector with all components set to `1.0`.
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    /// Creates a new `Vec2` with the specified components.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Creates a vector with every component set to `value`.
    #[inline]
    pub const fn splat(value: f64) -> Self {
        Self { x: value, y: value }
    }

    /// Calculates the dot product of this vector and another.
    #[inline]
    pub fn dot(&self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// Calculates the length (magnitude) of the vector.
    #[inline]
    pub fn length(&self) -> f64 {
        self.dot(*self).sqrt()
    }

    /// Rounds both components to the nearest integer pixel coordinate.
    #[inline]
    pub fn to_point(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

// --- Vec3 ---

/// A 3-dimensional vector with `f64` components.
///
/// Used for every spatial attribute of an object (position, rotation, scale, ...).
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// The x component of the vector.
    pub x: f64,
    /// The y component of the vector.
    pub y: f64,
    /// The z component of the vector.
    pub z: f64,
}

impl Vec3 {
    /// A vector with all components set to `0.0`.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    /// A vector with all components set to `1.0`.
    pub const ONE: Self = Self {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };

    /// Creates a new `Vec3` with the specified components.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Creates a vector with every component set to `value`.
    #[inline]
    pub const fn splat(value: f64) -> Self {
        Self {
            x: value,
            y: value,
            z: value,
        }
    }

    /// Calculates the dot product of this vector and another.
    #[inline]
    pub fn dot(&self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Calculates the length (magnitude) of the vector.
    #[inline]
    pub fn length(&self) -> f64 {
        self.dot(*self).sqrt()
    }

    /// Returns `true` when every component is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Drops the z component.
    #[inline]
    pub fn truncate(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

// --- Shared behavior ---

macro_rules! impl_vector {
    ($ty:ident, $len:literal, $($field:ident => $idx:literal),+) => {
        impl $ty {
            /// The number of components.
            pub const LEN: usize = $len;

            /// Returns the component at `index`.
            ///
            /// ## Errors
            /// Returns [`Error::InvalidIndex`] when `index` is out of range.
            pub fn get(&self, index: usize) -> Result<f64> {
                match index {
                    $($idx => Ok(self.$field),)+
                    _ => Err(Error::InvalidIndex { index }),
                }
            }

            /// Overwrites the component at `index`.
            ///
            /// ## Errors
            /// Returns [`Error::InvalidIndex`] when `index` is out of range.
            pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
                match index {
                    $($idx => { self.$field = value; Ok(()) })+
                    _ => Err(Error::InvalidIndex { index }),
                }
            }

            /// Component-wise comparison within [`EPSILON`].
            pub fn approx_eq(&self, other: &Self) -> bool {
                true $(&& (self.$field - other.$field).abs() <= EPSILON)+
            }
        }

        impl Add for $ty {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl AddAssign for $ty {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                $(self.$field += rhs.$field;)+
            }
        }

        impl Sub for $ty {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl SubAssign for $ty {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                $(self.$field -= rhs.$field;)+
            }
        }

        impl Mul<f64> for $ty {
            type Output = Self;
            #[inline]
            fn mul(self, rhs: f64) -> Self {
                Self { $($field: self.$field * rhs),+ }
            }
        }

        impl Mul<$ty> for f64 {
            type Output = $ty;
            #[inline]
            fn mul(self, rhs: $ty) -> $ty {
                rhs * self
            }
        }

        impl MulAssign<f64> for $ty {
            #[inline]
            fn mul_assign(&mut self, rhs: f64) {
                $(self.$field *= rhs;)+
            }
        }

        impl Div<f64> for $ty {
            type Output = Self;
            #[inline]
            fn div(self, rhs: f64) -> Self {
                Self { $($field: self.$field / rhs),+ }
            }
        }

        impl Neg for $ty {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }

        impl Index<usize> for $ty {
            type Output = f64;
            /// Panics with the same message as [`Error::InvalidIndex`].
            fn index(&self, index: usize) -> &f64 {
                match index {
                    $($idx => &self.$field,)+
                    _ => panic!("{}", Error::InvalidIndex { index }),
                }
            }
        }

        impl IndexMut<usize> for $ty {
            fn index_mut(&mut self, index: usize) -> &mut f64 {
                match index {
                    $($idx => &mut self.$field,)+
                    _ => panic!("{}", Error::InvalidIndex { index }),
                }
            }
        }
    };
}

impl_vector!(Vec2, 2, x => 0, y => 1);
impl_vector!(Vec3, 3, x => 0, y => 1, z => 2);
