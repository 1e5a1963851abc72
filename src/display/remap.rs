/*
 *  display/remap.rs
 *
 *  citymap - every city, one pixel
 *  (c) 2020-26 Stuart Hunter
 *
 *  Pixel mapper - rotate logical coordinates onto a physical panel
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use crate::display::error::DisplayError;
use crate::display::traits::PixelSink;

/// Clockwise panel rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn from_degrees(degrees: u16) -> Result<Self, DisplayError> {
        match degrees {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(DisplayError::InvalidRotation(other)),
        }
    }

    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    fn swaps_axes(&self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

/// Wraps a sink and rotates every coordinate before it reaches the panel.
///
/// `dimensions()` reports the logical (rotated) size, so a 64x32 panel at
/// 90 degrees draws as 32x64.
pub struct Rotated<S> {
    inner: S,
    rotation: Rotation,
}

impl<S: PixelSink> Rotated<S> {
    pub fn new(inner: S, rotation: Rotation) -> Self {
        Self { inner, rotation }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Logical to physical. Inputs outside the logical area stay outside.
    fn map(&self, x: i32, y: i32) -> (i32, i32) {
        let (w, h) = self.inner.dimensions();
        let (w, h) = (w as i32, h as i32);
        match self.rotation {
            Rotation::Deg0 => (x, y),
            Rotation::Deg90 => (w - 1 - y, x),
            Rotation::Deg180 => (w - 1 - x, h - 1 - y),
            Rotation::Deg270 => (y, h - 1 - x),
        }
    }
}

impl<S: PixelSink> PixelSink for Rotated<S> {
    fn dimensions(&self) -> (u32, u32) {
        let (w, h) = self.inner.dimensions();
        if self.rotation.swaps_axes() { (h, w) } else { (w, h) }
    }

    fn set_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8) {
        if !self.contains(x, y) {
            return;
        }
        let (px, py) = self.map(x, y);
        self.inner.set_pixel(px, py, r, g, b);
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.inner.flush()
    }
}
