/*
 *  display/traits.rs
 *
 *  citymap - every city, one pixel
 *  (c) 2020-26 Stuart Hunter
 *
 *  The pixel sink the map is drawn into
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

use crate::display::color::Color;
use crate::display::error::DisplayError;

/// Minimal display abstraction - every output surface implements this
///
/// Mirrors what an LED matrix canvas offers: set one pixel, clear everything.
/// Pixels outside `dimensions()` are silently ignored by the sink; callers do
/// not need to clip.
pub trait PixelSink {
    /// Addressable area as (width, height)
    fn dimensions(&self) -> (u32, u32);

    /// Set one pixel. Out of range coordinates are ignored.
    fn set_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8);

    /// Blank the whole surface
    fn clear(&mut self);

    /// Push buffered pixels to the device. Immediate sinks need not override.
    fn flush(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    /// Whether (x, y) is addressable
    fn contains(&self, x: i32, y: i32) -> bool {
        let (w, h) = self.dimensions();
        x >= 0 && y >= 0 && (x as i64) < i64::from(w) && (y as i64) < i64::from(h)
    }

    /// Set one pixel from a palette color
    fn set_color(&mut self, x: i32, y: i32, color: Color) {
        let (r, g, b) = color.to_rgb();
        self.set_pixel(x, y, r, g, b);
    }
}

impl<S: PixelSink + ?Sized> PixelSink for Box<S> {
    fn dimensions(&self) -> (u32, u32) {
        (**self).dimensions()
    }

    fn set_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8) {
        (**self).set_pixel(x, y, r, g, b)
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        (**self).flush()
    }
}
