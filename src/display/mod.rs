/*
 *  display/mod.rs
 *
 *  citymap - every city, one pixel
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display output - pixel sinks, pixel mappers and colors
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

// Core trait definitions
pub mod traits;
pub mod error;
pub mod framebuffer;
pub mod factory;
pub mod color;

// Pixel mappers
pub mod remap;

// Recording sink (tests only)
#[cfg(test)]
pub mod mock;

// Re-exports for convenience
pub use traits::PixelSink;
pub use error::DisplayError;
pub use framebuffer::FrameSink;
pub use factory::{SinkFactory, BoxedSink};
pub use color::Color;
pub use remap::{Rotated, Rotation};
