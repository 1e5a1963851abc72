/*
 *  lib.rs
 *
 *  citymap - every city, one pixel
 *  (c) 2020-26 Stuart Hunter
 *
 *  Read a city CSV, fit an affine map through three reference cities and
 *  plot every row as one pixel on an LED matrix or framebuffer
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

pub mod error;
pub mod cities;
pub mod affine;
pub mod projection;
pub mod reference;
pub mod render;
pub mod display;
pub mod config;

pub use error::{Error, Result};
pub use cities::{CitiesDb, ColumnMap, Record, tokenize};
pub use affine::{AffineMap, Correspondence, PlacedCity, Point, project_all};
pub use projection::{Bounds, BoundsMap, PixelProjection, planar};
pub use reference::{ControlPoint, DEFAULT_REFERENCE, parse_reference, resolve};
pub use render::{DrawOrder, Palette, RenderOptions, RenderStats, render_map};
pub use display::{Color, FrameSink, PixelSink, Rotated, Rotation};
