/*
 *  display/factory.rs
 *
 *  citymap - every city, one pixel
 *  (c) 2020-26 Stuart Hunter
 *
 *  Build the configured pixel sink
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

use crate::config::DisplayConfig;
use crate::display::error::DisplayError;
use crate::display::framebuffer::FrameSink;
use crate::display::remap::{Rotated, Rotation};
use crate::display::traits::PixelSink;
use log::{debug, info};

/// Type alias for boxed sink trait objects
pub type BoxedSink = Box<dyn PixelSink>;

/// Panel size when none is configured - a 2 x 1 chain of 64 x 64 matrices
pub const DEFAULT_WIDTH: u32 = 128;
pub const DEFAULT_HEIGHT: u32 = 64;

/// Factory for creating sinks from configuration
pub struct SinkFactory;

impl SinkFactory {
    /// Create a framebuffer sink sized by `config`, wrapped in a pixel mapper
    /// when a rotation other than 0 is asked for.
    ///
    /// ```ignore
    /// let config = DisplayConfig {
    ///     width: Some(64),
    ///     height: Some(32),
    ///     rotate_deg: Some(90),
    ///     ..Default::default()
    /// };
    ///
    /// let sink = SinkFactory::create_from_config(&config)?;
    /// assert_eq!(sink.dimensions(), (32, 64));
    /// ```
    pub fn create_from_config(config: &DisplayConfig) -> Result<BoxedSink, DisplayError> {
        Self::validate_config(config)?;

        let width = config.width.unwrap_or(DEFAULT_WIDTH);
        let height = config.height.unwrap_or(DEFAULT_HEIGHT);
        let rotation = Rotation::from_degrees(config.rotate_deg.unwrap_or(0))?;

        let mut frame = FrameSink::new(width, height)?;
        if let Some(path) = config.output.as_ref() {
            frame = frame.with_output(path);
        }

        info!(
            "Creating {}x{} frame sink, rotation {} deg, output {}",
            width,
            height,
            rotation.degrees(),
            config.output.as_ref().map_or("none".to_string(), |p| p.display().to_string())
        );

        if rotation == Rotation::Deg0 {
            return Ok(Box::new(frame));
        }
        debug!("Pixel mapper Rotate:{}", rotation.degrees());
        Ok(Box::new(Rotated::new(frame, rotation)))
    }

    /// Validate a configuration without creating a sink
    pub fn validate_config(config: &DisplayConfig) -> Result<(), DisplayError> {
        if config.width == Some(0) || config.height == Some(0) {
            return Err(DisplayError::InvalidConfiguration(
                "display width/height must be > 0".to_string(),
            ));
        }
        if let Some(rotation) = config.rotate_deg {
            Rotation::from_degrees(rotation)?;
        }
        Ok(())
    }
}
