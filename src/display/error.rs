/*
 *  display/error.rs
 *
 *  citymap - every city, one pixel
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error type for pixel sinks
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

use std::fmt;
use std::error::Error;

/// Unified error type for all sink operations
#[derive(Debug)]
pub enum DisplayError {
    /// Invalid configuration (zero sized panel, etc.)
    InvalidConfiguration(String),

    /// Invalid rotation angle
    InvalidRotation(u16),

    /// Writing the frame out failed
    Io(std::io::Error),

    /// Generic error with message
    Other(String),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::InvalidConfiguration(msg) =>
                write!(f, "Invalid configuration: {}", msg),
            DisplayError::InvalidRotation(degrees) =>
                write!(f, "Invalid rotation angle: {} (must be 0, 90, 180, or 270)", degrees),
            DisplayError::Io(err) =>
                write!(f, "Frame output error: {}", err),
            DisplayError::Other(msg) =>
                write!(f, "{}", msg),
        }
    }
}

impl Error for DisplayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DisplayError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DisplayError {
    fn from(err: std::io::Error) -> Self {
        DisplayError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_message() {
        let msg = DisplayError::InvalidRotation(45).to_string();
        assert!(msg.contains("45"));
        assert!(msg.contains("270"));
    }

    #[test]
    fn test_io_source() {
        let err = DisplayError::from(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert!(err.source().is_some());
        assert!(DisplayError::Other("x".into()).source().is_none());
    }
}
