/*
 *  error.rs
 *
 *  citymap - every city, one pixel
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error taxonomy for dataset, reference and transform operations
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

use std::path::PathBuf;
use thiserror::Error;

use crate::display::DisplayError;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a map run. None of these are retried.
#[derive(Debug, Error)]
pub enum Error {
    /// Dataset missing or unreadable
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Data line has fewer fields than the column map needs
    #[error("malformed record at line {line}: expected at least {expected} fields, found {found}")]
    MalformedRecord { line: usize, expected: usize, found: usize },

    /// Coordinate column present but not a number
    #[error("invalid number at line {line}, column {column}: '{value}'")]
    InvalidNumber { line: usize, column: usize, value: String },

    /// Reference string or bounds could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// Control point lookup found nothing
    #[error("no record found for '{name}', '{region}'")]
    NotFound { name: String, region: String },

    /// Control points are collinear or duplicated
    #[error("singular system: reference points are collinear or duplicated")]
    SingularSystem,

    #[error("display error: {0}")]
    Display(#[from] DisplayError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_the_key() {
        let err = Error::NotFound { name: "Springfield".into(), region: "ZZ".into() };
        let msg = err.to_string();
        assert!(msg.contains("Springfield"));
        assert!(msg.contains("ZZ"));
    }

    #[test]
    fn test_malformed_record_display() {
        let err = Error::MalformedRecord { line: 7, expected: 10, found: 3 };
        let msg = err.to_string();
        assert!(msg.contains("line 7"));
        assert!(msg.contains("10"));
        assert!(msg.contains("3"));
    }

    #[test]
    fn test_display_error_converts() {
        use std::error::Error as _;
        let err = Error::from(DisplayError::InvalidRotation(45));
        assert!(matches!(err, Error::Display(DisplayError::InvalidRotation(45))));
        assert!(err.to_string().starts_with("display error:"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;
        let err = Error::io("missing.csv", std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(err.to_string().contains("missing.csv"));
        assert!(err.source().is_some());
    }
}
