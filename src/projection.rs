/*
 *  projection.rs
 *
 *  citymap - every city, one pixel
 *  (c) 2020-26 Stuart Hunter
 *
 *  Source to pixel projections: fitted affine map or a fixed lon/lat box
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

use serde::{Deserialize, Serialize};

use crate::affine::{AffineMap, Point};
use crate::cities::Record;
use crate::error::{Error, Result};

/// Anything that turns a planar source point into a display pixel
pub trait PixelProjection {
    fn project(&self, p: Point) -> (i32, i32);
}

impl PixelProjection for AffineMap {
    fn project(&self, p: Point) -> (i32, i32) {
        self.apply(p)
    }
}

/// Plate carree: longitude is x, latitude is y
pub fn planar(record: &Record) -> Point {
    Point::new(record.x, record.y)
}

/// Longitude/latitude window shown on the display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Contiguous United States
    pub const CONTIGUOUS_US: Bounds = Bounds {
        min_x: -124.8228,
        max_x: -69.6276,
        min_y: 26.2482,
        max_y: 49.2335,
    };

    pub fn validate(&self) -> Result<()> {
        let ok = |lo: f64, hi: f64| lo.is_finite() && hi.is_finite() && lo < hi;
        if !ok(self.min_x, self.max_x) || !ok(self.min_y, self.max_y) {
            return Err(Error::Parse(format!(
                "invalid bounds: x {}..{}, y {}..{}",
                self.min_x, self.max_x, self.min_y, self.max_y
            )));
        }
        Ok(())
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::CONTIGUOUS_US
    }
}

/// Linear stretch of [`Bounds`] over a `width` x `height` panel, north up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsMap {
    bounds: Bounds,
    width: f64,
    height: f64,
}

impl BoundsMap {
    pub fn new(bounds: Bounds, width: u32, height: u32) -> Result<Self> {
        bounds.validate()?;
        Ok(Self {
            bounds,
            width: f64::from(width),
            height: f64::from(height),
        })
    }
}

impl PixelProjection for BoundsMap {
    fn project(&self, p: Point) -> (i32, i32) {
        let b = &self.bounds;
        let x = self.width * (p.x - b.min_x) / (b.max_x - b.min_x);
        let y = self.height * (p.y - b.min_y) / (b.max_y - b.min_y);
        // flip vertical, plain truncation toward zero
        (x.trunc() as i32, (self.height - y).trunc() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_corners() {
        let map = BoundsMap::new(Bounds::CONTIGUOUS_US, 192, 128).unwrap();
        let b = Bounds::CONTIGUOUS_US;
        // north west corner is top left
        assert_eq!(map.project(Point::new(b.min_x, b.max_y)), (0, 0));
        // south east corner lands one past the last row and column
        assert_eq!(map.project(Point::new(b.max_x, b.min_y)), (192, 128));
    }

    #[test]
    fn test_bounds_midpoint() {
        let bounds = Bounds { min_x: 0.0, max_x: 10.0, min_y: 0.0, max_y: 10.0 };
        let map = BoundsMap::new(bounds, 64, 32).unwrap();
        assert_eq!(map.project(Point::new(5.0, 5.0)), (32, 16));
        assert_eq!(map.project(Point::new(2.55, 7.5)), (16, 8));
    }

    #[test]
    fn test_bounds_truncates_without_snapping() {
        let bounds = Bounds { min_x: 0.0, max_x: 10.0, min_y: 0.0, max_y: 10.0 };
        let map = BoundsMap::new(bounds, 10, 10).unwrap();
        // 10 - 4.9999995 = 5.0000005 -> 5, 4.9999995 -> 4
        assert_eq!(map.project(Point::new(4.9999995, 4.9999995)), (4, 5));
        assert_eq!(map.project(Point::new(-0.9999995, 10.0)), (0, 0));
    }

    #[test]
    fn test_bounds_rejects_empty_range() {
        let bounds = Bounds { min_x: 1.0, max_x: 1.0, min_y: 0.0, max_y: 10.0 };
        assert!(matches!(BoundsMap::new(bounds, 64, 32), Err(Error::Parse(_))));
        let inverted = Bounds { min_y: 10.0, max_y: 0.0, ..Bounds::CONTIGUOUS_US };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_planar_is_identity() {
        let rec = Record { name: "Austin".into(), region: "TX".into(), x: -97.7, y: 30.3 };
        assert_eq!(planar(&rec), Point::new(-97.7, 30.3));
    }

    #[test]
    fn test_affine_map_is_a_projection() {
        let map = AffineMap::from_coefficients([2.0, 0.0, 1.0, 0.0, 2.0, 1.0]);
        let dynamic: &dyn PixelProjection = &map;
        assert_eq!(dynamic.project(Point::new(1.0, 2.0)), (3, 5));
    }
}
