/*
 *  affine.rs
 *
 *  citymap - every city, one pixel
 *  (c) 2020-26 Stuart Hunter
 *
 *  Six parameter affine map fitted from three reference correspondences
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

use log::debug;

use crate::cities::Record;
use crate::error::{Error, Result};
use crate::projection::{PixelProjection, planar};

/// Pivots smaller than this fraction of the largest coefficient count as zero
const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Solve noise allowance when snapping to a whole pixel. Kept at round-off
/// scale so ordinary fractional pixels still truncate.
const SNAP_EPSILON: f64 = 1e-9;

/// Source-space point (longitude, latitude for plate carree)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Source point paired with the pixel it must land on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correspondence {
    pub source: Point,
    pub target: (i32, i32),
}

impl Correspondence {
    pub const fn new(source: Point, target: (i32, i32)) -> Self {
        Self { source, target }
    }
}

/// `tx = a*sx + b*sy + c`, `ty = d*sx + e*sy + f`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMap {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl AffineMap {
    /// Exact fit through three correspondences.
    ///
    /// Builds the 6x6 system with rows `[sx, sy, 1, 0, 0, 0] = tx` and
    /// `[0, 0, 0, sx, sy, 1] = ty` per correspondence and solves it with
    /// partial pivoting. Collinear or repeated source points give
    /// [`Error::SingularSystem`].
    pub fn fit(correspondences: &[Correspondence; 3]) -> Result<Self> {
        let mut m = [[0.0f64; 6]; 6];
        let mut rhs = [0.0f64; 6];

        for (i, c) in correspondences.iter().enumerate() {
            let (sx, sy) = (c.source.x, c.source.y);
            m[2 * i] = [sx, sy, 1.0, 0.0, 0.0, 0.0];
            m[2 * i + 1] = [0.0, 0.0, 0.0, sx, sy, 1.0];
            rhs[2 * i] = f64::from(c.target.0);
            rhs[2 * i + 1] = f64::from(c.target.1);
        }

        let [a, b, c, d, e, f] = solve(m, rhs)?;
        if ![a, b, c, d, e, f].iter().all(|v| v.is_finite()) {
            return Err(Error::SingularSystem);
        }

        let map = Self { a, b, c, d, e, f };
        debug!("Fitted affine map {:?}", map);
        Ok(map)
    }

    /// Build from known coefficients `(a, b, c, d, e, f)`
    pub const fn from_coefficients(k: [f64; 6]) -> Self {
        Self { a: k[0], b: k[1], c: k[2], d: k[3], e: k[4], f: k[5] }
    }

    pub fn coefficients(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// Untruncated target coordinates
    pub fn apply_f64(&self, p: Point) -> (f64, f64) {
        (
            self.a * p.x + self.b * p.y + self.c,
            self.d * p.x + self.e * p.y + self.f,
        )
    }

    /// Target pixel, truncated toward zero
    pub fn apply(&self, p: Point) -> (i32, i32) {
        let (tx, ty) = self.apply_f64(p);
        (to_pixel(tx), to_pixel(ty))
    }
}

/// Truncate toward zero, except that values within [`SNAP_EPSILON`] of a whole
/// number are taken as that number.
fn to_pixel(v: f64) -> i32 {
    let nearest = v.round();
    if (v - nearest).abs() < SNAP_EPSILON {
        nearest as i32
    } else {
        v.trunc() as i32
    }
}

/// Gaussian elimination with partial pivoting
fn solve(mut m: [[f64; 6]; 6], mut rhs: [f64; 6]) -> Result<[f64; 6]> {
    const N: usize = 6;

    let scale = m.iter().flatten().fold(0.0f64, |acc, v| acc.max(v.abs()));
    let tolerance = scale * SINGULAR_TOLERANCE;

    for col in 0..N {
        let pivot_row = (col..N)
            .max_by(|&i, &j| m[i][col].abs().total_cmp(&m[j][col].abs()))
            .unwrap_or(col);
        if !(m[pivot_row][col].abs() > tolerance) {
            return Err(Error::SingularSystem);
        }
        m.swap(col, pivot_row);
        rhs.swap(col, pivot_row);

        let pivot = m[col][col];
        for row in (col + 1)..N {
            let factor = m[row][col] / pivot;
            if factor == 0.0 {
                continue;
            }
            for j in col..N {
                m[row][j] -= factor * m[col][j];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut x = [0.0f64; N];
    for i in (0..N).rev() {
        let mut sum = rhs[i];
        for j in (i + 1)..N {
            sum -= m[i][j] * x[j];
        }
        x[i] = sum / m[i][i];
    }
    Ok(x)
}

/// A record together with the pixel it projects to
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedCity {
    pub record: Record,
    pub x: i32,
    pub y: i32,
}

/// Project every record, lazily and in order. Record errors pass through.
pub fn project_all<P, I>(projection: &P, records: I) -> impl Iterator<Item = Result<PlacedCity>>
where
    P: PixelProjection + ?Sized,
    I: IntoIterator<Item = Result<Record>>,
{
    records.into_iter().map(move |record| {
        record.map(|record| {
            let (x, y) = projection.project(planar(&record));
            PlacedCity { record, x, y }
        })
    })
}
