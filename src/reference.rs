/*
 *  reference.rs
 *
 *  citymap - every city, one pixel
 *  (c) 2020-26 Stuart Hunter
 *
 *  Reference cities - parse "city,state,x,y" x3 and resolve to correspondences
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

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufRead, Seek};

use crate::affine::{Correspondence, Point};
use crate::cities::{CitiesDb, tokenize};
use crate::error::{Error, Result};

/// Seattle, El Paso and Portland (ME) spread over a 128 x 64 chain
pub const DEFAULT_REFERENCE: &str = "Seattle,WA,10,10,El Paso,TX,60,50,Portland,ME,110,10";

const FIELDS_PER_POINT: usize = 4;

/// A named city pinned to a display pixel.
///
/// `source` is filled in when the coordinates are already known; otherwise
/// the city is looked up in the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub name: String,
    pub region: String,
    pub target: (i32, i32),
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<(f64, f64)>,
}

impl fmt::Display for ControlPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {} -> ({}, {})", self.name, self.region, self.target.0, self.target.1)
    }
}

/// Parse exactly three `name,region,x,y` groups.
pub fn parse_reference(s: &str) -> Result<[ControlPoint; 3]> {
    let tokens = tokenize(s);
    if tokens.len() != 3 * FIELDS_PER_POINT {
        return Err(Error::Parse(format!(
            "reference string needs {} fields (name,region,x,y x3), found {}",
            3 * FIELDS_PER_POINT,
            tokens.len()
        )));
    }

    let point = |i: usize| -> Result<ControlPoint> {
        let group = &tokens[i * FIELDS_PER_POINT..(i + 1) * FIELDS_PER_POINT];
        Ok(ControlPoint {
            name: group[0].trim().to_string(),
            region: group[1].trim().to_string(),
            target: (parse_pixel(&group[2])?, parse_pixel(&group[3])?),
            source: None,
        })
    };

    Ok([point(0)?, point(1)?, point(2)?])
}

fn parse_pixel(s: &str) -> Result<i32> {
    s.trim()
        .parse::<i32>()
        .map_err(|e| Error::Parse(format!("bad pixel coordinate '{}': {}", s, e)))
}

/// Turn control points into correspondences, looking up the unknown sources.
/// A missing city stops here, before any fitting.
pub fn resolve<R: BufRead + Seek>(
    db: &mut CitiesDb<R>,
    points: &[ControlPoint; 3],
) -> Result<[Correspondence; 3]> {
    Ok([
        resolve_one(db, &points[0])?,
        resolve_one(db, &points[1])?,
        resolve_one(db, &points[2])?,
    ])
}

fn resolve_one<R: BufRead + Seek>(db: &mut CitiesDb<R>, p: &ControlPoint) -> Result<Correspondence> {
    let source = match p.source {
        Some((x, y)) => {
            debug!("Reference {} uses configured source ({}, {})", p, x, y);
            Point::new(x, y)
        }
        None => {
            let record = db.find(&p.name, &p.region)?;
            Point::new(record.x, record.y)
        }
    };
    info!("Reference {} at ({:.4}, {:.4})", p, source.x, source.y);
    Ok(Correspondence::new(source, p.target))
}
