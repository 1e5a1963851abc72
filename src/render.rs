/*
 *  render.rs
 *
 *  citymap - every city, one pixel
 *  (c) 2020-26 Stuart Hunter
 *
 *  Draw the whole dataset, then the reference pixels on top
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

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Seek};

use crate::affine::{PlacedCity, project_all};
use crate::cities::CitiesDb;
use crate::display::{Color, PixelSink};
use crate::error::Result;
use crate::projection::PixelProjection;

/// Order cities are pushed to the sink. Later pixels overwrite earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawOrder {
    /// Stream in file order, last record wins a shared pixel
    #[default]
    File,
    /// Collect then draw last to first, first record wins
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// every city
    pub background: Color,
    /// reference targets
    pub foreground: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::Blue,
            foreground: Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub palette: Palette,
    pub draw_order: DrawOrder,
    pub highlight_references: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            draw_order: DrawOrder::File,
            highlight_references: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// records sent to the sink
    pub drawn: usize,
    /// of those, how many fell outside the panel
    pub off_screen: usize,
    pub highlighted: usize,
}

/// Render every record of `db` through `projection` into `sink`.
///
/// The sink is cleared first and is not flushed; the caller flushes once the
/// whole frame is known good. Any record error aborts the render.
pub fn render_map<R, P, S>(
    db: &mut CitiesDb<R>,
    projection: &P,
    highlights: &[(i32, i32)],
    sink: &mut S,
    options: &RenderOptions,
) -> Result<RenderStats>
where
    R: BufRead + Seek,
    P: PixelProjection + ?Sized,
    S: PixelSink + ?Sized,
{
    db.reset()?;
    sink.clear();

    let mut stats = RenderStats::default();
    let city_color = options.palette.background;

    match options.draw_order {
        DrawOrder::File => {
            for placed in project_all(projection, db.records()) {
                plot(sink, &placed?, city_color, &mut stats);
            }
        }
        DrawOrder::Reverse => {
            let placed = project_all(projection, db.records()).collect::<Result<Vec<_>>>()?;
            for city in placed.iter().rev() {
                plot(sink, city, city_color, &mut stats);
            }
        }
    }

    if options.highlight_references {
        for &(x, y) in highlights {
            if !sink.contains(x, y) {
                warn!("Reference pixel ({}, {}) is outside the panel", x, y);
            }
            sink.set_color(x, y, options.palette.foreground);
            stats.highlighted += 1;
        }
    }

    info!(
        "Rendered {} cities from '{}' ({} off panel, {} references)",
        stats.drawn,
        db.source().display(),
        stats.off_screen,
        stats.highlighted
    );
    Ok(stats)
}

fn plot<S: PixelSink + ?Sized>(sink: &mut S, city: &PlacedCity, color: Color, stats: &mut RenderStats) {
    if !sink.contains(city.x, city.y) {
        debug!("{} projects off panel at ({}, {})", city.record, city.x, city.y);
        stats.off_screen += 1;
    }
    sink.set_color(city.x, city.y, color);
    stats.drawn += 1;
}
