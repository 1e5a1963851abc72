/*
 *  main.rs
 *
 *  citymap - every city, one pixel
 *  (c) 2020-26 Stuart Hunter
 *
 *  Draw a city dataset on the panel, hold it, then clear
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

use anyhow::{Context, Result};
use env_logger::Env;
use log::{error, info};

use citymap::config::{self, Config, ProjectionKind};
use citymap::display::{PixelSink, SinkFactory};
use citymap::{AffineMap, BoundsMap, CitiesDb, Error, render_map, resolve};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

fn main() -> Result<()> {
    let cfg = config::load().context("loading configuration")?;

    // Initialize the logger, --debug or log_level from the config
    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_filter()))
        .format_timestamp_secs()
        .init();

    info!("{} - every city, one pixel", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    if let Err(e) = run(&cfg) {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

fn run(cfg: &Config) -> Result<()> {
    let dataset = cfg.dataset_path();
    let mut db = CitiesDb::open(&dataset, cfg.columns())
        .with_context(|| format!("opening city database {}", dataset.display()))?;

    let mut sink = SinkFactory::create_from_config(&cfg.display())
        .map_err(Error::from)
        .context("creating display")?;
    let options = cfg.render_options();

    let stats = match cfg.projection() {
        ProjectionKind::Affine => {
            let points = cfg.reference_points()?;
            let refs = resolve(&mut db, &points).context("resolving reference cities")?;
            let map = AffineMap::fit(&refs).context("fitting reference cities")?;
            let highlights: Vec<(i32, i32)> = refs.iter().map(|r| r.target).collect();
            render_map(&mut db, &map, &highlights, &mut sink, &options)?
        }
        ProjectionKind::Bounds => {
            let (width, height) = sink.dimensions();
            let map = BoundsMap::new(cfg.bounds(), width, height)?;
            render_map(&mut db, &map, &[], &mut sink, &options)?
        }
    };

    // only a complete frame reaches the panel
    sink.flush().map_err(Error::from).context("flushing display")?;
    info!("{} cities on the map", stats.drawn - stats.off_screen);

    let hold = cfg.hold();
    if !hold.is_zero() {
        info!("Holding for {}s", hold.as_secs());
        std::thread::sleep(hold);
    }
    // blank the panel, the written frame stays as it was
    sink.clear();
    Ok(())
}
