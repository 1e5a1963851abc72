/*
 *  config.rs
 *
 *  citymap - every city, one pixel
 *  (c) 2020-26 Stuart Hunter
 *
 *  Layered configuration: defaults, YAML file, CLI overrides
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
use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}, time::Duration};
use thiserror::Error;

use crate::cities::ColumnMap;
use crate::display::Color;
use crate::projection::Bounds;
use crate::reference::{ControlPoint, DEFAULT_REFERENCE, parse_reference};
use crate::render::{DrawOrder, Palette, RenderOptions};

/// Dataset used when none is configured, SimpleMaps US cities
pub const DEFAULT_DATASET: &str = "uscities.csv";

/// Seconds the finished map stays up before the panel is cleared
pub const DEFAULT_HOLD_SECS: u64 = 10;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// How source coordinates become pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionKind {
    /// Fit through three reference cities
    #[default]
    Affine,
    /// Stretch a fixed lon/lat box over the panel
    Bounds,
}

/// Top-level app configuration. Every field is optional so layers merge.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// General options
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    pub dataset: Option<DatasetConfig>,
    /// "city,state,x,y" x3
    pub reference: Option<String>,
    /// Structured alternative to `reference`, may carry known coordinates
    pub references: Option<Vec<ControlPoint>>,
    pub projection: Option<ProjectionKind>,
    pub bounds: Option<Bounds>,
    pub draw_order: Option<DrawOrder>,
    pub palette: Option<PaletteConfig>,
    pub highlight_references: Option<bool>,
    /// display-specific geometry & behavior
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatasetConfig {
    pub path: Option<PathBuf>,
    pub columns: Option<ColumnMap>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct PaletteConfig {
    pub background: Option<Color>,
    pub foreground: Option<Color>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub rotate_deg: Option<u16>,
    pub output: Option<PathBuf>,    // PPM written on flush
    pub hold_secs: Option<u64>,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "citymap", version, about = "Every city, one pixel", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// City CSV, header line first
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub dataset: Option<PathBuf>,
    /// Three reference cities: "city,state,x,y,city,state,x,y,city,state,x,y"
    #[arg(short = 'r', long)]
    pub reference: Option<String>,
    #[arg(long, value_enum)]
    pub projection: Option<ProjectionKind>,
    #[arg(long)]
    pub width: Option<u32>,
    #[arg(long)]
    pub height: Option<u32>,
    #[arg(long)]
    pub rotate_deg: Option<u16>,
    /// Write the finished frame here as a binary PPM
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub hold_secs: Option<u64>,
    /// Draw last record first so the first city in the file wins a pixel
    #[arg(long, action = ArgAction::SetTrue)]
    pub reverse: bool,
    /// City color, palette name or #rrggbb
    #[arg(long)]
    pub background: Option<Color>,
    /// Reference pixel color, palette name or #rrggbb
    #[arg(long)]
    pub foreground: Option<Color>,
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_highlight: bool,
    #[arg(long)]
    pub log_level: Option<String>,
    /// Enable debug log level
    #[arg(short = 'v', long = "debug", alias = "verbose", action = ArgAction::SetTrue)]
    pub debug: bool,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();
    let cfg = load_with(&cli)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Everything `load` does except parsing argv and dumping
pub fn load_with(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;

    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/citymap/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/citymap/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/citymap.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["citymap.yaml", "config/citymap.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    // top-level
    if src.log_level.is_some()            { dst.log_level = src.log_level; }
    if src.reference.is_some()            { dst.reference = src.reference; }
    if src.references.is_some()           { dst.references = src.references; }
    if src.projection.is_some()           { dst.projection = src.projection; }
    if src.bounds.is_some()               { dst.bounds = src.bounds; }
    if src.draw_order.is_some()           { dst.draw_order = src.draw_order; }
    if src.highlight_references.is_some() { dst.highlight_references = src.highlight_references; }
    // dataset
    match (&mut dst.dataset, src.dataset) {
        (None, Some(s)) => dst.dataset = Some(s),
        (Some(d), Some(s)) => {
            if s.path.is_some()    { d.path = s.path; }
            if s.columns.is_some() { d.columns = s.columns; }
        }
        _ => {}
    }
    // palette
    match (&mut dst.palette, src.palette) {
        (None, Some(s)) => dst.palette = Some(s),
        (Some(d), Some(s)) => {
            if s.background.is_some() { d.background = s.background; }
            if s.foreground.is_some() { d.foreground = s.foreground; }
        }
        _ => {}
    }
    // display
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.width.is_some()       { dst.width = src.width; }
    if src.height.is_some()      { dst.height = src.height; }
    if src.rotate_deg.is_some()  { dst.rotate_deg = src.rotate_deg; }
    if src.output.is_some()      { dst.output = src.output; }
    if src.hold_secs.is_some()   { dst.hold_secs = src.hold_secs; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()       { cfg.log_level = cli.log_level.clone(); }
    if cli.debug                     { cfg.log_level = Some("debug".into()); }
    if cli.reference.is_some() {
        // a reference string on the command line beats structured YAML points
        cfg.reference = cli.reference.clone();
        cfg.references = None;
    }
    if cli.projection.is_some()      { cfg.projection = cli.projection; }
    if cli.reverse                   { cfg.draw_order = Some(DrawOrder::Reverse); }
    if cli.no_highlight              { cfg.highlight_references = Some(false); }

    if let Some(path) = cli.dataset.as_ref() {
        cfg.dataset.get_or_insert_with(DatasetConfig::default).path = Some(path.clone());
    }

    if cli.background.is_some() || cli.foreground.is_some() {
        let palette = cfg.palette.get_or_insert_with(PaletteConfig::default);
        if cli.background.is_some() { palette.background = cli.background; }
        if cli.foreground.is_some() { palette.foreground = cli.foreground; }
    }

    let any_display = cli.width.is_some()
        || cli.height.is_some()
        || cli.rotate_deg.is_some()
        || cli.output.is_some()
        || cli.hold_secs.is_some();

    if any_display && cfg.display.is_none() {
        cfg.display = Some(DisplayConfig::default());
    }
    if let Some(display) = cfg.display.as_mut() {
        if cli.width.is_some()       { display.width = cli.width; }
        if cli.height.is_some()      { display.height = cli.height; }
        if cli.rotate_deg.is_some()  { display.rotate_deg = cli.rotate_deg; }
        if cli.output.is_some()      { display.output = cli.output.clone(); }
        if cli.hold_secs.is_some()   { display.hold_secs = cli.hold_secs; }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(display) = cfg.display.as_ref() {
        if display.width == Some(0) || display.height == Some(0) {
            return Err(ConfigError::Validation("display width/height must be > 0".into()));
        }
        if let Some(rot) = display.rotate_deg {
            match rot {
                0 | 90 | 180 | 270 => {},
                _ => return Err(ConfigError::Validation("display rotate_deg must be 0|90|180|270".into()))
            }
        }
    }
    if let Some(bounds) = cfg.bounds.as_ref() {
        bounds.validate().map_err(|e| ConfigError::Validation(e.to_string()))?;
    }
    if let Some(columns) = cfg.dataset.as_ref().and_then(|d| d.columns) {
        if !columns.is_distinct() {
            return Err(ConfigError::Validation(
                "dataset columns must name four different fields".into(),
            ));
        }
    }
    if let Some(points) = cfg.references.as_ref() {
        if points.len() != 3 {
            return Err(ConfigError::Validation(format!(
                "references needs exactly 3 points, found {}",
                points.len()
            )));
        }
    } else if let Some(s) = cfg.reference.as_ref() {
        parse_reference(s).map_err(|e| ConfigError::Validation(e.to_string()))?;
    }
    Ok(())
}

impl Config {
    pub fn dataset_path(&self) -> PathBuf {
        self.dataset
            .as_ref()
            .and_then(|d| d.path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET))
    }

    pub fn columns(&self) -> ColumnMap {
        self.dataset.as_ref().and_then(|d| d.columns).unwrap_or_default()
    }

    /// Structured points when given, else the reference string, else the
    /// built-in Seattle / El Paso / Portland triple
    pub fn reference_points(&self) -> crate::error::Result<[ControlPoint; 3]> {
        if let Some(points) = self.references.as_ref() {
            return points.clone().try_into().map_err(|v: Vec<ControlPoint>| {
                crate::error::Error::Parse(format!("references needs exactly 3 points, found {}", v.len()))
            });
        }
        parse_reference(self.reference.as_deref().unwrap_or(DEFAULT_REFERENCE))
    }

    pub fn projection(&self) -> ProjectionKind {
        self.projection.unwrap_or_default()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds.unwrap_or_default()
    }

    pub fn render_options(&self) -> RenderOptions {
        let defaults = Palette::default();
        let palette = self.palette.unwrap_or_default();
        RenderOptions {
            palette: Palette {
                background: palette.background.unwrap_or(defaults.background),
                foreground: palette.foreground.unwrap_or(defaults.foreground),
            },
            draw_order: self.draw_order.unwrap_or_default(),
            highlight_references: self.highlight_references.unwrap_or(true),
        }
    }

    pub fn display(&self) -> DisplayConfig {
        self.display.clone().unwrap_or_default()
    }

    /// How long the map stays up before it is cleared
    pub fn hold(&self) -> Duration {
        let secs = self
            .display
            .as_ref()
            .and_then(|d| d.hold_secs)
            .unwrap_or(DEFAULT_HOLD_SECS);
        Duration::from_secs(secs)
    }

    /// Level filter for env_logger
    pub fn log_filter(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}
