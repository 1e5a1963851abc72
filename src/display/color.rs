/*
 *  display/color.rs
 *
 *  citymap - every city, one pixel
 *  (c) 2020-26 Stuart Hunter
 *
 *  Named colors - 2014 Material Design palette used by the matrix tools
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

use embedded_graphics::pixelcolor::Rgb888;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Palette color, or an explicit RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Black,
    White,
    Red,
    Pink,
    Purple,
    DeepPurple,
    Indigo,
    Blue,
    LightBlue,
    Cyan,
    Teal,
    Green,
    LightGreen,
    Lime,
    Yellow,
    Amber,
    Orange,
    DeepOrange,
    Brown,
    Gray,
    BlueGray,
    Rgb(u8, u8, u8),
}

impl Color {
    /// Names accepted by `from_str`, in palette order
    pub const NAMES: [&'static str; 21] = [
        "black", "white", "red", "pink", "purple", "deep_purple", "indigo",
        "blue", "light_blue", "cyan", "teal", "green", "light_green", "lime",
        "yellow", "amber", "orange", "deep_orange", "brown", "gray", "blue_gray",
    ];

    const PALETTE: [Color; 21] = [
        Color::Black, Color::White, Color::Red, Color::Pink, Color::Purple,
        Color::DeepPurple, Color::Indigo, Color::Blue, Color::LightBlue,
        Color::Cyan, Color::Teal, Color::Green, Color::LightGreen, Color::Lime,
        Color::Yellow, Color::Amber, Color::Orange, Color::DeepOrange,
        Color::Brown, Color::Gray, Color::BlueGray,
    ];

    pub fn to_rgb(&self) -> (u8, u8, u8) {
        match *self {
            Color::Black => (0, 0, 0),
            Color::White => (255, 255, 255),
            Color::Red => (244, 67, 54),
            Color::Pink => (233, 30, 99),
            Color::Purple => (156, 39, 176),
            Color::DeepPurple => (103, 58, 183),
            Color::Indigo => (63, 81, 181),
            Color::Blue => (33, 150, 243),
            Color::LightBlue => (3, 169, 244),
            Color::Cyan => (0, 188, 212),
            Color::Teal => (0, 150, 136),
            Color::Green => (76, 175, 80),
            Color::LightGreen => (139, 195, 74),
            Color::Lime => (205, 220, 57),
            Color::Yellow => (255, 235, 59),
            Color::Amber => (255, 193, 7),
            Color::Orange => (255, 152, 0),
            Color::DeepOrange => (255, 97, 34),
            Color::Brown => (121, 85, 72),
            Color::Gray => (158, 158, 158),
            Color::BlueGray => (96, 125, 139),
            Color::Rgb(r, g, b) => (r, g, b),
        }
    }

    pub fn to_rgb888(&self) -> Rgb888 {
        let (r, g, b) = self.to_rgb();
        Rgb888::new(r, g, b)
    }
}

impl FromStr for Color {
    type Err = String;

    /// Palette name (`deep_orange`, `deep-orange`) or `#rrggbb`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(format!("bad hex color '{}'", s));
            }
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .map_err(|_| format!("bad hex color '{}'", s))
            };
            return Ok(Color::Rgb(channel(0)?, channel(2)?, channel(4)?));
        }

        let wanted = s.to_ascii_lowercase().replace('-', "_");
        Color::NAMES
            .iter()
            .position(|name| *name == wanted)
            .map(|i| Color::PALETTE[i])
            .ok_or_else(|| format!("unknown color '{}' (try one of: {})", s, Color::NAMES.join(", ")))
    }
}
