/*
 *  display/framebuffer.rs
 *
 *  citymap - every city, one pixel
 *  (c) 2020-26 Stuart Hunter
 *
 *  Runtime sized RGB framebuffer, written out as a binary PPM on flush
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

use core::convert::Infallible;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::display::error::DisplayError;
use crate::display::traits::PixelSink;

/// An in-memory panel. Drawing never fails; `flush` optionally writes the
/// frame to disk.
#[derive(Debug, Clone)]
pub struct FrameSink {
    buf: Vec<Rgb888>,
    w: usize,
    h: usize,
    output: Option<PathBuf>,
    flush_count: usize,
}

impl FrameSink {
    pub fn new(width: u32, height: u32) -> Result<Self, DisplayError> {
        if width == 0 || height == 0 {
            return Err(DisplayError::InvalidConfiguration(format!(
                "panel must be at least 1x1, got {}x{}",
                width, height
            )));
        }
        let (w, h) = (width as usize, height as usize);
        Ok(Self {
            buf: vec![Rgb888::BLACK; w * h],
            w,
            h,
            output: None,
            flush_count: 0,
        })
    }

    /// Write a PPM to `path` on every flush
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Color at (x, y), None if off panel
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb888> {
        self.idx(Point::new(x, y)).map(|i| self.buf[i])
    }

    /// Number of pixels that differ from black
    pub fn count_lit(&self) -> usize {
        self.buf.iter().filter(|c| **c != Rgb888::BLACK).count()
    }

    pub fn flush_count(&self) -> usize {
        self.flush_count
    }

    /// Binary PPM (P6), row major, 8 bits per channel
    pub fn write_ppm<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.w, self.h)?;
        let mut row = Vec::with_capacity(self.w * 3);
        for line in self.buf.chunks(self.w) {
            row.clear();
            for c in line {
                row.extend_from_slice(&[c.r(), c.g(), c.b()]);
            }
            out.write_all(&row)?;
        }
        out.flush()
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }
}

impl OriginDimensions for FrameSink {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl DrawTarget for FrameSink {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.buf.fill(color);
        Ok(())
    }
}

impl PixelSink for FrameSink {
    fn dimensions(&self) -> (u32, u32) {
        (self.w as u32, self.h as u32)
    }

    fn set_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8) {
        let px = Pixel(Point::new(x, y), Rgb888::new(r, g, b));
        // infallible
        let _ = self.draw_iter(std::iter::once(px));
    }

    fn clear(&mut self) {
        self.buf.fill(Rgb888::BLACK);
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.flush_count += 1;
        match &self.output {
            Some(path) => {
                let file = File::create(path)?;
                self.write_ppm(BufWriter::new(file))?;
                info!("Frame {}x{} written to {}", self.w, self.h, path.display());
            }
            None => debug!("Frame flushed, {} pixels lit", self.count_lit()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{Line, Primitive, PrimitiveStyle};

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(FrameSink::new(0, 10), Err(DisplayError::InvalidConfiguration(_))));
        assert!(matches!(FrameSink::new(10, 0), Err(DisplayError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_set_pixel_and_read_back() {
        let mut fb = FrameSink::new(8, 4).unwrap();
        fb.set_pixel(3, 2, 244, 67, 54);
        assert_eq!(fb.pixel(3, 2), Some(Rgb888::new(244, 67, 54)));
        assert_eq!(fb.count_lit(), 1);
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut fb = FrameSink::new(8, 4).unwrap();
        fb.set_pixel(-1, 0, 255, 255, 255);
        fb.set_pixel(8, 0, 255, 255, 255);
        fb.set_pixel(0, 4, 255, 255, 255);
        fb.set_pixel(i32::MAX, i32::MIN, 255, 255, 255);
        assert_eq!(fb.count_lit(), 0);
        assert_eq!(fb.pixel(8, 0), None);
    }

    #[test]
    fn test_clear_blanks_everything() {
        let mut fb = FrameSink::new(4, 4).unwrap();
        fb.set_pixel(0, 0, 1, 1, 1);
        fb.set_pixel(3, 3, 1, 1, 1);
        PixelSink::clear(&mut fb);
        assert_eq!(fb.count_lit(), 0);
    }

    #[test]
    fn test_embedded_graphics_draw() {
        let mut fb = FrameSink::new(16, 16).unwrap();
        Line::new(Point::new(0, 0), Point::new(15, 0))
            .into_styled(PrimitiveStyle::with_stroke(Rgb888::WHITE, 1))
            .draw(&mut fb)
            .unwrap();
        assert_eq!(fb.count_lit(), 16);
    }

    #[test]
    fn test_ppm_layout() {
        let mut fb = FrameSink::new(2, 1).unwrap();
        fb.set_pixel(1, 0, 10, 20, 30);
        let mut bytes = Vec::new();
        fb.write_ppm(&mut bytes).unwrap();
        let header = b"P6\n2 1\n255\n";
        assert_eq!(&bytes[..header.len()], header);
        assert_eq!(&bytes[header.len()..], &[0, 0, 0, 10, 20, 30]);
    }

    #[test]
    fn test_flush_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.ppm");
        let mut fb = FrameSink::new(3, 2).unwrap().with_output(&path);
        fb.set_pixel(0, 0, 255, 0, 0);
        fb.flush().unwrap();
        assert_eq!(fb.flush_count(), 1);
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), b"P6\n3 2\n255\n".len() + 3 * 2 * 3);
    }

    #[test]
    fn test_flush_to_bad_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("frame.ppm");
        let mut fb = FrameSink::new(1, 1).unwrap().with_output(path);
        assert!(matches!(fb.flush(), Err(DisplayError::Io(_))));
    }
}
