/*
 *  display/mock.rs
 *
 *  citymap - every city, one pixel
 *  (c) 2020-26 Stuart Hunter
 *
 *  Recording sink for tests
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

use std::sync::{Arc, Mutex};

use crate::display::error::DisplayError;
use crate::display::traits::PixelSink;

/// Mock sink for testing
///
/// Records every `set_pixel` call in order, including the ones that fall
/// outside the panel, so tests can check exactly what the renderer pushed.
/// State is shared so it can still be inspected after the sink is boxed.
#[derive(Debug, Clone)]
pub struct MockSink {
    width: u32,
    height: u32,
    state: Arc<Mutex<MockSinkState>>,
}

/// Shared state for inspection in tests
#[derive(Debug, Default)]
pub struct MockSinkState {
    /// Every set_pixel call as (x, y, rgb)
    pub pixels: Vec<(i32, i32, (u8, u8, u8))>,

    /// Number of times clear() was called
    pub clear_count: usize,

    /// Number of times flush() was called
    pub flush_count: usize,

    /// Simulate failures (for error testing)
    pub simulate_flush_failure: bool,
}

impl MockSink {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            state: Arc::new(Mutex::new(MockSinkState::default())),
        }
    }

    pub fn state(&self) -> Arc<Mutex<MockSinkState>> {
        Arc::clone(&self.state)
    }

    /// Coordinates of every recorded call, in order
    pub fn points(&self) -> Vec<(i32, i32)> {
        self.state.lock().unwrap().pixels.iter().map(|(x, y, _)| (*x, *y)).collect()
    }

    /// Recorded calls drawn in `rgb`
    pub fn points_in(&self, rgb: (u8, u8, u8)) -> Vec<(i32, i32)> {
        self.state
            .lock()
            .unwrap()
            .pixels
            .iter()
            .filter(|(_, _, c)| *c == rgb)
            .map(|(x, y, _)| (*x, *y))
            .collect()
    }
}

impl PixelSink for MockSink {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8) {
        self.state.lock().unwrap().pixels.push((x, y, (r, g, b)));
    }

    fn clear(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.clear_count += 1;
        state.pixels.clear();
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        let mut state = self.state.lock().unwrap();
        if state.simulate_flush_failure {
            return Err(DisplayError::Other("Simulated flush failure".to_string()));
        }
        state.flush_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_in_order() {
        let mut sink = MockSink::new(4, 4);
        sink.set_pixel(1, 1, 1, 2, 3);
        sink.set_pixel(9, 9, 4, 5, 6);
        assert_eq!(sink.points(), vec![(1, 1), (9, 9)]);
        assert_eq!(sink.points_in((4, 5, 6)), vec![(9, 9)]);
    }

    #[test]
    fn test_mock_clear_and_flush() {
        let mut sink = MockSink::new(4, 4);
        let state = sink.state();
        sink.set_pixel(0, 0, 1, 1, 1);
        sink.clear();
        assert!(sink.points().is_empty());
        sink.flush().unwrap();
        assert_eq!(state.lock().unwrap().clear_count, 1);
        assert_eq!(state.lock().unwrap().flush_count, 1);

        state.lock().unwrap().simulate_flush_failure = true;
        assert!(sink.flush().is_err());
    }
}
