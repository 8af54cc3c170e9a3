// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The in-memory RGB image the carver works on.

use crate::error::Result;
use crate::flipper::Orientation;
use crate::twodmap::TwoDimensionalMap;
use image::{Rgb, RgbImage};
use itertools::iproduct;

/// A width × height grid of 8-bit RGB colors, one per coordinate.
/// Each carve produces a fresh buffer; the previous one is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pixels: TwoDimensionalMap<Rgb<u8>>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize, fill: Rgb<u8>) -> Self {
        PixelBuffer {
            pixels: TwoDimensionalMap::new(width, height, fill),
        }
    }

    /// Copy an `image` RGB buffer.
    pub fn from_image(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let mut buf = PixelBuffer::new(width as usize, height as usize, Rgb([0, 0, 0]));
        for (x, y, pixel) in image.enumerate_pixels() {
            buf.put_pixel(x as usize, y as usize, *pixel);
        }
        buf
    }

    /// Build a buffer from cells laid out line by line under the given
    /// orientation: `active_height` lines of `active_width` cells.
    pub fn from_lines(
        orientation: Orientation,
        active_width: usize,
        active_height: usize,
        cells: Vec<Rgb<u8>>,
    ) -> Result<Self> {
        let lines = TwoDimensionalMap::from_vec(active_width, active_height, cells)?;
        let pixels = match orientation {
            Orientation::Horizontal => lines,
            Orientation::Vertical => {
                // Lines are columns here; transpose into row-major order.
                let (width, height) = (active_height, active_width);
                let transposed = iproduct!(0..height, 0..width)
                    .map(|(y, x)| lines[(y, x)])
                    .collect();
                TwoDimensionalMap::from_vec(width, height, transposed)?
            }
        };
        Ok(PixelBuffer { pixels })
    }

    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width() as u32, self.height() as u32, |x, y| {
            self.get_pixel(x as usize, y as usize)
        })
    }

    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> Rgb<u8> {
        self.pixels[(x, y)]
    }

    #[inline]
    pub fn put_pixel(&mut self, x: usize, y: usize, pixel: Rgb<u8>) {
        self.pixels[(x, y)] = pixel;
    }
}
