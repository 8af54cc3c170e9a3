// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Image dimensional flipper
//!
//! Every stage of the carver is written once, against a virtual image
//! made of *lines* (the direction a seam travels) and *rows* (the
//! position across a line).  The `Flipper` maps that (row, line)
//! address onto the physical (x, y) of a `PixelBuffer`: unchanged when
//! carving horizontally, swapped when carving vertically.  This has
//! the effect of treating every column of a vertical pass as though it
//! were a row, so no stage has to carry its own swap logic.

use crate::pixelbuffer::PixelBuffer;
use image::Rgb;

/// Which way the next seam runs.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Orientation {
    /// Seams run top to bottom, one pixel per image row.  Removing one
    /// makes the image one pixel narrower.
    Horizontal,
    /// Seams run left to right, one pixel per image column.  Removing
    /// one makes the image one pixel shorter.
    Vertical,
}

impl Orientation {
    /// Map a logical (row, line) pair to a physical (x, y) pair.
    #[inline]
    pub fn to_xy(self, row: usize, line: usize) -> (usize, usize) {
        match self {
            Orientation::Horizontal => (row, line),
            Orientation::Vertical => (line, row),
        }
    }

    /// The (active width, active height) of an image of the given
    /// physical size.
    #[inline]
    pub fn active(self, width: usize, height: usize) -> (usize, usize) {
        match self {
            Orientation::Horizontal => (width, height),
            Orientation::Vertical => (height, width),
        }
    }
}

/// A read-only view of a `PixelBuffer` addressed by (row, line).
pub struct Flipper<'a> {
    pub image: &'a PixelBuffer,
    pub orientation: Orientation,
}

impl<'a> Flipper<'a> {
    pub fn new(image: &'a PixelBuffer, orientation: Orientation) -> Self {
        Flipper { image, orientation }
    }

    /// (rows across a line, number of lines).  The number of lines is
    /// also the length of a seam.
    pub fn dimensions(&self) -> (usize, usize) {
        self.orientation
            .active(self.image.width(), self.image.height())
    }

    #[inline]
    pub fn get_pixel(&self, row: usize, line: usize) -> Rgb<u8> {
        let (x, y) = self.orientation.to_xy(row, line);
        self.image.get_pixel(x, y)
    }
}
