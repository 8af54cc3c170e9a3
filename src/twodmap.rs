// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::error::{CarveError, Result};
use std::ops::{Index, IndexMut};

/// An addressable two-dimensional field.  It holds the pixels of an
/// image, the per-cell removal costs of a cost field, or the
/// cost-and-back-offset pairs of the path table.  Storage is
/// line-major: every line `y` is one contiguous run of `width` cells,
/// so a line can be handed to a worker thread as a plain slice.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoDimensionalMap<P: Copy> {
    width: usize,
    height: usize,
    cells: Vec<P>,
}

impl<P: Copy> TwoDimensionalMap<P> {
    /// A map of the given size with every cell set to `fill`.
    pub fn new(width: usize, height: usize, fill: P) -> Self {
        TwoDimensionalMap {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    /// Wrap an existing line-major vector.  The vector must hold
    /// exactly `width * height` cells.
    pub fn from_vec(width: usize, height: usize, cells: Vec<P>) -> Result<Self> {
        if cells.len() != width * height {
            return Err(CarveError::invariant(format!(
                "{} cells cannot fill a {}x{} map",
                cells.len(),
                width,
                height
            )));
        }
        Ok(TwoDimensionalMap {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    // Absolutely, the number one name of this game is keep the index
    // math in a singular location and never, ever mess with it.
    fn get_index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    /// The cells of line `y`, in order of `x`.
    pub fn line(&self, y: usize) -> &[P] {
        let start = y * self.width;
        &self.cells[start..start + self.width]
    }

    pub fn as_slice(&self) -> &[P] {
        &self.cells
    }

    pub fn as_mut_slice(&mut self) -> &mut [P] {
        &mut self.cells
    }
}

impl<P: Copy> Index<(usize, usize)> for TwoDimensionalMap<P> {
    type Output = P;

    /// A convenience addressing mode for getting values.
    fn index(&self, (x, y): (usize, usize)) -> &P {
        let index = self.get_index(x, y);
        &self.cells[index]
    }
}

impl<P: Copy> IndexMut<(usize, usize)> for TwoDimensionalMap<P> {
    /// A convenience addressing mode for setting values.
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut P {
        let index = self.get_index(x, y);
        &mut self.cells[index]
    }
}
