// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seamcarve - remove one seam
//!
//! The pixel pair a seam passes through is merged into a single pixel
//! (the truncated mean of each channel) and everything past the pair
//! moves up by one, so each carve makes the active dimension exactly
//! one pixel smaller.

use crate::energy::{ContrastCostField, CostField};
use crate::error::{CarveError, Result};
use crate::flipper::{Flipper, Orientation};
use crate::parallel::for_each_line;
use crate::pixelbuffer::PixelBuffer;
use crate::seamfinder::{Seam, SeamSolver};
use image::{Pixel, Rgb};

/// The unweighted mean of two pixels, channel by channel, rounded
/// down.
#[inline]
pub fn merge_pixels(p1: &Rgb<u8>, p2: &Rgb<u8>) -> Rgb<u8> {
    let mut merged = *p1;
    merged.apply2(p2, |a, b| ((u16::from(a) + u16::from(b)) / 2) as u8);
    merged
}

/// Produce a copy of `image` with `seam` removed.  Lines are carved
/// in parallel; each one only reads its own seam row.
pub fn remove_seam(image: &PixelBuffer, orientation: Orientation, seam: &Seam) -> Result<PixelBuffer> {
    let view = Flipper::new(image, orientation);
    let (width, height) = view.dimensions();
    if width < 2 {
        return Err(CarveError::config(format!(
            "cannot remove a {:?} seam from a {}x{} image",
            orientation,
            image.width(),
            image.height()
        )));
    }
    if seam.len() != height {
        return Err(CarveError::invariant(format!(
            "seam has {} entries for {} lines",
            seam.len(),
            height
        )));
    }
    if let Some(row) = seam.rows.iter().find(|&&row| row + 1 >= width) {
        return Err(CarveError::invariant(format!(
            "seam row {} leaves no pixel to merge with in a line {} wide",
            row, width
        )));
    }

    let mut cells = vec![Rgb([0, 0, 0]); (width - 1) * height];
    for_each_line(&mut cells, width - 1, |y, out| {
        let r = seam.rows[y];
        for (x, cell) in out.iter_mut().enumerate().take(r) {
            *cell = view.get_pixel(x, y);
        }
        out[r] = merge_pixels(&view.get_pixel(r, y), &view.get_pixel(r + 1, y));
        for x in (r + 2)..width {
            out[x - 1] = view.get_pixel(x, y);
        }
    });

    PixelBuffer::from_lines(orientation, width - 1, height, cells)
}

/// What one carve produced.  The field and seam are only kept around
/// for diagnostics.
pub struct CarveStep {
    pub image: PixelBuffer,
    pub field: CostField,
    pub seam: Seam,
}

/// Cost field, seam, removal: one full iteration in one orientation.
pub fn carve_once(
    image: &PixelBuffer,
    orientation: Orientation,
    costs: &ContrastCostField,
    solver: &SeamSolver,
    epoch: usize,
) -> Result<CarveStep> {
    let field = costs.calculate(image, orientation, epoch)?;
    let seam = solver.find_seam(&field)?;
    seam.validate(field.width(), field.height(), solver.max_shift)?;
    let image = remove_seam(image, orientation, &seam)?;
    Ok(CarveStep { image, field, seam })
}
