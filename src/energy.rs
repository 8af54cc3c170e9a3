// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the contrast cost field of an image
//!
//! A seam runs *between* two neighbouring rows and removes them both
//! by merging them into one, so the field has one cell per adjacent
//! row pair: `(active width - 1) × active height`.  The cost of cell
//! `(x, y)` is the mean of two contrast ratios taken across the pair,
//!
//! ```text
//!   cost(x, y) = ( C[(x-1, y), (x+1, y)] + C[(x, y), (x+2, y)] ) / 2 + U(0, a)
//! ```
//!
//! where `C` is the WCAG contrast ratio, `x - 1` is clamped to 0 and
//! `x + 2` to the last row.  Flat regions cost about 1.0; edges cost
//! a great deal more.  `U(0, a)` is the tie-breaking jitter.

use crate::error::{CarveError, Result};
use crate::flipper::{Flipper, Orientation};
use crate::noise::NoiseSource;
use crate::parallel::for_each_line;
use crate::pixelbuffer::PixelBuffer;
use crate::pixelpairs::{luminance_contrast, relative_luminance};
use crate::twodmap::TwoDimensionalMap;

/// Per-cell removal costs, indexed `(row, line)`.
pub type CostField = TwoDimensionalMap<f64>;

/// Builds the cost field for one orientation of an image.
pub struct ContrastCostField<'a> {
    /// Upper bound of the jitter added to every cell.
    pub noise_amplitude: f64,
    pub noise: &'a dyn NoiseSource,
}

impl<'a> ContrastCostField<'a> {
    pub fn new(noise_amplitude: f64, noise: &'a dyn NoiseSource) -> Self {
        ContrastCostField {
            noise_amplitude,
            noise,
        }
    }

    /// Compute the field.  Lines are independent of each other and are
    /// filled in parallel.  `epoch` identifies the carve iteration to
    /// the noise source.
    pub fn calculate(
        &self,
        image: &PixelBuffer,
        orientation: Orientation,
        epoch: usize,
    ) -> Result<CostField> {
        let view = Flipper::new(image, orientation);
        let (width, height) = view.dimensions();
        if width < 2 || height < 1 {
            return Err(CarveError::config(format!(
                "cannot carve a {:?} seam from a {}x{} image",
                orientation,
                image.width(),
                image.height()
            )));
        }

        let mut field = CostField::new(width - 1, height, 0.0);
        for_each_line(field.as_mut_slice(), width - 1, |y, costs| {
            let lum: Vec<f64> = (0..width)
                .map(|x| relative_luminance(&view.get_pixel(x, y)))
                .collect();
            line_costs(&lum, costs);
            self.noise.jitter(epoch, y, self.noise_amplitude, costs);
        });
        Ok(field)
    }
}

// One line of the field from the luminances of that line.  `costs`
// is one cell shorter than `lum`.
fn line_costs(lum: &[f64], costs: &mut [f64]) {
    let last = lum.len() - 1;
    for (x, cost) in costs.iter_mut().enumerate() {
        let outer = luminance_contrast(lum[x.saturating_sub(1)], lum[x + 1]);
        let inner = luminance_contrast(lum[x], lum[(x + 2).min(last)]);
        *cost = (outer + inner) / 2.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{SeededNoise, ThreadNoise};
    use crate::pixelpairs::contrast_ratio;
    use image::Rgb;

    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    // Black columns 0 and 1, white columns 2 and 3.
    fn split_image(height: usize) -> PixelBuffer {
        let mut buf = PixelBuffer::new(4, height, BLACK);
        for y in 0..height {
            buf.put_pixel(2, y, WHITE);
            buf.put_pixel(3, y, WHITE);
        }
        buf
    }

    #[test]
    fn flat_image_costs_one_everywhere() {
        let buf = PixelBuffer::new(5, 3, Rgb([90, 40, 200]));
        let field = ContrastCostField::new(0.0, &ThreadNoise)
            .calculate(&buf, Orientation::Horizontal, 0)
            .unwrap();
        assert_eq!((field.width(), field.height()), (4, 3));
        assert!(field.as_slice().iter().all(|&c| c == 1.0));
    }

    #[test]
    fn edges_are_expensive_and_clamped_at_the_borders() {
        let buf = split_image(2);
        let field = ContrastCostField::new(0.0, &ThreadNoise)
            .calculate(&buf, Orientation::Horizontal, 0)
            .unwrap();
        let hi = contrast_ratio(&BLACK, &WHITE);
        // x = 0: C[p0, p1] + C[p0, p2]; x - 1 clamps to 0.
        assert!((field[(0, 0)] - (1.0 + hi) / 2.0).abs() < 1e-12);
        // x = 1: C[p0, p2] + C[p1, p3]
        assert!((field[(1, 0)] - hi).abs() < 1e-12);
        // x = 2: C[p1, p3] + C[p2, p3]; x + 2 clamps to 3.
        assert!((field[(2, 1)] - (hi + 1.0) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn vertical_field_reads_columns_as_lines() {
        let buf = split_image(3);
        let field = ContrastCostField::new(0.0, &ThreadNoise)
            .calculate(&buf, Orientation::Vertical, 0)
            .unwrap();
        // Four lines (the columns), each three rows tall, all uniform.
        assert_eq!((field.width(), field.height()), (2, 4));
        assert!(field.as_slice().iter().all(|&c| c == 1.0));
    }

    #[test]
    fn jitter_is_bounded() {
        let buf = PixelBuffer::new(30, 20, WHITE);
        let field = ContrastCostField::new(0.05, &SeededNoise::new(9))
            .calculate(&buf, Orientation::Horizontal, 3)
            .unwrap();
        assert!(field.as_slice().iter().all(|&c| c >= 1.0 && c < 1.05));
    }

    #[test]
    fn too_narrow_is_a_configuration_error() {
        let buf = PixelBuffer::new(1, 4, WHITE);
        match ContrastCostField::new(0.0, &ThreadNoise).calculate(&buf, Orientation::Horizontal, 0) {
            Err(CarveError::Configuration(_)) => {}
            other => panic!("expected a configuration error, got {:?}", other),
        }
    }
}
