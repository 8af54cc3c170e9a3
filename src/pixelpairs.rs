// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the contrast of a pixel pair
//!
//! Given two pixels, the cost of the pair is their WCAG contrast
//! ratio: the ratio of the brighter pixel's relative luminance to the
//! darker one's, each offset by 0.05.  Identical colors score exactly
//! 1.0; black against white scores 21.0.

use image::{Pixel, Rgb};

// sRGB transfer function, one channel.
#[inline]
fn linearize(raw: u8) -> f64 {
    let v = f64::from(raw) / 255.0;
    if v <= 0.03928 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance of an 8-bit sRGB color, in [0, 1].
#[inline]
pub fn relative_luminance(p: &Rgb<u8>) -> f64 {
    let c = p.channels();
    0.2126 * linearize(c[0]) + 0.7152 * linearize(c[1]) + 0.0722 * linearize(c[2])
}

/// (Pixel, Pixel) -> Cost
///
/// Symmetric, and never less than 1.0.
#[inline]
pub fn contrast_ratio(p1: &Rgb<u8>, p2: &Rgb<u8>) -> f64 {
    luminance_contrast(relative_luminance(p1), relative_luminance(p2))
}

/// The contrast ratio of two already-computed relative luminances.
#[inline]
pub fn luminance_contrast(lum1: f64, lum2: f64) -> f64 {
    let (l1, l2) = (lum1 + 0.05, lum2 + 0.05);
    if l1 > l2 {
        l1 / l2
    } else {
        l2 / l1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    #[test]
    fn luminance_extremes() {
        assert_eq!(relative_luminance(&BLACK), 0.0);
        assert!((relative_luminance(&WHITE) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn identical_colors_have_unit_contrast() {
        for c in &[BLACK, WHITE, Rgb([12, 200, 77]), Rgb([128, 128, 128])] {
            assert_eq!(contrast_ratio(c, c), 1.0);
        }
    }

    #[test]
    fn black_on_white_is_twenty_one() {
        assert!((contrast_ratio(&BLACK, &WHITE) - 21.0).abs() < 1e-9);
        assert_eq!(contrast_ratio(&BLACK, &WHITE), contrast_ratio(&WHITE, &BLACK));
    }

    #[test]
    fn green_outweighs_blue() {
        let green = relative_luminance(&Rgb([0, 255, 0]));
        let blue = relative_luminance(&Rgb([0, 0, 255]));
        assert!((green - 0.7152).abs() < 1e-12);
        assert!((blue - 0.0722).abs() < 1e-12);
    }

    #[test]
    fn dark_channels_use_the_linear_segment() {
        // 10 / 255 is below the 0.03928 knee.
        let expected = 0.2126 * (10.0 / 255.0) / 12.92;
        assert!((relative_luminance(&Rgb([10, 0, 0])) - expected).abs() < 1e-15);
    }
}
