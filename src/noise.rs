// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tie-breaking jitter for the cost field.
//!
//! Flat regions produce long runs of identical costs, and the seam
//! solver's fixed scan order would then carve through the same place
//! every time.  A small uniform draw added to every cell scatters the
//! seams.  The default source is unseeded, so two runs over the same
//! image will generally not produce the same output.  Use
//! `SeededNoise` when a run has to be repeatable.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A source of jitter that worker threads may draw from concurrently.
pub trait NoiseSource: Sync {
    /// Add an independent draw from U(0, amplitude) to every cell of
    /// one line.  `epoch` is the carve iteration the line belongs to.
    fn jitter(&self, epoch: usize, line: usize, amplitude: f64, cells: &mut [f64]);
}

/// Draws from each worker's thread-local generator.  Not repeatable.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadNoise;

impl NoiseSource for ThreadNoise {
    fn jitter(&self, _epoch: usize, _line: usize, amplitude: f64, cells: &mut [f64]) {
        if amplitude <= 0.0 {
            return;
        }
        let dist = Uniform::new(0.0, amplitude);
        let mut rng = rand::thread_rng();
        cells.iter_mut().for_each(|c| *c += dist.sample(&mut rng));
    }
}

/// Derives a generator from (seed, epoch, line), so the draws for a
/// line do not depend on which thread computes it or in what order.
#[derive(Debug, Clone, Copy)]
pub struct SeededNoise {
    seed: u64,
}

impl SeededNoise {
    pub fn new(seed: u64) -> Self {
        SeededNoise { seed }
    }

    fn line_seed(&self, epoch: usize, line: usize) -> u64 {
        // splitmix64 over the packed coordinates
        let mut z = self
            .seed
            .wrapping_add((epoch as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
            .wrapping_add((line as u64).wrapping_mul(0xD1B5_4A32_D192_ED03));
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

impl NoiseSource for SeededNoise {
    fn jitter(&self, epoch: usize, line: usize, amplitude: f64, cells: &mut [f64]) {
        if amplitude <= 0.0 {
            return;
        }
        let dist = Uniform::new(0.0, amplitude);
        let mut rng = StdRng::seed_from_u64(self.line_seed(epoch, line));
        cells.iter_mut().for_each(|c| *c += dist.sample(&mut rng));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_stay_in_range() {
        let mut cells = vec![1.0; 500];
        ThreadNoise.jitter(0, 0, 0.05, &mut cells);
        assert!(cells.iter().all(|&c| c >= 1.0 && c < 1.05));
        assert!(cells.iter().any(|&c| c > 1.0));
    }

    #[test]
    fn zero_amplitude_is_a_no_op() {
        let mut cells = vec![2.0; 10];
        ThreadNoise.jitter(3, 4, 0.0, &mut cells);
        SeededNoise::new(1).jitter(3, 4, 0.0, &mut cells);
        assert_eq!(cells, vec![2.0; 10]);
    }

    #[test]
    fn seeded_lines_repeat() {
        let noise = SeededNoise::new(42);
        let (mut a, mut b, mut c) = (vec![0.0; 16], vec![0.0; 16], vec![0.0; 16]);
        noise.jitter(5, 7, 1.0, &mut a);
        noise.jitter(5, 7, 1.0, &mut b);
        noise.jitter(5, 8, 1.0, &mut c);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
