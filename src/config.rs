// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::error::{CarveError, Result};

/// The knobs of a shrink run.
#[derive(Debug, Clone, PartialEq)]
pub struct CarveOptions {
    /// Pixels to take off the width.
    pub shrink_width: u32,
    /// Pixels to take off the height.  Ignored when `lock_aspect` is
    /// set.
    pub shrink_height: u32,
    /// Derive the height reduction from the width reduction so the
    /// result keeps the source's aspect ratio.
    pub lock_aspect: bool,
    /// How far a seam may drift between neighbouring lines.
    pub max_shift: usize,
    /// Upper bound of the uniform jitter added to every cost.
    pub noise_amplitude: f64,
    /// Hand the current image to the diagnostic sink every this many
    /// carves.  Zero disables the periodic snapshots.
    pub snapshot_every: usize,
    /// At each snapshot, also dump the cost field with the seam drawn
    /// on it.
    pub trace_seams: bool,
}

impl Default for CarveOptions {
    fn default() -> Self {
        CarveOptions {
            shrink_width: 0,
            shrink_height: 0,
            lock_aspect: false,
            max_shift: 1,
            noise_amplitude: 0.05,
            snapshot_every: 20,
            trace_seams: false,
        }
    }
}

impl CarveOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.noise_amplitude.is_finite() || self.noise_amplitude < 0.0 {
            return Err(CarveError::config(format!(
                "noise amplitude must be a finite, non-negative number, not {}",
                self.noise_amplitude
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = CarveOptions::default();
        assert_eq!(opts.max_shift, 1);
        assert_eq!(opts.noise_amplitude, 0.05);
        assert_eq!(opts.snapshot_every, 20);
        opts.validate().unwrap();
    }

    #[test]
    fn bad_noise_is_rejected() {
        for amp in &[-0.1, std::f64::NAN, std::f64::INFINITY] {
            let opts = CarveOptions {
                noise_amplitude: *amp,
                ..CarveOptions::default()
            };
            assert!(opts.validate().is_err());
        }
    }
}
