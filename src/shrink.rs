// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The shrink loop
//!
//! Carves one seam at a time until the image fits its target size.
//! Each round shrinks whichever dimension is proportionally further
//! from its target, so the aspect ratio drifts toward the target's
//! rather than one side being finished before the other starts.

use crate::config::CarveOptions;
use crate::dump::DiagnosticSink;
use crate::energy::ContrastCostField;
use crate::error::{CarveError, Result};
use crate::flipper::Orientation;
use crate::noise::{NoiseSource, ThreadNoise};
use crate::pixelbuffer::PixelBuffer;
use crate::seamcarver::carve_once;
use crate::seamfinder::SeamSolver;
use log::{debug, info, warn};
use std::time::Instant;

/// No target side is allowed to end up smaller than this.
pub const MIN_TARGET_SIDE: i64 = 5;

/// The size the loop carves down to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub width: usize,
    pub height: usize,
}

impl Target {
    /// Width over height.
    pub fn ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// If either target side is at or below the floor, raise both by the
/// same amount so the smaller one lands exactly on it.
pub fn apply_floor(width: i64, height: i64) -> (i64, i64) {
    let smallest = width.min(height);
    if smallest <= MIN_TARGET_SIDE {
        let lift = MIN_TARGET_SIDE - smallest;
        (width + lift, height + lift)
    } else {
        (width, height)
    }
}

/// Work out the target size for an image of the given size.
pub fn plan_target(width: usize, height: usize, options: &CarveOptions) -> Result<Target> {
    if width == 0 || height == 0 {
        return Err(CarveError::config(format!(
            "cannot shrink an empty {}x{} image",
            width, height
        )));
    }
    let (w, h) = (width as i64, height as i64);
    let delta_w = i64::from(options.shrink_width);
    let delta_h = if options.lock_aspect {
        delta_w * h / w
    } else {
        i64::from(options.shrink_height)
    };

    let (target_w, target_h) = (w - delta_w, h - delta_h);
    let (floored_w, floored_h) = apply_floor(target_w, target_h);
    if (floored_w, floored_h) != (target_w, target_h) {
        warn!(
            "too much shrinking: target {}x{} raised to {}x{}",
            target_w, target_h, floored_w, floored_h
        );
        if floored_w >= w && floored_h >= h {
            warn!(
                "a {}x{} target leaves a {}x{} image untouched",
                floored_w, floored_h, width, height
            );
        }
    }

    Ok(Target {
        width: floored_w as usize,
        height: floored_h as usize,
    })
}

/// Pick the orientation of the next carve.  A side already at its
/// target is left alone.  Otherwise an image relatively too tall
/// (width/height below the target's) loses a row, and one too wide,
/// or exactly on ratio, loses a column.
pub fn choose_orientation(width: usize, height: usize, target: &Target) -> Orientation {
    if width <= target.width {
        Orientation::Vertical
    } else if height <= target.height {
        Orientation::Horizontal
    } else if (width as f64 / height as f64) < target.ratio() {
        Orientation::Vertical
    } else {
        Orientation::Horizontal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShrinkState {
    Running,
    Done,
}

/// Owns the image while it is being shrunk.
pub struct ShrinkController<'a> {
    image: PixelBuffer,
    target: Target,
    options: CarveOptions,
    noise: Box<dyn NoiseSource + 'a>,
    sink: Option<&'a dyn DiagnosticSink>,
    iteration: usize,
}

impl<'a> ShrinkController<'a> {
    pub fn new(image: PixelBuffer, options: CarveOptions) -> Result<Self> {
        options.validate()?;
        let target = plan_target(image.width(), image.height(), &options)?;
        info!(
            "shrinking {}x{} to {}x{}",
            image.width(),
            image.height(),
            target.width,
            target.height
        );
        Ok(ShrinkController {
            image,
            target,
            options,
            noise: Box::new(ThreadNoise),
            sink: None,
            iteration: 0,
        })
    }

    /// Replace the default, unseeded jitter.
    pub fn with_noise<N: NoiseSource + 'a>(mut self, noise: N) -> Self {
        self.noise = Box::new(noise);
        self
    }

    pub fn with_sink(mut self, sink: &'a dyn DiagnosticSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn image(&self) -> &PixelBuffer {
        &self.image
    }

    /// Carves made so far.
    pub fn iterations(&self) -> usize {
        self.iteration
    }

    pub fn state(&self) -> ShrinkState {
        let (width, height) = self.image.dimensions();
        if width > self.target.width || height > self.target.height {
            ShrinkState::Running
        } else {
            ShrinkState::Done
        }
    }

    /// Carve one seam.  Returns the orientation carved, or `None` once
    /// the target has been reached.
    pub fn step(&mut self) -> Result<Option<Orientation>> {
        if self.state() == ShrinkState::Done {
            return Ok(None);
        }
        if self.iteration == 0 {
            if let Some(sink) = self.sink {
                sink.picture(0, &self.image);
            }
        }

        let (width, height) = self.image.dimensions();
        let orientation = choose_orientation(width, height, &self.target);
        let costs = ContrastCostField::new(self.options.noise_amplitude, self.noise.as_ref());
        let solver = SeamSolver::new(self.options.max_shift);
        let step = carve_once(&self.image, orientation, &costs, &solver, self.iteration)?;

        self.image = step.image;
        self.iteration += 1;
        debug!(
            "carve {}: {:?} seam, cost {:.3}, now {}x{}",
            self.iteration,
            orientation,
            step.seam.cost,
            self.image.width(),
            self.image.height()
        );

        let every = self.options.snapshot_every;
        if let Some(sink) = self.sink {
            if every > 0 && self.iteration % every == 0 {
                sink.picture(self.iteration, &self.image);
                if self.options.trace_seams {
                    sink.seam_trace(self.iteration, &step.field, &step.seam);
                }
            }
        }
        Ok(Some(orientation))
    }

    /// Carve until done and hand back the result.
    pub fn run(mut self) -> Result<PixelBuffer> {
        let started = Instant::now();
        while self.step()?.is_some() {}
        info!(
            "done after {} carves in {:.2?}, now {}x{}",
            self.iteration,
            started.elapsed(),
            self.image.width(),
            self.image.height()
        );
        Ok(self.image)
    }
}

/// Shrink `image` with the given options and the default jitter.
pub fn shrink(image: PixelBuffer, options: CarveOptions) -> Result<PixelBuffer> {
    ShrinkController::new(image, options)?.run()
}
