// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Content-aware image shrinking by seam carving.
//!
//! The cost of removing a spot in the image is the WCAG contrast
//! ratio across it, so seams pass through flat regions and steer
//! around edges.  Width and height are carved alternately, one seam
//! at a time, until the image reaches its target size.
//!
//! Results are not repeatable by default: every cost gets a little
//! unseeded random jitter to break ties.  Hand a `SeededNoise` to the
//! `ShrinkController` when they need to be.

pub mod config;
pub mod dump;
pub mod energy;
pub mod error;
pub mod flipper;
pub mod io;
mod parallel;
pub mod pixelbuffer;
pub mod pixelpairs;
pub mod noise;
pub mod seamcarver;
pub mod seamfinder;
pub mod shrink;
pub mod twodmap;

pub use config::CarveOptions;
pub use dump::{DiagnosticSink, SnapshotWriter};
pub use energy::{ContrastCostField, CostField};
pub use error::{CarveError, Result};
pub use flipper::Orientation;
pub use noise::{NoiseSource, SeededNoise, ThreadNoise};
pub use pixelbuffer::PixelBuffer;
pub use seamcarver::{carve_once, remove_seam};
pub use seamfinder::{Seam, SeamSolver};
pub use shrink::{shrink, ShrinkController, ShrinkState, Target};
