// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Diagnostic dumps
//!
//! Snapshots of the shrinking image and grayscale renderings of the
//! cost field, handed off to a background thread so that writing them
//! never holds up the carve loop.  A failed write is logged and
//! forgotten.

use crate::energy::CostField;
use crate::error::{CarveError, Result};
use crate::pixelbuffer::PixelBuffer;
use crate::seamfinder::Seam;
use crossbeam::channel::{unbounded, Sender};
use image::{GrayImage, Luma, RgbImage};
use log::{debug, warn};
use num_traits::{clamp, NumCast};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

/// Receives checkpoints from the shrink loop.  Implementations must
/// not fail the caller; whatever goes wrong stays inside the sink.
pub trait DiagnosticSink {
    /// The image after `iteration` carves; iteration 0 is the source.
    fn picture(&self, iteration: usize, image: &PixelBuffer);

    /// The cost field of carve `iteration` with its seam.
    fn seam_trace(&self, iteration: usize, field: &CostField, seam: &Seam);
}

/// Render a cost field as grayscale, cheapest black, dearest white.
/// When a seam is given its cells are painted at the field's maximum.
pub fn cost_field_to_image(field: &CostField, seam: Option<&Seam>) -> GrayImage {
    let (min, max) = field
        .as_slice()
        .iter()
        .fold((std::f64::INFINITY, std::f64::NEG_INFINITY), |(lo, hi), &c| {
            (lo.min(c), hi.max(c))
        });
    let span = max - min;

    let shade = |c: f64| -> u8 {
        if span <= 0.0 {
            return 0;
        }
        let v = clamp((c - min) / span * 255.5, 0.0, 255.0);
        NumCast::from(v).unwrap_or(0)
    };

    let mut out = GrayImage::from_fn(field.width() as u32, field.height() as u32, |x, y| {
        Luma([shade(field[(x as usize, y as usize)])])
    });
    if let Some(seam) = seam {
        for (line, &row) in seam.rows.iter().enumerate() {
            if row < field.width() && line < field.height() {
                out.put_pixel(row as u32, line as u32, Luma([shade(max)]));
            }
        }
    }
    out
}

enum Job {
    Picture(PathBuf, RgbImage),
    Trace(PathBuf, GrayImage),
}

impl Job {
    fn run(self) {
        let (path, saved) = match self {
            Job::Picture(path, img) => {
                let saved = img.save(&path);
                (path, saved)
            }
            Job::Trace(path, img) => {
                let saved = img.save(&path);
                (path, saved)
            }
        };
        match saved {
            Ok(()) => debug!("stored {}", path.display()),
            Err(e) => warn!("could not store {}: {}", path.display(), e),
        }
    }
}

/// A diagnostic sink writing PNG files into one directory from a
/// dedicated worker thread.
pub struct SnapshotWriter {
    dir: PathBuf,
    sender: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
}

impl SnapshotWriter {
    /// Create `dir` if needed and start the worker.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let write_err = |e: std::io::Error| CarveError::Write {
            path: dir.display().to_string(),
            reason: e.to_string(),
        };
        fs::create_dir_all(&dir).map_err(write_err)?;

        let (sender, receiver) = unbounded::<Job>();
        let worker = thread::Builder::new()
            .name("snapshots".into())
            .spawn(move || receiver.iter().for_each(Job::run))
            .map_err(write_err)?;

        Ok(SnapshotWriter {
            dir,
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    fn picture_name(iteration: usize) -> String {
        if iteration == 0 {
            "original.png".to_string()
        } else {
            format!("shrink-{:04}.png", iteration)
        }
    }

    fn send(&self, job: Job) {
        if let Some(sender) = &self.sender {
            if sender.send(job).is_err() {
                warn!("snapshot worker has stopped; dropping snapshot");
            }
        }
    }

    /// Wait for every queued snapshot to be written.
    pub fn finish(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Closing the channel ends the worker's loop.
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("snapshot worker panicked");
            }
        }
    }
}

impl DiagnosticSink for SnapshotWriter {
    fn picture(&self, iteration: usize, image: &PixelBuffer) {
        let path = self.dir.join(Self::picture_name(iteration));
        self.send(Job::Picture(path, image.to_image()));
    }

    fn seam_trace(&self, iteration: usize, field: &CostField, seam: &Seam) {
        let path = self.dir.join(format!("shrink-{:04}-path.png", iteration));
        self.send(Job::Trace(path, cost_field_to_image(field, Some(seam))));
    }
}

impl Drop for SnapshotWriter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn field_is_stretched_to_full_range() {
        let field = CostField::from_vec(3, 1, vec![1.0, 2.0, 3.0]).unwrap();
        let img = cost_field_to_image(&field, None);
        assert_eq!(img.get_pixel(0, 0), &Luma([0]));
        assert_eq!(img.get_pixel(1, 0), &Luma([127]));
        assert_eq!(img.get_pixel(2, 0), &Luma([255]));
    }

    #[test]
    fn flat_field_renders_black() {
        let field = CostField::new(2, 2, 1.0);
        let img = cost_field_to_image(&field, None);
        assert!(img.pixels().all(|p| *p == Luma([0])));
    }

    #[test]
    fn seam_is_painted_white() {
        let field = CostField::from_vec(2, 2, vec![1.0, 5.0, 1.0, 5.0]).unwrap();
        let seam = Seam {
            rows: vec![0, 0],
            cost: 2.0,
        };
        let img = cost_field_to_image(&field, Some(&seam));
        assert_eq!(img.get_pixel(0, 0), &Luma([255]));
        assert_eq!(img.get_pixel(0, 1), &Luma([255]));
    }

    #[test]
    fn writer_stores_files_before_finishing() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path().join("dumps")).unwrap();
        let buf = PixelBuffer::new(4, 3, Rgb([1, 2, 3]));
        writer.picture(0, &buf);
        writer.picture(20, &buf);
        let field = CostField::new(3, 3, 1.0);
        let seam = Seam {
            rows: vec![1, 1, 1],
            cost: 3.0,
        };
        writer.seam_trace(20, &field, &seam);
        writer.finish();

        let dumps = dir.path().join("dumps");
        let original = image::open(dumps.join("original.png")).unwrap().to_rgb8();
        assert_eq!(original.dimensions(), (4, 3));
        assert!(dumps.join("shrink-0020.png").is_file());
        assert!(dumps.join("shrink-0020-path.png").is_file());
    }
}
