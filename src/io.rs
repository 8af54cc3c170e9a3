// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reading and writing pixel buffers.  The format is chosen by `image`
//! from the file contents on load and from the extension on save.

use crate::error::{CarveError, Result};
use crate::pixelbuffer::PixelBuffer;
use log::info;
use std::path::Path;

/// Load any image `image` can decode, flattened to 8-bit RGB.
pub fn load<P: AsRef<Path>>(path: P) -> Result<PixelBuffer> {
    let path = path.as_ref();
    let decoded = image::open(path).map_err(|e| CarveError::Decode {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let buffer = PixelBuffer::from_image(&decoded.to_rgb8());
    info!(
        "loaded {} ({}x{})",
        path.display(),
        buffer.width(),
        buffer.height()
    );
    Ok(buffer)
}

/// Save a buffer.  Use a lossless format (PNG) for the result.
pub fn save<P: AsRef<Path>>(buffer: &PixelBuffer, path: P) -> Result<()> {
    let path = path.as_ref();
    buffer
        .to_image()
        .save(path)
        .map_err(|e| CarveError::Write {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        let mut buf = PixelBuffer::new(3, 2, Rgb([10, 20, 30]));
        buf.put_pixel(2, 1, Rgb([200, 100, 0]));
        save(&buf, &path).unwrap();
        assert_eq!(load(&path).unwrap(), buf);
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        match load(dir.path().join("nope.png")) {
            Err(CarveError::Decode { .. }) => {}
            other => panic!("expected a decode error, got {:?}", other),
        }
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(match load(&path) {
            Err(CarveError::Decode { .. }) => true,
            _ => false,
        });
    }

    #[test]
    fn unwritable_path_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let buf = PixelBuffer::new(1, 1, Rgb([0, 0, 0]));
        let path = dir.path().join("missing-dir").join("out.png");
        match save(&buf, path) {
            Err(CarveError::Write { .. }) => {}
            other => panic!("expected a write error, got {:?}", other),
        }
    }
}
