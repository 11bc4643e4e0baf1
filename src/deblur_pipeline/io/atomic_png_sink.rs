use std::io::{Cursor, Write};
use std::path::Path;

use image::{ImageOutputFormat, RgbImage};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::deblur_pipeline::common::error::{RestoreError, Result};
use crate::deblur_pipeline::io::sink::ImageSink;

/// PNG writer that never leaves a partial file at the destination.
///
/// The image is encoded in memory first, then written to a temporary file in
/// the destination directory and renamed over the target path. If encoding or
/// writing fails the temporary file is dropped and removed.
pub struct AtomicPngSink;

impl ImageSink for AtomicPngSink {
    fn write_png(&self, image: &RgbImage, path: &Path) -> Result<()> {
        debug!("Encoding PNG image: {}x{}", image.width(), image.height());

        let mut buffer = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buffer), ImageOutputFormat::Png)
            .map_err(|e| RestoreError::EncodeError(e.to_string()))?;

        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut staged = NamedTempFile::new_in(directory).map_err(|e| {
            RestoreError::OutputWriteError(format!("{}: {}", directory.display(), e))
        })?;
        staged
            .write_all(&buffer)
            .and_then(|_| staged.flush())
            .map_err(|e| RestoreError::OutputWriteError(format!("{}: {}", path.display(), e)))?;
        staged.persist(path).map_err(|e| {
            RestoreError::OutputWriteError(format!("{}: {}", path.display(), e.error))
        })?;

        debug!("PNG written to {} ({} bytes)", path.display(), buffer.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_writes_decodable_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let image = RgbImage::from_pixel(7, 3, Rgb([10, 20, 30]));

        AtomicPngSink.write_png(&image, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded, image);
        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_missing_directory_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_created").join("out.png");
        let image = RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]));

        let err = AtomicPngSink.write_png(&image, &path).unwrap_err();
        assert!(matches!(err, RestoreError::OutputWriteError(_)));
        assert!(!path.exists());
    }
}
