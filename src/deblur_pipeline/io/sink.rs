use std::path::Path;

use image::RgbImage;

use crate::deblur_pipeline::common::error::Result;

pub trait ImageSink {
    fn write_png(&self, image: &RgbImage, path: &Path) -> Result<()>;
}
