use std::path::Path;

use crate::deblur_pipeline::common::error::Result;
use crate::deblur_pipeline::io::types::FloatImage;

pub trait ImageSource {
    fn read_image(&self, path: &Path) -> Result<FloatImage>;
}
