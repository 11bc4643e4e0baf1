use image::RgbImage;
use ndarray::{Array2, s};
use tracing::debug;

use crate::deblur_pipeline::common::error::{RestoreError, Result};
use crate::deblur_pipeline::display::layout::{CanvasMargins, ComparisonLayout, PanelRole};
use crate::deblur_pipeline::display::titles::TitleRenderer;
use crate::deblur_pipeline::io::types::FloatImage;

/// The three display-ready images of one comparison.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonImages<'a> {
    pub original: &'a FloatImage,
    pub blurred: &'a FloatImage,
    pub recovered: &'a FloatImage,
}

impl<'a> ComparisonImages<'a> {
    pub fn get(&self, role: PanelRole) -> &'a FloatImage {
        match role {
            PanelRole::Original => self.original,
            PanelRole::Blurred => self.blurred,
            PanelRole::Recovered => self.recovered,
        }
    }
}

/// Paints every panel of `layout` onto a white floating-point canvas.
///
/// Images are copied as-is; no scaling happens, so each image must match its
/// panel exactly.
pub fn compose_canvas(layout: &ComparisonLayout, images: &ComparisonImages<'_>) -> Result<FloatImage> {
    let (height, width) = layout.canvas_dimensions();
    let mut planes: [Array2<f32>; 3] = std::array::from_fn(|_| Array2::from_elem((height, width), 1.0));

    for panel in &layout.panels {
        let image = images.get(panel.role);
        if image.dimensions() != (panel.height, panel.width) {
            return Err(RestoreError::ShapeMismatch {
                expected: (panel.height, panel.width),
                actual: image.dimensions(),
            });
        }
        for (plane, source) in planes.iter_mut().zip(image.channels()) {
            plane
                .slice_mut(s![panel.y..panel.y + panel.height, panel.x..panel.x + panel.width])
                .assign(source);
        }
    }

    FloatImage::from_channels(planes)
}

/// Renders comparison canvases with a fixed set of margins and optional titles.
pub struct Compositor {
    margins: CanvasMargins,
    titles: Option<TitleRenderer>,
}

impl Compositor {
    pub fn new(margins: CanvasMargins, titles: Option<TitleRenderer>) -> Self {
        Self { margins, titles }
    }

    pub fn margins(&self) -> CanvasMargins {
        self.margins
    }

    pub fn has_titles(&self) -> bool {
        self.titles.is_some()
    }

    pub fn layout_for(&self, images: &ComparisonImages<'_>) -> ComparisonLayout {
        let (height, width) = images.original.dimensions();
        ComparisonLayout::new(height, width, self.margins)
    }

    /// Builds the 8-bit comparison image: layout, paste, quantize, then titles.
    pub fn render(&self, images: &ComparisonImages<'_>) -> Result<RgbImage> {
        let layout = self.layout_for(images);
        let canvas = compose_canvas(&layout, images)?;
        let mut rgb = canvas.to_rgb8();

        if let Some(titles) = &self.titles {
            titles.draw(&mut rgb, &layout);
        }

        debug!(
            "Composited canvas {}x{} with {} panels",
            layout.canvas_width,
            layout.canvas_height,
            layout.panels.len()
        );
        Ok(rgb)
    }
}
