//! Bold panel titles drawn with `imageproc` and a TrueType font.

use std::path::Path;

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};
use tracing::debug;

use crate::deblur_pipeline::common::error::{RestoreError, Result};
use crate::deblur_pipeline::display::layout::{ComparisonLayout, Panel};

/// Pixel height of the title glyphs.
pub const TITLE_SCALE: f32 = 33.0;

/// Gap between the bottom of a title and the top of its panel.
const TITLE_GAP: i32 = 30;

/// Center pass plus a one-pixel stroke in the four cardinal directions.
const STROKE_OFFSETS: [(i32, i32); 5] = [(0, 0), (1, 0), (0, 1), (-1, 0), (0, -1)];

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

pub struct TitleRenderer {
    font: Font<'static>,
    scale: Scale,
    color: Rgb<u8>,
}

impl TitleRenderer {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| RestoreError::FontError("not a TrueType/OpenType font".to_string()))?;
        Ok(Self {
            font,
            scale: Scale::uniform(TITLE_SCALE),
            color: Rgb([0, 0, 0]),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| RestoreError::FontError(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(bytes)
            .map_err(|e| RestoreError::FontError(format!("{}: {}", path.display(), e)))
    }

    /// First loadable font among well-known system locations.
    pub fn discover() -> Option<Self> {
        FONT_CANDIDATES.iter().map(Path::new).find_map(|path| {
            let renderer = Self::from_file(path).ok()?;
            debug!("Using title font {}", path.display());
            Some(renderer)
        })
    }

    /// Top-left corner for a title centered over `panel` and sitting above it.
    pub fn title_origin(&self, panel: &Panel) -> (i32, i32) {
        let (text_width, text_height) = text_size(self.scale, &self.font, panel.title);
        let x = panel.x as i32 + (panel.width as i32 - text_width) / 2;
        let y = (panel.y as i32 - TITLE_GAP - text_height).max(0);
        (x, y)
    }

    pub fn draw(&self, canvas: &mut RgbImage, layout: &ComparisonLayout) {
        for panel in &layout.panels {
            let (x, y) = self.title_origin(panel);
            for (dx, dy) in STROKE_OFFSETS {
                draw_text_mut(canvas, self.color, x + dx, y + dy, self.scale, &self.font, panel.title);
            }
        }
    }
}
