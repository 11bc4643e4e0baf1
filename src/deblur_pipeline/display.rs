//! Display module
//!
//! Gamma remapping and the side-by-side comparison canvas. Nothing here feeds
//! back into the numerical restoration.

pub mod gamma;
pub mod layout;
mod compositor;
mod titles;

pub use compositor::{ComparisonImages, Compositor, compose_canvas};
pub use gamma::{DEFAULT_GAMMA, adjust_gamma};
pub use layout::{CanvasMargins, ComparisonLayout, Panel, PanelRole};
pub use titles::TitleRenderer;
