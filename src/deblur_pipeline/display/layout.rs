//! Declarative geometry of the comparison canvas.
//!
//! The layout is pure arithmetic on the source size and the margins, so it can
//! be checked without touching pixel data.

/// Canvas margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasMargins {
    pub top: usize,
    pub bottom: usize,
    pub sides: usize,
    pub between: usize,
}

impl Default for CanvasMargins {
    fn default() -> Self {
        Self {
            top: 100,
            bottom: 100,
            sides: 150,
            between: 150,
        }
    }
}

/// The three images of a comparison, in left-to-right order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelRole {
    Original,
    Blurred,
    Recovered,
}

impl PanelRole {
    pub const ALL: [PanelRole; 3] = [PanelRole::Original, PanelRole::Blurred, PanelRole::Recovered];

    pub fn title(self) -> &'static str {
        match self {
            PanelRole::Original => "Original Image",
            PanelRole::Blurred => "Blurred Image",
            PanelRole::Recovered => "Recovered Image",
        }
    }
}

/// One image slot: where it goes and what its title says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub role: PanelRole,
    pub title: &'static str,
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonLayout {
    pub canvas_width: usize,
    pub canvas_height: usize,
    pub margins: CanvasMargins,
    pub panels: Vec<Panel>,
}

impl ComparisonLayout {
    /// Lays out three `height x width` images.
    ///
    /// Canvas: `(height + top + bottom) x (3·width + 4·sides + 2·between)`.
    /// Panel `i` starts at `x = sides + i·(width + between)`, `y = top`. The
    /// right margin is whatever remains, which is wider than the left one.
    pub fn new(height: usize, width: usize, margins: CanvasMargins) -> Self {
        let canvas_width = 3 * width + 4 * margins.sides + 2 * margins.between;
        let canvas_height = height + margins.top + margins.bottom;

        let panels = PanelRole::ALL
            .iter()
            .enumerate()
            .map(|(i, &role)| Panel {
                role,
                title: role.title(),
                x: margins.sides + i * (width + margins.between),
                y: margins.top,
                width,
                height,
            })
            .collect();

        Self {
            canvas_width,
            canvas_height,
            margins,
            panels,
        }
    }

    /// `(height, width)`
    pub fn canvas_dimensions(&self) -> (usize, usize) {
        (self.canvas_height, self.canvas_width)
    }

    pub fn panel(&self, role: PanelRole) -> Option<&Panel> {
        self.panels.iter().find(|p| p.role == role)
    }
}
