use thiserror::Error;

#[derive(Error, Debug)]
pub enum RestoreError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode PNG image: {0}")]
    EncodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("PSF of shape {psf:?} does not fit into target shape {target:?}")]
    PsfTooLarge {
        psf: (usize, usize),
        target: (usize, usize),
    },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Font error: {0}")]
    FontError(String),
}

impl RestoreError {
    /// Missing or undecodable inputs are skipped by a batch instead of counted as failures.
    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::InputReadError(_) | Self::DecodeError(_))
    }

    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RestoreError>;
