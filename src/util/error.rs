//! Error types for iconmatch.

use thiserror::Error;

/// Result alias for iconmatch operations.
pub type IconMatchResult<T> = std::result::Result<T, IconMatchError>;

/// Errors that can occur while matching, suppressing or rendering detections.
///
/// Malformed candidates are not errors: they are dropped with a warning event.
/// Every variant here is fatal to a pipeline run.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum IconMatchError {
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Image dimensions are zero or overflow.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The backing buffer is too small for the requested view.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The template has no intensity variation and cannot be correlated.
    #[error("degenerate template: {reason}")]
    DegenerateTemplate { reason: &'static str },
    /// The template does not fit inside the reference image.
    #[error("template {tpl_width}x{tpl_height} larger than image {img_width}x{img_height}")]
    TemplateTooLarge {
        tpl_width: usize,
        tpl_height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The matcher returned a different number of results than templates submitted.
    #[error("expected {expected} template results, got {got}")]
    TemplateCountMismatch { expected: usize, got: usize },
    /// Decoding, resizing or encoding an image failed.
    #[error("image i/o failed for {path}: {reason}")]
    ImageIo { path: String, reason: String },
    /// A filesystem operation failed.
    #[error("filesystem error at {path}: {reason}")]
    Filesystem { path: String, reason: String },
    /// Serializing the results artifact failed.
    #[error("serialization failed: {reason}")]
    Serialize { reason: String },
}

impl IconMatchError {
    pub(crate) fn filesystem(path: &std::path::Path, err: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for IconMatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize {
            reason: err.to_string(),
        }
    }
}
