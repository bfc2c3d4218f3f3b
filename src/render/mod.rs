//! Overlay rendering for annotation descriptors.

mod svg;

#[cfg(feature = "image-io")]
mod compose;

pub use svg::{overlay_document, overlay_svg};

#[cfg(feature = "image-io")]
pub use compose::{compose_annotations, draw_annotations, parse_hex_color};
