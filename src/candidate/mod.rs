//! Detection candidates: pooling raw matches and pruning redundant ones.
//!
//! Raw matches come out of a [`crate::TemplateMatcher`] per template, get
//! tagged with their template id in [`aggregate`], and are reduced to a
//! non-overlapping set by [`suppress`].

pub(crate) mod aggregate;
pub(crate) mod nms;

pub use aggregate::{aggregate, Aggregation, CandidatePool, TemplatePeak};
pub use nms::{suppress, suppress_with, SuppressionConfig};

use crate::geometry::BBox;

/// A single raw hit reported by the matcher, before template identity is attached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawMatch {
    /// Placement of the template in the reference image.
    pub bbox: BBox,
    /// Matcher score; higher is better.
    pub confidence: f32,
}

impl RawMatch {
    /// Creates a raw match from placement and score.
    pub fn new(x: f32, y: f32, width: f32, height: f32, confidence: f32) -> Self {
        Self {
            bbox: BBox::new(x, y, width, height),
            confidence,
        }
    }
}

/// Matcher output for one template.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TemplateResult {
    /// Best score over every placement, including those below the threshold.
    ///
    /// `f32::NEG_INFINITY` when no placement could be scored, e.g. every
    /// window was too flat for the variance floor.
    pub max_confidence: f32,
    /// Placements whose score passed the matcher threshold.
    pub matches: Vec<RawMatch>,
}

/// A scored, labeled box competing for selection.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// Placement in the reference image.
    pub bbox: BBox,
    /// Matcher score; higher is better.
    pub confidence: f32,
    /// Identifier of the template that produced this candidate.
    pub template: String,
}

impl Candidate {
    /// Creates a candidate.
    pub fn new(bbox: BBox, confidence: f32, template: impl Into<String>) -> Self {
        Self {
            bbox,
            confidence,
            template: template.into(),
        }
    }

    /// Tags a raw match with the id of the template that produced it.
    pub fn from_raw(raw: RawMatch, template: impl Into<String>) -> Self {
        Self::new(raw.bbox, raw.confidence, template)
    }

    /// Returns true when the box is well formed and the score is finite.
    pub fn is_valid(&self) -> bool {
        self.bbox.is_well_formed() && self.confidence.is_finite()
    }
}
