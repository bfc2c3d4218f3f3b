//! Asymmetric non-maximum suppression over labeled candidates.
//!
//! Same-template duplicates (the matcher firing on shifted windows of one icon)
//! are removed on overlap alone. Boxes of different templates must overlap more
//! before one can hide the other, and a dominant confidence ratio marks the
//! weaker box as noise. These thresholds are tunable policy, not geometry.

use crate::candidate::Candidate;
use crate::trace::{trace_event, trace_span, trace_warn};

/// Thresholds for [`suppress_with`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SuppressionConfig {
    /// IoU at or above which a same-template candidate is dropped.
    pub same_template_iou: f32,
    /// IoU at or above which a different-template candidate is dropped.
    pub cross_template_iou: f32,
    /// Confidence ratio (`best / other`) above which `best` dominates `other`.
    pub confidence_ratio: f32,
}

impl Default for SuppressionConfig {
    fn default() -> Self {
        Self {
            same_template_iou: 0.2,
            cross_template_iou: 0.5,
            confidence_ratio: 1.5,
        }
    }
}

impl SuppressionConfig {
    /// Uses `same_template_iou` with the default cross-template policy.
    pub fn with_same_template_iou(same_template_iou: f32) -> Self {
        Self {
            same_template_iou,
            ..Self::default()
        }
    }

    /// Returns true when `best` outweighs `other` by more than the ratio threshold.
    ///
    /// A zero `other` score counts as an infinite ratio unless `best` is zero too.
    fn dominates(&self, best: f32, other: f32) -> bool {
        if other == 0.0 {
            return best != 0.0;
        }
        best / other > self.confidence_ratio
    }

    /// Returns true when `other` is redundant given the already selected `best`.
    ///
    /// For different templates the ratio-gated rule only fires when the plain
    /// `iou >= cross_template_iou` rule fires as well, so a low ratio never
    /// keeps a candidate alive. The net effect is kept as-is.
    pub fn suppresses(&self, best: &Candidate, other: &Candidate) -> bool {
        let iou = best.bbox.iou(&other.bbox);
        if best.template == other.template {
            return iou >= self.same_template_iou;
        }
        if iou > self.cross_template_iou && self.dominates(best.confidence, other.confidence) {
            return true;
        }
        iou >= self.cross_template_iou
    }
}

/// Runs suppression with the default cross-template policy.
pub fn suppress<I>(pool: I, same_template_iou: f32) -> Vec<Candidate>
where
    I: IntoIterator<Item = Candidate>,
{
    suppress_with(pool, &SuppressionConfig::with_same_template_iou(same_template_iou))
}

/// Greedy, confidence-ordered suppression.
///
/// Candidates with non-finite or empty boxes, or a non-finite score, are
/// dropped before any comparison. The rest are sorted by descending
/// confidence; equal scores keep their input order. Each round emits the head
/// of the remaining set and rebuilds the set from the candidates it does not
/// suppress.
///
/// The output is in selection order. Every selected candidate comes from the
/// input, and running the function again on its output returns it unchanged.
pub fn suppress_with<I>(pool: I, cfg: &SuppressionConfig) -> Vec<Candidate>
where
    I: IntoIterator<Item = Candidate>,
{
    let _span = trace_span!("suppress").entered();

    let mut remaining: Vec<Candidate> = Vec::new();
    let mut rejected = 0usize;
    for candidate in pool {
        if candidate.is_valid() {
            remaining.push(candidate);
        } else {
            rejected += 1;
            trace_warn!(
                "suppress.reject",
                template = candidate.template.as_str(),
                x = candidate.bbox.x,
                y = candidate.bbox.y,
                width = candidate.bbox.width,
                height = candidate.bbox.height,
            );
        }
    }
    let input_len = remaining.len() + rejected;

    // Stable sort: ties stay in pool order.
    remaining.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut selected = Vec::new();
    while !remaining.is_empty() {
        let mut rest = remaining.into_iter();
        let Some(best) = rest.next() else {
            break;
        };
        remaining = rest.filter(|other| !cfg.suppresses(&best, other)).collect();
        selected.push(best);
    }

    trace_event!(
        "suppress.done",
        input = input_len,
        rejected = rejected,
        selected = selected.len(),
    );
    selected
}
