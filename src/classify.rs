//! Confidence banding and annotation descriptors for selected candidates.

use crate::candidate::Candidate;
use crate::trace::{trace_event, trace_span, trace_warn};

/// Confidence band used for styling and summary tallies.
///
/// Bands are `[0.9, inf)`, `[0.8, 0.9)`, `[0.7, 0.8)` and `(-inf, 0.6]`.
/// Scores in `(0.6, 0.7)` fall in no band and are not tallied; they are still
/// drawn, using the weak style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfidenceBand {
    High,
    Good,
    Fair,
    Weak,
}

impl ConfidenceBand {
    /// Returns the band for a score, or `None` for the untallied gap and NaN.
    pub fn of(confidence: f32) -> Option<Self> {
        if confidence >= 0.9 {
            Some(Self::High)
        } else if confidence >= 0.8 {
            Some(Self::Good)
        } else if confidence >= 0.7 {
            Some(Self::Fair)
        } else if confidence <= 0.6 {
            Some(Self::Weak)
        } else {
            None
        }
    }

    /// Returns the stroke used to draw boxes in this band.
    pub fn stroke(self) -> Stroke {
        match self {
            Self::High => Stroke {
                color: "#38E6FF",
                width: 3,
            },
            Self::Good => Stroke {
                color: "#8F0CB6",
                width: 2,
            },
            Self::Fair => Stroke {
                color: "#C03D0C",
                width: 2,
            },
            Self::Weak => Stroke {
                color: "#E1625B",
                width: 3,
            },
        }
    }
}

/// Stroke color (`#RRGGBB`) and width in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stroke {
    pub color: &'static str,
    pub width: u32,
}

/// Counts of selected candidates per confidence band.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BandTally {
    pub high: usize,
    pub good: usize,
    pub fair: usize,
    pub weak: usize,
}

impl BandTally {
    /// Counts `confidence` in its band; the `(0.6, 0.7)` gap is ignored.
    pub fn record(&mut self, confidence: f32) {
        match ConfidenceBand::of(confidence) {
            Some(ConfidenceBand::High) => self.high += 1,
            Some(ConfidenceBand::Good) => self.good += 1,
            Some(ConfidenceBand::Fair) => self.fair += 1,
            Some(ConfidenceBand::Weak) => self.weak += 1,
            None => {}
        }
    }

    /// Sum over all four bands.
    pub fn total(&self) -> usize {
        self.high + self.good + self.fair + self.weak
    }
}

/// How template ids are shortened into overlay labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelPolicy {
    /// Token removed from the id (first occurrence) before truncation.
    pub strip_token: String,
    /// Maximum label length in characters.
    pub max_chars: usize,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self {
            strip_token: "_png".to_string(),
            max_chars: 5,
        }
    }
}

impl LabelPolicy {
    /// Builds the overlay label for a template id.
    pub fn label(&self, template: &str) -> String {
        let stripped = if self.strip_token.is_empty() {
            template.to_string()
        } else {
            template.replacen(self.strip_token.as_str(), "", 1)
        };
        stripped
            .chars()
            .filter(|c| !c.is_control())
            .take(self.max_chars)
            .collect()
    }
}

/// Renderable overlay for one selected candidate.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationDescriptor {
    /// Floored x coordinate of the top-left corner.
    pub left: i64,
    /// Floored y coordinate of the top-left corner.
    pub top: i64,
    /// Drawn rectangle width in pixels (at least 1).
    pub width: u32,
    /// Drawn rectangle height in pixels (at least 1).
    pub height: u32,
    pub stroke: Stroke,
    /// Short label derived from the template id.
    pub label: String,
    /// Band of the source candidate, if any.
    pub band: Option<ConfidenceBand>,
}

/// Output of [`classify`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Classification {
    /// One descriptor per accepted candidate, in selection order.
    pub annotations: Vec<AnnotationDescriptor>,
    pub tally: BandTally,
    /// Candidates discarded for non-finite geometry.
    pub rejected: usize,
}

fn extent(value: f32) -> u32 {
    value.round().clamp(1.0, u32::MAX as f32) as u32
}

/// Builds annotation descriptors and band tallies for a selected set.
pub fn classify(selected: &[Candidate], labels: &LabelPolicy) -> Classification {
    let _span = trace_span!("classify").entered();

    let mut out = Classification::default();
    for candidate in selected {
        let bbox = candidate.bbox;
        if !bbox.is_finite() {
            out.rejected += 1;
            trace_warn!(
                "classify.reject",
                template = candidate.template.as_str(),
                x = bbox.x,
                y = bbox.y,
                width = bbox.width,
                height = bbox.height,
            );
            continue;
        }

        let band = ConfidenceBand::of(candidate.confidence);
        out.tally.record(candidate.confidence);
        out.annotations.push(AnnotationDescriptor {
            left: bbox.x.floor() as i64,
            top: bbox.y.floor() as i64,
            width: extent(bbox.width),
            height: extent(bbox.height),
            stroke: band.unwrap_or(ConfidenceBand::Weak).stroke(),
            label: labels.label(&candidate.template),
            band,
        });
    }

    trace_event!(
        "classify.done",
        drawn = out.annotations.len(),
        rejected = out.rejected,
        high = out.tally.high,
        good = out.tally.good,
        fair = out.tally.fair,
        weak = out.tally.weak,
    );
    out
}

#[cfg(test)]
mod tests {
    use super::{classify, BandTally, ConfidenceBand, LabelPolicy};
    use crate::candidate::Candidate;
    use crate::geometry::BBox;

    #[test]
    fn band_edges_are_half_open() {
        assert_eq!(ConfidenceBand::of(0.9), Some(ConfidenceBand::High));
        assert_eq!(ConfidenceBand::of(0.8999), Some(ConfidenceBand::Good));
        assert_eq!(ConfidenceBand::of(0.8), Some(ConfidenceBand::Good));
        assert_eq!(ConfidenceBand::of(0.7), Some(ConfidenceBand::Fair));
        assert_eq!(ConfidenceBand::of(0.65), None);
        assert_eq!(ConfidenceBand::of(0.6), Some(ConfidenceBand::Weak));
        assert_eq!(ConfidenceBand::of(f32::NAN), None);
    }

    #[test]
    fn gap_scores_are_not_tallied() {
        let mut tally = BandTally::default();
        for c in [0.65, 0.6, 0.9] {
            tally.record(c);
        }
        assert_eq!(
            tally,
            BandTally {
                high: 1,
                good: 0,
                fair: 0,
                weak: 1
            }
        );
    }

    #[test]
    fn label_strips_token_and_truncates() {
        let policy = LabelPolicy::default();
        assert_eq!(policy.label("sword_png.png"), "sword");
        assert_eq!(policy.label("ab_png"), "ab");
        assert_eq!(policy.label("shield.png"), "shiel");
        assert_eq!(policy.label("épée.png"), "épée.");
    }

    #[test]
    fn descriptor_uses_floored_position() {
        let selected = vec![Candidate::new(
            BBox::new(10.7, 20.2, 50.0, 35.0),
            0.85,
            "gem.png",
        )];
        let out = classify(&selected, &LabelPolicy::default());
        let desc = &out.annotations[0];
        assert_eq!((desc.left, desc.top), (10, 20));
        assert_eq!((desc.width, desc.height), (50, 35));
        assert_eq!(desc.stroke.color, "#8F0CB6");
        assert_eq!(desc.stroke.width, 2);
        assert_eq!(desc.label, "gem.p");
    }

    #[test]
    fn non_finite_geometry_is_rejected() {
        let selected = vec![
            Candidate::new(BBox::new(f32::NAN, 0.0, 5.0, 5.0), 0.95, "a"),
            Candidate::new(BBox::new(0.0, 0.0, 5.0, 5.0), 0.95, "b"),
        ];
        let out = classify(&selected, &LabelPolicy::default());
        assert_eq!(out.rejected, 1);
        assert_eq!(out.annotations.len(), 1);
        assert_eq!(out.tally.high, 1);
    }

    #[test]
    fn gap_score_is_drawn_with_weak_stroke() {
        let selected = vec![Candidate::new(BBox::new(0.0, 0.0, 5.0, 5.0), 0.65, "a")];
        let out = classify(&selected, &LabelPolicy::default());
        assert_eq!(out.annotations[0].band, None);
        assert_eq!(out.annotations[0].stroke, ConfidenceBand::Weak.stroke());
        assert_eq!(out.tally.total(), 0);
    }
}
