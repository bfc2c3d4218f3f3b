//! Results artifact and human-facing run summary.

use crate::candidate::{Candidate, TemplatePeak};
use crate::classify::BandTally;
use crate::detect::Detection;
use crate::util::{IconMatchError, IconMatchResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// One entry of the results artifact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub confidence: f32,
    pub template: String,
}

impl From<&Candidate> for ResultRecord {
    fn from(value: &Candidate) -> Self {
        Self {
            x: value.bbox.x,
            y: value.bbox.y,
            width: value.bbox.width,
            height: value.bbox.height,
            confidence: value.confidence,
            template: value.template.clone(),
        }
    }
}

/// Serializes a selected set as a pretty JSON array, in selection order.
pub fn results_json(selected: &[Candidate]) -> IconMatchResult<String> {
    let records: Vec<ResultRecord> = selected.iter().map(ResultRecord::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Writes the results artifact to `path`.
pub fn write_results<P: AsRef<Path>>(path: P, selected: &[Candidate]) -> IconMatchResult<()> {
    let path = path.as_ref();
    let json = results_json(selected)?;
    std::fs::write(path, json).map_err(|err| IconMatchError::filesystem(path, err))
}

/// Console summary of a run. Not a stable format.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub image_size: (usize, usize),
    /// Templates whose best score stayed below the reporting cutoff.
    pub weak_peaks: Vec<TemplatePeak>,
    pub found: usize,
    pub not_found: Vec<String>,
    pub total_before: usize,
    pub total_after: usize,
    pub drawn: usize,
    pub tally: BandTally,
}

impl RunSummary {
    /// Builds a summary; peaks below `peak_cutoff` are listed individually.
    pub fn new(detection: &Detection, image_size: (usize, usize), peak_cutoff: f32) -> Self {
        Self {
            image_size,
            weak_peaks: detection
                .peaks
                .iter()
                .filter(|peak| peak.max_confidence < peak_cutoff)
                .cloned()
                .collect(),
            found: detection.found_templates(),
            not_found: detection.not_found.clone(),
            total_before: detection.total_before,
            total_after: detection.selected.len(),
            drawn: detection.annotations.len(),
            tally: detection.tally,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Reference image: {}x{}",
            self.image_size.0, self.image_size.1
        )?;
        if !self.weak_peaks.is_empty() {
            writeln!(f, "Template max confidences:")?;
            for peak in &self.weak_peaks {
                if peak.max_confidence.is_finite() {
                    writeln!(f, "  {}: {}", peak.template, peak.max_confidence)?;
                } else {
                    writeln!(f, "  {}: no scorable window", peak.template)?;
                }
            }
        }
        writeln!(f, "Templates found: {}", self.found)?;
        writeln!(f, "Templates not found: {}", self.not_found.len())?;
        for name in &self.not_found {
            writeln!(f, "  {name}")?;
        }
        writeln!(f, "Total results before NMS: {}", self.total_before)?;
        writeln!(f, "Total rectangles after NMS: {}", self.total_after)?;
        writeln!(f, "Drawn rectangles: {}", self.drawn)?;
        write!(
            f,
            "Confidence >=0.9: {}  [0.8,0.9): {}  [0.7,0.8): {}  <=0.6: {}",
            self.tally.high, self.tally.good, self.tally.fair, self.tally.weak
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{results_json, ResultRecord, RunSummary};
    use crate::candidate::{Candidate, TemplatePeak};
    use crate::classify::BandTally;
    use crate::geometry::BBox;

    #[test]
    fn unscorable_peaks_are_named_in_summary() {
        let summary = RunSummary {
            image_size: (80, 60),
            weak_peaks: vec![
                TemplatePeak {
                    template: "flat.png".to_string(),
                    max_confidence: f32::NEG_INFINITY,
                    matches: 0,
                },
                TemplatePeak {
                    template: "dim.png".to_string(),
                    max_confidence: 0.5,
                    matches: 0,
                },
            ],
            found: 0,
            not_found: vec!["flat.png".to_string(), "dim.png".to_string()],
            total_before: 0,
            total_after: 0,
            drawn: 0,
            tally: BandTally::default(),
        };
        let text = summary.to_string();
        assert!(text.contains("  flat.png: no scorable window\n"));
        assert!(text.contains("  dim.png: 0.5\n"));
        assert!(!text.contains("inf"));
    }

    #[test]
    fn results_keep_field_names_and_order() {
        let selected = vec![
            Candidate::new(BBox::new(10.0, 20.0, 50.0, 35.0), 0.95, "a.png"),
            Candidate::new(BBox::new(90.0, 20.0, 50.0, 35.0), 0.5, "b.png"),
        ];
        let json = results_json(&selected).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &value[0];
        for key in ["x", "y", "width", "height", "confidence", "template"] {
            assert!(first.get(key).is_some(), "missing {key}");
        }
        let records: Vec<ResultRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(records[0].template, "a.png");
        assert_eq!(records[1].confidence, 0.5);
        assert_eq!(records[1].x, 90.0);
    }
}
