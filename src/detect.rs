//! Aggregation, suppression and classification chained into one stage.

use crate::candidate::{
    aggregate, suppress_with, Candidate, SuppressionConfig, TemplatePeak, TemplateResult,
};
use crate::classify::{classify, AnnotationDescriptor, BandTally, LabelPolicy};
use crate::trace::{trace_event, trace_span};
use crate::util::IconMatchResult;

/// Configuration for [`Detector`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectConfig {
    pub suppression: SuppressionConfig,
    pub labels: LabelPolicy,
}

/// Everything the core derives from one set of matcher results.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Detection {
    /// Surviving candidates in selection order.
    pub selected: Vec<Candidate>,
    /// Templates that produced no raw match, in template order.
    pub not_found: Vec<String>,
    /// Per-template best scores, in template order.
    pub peaks: Vec<TemplatePeak>,
    /// Pooled candidate count before suppression.
    pub total_before: usize,
    /// Overlays for the selected candidates that passed validation.
    pub annotations: Vec<AnnotationDescriptor>,
    pub tally: BandTally,
    /// Selected candidates discarded during classification.
    pub rejected: usize,
}

impl Detection {
    /// Number of templates with at least one raw match.
    pub fn found_templates(&self) -> usize {
        self.peaks.len() - self.not_found.len()
    }
}

/// Turns raw matcher output into a clean set of detections.
#[derive(Clone, Debug, Default)]
pub struct Detector {
    cfg: DetectConfig,
}

impl Detector {
    pub fn new(cfg: DetectConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &DetectConfig {
        &self.cfg
    }

    /// Runs aggregation, suppression and classification.
    ///
    /// `ids` name the templates in the same order as `results`.
    pub fn detect<S>(&self, ids: &[S], results: Vec<TemplateResult>) -> IconMatchResult<Detection>
    where
        S: AsRef<str>,
    {
        let _span = trace_span!("detect").entered();

        let agg = aggregate(ids, results)?;
        let total_before = agg.pool.len();
        let selected = suppress_with(agg.pool, &self.cfg.suppression);
        let classified = classify(&selected, &self.cfg.labels);

        trace_event!(
            "detect.done",
            before = total_before,
            after = selected.len(),
            not_found = agg.not_found.len(),
        );
        Ok(Detection {
            selected,
            not_found: agg.not_found,
            peaks: agg.peaks,
            total_before,
            annotations: classified.annotations,
            tally: classified.tally,
            rejected: classified.rejected,
        })
    }
}
