//! Per-template match search over a reference image.
//!
//! [`TemplateMatcher`] is the seam between the detection core and whatever
//! produces raw scores. [`CorrelationMatcher`] is the bundled implementation:
//! an exhaustive normalized-correlation scan that reports every placement at
//! or above a threshold.

use crate::candidate::{RawMatch, TemplateResult};
use crate::kernel::scalar::{NccScalar, ZnccScalar};
use crate::kernel::{Kernel, ScanParams, ScoreScan};
use crate::template::{Template, TemplatePlan};
use crate::trace::{trace_event, trace_span};
use crate::util::IconMatchResult;
use crate::ImageView;

/// Scoring metric used by [`CorrelationMatcher`]. Both are higher-is-better.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Metric {
    /// Zero-mean normalized cross-correlation (correlation coefficient).
    #[default]
    Zncc,
    /// Normalized cross-correlation without mean removal.
    Ncc,
}

/// Configuration for [`CorrelationMatcher`].
#[derive(Clone, Debug)]
pub struct MatchConfig {
    pub metric: Metric,
    /// Minimum score for a placement to be reported as a match.
    pub threshold: f32,
    /// Minimum image-window variance; flatter windows are not scored.
    pub min_var_i: f32,
    /// Scan rows in parallel when the `rayon` feature is enabled.
    pub parallel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            metric: Metric::Zncc,
            threshold: 0.833,
            min_var_i: 1e-6,
            parallel: false,
        }
    }
}

/// Produces raw per-template matches for a reference image.
pub trait TemplateMatcher {
    /// Matches every template against `image`.
    ///
    /// Returns one result per template, in the order given.
    fn match_templates(
        &self,
        image: ImageView<'_, u8>,
        templates: &[Template],
    ) -> IconMatchResult<Vec<TemplateResult>>;
}

/// Exhaustive normalized-correlation matcher.
#[derive(Clone, Debug, Default)]
pub struct CorrelationMatcher {
    cfg: MatchConfig,
}

impl CorrelationMatcher {
    /// Creates a matcher with the given configuration.
    pub fn new(cfg: MatchConfig) -> Self {
        Self { cfg }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Matches a single template.
    pub fn match_one(
        &self,
        image: ImageView<'_, u8>,
        template: &Template,
    ) -> IconMatchResult<TemplateResult> {
        let plan = TemplatePlan::from_view(template.view())?;
        let params = ScanParams {
            threshold: self.cfg.threshold,
            min_var_i: self.cfg.min_var_i,
        };
        let scan = match self.cfg.metric {
            Metric::Zncc => self.scan::<ZnccScalar>(image, &plan, params)?,
            Metric::Ncc => self.scan::<NccScalar>(image, &plan, params)?,
        };

        let width = plan.width() as f32;
        let height = plan.height() as f32;
        let matches = scan
            .hits
            .into_iter()
            .map(|hit| RawMatch::new(hit.x as f32, hit.y as f32, width, height, hit.score))
            .collect();
        Ok(TemplateResult {
            max_confidence: scan.max_score,
            matches,
        })
    }

    fn scan<K>(
        &self,
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        params: ScanParams,
    ) -> IconMatchResult<ScoreScan>
    where
        K: Kernel<Plan = TemplatePlan>,
    {
        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            return crate::kernel::rayon::scan_full_par::<K>(image, plan, params);
        }
        K::scan_full(image, plan, params)
    }
}

impl TemplateMatcher for CorrelationMatcher {
    fn match_templates(
        &self,
        image: ImageView<'_, u8>,
        templates: &[Template],
    ) -> IconMatchResult<Vec<TemplateResult>> {
        let _span = trace_span!("match_templates", templates = templates.len()).entered();

        let mut results = Vec::with_capacity(templates.len());
        for (idx, template) in templates.iter().enumerate() {
            let result = self.match_one(image, template)?;
            trace_event!(
                "match_templates.template",
                index = idx,
                max_confidence = result.max_confidence,
                matches = result.matches.len(),
            );
            results.push(result);
        }
        Ok(results)
    }
}
