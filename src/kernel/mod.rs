//! Correlation kernel implementations.

use crate::template::TemplatePlan;
use crate::util::{IconMatchError, IconMatchResult};
use crate::ImageView;

/// Scan configuration for kernel evaluations.
#[derive(Clone, Copy, Debug)]
pub struct ScanParams {
    /// Minimum score for a placement to be reported as a hit.
    pub threshold: f32,
    /// Minimum variance (or energy, for NCC) of an image window to be scored.
    pub min_var_i: f32,
}

/// A placement whose score passed the threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// X coordinate (column) of the top-left corner.
    pub x: usize,
    /// Y coordinate (row) of the top-left corner.
    pub y: usize,
    pub score: f32,
}

/// Result of scanning every placement of one template.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreScan {
    /// Highest valid score seen, `NEG_INFINITY` when no window could be scored.
    pub max_score: f32,
    /// Hits in row-major placement order.
    pub hits: Vec<Hit>,
}

impl Default for ScoreScan {
    fn default() -> Self {
        Self {
            max_score: f32::NEG_INFINITY,
            hits: Vec::new(),
        }
    }
}

impl ScoreScan {
    fn merge(&mut self, other: ScoreScan) {
        self.max_score = self.max_score.max(other.max_score);
        self.hits.extend(other.hits);
    }
}

/// Kernel trait for scoring and scan operations.
pub trait Kernel {
    type Plan;

    /// Returns the plan width and height.
    fn plan_size(plan: &Self::Plan) -> (usize, usize);

    /// Computes the score at a single placement (top-left coordinates).
    ///
    /// Returns `NEG_INFINITY` for out-of-range placements and flat windows.
    fn score_at(
        image: ImageView<'_, u8>,
        plan: &Self::Plan,
        x: usize,
        y: usize,
        min_var_i: f32,
    ) -> f32;

    /// Scans the full valid placement range.
    fn scan_full(
        image: ImageView<'_, u8>,
        plan: &Self::Plan,
        params: ScanParams,
    ) -> IconMatchResult<ScoreScan> {
        let (max_x, max_y) = placement_range(image, Self::plan_size(plan))?;
        let mut scan = ScoreScan::default();
        for y in 0..=max_y {
            scan.merge(scan_row::<Self>(image, plan, y, max_x, params));
        }
        Ok(scan)
    }
}

/// Returns the largest valid top-left placement for a template size.
pub(crate) fn placement_range(
    image: ImageView<'_, u8>,
    (tpl_width, tpl_height): (usize, usize),
) -> IconMatchResult<(usize, usize)> {
    let img_width = image.width();
    let img_height = image.height();
    if img_width < tpl_width || img_height < tpl_height {
        return Err(IconMatchError::TemplateTooLarge {
            tpl_width,
            tpl_height,
            img_width,
            img_height,
        });
    }
    Ok((img_width - tpl_width, img_height - tpl_height))
}

pub(crate) fn scan_row<K: Kernel + ?Sized>(
    image: ImageView<'_, u8>,
    plan: &K::Plan,
    y: usize,
    max_x: usize,
    params: ScanParams,
) -> ScoreScan {
    let mut row = ScoreScan::default();
    for x in 0..=max_x {
        let score = K::score_at(image, plan, x, y, params.min_var_i);
        if !score.is_finite() {
            continue;
        }
        row.max_score = row.max_score.max(score);
        if score >= params.threshold {
            row.hits.push(Hit { x, y, score });
        }
    }
    row
}

/// Width and height of a template plan.
pub(crate) fn tpl_size(plan: &TemplatePlan) -> (usize, usize) {
    (plan.width(), plan.height())
}

pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;
