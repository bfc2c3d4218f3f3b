//! Rayon-parallel scans (feature-gated).
//!
//! Rows of placements are scored in parallel and merged in row order, so the
//! result is identical to [`Kernel::scan_full`].

use crate::kernel::{placement_range, scan_row, Kernel, ScanParams, ScoreScan};
use crate::util::IconMatchResult;
use crate::ImageView;
use rayon::prelude::*;

/// Row-parallel full scan for any kernel.
pub fn scan_full_par<K>(
    image: ImageView<'_, u8>,
    plan: &K::Plan,
    params: ScanParams,
) -> IconMatchResult<ScoreScan>
where
    K: Kernel,
    K::Plan: Sync,
{
    let (max_x, max_y) = placement_range(image, K::plan_size(plan))?;

    let rows: Vec<ScoreScan> = (0..=max_y)
        .into_par_iter()
        .map(|y| scan_row::<K>(image, plan, y, max_x, params))
        .collect();

    let mut scan = ScoreScan::default();
    for row in rows {
        scan.merge(row);
    }
    Ok(scan)
}
