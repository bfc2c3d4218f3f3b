//! Scalar reference kernels for score evaluation.

use crate::kernel::{tpl_size, Kernel};
use crate::template::TemplatePlan;
use crate::ImageView;

/// Zero-mean normalized cross-correlation (correlation coefficient).
pub(crate) struct ZnccScalar;

/// Normalized cross-correlation without mean removal.
pub(crate) struct NccScalar;

fn fits(image: ImageView<'_, u8>, plan: &TemplatePlan, x: usize, y: usize) -> bool {
    image.width() >= plan.width()
        && image.height() >= plan.height()
        && x <= image.width() - plan.width()
        && y <= image.height() - plan.height()
}

impl Kernel for ZnccScalar {
    type Plan = TemplatePlan;

    fn plan_size(plan: &Self::Plan) -> (usize, usize) {
        tpl_size(plan)
    }

    fn score_at(
        image: ImageView<'_, u8>,
        tpl: &Self::Plan,
        x: usize,
        y: usize,
        min_var_i: f32,
    ) -> f32 {
        if !fits(image, tpl, x, y) {
            return f32::NEG_INFINITY;
        }
        let var_t = tpl.var_t() as f64;
        if var_t <= 1e-8 {
            return f32::NEG_INFINITY;
        }
        let tpl_width = tpl.width();
        let t_prime = tpl.t_prime();
        let n = (tpl_width * tpl.height()) as f64;

        let mut dot = 0.0f64;
        let mut sum_i = 0.0f64;
        let mut sum_i2 = 0.0f64;
        for ty in 0..tpl.height() {
            let Some(img_row) = image.row(y + ty) else {
                return f32::NEG_INFINITY;
            };
            let window = &img_row[x..x + tpl_width];
            let tpl_row = &t_prime[ty * tpl_width..(ty + 1) * tpl_width];
            for (&value, &t) in window.iter().zip(tpl_row) {
                let v = value as f64;
                dot += t as f64 * v;
                sum_i += v;
                sum_i2 += v * v;
            }
        }

        let var_i = sum_i2 - (sum_i * sum_i) / n;
        if var_i <= min_var_i as f64 {
            return f32::NEG_INFINITY;
        }
        let score = (dot / (var_t * var_i).sqrt()) as f32;
        if score.is_finite() {
            score
        } else {
            f32::NEG_INFINITY
        }
    }
}

impl Kernel for NccScalar {
    type Plan = TemplatePlan;

    fn plan_size(plan: &Self::Plan) -> (usize, usize) {
        tpl_size(plan)
    }

    fn score_at(
        image: ImageView<'_, u8>,
        tpl: &Self::Plan,
        x: usize,
        y: usize,
        min_var_i: f32,
    ) -> f32 {
        if !fits(image, tpl, x, y) {
            return f32::NEG_INFINITY;
        }
        let sum_t2 = tpl.sum_t2() as f64;
        let tpl_width = tpl.width();
        let values = tpl.values();

        let mut dot = 0.0f64;
        let mut sum_i2 = 0.0f64;
        for ty in 0..tpl.height() {
            let Some(img_row) = image.row(y + ty) else {
                return f32::NEG_INFINITY;
            };
            let window = &img_row[x..x + tpl_width];
            let tpl_row = &values[ty * tpl_width..(ty + 1) * tpl_width];
            for (&value, &t) in window.iter().zip(tpl_row) {
                let v = value as f64;
                dot += t as f64 * v;
                sum_i2 += v * v;
            }
        }

        if sum_i2 <= min_var_i as f64 {
            return f32::NEG_INFINITY;
        }
        let score = (dot / (sum_t2 * sum_i2).sqrt()) as f32;
        if score.is_finite() {
            score
        } else {
            f32::NEG_INFINITY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NccScalar, ZnccScalar};
    use crate::kernel::{Kernel, ScanParams};
    use crate::template::TemplatePlan;
    use crate::util::IconMatchError;
    use crate::ImageView;

    fn make_image(width: usize, height: usize) -> Vec<u8> {
        let mut image = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                image.push(((x * 17 + y * 9 + x * y) & 0xFF) as u8);
            }
        }
        image
    }

    fn extract(image: &[u8], img_width: usize, x0: usize, y0: usize, w: usize, h: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(w * h);
        for y in 0..h {
            let row = (y0 + y) * img_width;
            out.extend_from_slice(&image[row + x0..row + x0 + w]);
        }
        out
    }

    #[test]
    fn zncc_peaks_at_source_location() {
        let (img_width, img_height) = (24, 20);
        let image = make_image(img_width, img_height);
        let tpl_data = extract(&image, img_width, 7, 5, 6, 5);
        let tpl_view = ImageView::from_slice(&tpl_data, 6, 5).unwrap();
        let plan = TemplatePlan::from_view(tpl_view).unwrap();
        let view = ImageView::from_slice(&image, img_width, img_height).unwrap();

        let score = ZnccScalar::score_at(view, &plan, 7, 5, 1e-8);
        assert!((score - 1.0).abs() < 1e-4);

        let scan = ZnccScalar::scan_full(
            view,
            &plan,
            ScanParams {
                threshold: 0.999,
                min_var_i: 1e-8,
            },
        )
        .unwrap();
        assert!((scan.max_score - 1.0).abs() < 1e-4);
        assert!(scan.hits.iter().any(|hit| hit.x == 7 && hit.y == 5));
    }

    #[test]
    fn zncc_is_invariant_to_brightness_offset() {
        let tpl_data: Vec<u8> = (0u8..16).map(|v| v * 3).collect();
        let shifted: Vec<u8> = tpl_data.iter().map(|v| v + 40).collect();
        let plan = TemplatePlan::from_view(ImageView::from_slice(&tpl_data, 4, 4).unwrap()).unwrap();
        let view = ImageView::from_slice(&shifted, 4, 4).unwrap();
        let zncc = ZnccScalar::score_at(view, &plan, 0, 0, 1e-8);
        let ncc = NccScalar::score_at(view, &plan, 0, 0, 1e-8);
        assert!((zncc - 1.0).abs() < 1e-4);
        assert!(ncc < zncc);
    }

    #[test]
    fn flat_window_has_no_score() {
        let tpl_data: Vec<u8> = (0u8..4).collect();
        let plan = TemplatePlan::from_view(ImageView::from_slice(&tpl_data, 2, 2).unwrap()).unwrap();
        let image = vec![9u8; 9];
        let view = ImageView::from_slice(&image, 3, 3).unwrap();
        assert_eq!(ZnccScalar::score_at(view, &plan, 0, 0, 1e-8), f32::NEG_INFINITY);
        assert_eq!(ZnccScalar::score_at(view, &plan, 2, 0, 1e-8), f32::NEG_INFINITY);
    }

    #[test]
    fn template_larger_than_image_is_rejected() {
        let tpl_data: Vec<u8> = (0u8..16).collect();
        let plan = TemplatePlan::from_view(ImageView::from_slice(&tpl_data, 4, 4).unwrap()).unwrap();
        let image = make_image(3, 8);
        let view = ImageView::from_slice(&image, 3, 8).unwrap();
        let err = ZnccScalar::scan_full(
            view,
            &plan,
            ScanParams {
                threshold: 0.5,
                min_var_i: 1e-8,
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            IconMatchError::TemplateTooLarge {
                tpl_width: 4,
                tpl_height: 4,
                img_width: 3,
                img_height: 8,
            }
        );
    }
}
