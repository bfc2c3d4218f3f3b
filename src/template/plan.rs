//! Template plan precomputation for correlation metrics.

use crate::image::ImageView;
use crate::util::{IconMatchError, IconMatchResult};

/// Precomputed statistics and buffers for scoring one template.
#[derive(Clone, Debug)]
pub struct TemplatePlan {
    width: usize,
    height: usize,
    mean: f32,
    values: Vec<f32>,
    t_prime: Vec<f32>,
    var_t: f32,
    sum_t2: f32,
}

impl TemplatePlan {
    /// Builds a plan from a template view.
    ///
    /// Fails with `DegenerateTemplate` when the template is flat, since a
    /// normalized correlation against it is undefined.
    pub fn from_view(tpl: ImageView<'_, u8>) -> IconMatchResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let count = width
            .checked_mul(height)
            .ok_or(IconMatchError::InvalidDimensions { width, height })?;

        let mut values = Vec::with_capacity(count);
        for y in 0..height {
            let row = tpl.row(y).ok_or(IconMatchError::InvalidDimensions { width, height })?;
            values.extend(row.iter().map(|&v| v as f32));
        }

        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        for &v in &values {
            let v = v as f64;
            sum += v;
            sum_sq += v * v;
        }
        let count_f = count as f64;
        let mean_f64 = sum / count_f;
        let variance = sum_sq / count_f - mean_f64 * mean_f64;
        if variance <= 1e-8 {
            return Err(IconMatchError::DegenerateTemplate {
                reason: "zero variance",
            });
        }

        let mean = mean_f64 as f32;
        let t_prime: Vec<f32> = values.iter().map(|&v| v - mean).collect();
        let var_t: f32 = t_prime.iter().map(|&t| t * t).sum();

        Ok(Self {
            width,
            height,
            mean,
            values,
            t_prime,
            var_t,
            sum_t2: sum_sq as f32,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the mean intensity of the template.
    pub fn mean(&self) -> f32 {
        self.mean
    }

    /// Returns the raw template intensities in row-major order.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Returns the zero-mean template buffer in row-major order.
    pub fn t_prime(&self) -> &[f32] {
        &self.t_prime
    }

    /// Returns the sum of squared zero-mean intensities.
    pub fn var_t(&self) -> f32 {
        self.var_t
    }

    /// Returns the sum of squared raw intensities.
    pub fn sum_t2(&self) -> f32 {
        self.sum_t2
    }
}

#[cfg(test)]
mod tests {
    use super::TemplatePlan;
    use crate::template::Template;
    use crate::util::IconMatchError;

    #[test]
    fn plan_matches_known_stats() {
        let tpl = Template::new(vec![0u8, 1, 2, 3], 2, 2).unwrap();
        let plan = TemplatePlan::from_view(tpl.view()).unwrap();
        assert_eq!((plan.width(), plan.height()), (2, 2));
        assert!((plan.mean() - 1.5).abs() < 1e-6);
        assert!((plan.var_t() - 5.0).abs() < 1e-5);
        assert!((plan.sum_t2() - 14.0).abs() < 1e-5);
        let expected = [-1.5f32, -0.5, 0.5, 1.5];
        for (value, expected) in plan.t_prime().iter().zip(expected.iter()) {
            assert!((value - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn flat_template_is_degenerate() {
        let tpl = Template::new(vec![5u8; 4], 2, 2).unwrap();
        let err = TemplatePlan::from_view(tpl.view()).unwrap_err();
        assert_eq!(
            err,
            IconMatchError::DegenerateTemplate {
                reason: "zero variance"
            }
        );
    }
}
