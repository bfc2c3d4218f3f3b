//! Axis-aligned bounding boxes and overlap measures.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in image pixel coordinates.
///
/// `x`/`y` address the top-left corner. Extents are expected to be positive for
/// any box that takes part in suppression; see [`BBox::is_well_formed`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge (column) of the box.
    pub x: f32,
    /// Top edge (row) of the box.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl BBox {
    /// Creates a box from its top-left corner and extents.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the box area (`width * height`).
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Returns true when every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Returns true when the box is finite and has positive extents.
    pub fn is_well_formed(&self) -> bool {
        self.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Returns the area shared by two boxes, zero when they do not overlap.
    pub fn intersection_area(&self, other: &BBox) -> f32 {
        let x_a = self.x.max(other.x);
        let y_a = self.y.max(other.y);
        let x_b = (self.x + self.width).min(other.x + other.width);
        let y_b = (self.y + self.height).min(other.y + other.height);
        (x_b - x_a).max(0.0) * (y_b - y_a).max(0.0)
    }

    /// Intersection over union with another box, in `[0, 1]`.
    ///
    /// Returns `0.0` when the union area is zero instead of dividing by it.
    pub fn iou(&self, other: &BBox) -> f32 {
        let intersection = self.intersection_area(other);
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            return 0.0;
        }
        intersection / union
    }
}

/// Free-function form of [`BBox::iou`].
pub fn iou(a: &BBox, b: &BBox) -> f32 {
    a.iou(b)
}

#[cfg(test)]
mod tests {
    use super::{iou, BBox};

    #[test]
    fn identical_boxes_have_unit_iou() {
        let a = BBox::new(3.0, 4.0, 50.0, 35.0);
        assert!((iou(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn disjoint_boxes_have_zero_iou() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(20.0, 0.0, 10.0, 10.0);
        assert_eq!(iou(&a, &b), 0.0);
        // Touching edges share no area.
        let c = BBox::new(10.0, 0.0, 10.0, 10.0);
        assert_eq!(iou(&a, &c), 0.0);
    }

    #[test]
    fn degenerate_union_yields_zero() {
        let a = BBox::new(5.0, 5.0, 0.0, 0.0);
        let b = BBox::new(5.0, 5.0, 0.0, 0.0);
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn shifted_square_matches_hand_computation() {
        let a = BBox::new(0.0, 0.0, 100.0, 100.0);
        let b = BBox::new(10.0, 10.0, 100.0, 100.0);
        let expected = 8100.0 / 11900.0;
        assert!((iou(&a, &b) - expected).abs() < 1e-6);
        assert_eq!(iou(&a, &b), iou(&b, &a));
    }

    #[test]
    fn well_formed_rejects_non_finite_and_empty() {
        assert!(BBox::new(0.0, 0.0, 1.0, 1.0).is_well_formed());
        assert!(!BBox::new(f32::NAN, 0.0, 1.0, 1.0).is_well_formed());
        assert!(!BBox::new(0.0, 0.0, f32::INFINITY, 1.0).is_well_formed());
        assert!(!BBox::new(0.0, 0.0, 0.0, 1.0).is_well_formed());
        assert!(!BBox::new(0.0, 0.0, 1.0, -2.0).is_well_formed());
    }
}
