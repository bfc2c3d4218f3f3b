//! Grayscale image views and owned buffers.
//!
//! `ImageView` is a borrowed 2D view into a contiguous row-major buffer.

use crate::util::{IconMatchError, IconMatchResult};

#[cfg(feature = "image-io")]
pub mod io;

/// Borrowed row-major 2D image view.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a view over the first `width * height` elements of `data`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> IconMatchResult<Self> {
        let needed = required_len(width, height)?;
        if data.len() < needed {
            return Err(IconMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns row `y`, or `None` past the last row.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.width)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }
}

/// Owned contiguous grayscale image.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Wraps a row-major buffer of exactly `width * height` bytes.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> IconMatchResult<Self> {
        let needed = required_len(width, height)?;
        if data.len() != needed {
            return Err(IconMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the raw row-major pixels.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Borrows the image as a contiguous view.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
        }
    }
}

fn required_len(width: usize, height: usize) -> IconMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(IconMatchError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(IconMatchError::InvalidDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::{ImageView, OwnedImage};
    use crate::util::IconMatchError;

    #[test]
    fn rows_are_bounds_checked() {
        let data = [1u8, 2, 3, 4, 5, 6, 7];
        let view = ImageView::from_slice(&data, 3, 2).unwrap();
        assert_eq!(view.row(1), Some(&[4u8, 5, 6][..]));
        assert_eq!(view.row(2), None);
    }

    #[test]
    fn short_or_empty_buffers_are_rejected() {
        assert_eq!(
            ImageView::from_slice(&[0u8; 5], 3, 2).unwrap_err(),
            IconMatchError::BufferTooSmall { needed: 6, got: 5 }
        );
        assert_eq!(
            OwnedImage::new(Vec::new(), 0, 4).unwrap_err(),
            IconMatchError::InvalidDimensions { width: 0, height: 4 }
        );
    }
}
