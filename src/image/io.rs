//! Convenience helpers for loading and transforming images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::geometry::BBox;
use crate::image::OwnedImage;
use crate::util::{IconMatchError, IconMatchResult};
use image::imageops::FilterType;
use std::path::Path;

pub(crate) fn image_error(path: &Path, err: image::ImageError) -> IconMatchError {
    IconMatchError::ImageIo {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Creates an owned image from a grayscale image buffer.
pub fn owned_from_gray_image(img: &image::GrayImage) -> IconMatchResult<OwnedImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    OwnedImage::new(img.as_raw().clone(), width, height)
}

/// Loads an image from disk and converts it to a grayscale owned image.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> IconMatchResult<OwnedImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| image_error(path, err))?;
    owned_from_gray_image(&img.to_luma8())
}

/// Resizes `src` to exactly `width x height` keeping aspect ratio, cropping
/// the overflow (fit "cover"), and writes it to `dst`.
pub fn resize_cover_and_save<P, Q>(src: P, width: u32, height: u32, dst: Q) -> IconMatchResult<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let (src, dst) = (src.as_ref(), dst.as_ref());
    if width == 0 || height == 0 {
        return Err(IconMatchError::InvalidDimensions {
            width: width as usize,
            height: height as usize,
        });
    }
    let img = image::open(src).map_err(|err| image_error(src, err))?;
    img.resize_to_fill(width, height, FilterType::Lanczos3)
        .save(dst)
        .map_err(|err| image_error(dst, err))
}

/// Crops `rect` out of `src`, stretches it to `width x height` (fit "fill")
/// and writes it to `dst`.
///
/// The crop rectangle is floored to whole pixels and must lie inside the image.
pub fn crop_resize_and_save<P, Q>(
    src: P,
    rect: BBox,
    width: u32,
    height: u32,
    dst: Q,
) -> IconMatchResult<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let (src, dst) = (src.as_ref(), dst.as_ref());
    if !rect.is_well_formed() || rect.x < 0.0 || rect.y < 0.0 {
        return Err(IconMatchError::InvalidInput("crop rectangle is malformed"));
    }
    if width == 0 || height == 0 {
        return Err(IconMatchError::InvalidDimensions {
            width: width as usize,
            height: height as usize,
        });
    }
    let img = image::open(src).map_err(|err| image_error(src, err))?;
    let (x, y) = (rect.x.floor() as u32, rect.y.floor() as u32);
    let (crop_w, crop_h) = (rect.width.floor() as u32, rect.height.floor() as u32);
    let fits = x.checked_add(crop_w).is_some_and(|r| r <= img.width())
        && y.checked_add(crop_h).is_some_and(|b| b <= img.height());
    if crop_w == 0 || crop_h == 0 || !fits {
        return Err(IconMatchError::InvalidInput("crop rectangle outside image"));
    }
    img.crop_imm(x, y, crop_w, crop_h)
        .resize_exact(width, height, FilterType::Lanczos3)
        .save(dst)
        .map_err(|err| image_error(dst, err))
}

#[cfg(test)]
mod tests {
    use super::{crop_resize_and_save, load_gray_image, resize_cover_and_save};
    use crate::geometry::BBox;
    use crate::util::IconMatchError;
    use image::{GrayImage, Luma};

    fn write_gradient(path: &std::path::Path, width: u32, height: u32) {
        let img = GrayImage::from_fn(width, height, |x, y| Luma([((x * 7 + y * 3) % 256) as u8]));
        img.save(path).unwrap();
    }

    #[test]
    fn cover_resize_hits_exact_size() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.png");
        let dst = dir.path().join("dst.png");
        write_gradient(&src, 120, 60);
        resize_cover_and_save(&src, 50, 35, &dst).unwrap();
        let out = load_gray_image(&dst).unwrap();
        assert_eq!((out.width(), out.height()), (50, 35));
    }

    #[test]
    fn crop_resize_rejects_out_of_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.png");
        let dst = dir.path().join("dst.png");
        write_gradient(&src, 40, 40);
        crop_resize_and_save(&src, BBox::new(5.0, 5.0, 10.0, 20.0), 8, 8, &dst).unwrap();
        let out = load_gray_image(&dst).unwrap();
        assert_eq!((out.width(), out.height()), (8, 8));

        let err = crop_resize_and_save(&src, BBox::new(35.0, 0.0, 10.0, 10.0), 8, 8, &dst)
            .unwrap_err();
        assert_eq!(err, IconMatchError::InvalidInput("crop rectangle outside image"));
    }

    #[test]
    fn missing_file_is_an_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_gray_image(dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, IconMatchError::ImageIo { .. }));
    }
}
