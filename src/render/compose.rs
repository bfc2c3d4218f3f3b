//! Raster compositing of annotation rectangles and labels via `imageproc`.

use crate::classify::AnnotationDescriptor;
use crate::image::io::image_error;
use crate::trace::{trace_event, trace_warn};
use crate::util::IconMatchResult;
use ab_glyph::{FontRef, PxScale};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::path::Path;

const LABEL_FONT: &[u8] = include_bytes!("../../assets/DejaVuSansMono.ttf");
const LABEL_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);
const LABEL_SCALE: f32 = 16.0;

fn label_font() -> Option<FontRef<'static>> {
    match FontRef::try_from_slice(LABEL_FONT) {
        Ok(font) => Some(font),
        Err(err) => {
            trace_warn!("compose.font_unavailable", reason = err.to_string());
            None
        }
    }
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Parses `#RRGGBB` into an opaque RGBA color.
pub fn parse_hex_color(hex: &str) -> Option<Rgba<u8>> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some(Rgba([channel(0..2)?, channel(2..4)?, channel(4..6)?, 255]))
}

/// Draws every descriptor's rectangle and label onto `canvas`.
///
/// A stroke of width `n` is drawn as `n` nested one-pixel outlines growing
/// inward. Labels are written in red just inside the top-left corner.
/// Parts outside the canvas are clipped.
pub fn draw_annotations(canvas: &mut RgbaImage, descs: &[AnnotationDescriptor]) {
    let font = label_font();
    for desc in descs {
        let color = parse_hex_color(desc.stroke.color).unwrap_or(Rgba([255, 0, 0, 255]));
        for inset in 0..desc.stroke.width {
            let Some(width) = desc.width.checked_sub(2 * inset).filter(|w| *w > 0) else {
                break;
            };
            let Some(height) = desc.height.checked_sub(2 * inset).filter(|h| *h > 0) else {
                break;
            };
            let x = clamp_i32(desc.left + inset as i64);
            let y = clamp_i32(desc.top + inset as i64);
            draw_hollow_rect_mut(canvas, Rect::at(x, y).of_size(width, height), color);
        }
        if let (Some(font), false) = (font.as_ref(), desc.label.is_empty()) {
            let pad = desc.stroke.width as i64 + 1;
            draw_text_mut(
                canvas,
                LABEL_COLOR,
                clamp_i32(desc.left + pad),
                clamp_i32(desc.top + pad),
                PxScale::from(LABEL_SCALE),
                font,
                &desc.label,
            );
        }
    }
}

/// Draws descriptors over the image at `src` and writes the result to `dst`.
pub fn compose_annotations<P, Q>(src: P, descs: &[AnnotationDescriptor], dst: Q) -> IconMatchResult<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let src = src.as_ref();
    let dst = dst.as_ref();
    let mut canvas = image::open(src)
        .map_err(|err| image_error(src, err))?
        .to_rgba8();
    draw_annotations(&mut canvas, descs);

    let out = DynamicImage::ImageRgba8(canvas);
    let saved = match ImageFormat::from_path(dst) {
        Ok(ImageFormat::Jpeg) => out.to_rgb8().save(dst),
        _ => out.save(dst),
    };
    saved.map_err(|err| image_error(dst, err))?;
    trace_event!("compose.written", annotations = descs.len());
    Ok(())
}
