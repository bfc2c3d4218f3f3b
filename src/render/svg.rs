//! SVG overlays: one stroked rectangle plus a text label per descriptor.

use crate::classify::AnnotationDescriptor;
use std::fmt::Write;

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn write_shapes(out: &mut String, desc: &AnnotationDescriptor) {
    let _ = write!(
        out,
        r#"<rect x="0" y="0" width="{w}" height="{h}" stroke="{color}" stroke-width="{sw}" fill="none"/>"#,
        w = desc.width,
        h = desc.height,
        color = desc.stroke.color,
        sw = desc.stroke.width,
    );
    let _ = write!(
        out,
        r#"<text x="1%" y="17%" font-family="monospace" font-size="16" fill="red" text-anchor="start" dominant-baseline="middle">{}</text>"#,
        escape_xml(&desc.label),
    );
}

/// Standalone SVG sized to the descriptor, anchored at its own origin.
///
/// The caller composites it at `(desc.left, desc.top)`.
pub fn overlay_svg(desc: &AnnotationDescriptor) -> String {
    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
        desc.width, desc.height
    );
    write_shapes(&mut out, desc);
    out.push_str("</svg>");
    out
}

/// Full-size SVG with every descriptor placed at its floored position.
pub fn overlay_document(descs: &[AnnotationDescriptor], width: usize, height: usize) -> String {
    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">"#
    );
    out.push('\n');
    for desc in descs {
        let _ = write!(
            out,
            r#"<svg x="{}" y="{}" width="{}" height="{}">"#,
            desc.left, desc.top, desc.width, desc.height
        );
        write_shapes(&mut out, desc);
        out.push_str("</svg>\n");
    }
    out.push_str("</svg>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::{overlay_document, overlay_svg};
    use crate::classify::{AnnotationDescriptor, ConfidenceBand};

    fn desc(label: &str) -> AnnotationDescriptor {
        AnnotationDescriptor {
            left: 12,
            top: 7,
            width: 50,
            height: 35,
            stroke: ConfidenceBand::High.stroke(),
            label: label.to_string(),
            band: Some(ConfidenceBand::High),
        }
    }

    #[test]
    fn overlay_contains_rect_and_label() {
        let svg = overlay_svg(&desc("gem"));
        assert!(svg.contains(r#"width="50" height="35""#));
        assert!(svg.contains(r##"stroke="#38E6FF" stroke-width="3""##));
        assert!(svg.contains(">gem</text>"));
    }

    #[test]
    fn labels_are_escaped() {
        let svg = overlay_svg(&desc("a<&b"));
        assert!(svg.contains(">a&lt;&amp;b</text>"));
    }

    #[test]
    fn document_places_each_overlay() {
        let doc = overlay_document(&[desc("x")], 640, 480);
        assert!(doc.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="640" height="480">"#));
        assert!(doc.contains(r#"<svg x="12" y="7" width="50" height="35">"#));
    }
}
