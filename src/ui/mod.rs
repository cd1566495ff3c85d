//! Stateless egui helpers shared by the shell: rotated node labels, Bézier
//! edges and a few text utilities.

use std::sync::Arc;

use egui::epaint::{CubicBezierShape, TextShape};
use egui::emath::Rot2;
use egui::{Color32, Pos2, Stroke};

use subculture_atlas::net::fetch::AssetSource;
use subculture_atlas::render::layout::LabelAnchor;

// ─── Painting ─────────────────────────────────────────────────────────────────

/// Paint one cubic segment given in screen space.
pub fn paint_cubic(painter: &egui::Painter, points: [Pos2; 4], stroke: Stroke) {
    painter.add(CubicBezierShape::from_points_stroke(
        points,
        false,
        Color32::TRANSPARENT,
        stroke,
    ));
}

/// Paint `text` at a label anchor already mapped to screen space.
///
/// Non-centred labels are rotated and vertically centred on the anchor;
/// flipped ones end at the anchor instead of starting there. Centred labels
/// sit above the anchor, `lift` pixels up.
pub fn paint_label(
    painter: &egui::Painter,
    anchor: &LabelAnchor,
    lift: f32,
    text: &str,
    size: f32,
    color: Color32,
) {
    let galley: Arc<egui::Galley> =
        painter.layout_no_wrap(text.to_string(), egui::FontId::proportional(size), color);
    let dims = galley.size();

    if anchor.centered {
        let top_left = anchor.pos - egui::vec2(dims.x * 0.5, dims.y + lift);
        painter.galley(top_left, galley, color);
        return;
    }

    let local = if anchor.flip {
        egui::vec2(-dims.x, -dims.y * 0.5)
    } else {
        egui::vec2(0.0, -dims.y * 0.5)
    };
    let top_left = anchor.pos + Rot2::from_angle(anchor.rotation) * local;
    painter.add(TextShape::new(top_left, galley, color).with_angle(anchor.rotation));
}

// ─── Text utilities ───────────────────────────────────────────────────────────

/// Truncate `s` to at most `max_chars` Unicode scalar values, appending `"..."` if truncated.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let t: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", t)
    }
}

/// `m:ss`
pub fn format_clock(secs: f32) -> String {
    let total = secs.max(0.0) as u32;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Something a browser can open for a media link.
pub fn external_url(source: &AssetSource, src: &str) -> String {
    if src.starts_with("http://") || src.starts_with("https://") {
        return src.to_string();
    }
    match source {
        AssetSource::Remote(_) => source.locate(&[src]),
        AssetSource::Local(_) => {
            let path = std::path::PathBuf::from(source.locate(&[src]));
            let path = std::fs::canonicalize(&path).unwrap_or(path);
            format!("file://{}", path.display())
        }
    }
}
