//! Hex colour strings from the colour map.
//!
//! Accepted forms: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`. Anything else
//! (missing `#`, wrong length, non-hex digit) is rejected so the node falls
//! back to the neutral colour.

use egui::Color32;

/// Fill for nodes with no colour entry.
pub const NEUTRAL: Color32 = Color32::from_rgb(0xCC, 0xCC, 0xCC);

pub fn parse_hex_color(s: &str) -> Option<Color32> {
    Color32::from_hex(s.trim()).ok()
}

/// Lighten towards white by `t` in [0, 1]. Used for the active marker.
pub fn lighten(c: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |v: u8| (v as f32 + (255.0 - v as f32) * t).round() as u8;
    Color32::from_rgba_unmultiplied(mix(c.r()), mix(c.g()), mix(c.b()), c.a())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_lengths() {
        assert_eq!(parse_hex_color("#FF69B4"), Some(Color32::from_rgb(0xFF, 0x69, 0xB4)));
        assert_eq!(parse_hex_color("#f0a"), Some(Color32::from_rgb(0xFF, 0x00, 0xAA)));
        assert_eq!(parse_hex_color("  #abc "), Some(Color32::from_rgb(0xAA, 0xBB, 0xCC)));
        let c = parse_hex_color("#FF000080").unwrap();
        assert_eq!(c.a(), 0x80);
        assert_eq!(parse_hex_color("#fff0").unwrap().a(), 0);
    }

    #[test]
    fn rejects_malformed() {
        assert_eq!(parse_hex_color("FF69B4"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("#"), None);
    }

    #[test]
    fn lighten_moves_towards_white() {
        let c = lighten(Color32::from_rgb(0, 100, 255), 0.5);
        assert_eq!((c.r(), c.g(), c.b()), (128, 178, 255));
        assert_eq!(lighten(NEUTRAL, 0.0), NEUTRAL);
    }
}
