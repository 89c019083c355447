//! Advance widths of the standard Type1 fonts, in 1/1000 em.
//!
//! Tables cover the printable ASCII range; other WinAnsi bytes fall back to a
//! per-family average. Oblique Helvetica shares the upright widths and all
//! Courier faces are fixed pitch.

use crate::app::services::export::surface::{BuiltinFont, FontStyle};

const COURIER_WIDTH: u16 = 600;
const FIRST: u8 = b' ';
const LAST: u8 = b'~';

const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

const TIMES_ITALIC: [u16; 95] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 675, 675, 675, 500,
    920, 611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833, 667, 722,
    611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556, 389, 278, 389, 422, 500,
    333, 500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722, 500, 500,
    500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389, 400, 275, 400, 541,
];

fn table(family: BuiltinFont, style: FontStyle) -> Option<&'static [u16; 95]> {
    match (family, style) {
        (BuiltinFont::Helvetica, FontStyle::Bold) => Some(&HELVETICA_BOLD),
        (BuiltinFont::Helvetica, _) => Some(&HELVETICA),
        (BuiltinFont::Times, FontStyle::Normal) => Some(&TIMES_ROMAN),
        (BuiltinFont::Times, FontStyle::Bold) => Some(&TIMES_BOLD),
        (BuiltinFont::Times, FontStyle::Italic) => Some(&TIMES_ITALIC),
        (BuiltinFont::Courier, _) => None,
    }
}

fn fallback(family: BuiltinFont) -> u16 {
    match family {
        BuiltinFont::Helvetica => 556,
        BuiltinFont::Times => 500,
        BuiltinFont::Courier => COURIER_WIDTH,
    }
}

/// Advance of one WinAnsi-encoded byte.
pub fn advance(family: BuiltinFont, style: FontStyle, byte: u8) -> u16 {
    match table(family, style) {
        Some(widths) if (FIRST..=LAST).contains(&byte) => widths[(byte - FIRST) as usize],
        Some(_) => fallback(family),
        None => COURIER_WIDTH,
    }
}

/// Width of WinAnsi-encoded text in points at `size`.
pub fn text_width(family: BuiltinFont, style: FontStyle, size: f32, encoded: &[u8]) -> f32 {
    let units: u32 = encoded
        .iter()
        .map(|&b| advance(family, style, b) as u32)
        .sum();
    units as f32 * size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_advances() {
        assert_eq!(advance(BuiltinFont::Helvetica, FontStyle::Normal, b'W'), 944);
        assert_eq!(advance(BuiltinFont::Helvetica, FontStyle::Italic, b'i'), 222);
        assert_eq!(advance(BuiltinFont::Helvetica, FontStyle::Bold, b'm'), 889);
        assert_eq!(advance(BuiltinFont::Times, FontStyle::Normal, b' '), 250);
        assert_eq!(advance(BuiltinFont::Times, FontStyle::Bold, b'W'), 1000);
        assert_eq!(advance(BuiltinFont::Times, FontStyle::Italic, b'~'), 541);
        assert_eq!(advance(BuiltinFont::Courier, FontStyle::Bold, b'W'), 600);
    }

    #[test]
    fn test_non_ascii_falls_back() {
        assert_eq!(advance(BuiltinFont::Helvetica, FontStyle::Normal, 0x95), 556);
        assert_eq!(advance(BuiltinFont::Times, FontStyle::Normal, 0xE9), 500);
    }

    #[test]
    fn test_text_width_sums_glyphs() {
        let width = text_width(BuiltinFont::Helvetica, FontStyle::Normal, 10.0, b"Wi");
        assert!((width - 11.66).abs() < 1e-3);
        assert_eq!(text_width(BuiltinFont::Courier, FontStyle::Normal, 10.0, b""), 0.0);
    }
}
