// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Standard 14 fonts used for stamping text, with the AFM advance widths needed
// to measure text exactly. Text is written with WinAnsiEncoding.

/// Advance widths (1/1000 em) of Helvetica for bytes 32..=126.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, //
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, //
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, //
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, //
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Advance widths (1/1000 em) of Helvetica-Bold for bytes 32..=126.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, //
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, //
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, //
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, //
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Advance used for glyphs without metrics: 15 units at 50pt, i.e. 0.3 em.
const FALLBACK_ADVANCE: u16 = 300;

/// Standard Type1 fonts every PDF reader ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    /// PostScript name written as `/BaseFont`.
    pub fn base_font(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Page resource name used when the font is registered on a page.
    pub(crate) fn resource_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "ExePdfHelv",
            Self::HelveticaBold => "ExePdfHelvB",
        }
    }

    fn widths(&self) -> &'static [u16; 95] {
        match self {
            Self::Helvetica => &HELVETICA_WIDTHS,
            Self::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Advance width of one encoded byte, in 1/1000 em.
    fn advance(&self, byte: u8) -> u16 {
        match byte {
            32..=126 => self.widths()[(byte - 32) as usize],
            _ => FALLBACK_ADVANCE,
        }
    }

    /// Width of `text` rendered at `size` points.
    pub fn width_of_text_at_size(&self, text: &str, size: f32) -> f32 {
        let units: u32 = encode_win_ansi(text)
            .into_iter()
            .map(|byte| u32::from(self.advance(byte)))
            .sum();
        units as f32 * size / 1000.0
    }
}

/// Encode `text` for a WinAnsiEncoding simple font.
///
/// Printable ASCII and the Latin-1 range 0xA0..=0xFF map to themselves;
/// anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch as u32 {
            code @ 0x20..=0x7E => code as u8,
            code @ 0xA0..=0xFF => code as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_label_width_matches_afm() {
        // '2' 556 + ' ' 278 + '/' 278 + ' ' 278 + '3' 556 = 1946 units.
        let width = StandardFont::Helvetica.width_of_text_at_size("2 / 3", 12.0);
        assert!((width - 23.352).abs() < 1e-3, "got {width}");
    }

    #[test]
    fn bold_is_wider_for_lowercase() {
        let regular = StandardFont::Helvetica.width_of_text_at_size("draft", 50.0);
        let bold = StandardFont::HelveticaBold.width_of_text_at_size("draft", 50.0);
        assert!(bold > regular);
    }

    #[test]
    fn empty_text_has_zero_width() {
        assert_eq!(StandardFont::HelveticaBold.width_of_text_at_size("", 50.0), 0.0);
    }

    #[test]
    fn unmapped_glyphs_use_fallback_advance() {
        // Encoded as '?' which has real metrics (556 in Helvetica).
        assert_eq!(encode_win_ansi("€"), b"?");
        // Latin-1 letters keep their code but have no table entry.
        let width = StandardFont::Helvetica.width_of_text_at_size("é", 50.0);
        assert!((width - 15.0).abs() < 1e-4);
    }
}
