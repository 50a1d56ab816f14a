//! Standard-14 font metrics for the fonts the cover uses
//!
//! Widths are the Adobe AFM advance widths (1/1000 em) for WinAnsi codes
//! 32-126. Codes outside that range use [`FALLBACK_WIDTH`].

use serde::{Deserialize, Serialize};

/// Width used for Latin-1 characters without an entry in the tables.
pub const FALLBACK_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Fonts available to cover text runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    /// PDF standard font name for the `BaseFont` entry.
    pub fn base_font(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Resource name the renderer registers this font under.
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    fn widths(self) -> &'static [u16; 95] {
        match self {
            Font::Helvetica => &HELVETICA_WIDTHS,
            Font::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Advance width of a single WinAnsi code, in 1/1000 em.
    pub fn glyph_width(self, code: u8) -> u16 {
        match code {
            32..=126 => self.widths()[(code - 32) as usize],
            _ => FALLBACK_WIDTH,
        }
    }

    /// Rendered width of `text` in points at `size`.
    ///
    /// Measures the same bytes the renderer writes, see [`encode_win_ansi`].
    pub fn string_width(self, text: &str, size: f32) -> f32 {
        let units: u32 = encode_win_ansi(text)
            .into_iter()
            .map(|code| u32::from(self.glyph_width(code)))
            .sum();
        units as f32 * size / 1000.0
    }
}

/// Encode text as WinAnsi bytes for a simple-font `Tj` operand.
///
/// Printable ASCII and Latin-1 pass through unchanged. Anything else is
/// transliterated to ASCII; control characters become spaces.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let code = ch as u32;
        if (0x20..=0x7e).contains(&code) || (0xa0..=0xff).contains(&code) {
            out.push(code as u8);
        } else if ch.is_whitespace() || ch.is_control() {
            out.push(b' ');
        } else if let Some(ascii) = deunicode::deunicode_char(ch) {
            out.extend(ascii.bytes().filter(|b| (0x20..=0x7e).contains(b)));
        }
    }
    out
}
