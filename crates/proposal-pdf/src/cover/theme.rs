//! Brand colours used by the cover layout

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PdfError;

pub const DEFAULT_PRIMARY: &str = "#0084a9";
pub const DEFAULT_SECONDARY: &str = "#fc9a2d";
pub const DEFAULT_NEUTRAL: &str = "#f7f7f7";

/// An RGB colour with components in the 0-1 range, as PDF `rg` expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub fn from_bytes(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }
}

/// Parse hex color string (e.g., "#FF0000" or "FF0000") to RGB floats (0-1 range)
pub fn parse_hex_color(color: &str) -> Result<Rgb, PdfError> {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(PdfError::InvalidColor(color.to_string()));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| PdfError::InvalidColor(color.to_string()))
    };

    Ok(Rgb::from_bytes(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

impl FromStr for Rgb {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex_color(s)
    }
}

/// The three brand colours of a cover.
///
/// `primary` paints the banner and accent text, `secondary` the bottom-left
/// triangle, `neutral` the header fill used when no background image exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrandTheme {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub neutral: Rgb,
}

impl BrandTheme {
    pub fn from_hex(primary: &str, secondary: &str, neutral: &str) -> Result<Self, PdfError> {
        Ok(Self {
            primary: parse_hex_color(primary)?,
            secondary: parse_hex_color(secondary)?,
            neutral: parse_hex_color(neutral)?,
        })
    }
}

impl Default for BrandTheme {
    fn default() -> Self {
        Self {
            primary: Rgb::from_bytes(0x00, 0x84, 0xa9),
            secondary: Rgb::from_bytes(0xfc, 0x9a, 0x2d),
            neutral: Rgb::from_bytes(0xf7, 0xf7, 0xf7),
        }
    }
}
