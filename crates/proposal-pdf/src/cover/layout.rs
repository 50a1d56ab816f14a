//! Cover page layout
//!
//! [`layout_cover`] turns cover metadata into a list of backend-independent
//! drawing primitives. Coordinates are PDF points with the origin at the
//! bottom-left corner of the page. Primitives are listed back-to-front.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::assets::{CoverAssets, ImageSlot};
use super::metrics::Font;
use super::theme::{BrandTheme, Rgb};

/// US Letter width in points.
pub const PAGE_WIDTH: f32 = 612.0;
/// US Letter height in points.
pub const PAGE_HEIGHT: f32 = 792.0;

const INCH: f32 = 72.0;
const MARGIN: f32 = 0.5 * INCH;

const TITLE_FONT: Font = Font::HelveticaBold;
const TITLE_SIZE: f32 = 36.0;
const TITLE_LINE_FACTOR: f32 = 1.2;
const TITLE_WIDTH_RATIO: f32 = 0.8;

const SUBTITLE_SIZE: f32 = 18.0;
const DATE_SIZE: f32 = 16.0;
const LABEL_SIZE: f32 = 12.0;
const NAME_SIZE: f32 = 16.0;

/// Text inputs for a cover.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverMetadata {
    pub title: String,
    pub client_name: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A single drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        rect: Rect,
        color: Rgb,
    },
    FillPolygon {
        points: Vec<Point>,
        color: Rgb,
    },
    Image {
        slot: ImageSlot,
        rect: Rect,
    },
    /// A left-anchored text run; `x` is the start of the baseline.
    Text {
        text: String,
        font: Font,
        size: f32,
        color: Rgb,
        x: f32,
        y: f32,
    },
}

/// A laid-out page ready for a render backend.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverLayout {
    pub width: f32,
    pub height: f32,
    pub ops: Vec<DrawOp>,
}

impl CoverLayout {
    /// Text runs in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = (&str, Font, f32, f32)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text {
                text, font, x, y, ..
            } => Some((text.as_str(), *font, *x, *y)),
            _ => None,
        })
    }
}

/// Lay out a US Letter cover.
pub fn layout_cover(meta: &CoverMetadata, theme: &BrandTheme, assets: &CoverAssets) -> CoverLayout {
    let (width, height) = (PAGE_WIDTH, PAGE_HEIGHT);
    let mut ops = Vec::new();

    // Header: photo over roughly the top 65%, or a flat neutral top half
    match assets.background.as_ref() {
        Some(image) => {
            let aspect = image.aspect();
            let mut draw_height = height * 0.65;
            let mut draw_width = draw_height / aspect;
            if draw_width < width {
                draw_width = width;
                draw_height = draw_width * aspect;
            }
            ops.push(DrawOp::Image {
                slot: ImageSlot::Background,
                rect: Rect {
                    x: 0.0,
                    y: height - draw_height,
                    width: draw_width,
                    height: draw_height,
                },
            });
        }
        None => ops.push(DrawOp::FillRect {
            rect: Rect {
                x: 0.0,
                y: height * 0.5,
                width,
                height: height * 0.5,
            },
            color: theme.neutral,
        }),
    }

    // Angled banner
    ops.push(DrawOp::FillPolygon {
        points: vec![
            Point::new(0.0, height),
            Point::new(width, height),
            Point::new(width, height - height * 0.25),
            Point::new(0.0, height - height * 0.35),
        ],
        color: theme.primary,
    });

    // Bottom-left accent
    ops.push(DrawOp::FillPolygon {
        points: vec![
            Point::new(0.0, 0.0),
            Point::new(width * 0.3, 0.0),
            Point::new(0.0, height * 0.12),
        ],
        color: theme.secondary,
    });

    if let Some(logo) = assets.logo.as_ref() {
        let (logo_width, logo_height) = (logo.width.max(1) as f32, logo.height.max(1) as f32);
        let scale = (width * 0.2 / logo_width)
            .min(height * 0.15 / logo_height)
            .min(1.0);
        let (lw, lh) = (logo_width * scale, logo_height * scale);
        ops.push(DrawOp::Image {
            slot: ImageSlot::Logo,
            rect: Rect {
                x: MARGIN,
                y: height - lh - MARGIN,
                width: lw,
                height: lh,
            },
        });
    }

    let mut y_pos = height - 2.5 * INCH;
    for line in wrap_greedy(&meta.title, TITLE_FONT, TITLE_SIZE, width * TITLE_WIDTH_RATIO) {
        ops.push(text(line, TITLE_FONT, TITLE_SIZE, Rgb::WHITE, MARGIN, y_pos));
        y_pos -= TITLE_SIZE * TITLE_LINE_FACTOR;
    }

    let client = non_empty(&meta.client_name);
    let author = non_empty(&meta.author);

    if let Some(client) = client {
        ops.push(text(
            format!("Prepared for {client}"),
            Font::Helvetica,
            SUBTITLE_SIZE,
            Rgb::WHITE,
            MARGIN,
            y_pos - 10.0,
        ));
    }

    if let Some(date) = non_empty(&meta.date) {
        ops.push(right_aligned(
            format_cover_date(date),
            Font::Helvetica,
            DATE_SIZE,
            theme.primary,
            width - MARGIN,
            height * 0.3,
        ));
    }

    if let Some(client) = client {
        ops.push(text(
            "Presented to".to_string(),
            Font::Helvetica,
            LABEL_SIZE,
            theme.primary,
            MARGIN,
            0.7 * INCH,
        ));
        ops.push(text(
            client.to_string(),
            Font::HelveticaBold,
            NAME_SIZE,
            Rgb::BLACK,
            MARGIN,
            MARGIN,
        ));
    }

    if let Some(author) = author {
        ops.push(right_aligned(
            "Presented by".to_string(),
            Font::Helvetica,
            LABEL_SIZE,
            theme.primary,
            width - MARGIN,
            0.7 * INCH,
        ));
        ops.push(right_aligned(
            author.to_string(),
            Font::HelveticaBold,
            NAME_SIZE,
            Rgb::BLACK,
            width - MARGIN,
            MARGIN,
        ));
    }

    CoverLayout { width, height, ops }
}

/// Greedy word wrap.
///
/// Words are added to the current line while the candidate line measures
/// strictly less than `max_width`. On overflow the current line is committed
/// as-is, even when empty (a first word that alone overflows yields a blank
/// first line), and the overflowing word starts the next line.
pub fn wrap_greedy(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if font.string_width(&candidate, size) < max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Format `YYYY-MM-DD` as `Month YYYY`; anything unparsable is returned as-is.
pub fn format_cover_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%B %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn text(text: String, font: Font, size: f32, color: Rgb, x: f32, y: f32) -> DrawOp {
    DrawOp::Text {
        text,
        font,
        size,
        color,
        x,
        y,
    }
}

fn right_aligned(value: String, font: Font, size: f32, color: Rgb, right: f32, y: f32) -> DrawOp {
    let x = right - font.string_width(&value, size);
    text(value, font, size, color, x, y)
}
