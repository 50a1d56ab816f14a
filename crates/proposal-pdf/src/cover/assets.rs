//! Optional raster assets (background photo, logo) for the cover

use std::io::Cursor;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::PdfError;

pub const BACKGROUND_FILE: &str = "background.png";
pub const LOGO_FILE: &str = "logo.png";

/// Colour model of decoded pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Gray,
    Rgb,
}

impl ColorSpace {
    pub fn components(self) -> usize {
        match self {
            ColorSpace::Gray => 1,
            ColorSpace::Rgb => 3,
        }
    }

    pub fn pdf_name(self) -> &'static str {
        match self {
            ColorSpace::Gray => "DeviceGray",
            ColorSpace::Rgb => "DeviceRGB",
        }
    }
}

/// An 8-bit image with colour and alpha planes split apart, ready to become
/// an image XObject plus an optional soft mask.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub pixels: Vec<u8>,
    pub alpha: Option<Vec<u8>>,
}

impl RasterImage {
    /// Decode a PNG, expanding palettes and low bit depths to 8 bits.
    pub fn from_png(bytes: &[u8]) -> Result<Self, PdfError> {
        let mut decoder = png::Decoder::new(Cursor::new(bytes));
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
        let mut reader = decoder
            .read_info()
            .map_err(|e| PdfError::ImageError(e.to_string()))?;

        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader
            .next_frame(&mut buf)
            .map_err(|e| PdfError::ImageError(e.to_string()))?;
        buf.truncate(info.buffer_size());

        let (color_space, has_alpha) = match info.color_type {
            png::ColorType::Grayscale => (ColorSpace::Gray, false),
            png::ColorType::GrayscaleAlpha => (ColorSpace::Gray, true),
            png::ColorType::Rgb => (ColorSpace::Rgb, false),
            png::ColorType::Rgba => (ColorSpace::Rgb, true),
            png::ColorType::Indexed => {
                return Err(PdfError::ImageError(
                    "indexed PNG was not expanded".to_string(),
                ))
            }
        };

        if !has_alpha {
            return Ok(Self {
                width: info.width,
                height: info.height,
                color_space,
                pixels: buf,
                alpha: None,
            });
        }

        let stride = color_space.components() + 1;
        let pixel_count = (info.width as usize) * (info.height as usize);
        let mut pixels = Vec::with_capacity(pixel_count * color_space.components());
        let mut alpha = Vec::with_capacity(pixel_count);
        for chunk in buf.chunks_exact(stride) {
            let (color, a) = chunk.split_at(stride - 1);
            pixels.extend_from_slice(color);
            alpha.push(a[0]);
        }

        Ok(Self {
            width: info.width,
            height: info.height,
            color_space,
            pixels,
            alpha: Some(alpha),
        })
    }

    /// Height divided by width.
    pub fn aspect(&self) -> f32 {
        self.height as f32 / self.width.max(1) as f32
    }
}

/// Which asset an image primitive refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    Background,
    Logo,
}

impl ImageSlot {
    pub fn resource_name(self) -> &'static str {
        match self {
            ImageSlot::Background => "Im1",
            ImageSlot::Logo => "Im2",
        }
    }
}

/// Decoded cover assets. Either image may be absent.
#[derive(Debug, Clone, Default)]
pub struct CoverAssets {
    pub background: Option<RasterImage>,
    pub logo: Option<RasterImage>,
}

impl CoverAssets {
    /// Load `background.png` and `logo.png` from `dir`.
    ///
    /// A missing file means the cover is drawn without it. A file that fails to
    /// decode is logged and treated the same way.
    pub fn load(dir: &Path) -> Self {
        Self {
            background: load_optional(&dir.join(BACKGROUND_FILE)),
            logo: load_optional(&dir.join(LOGO_FILE)),
        }
    }

    pub fn get(&self, slot: ImageSlot) -> Option<&RasterImage> {
        match slot {
            ImageSlot::Background => self.background.as_ref(),
            ImageSlot::Logo => self.logo.as_ref(),
        }
    }
}

fn load_optional(path: &Path) -> Option<RasterImage> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No cover asset at {}", path.display());
            return None;
        }
        Err(e) => {
            warn!("Failed to read cover asset {}: {}", path.display(), e);
            return None;
        }
    };

    match RasterImage::from_png(&bytes) {
        Ok(image) => Some(image),
        Err(e) => {
            warn!("Ignoring cover asset {}: {}", path.display(), e);
            None
        }
    }
}
