//! Cover page generation
//!
//! Layout is a pure function from metadata to drawing primitives; a
//! [`RenderBackend`] turns those into bytes.

pub mod assets;
pub mod layout;
pub mod metrics;
pub mod render;
pub mod theme;

pub use assets::{CoverAssets, ImageSlot, RasterImage};
pub use layout::{layout_cover, CoverLayout, CoverMetadata, DrawOp};
pub use metrics::Font;
pub use render::{PdfBackend, RenderBackend};
pub use theme::{BrandTheme, Rgb};

use crate::error::PdfError;

/// Lay out and render a cover with the lopdf backend.
pub fn render_cover(
    meta: &CoverMetadata,
    theme: &BrandTheme,
    assets: &CoverAssets,
) -> Result<Vec<u8>, PdfError> {
    let layout = layout_cover(meta, theme, assets);
    PdfBackend.render(&layout, assets)
}
