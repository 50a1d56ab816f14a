//! PDF building blocks for proposals
//!
//! This crate draws cover pages and concatenates documents using lopdf.
//! It works on bytes; callers decide where documents are stored.

pub mod cover;
pub mod error;
pub mod merge;

pub use cover::{render_cover, BrandTheme, CoverAssets, CoverMetadata};
pub use error::PdfError;
pub use merge::{merge_documents, MergeReport, MergeSource, SkippedSource};

/// Parse PDF bytes and return page count
pub fn get_page_count(bytes: &[u8]) -> Result<u32, PdfError> {
    let doc =
        lopdf::Document::load_mem(bytes).map_err(|e| PdfError::ParseError(e.to_string()))?;
    Ok(doc.get_pages().len() as u32)
}
