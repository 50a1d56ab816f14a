//! Cover generation and export, composed over the document store
//!
//! Both services are synchronous; handlers run them on the blocking pool.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use proposal_pdf::cover::{layout_cover, PdfBackend, RenderBackend};
use proposal_pdf::{merge_documents, BrandTheme, CoverAssets, CoverMetadata, MergeSource};
use proposal_store::{is_pdf_name, timestamped_name, Area, DocumentStore, StoreError};
use tracing::{debug, info, warn};

use crate::error::ApiError;

const COVER_PREFIX: &str = "cover";
const EXPORT_PREFIX: &str = "proposal";

/// Draws cover pages and files them in the covers area.
#[derive(Clone)]
pub struct CoverGenerator {
    store: Arc<dyn DocumentStore>,
    backend: Arc<dyn RenderBackend + Send + Sync>,
    theme: BrandTheme,
    static_dir: PathBuf,
}

impl CoverGenerator {
    pub fn new(store: Arc<dyn DocumentStore>, theme: BrandTheme, static_dir: PathBuf) -> Self {
        Self {
            store,
            backend: Arc::new(PdfBackend),
            theme,
            static_dir,
        }
    }

    /// Render a cover and return its stored name.
    ///
    /// Assets are reloaded on every call so replacing `logo.png` takes effect
    /// without a restart.
    pub fn generate(&self, meta: &CoverMetadata) -> Result<String, ApiError> {
        let assets = CoverAssets::load(&self.static_dir);
        let layout = layout_cover(meta, &self.theme, &assets);
        let bytes = self.backend.render(&layout, &assets)?;

        let name = timestamped_name(COVER_PREFIX, Utc::now());
        let stored = self.store.save(Area::Covers, &name, &bytes)?;
        info!("Generated cover {} ({} bytes)", stored, bytes.len());
        Ok(stored)
    }
}

/// Concatenates a cover and modules into an export.
#[derive(Clone)]
pub struct ExportMerger {
    store: Arc<dyn DocumentStore>,
}

impl ExportMerger {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Merge `cover` (if any) and then `modules` in order; return the export name.
    ///
    /// Missing or non-PDF names are skipped; so are sources that fail to parse.
    pub fn export(&self, cover: Option<&str>, modules: &[String]) -> Result<String, ApiError> {
        let mut sources = Vec::with_capacity(modules.len() + 1);

        if let Some(cover) = cover.filter(|c| !c.is_empty()) {
            if let Some(source) = self.load(Area::Covers, cover)? {
                sources.push(source);
            }
        }
        for name in modules {
            if let Some(source) = self.load(Area::Modules, name)? {
                sources.push(source);
            }
        }

        let report = merge_documents(sources)?;
        for skipped in &report.skipped {
            warn!("Export skipped {}: {}", skipped.name, skipped.reason);
        }

        let name = timestamped_name(EXPORT_PREFIX, Utc::now());
        let stored = self.store.save(Area::Exports, &name, &report.bytes)?;
        info!("Exported {} ({} pages)", stored, report.page_count);
        Ok(stored)
    }

    fn load(&self, area: Area, name: &str) -> Result<Option<MergeSource>, ApiError> {
        if !is_pdf_name(name) {
            debug!("Ignoring non-PDF {} entry {:?}", area, name);
            return Ok(None);
        }
        match self.store.read(area, name) {
            Ok(bytes) => Ok(Some(MergeSource::new(name, bytes))),
            Err(StoreError::NotFound(_)) => {
                debug!("Skipping missing {}/{}", area, name);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
