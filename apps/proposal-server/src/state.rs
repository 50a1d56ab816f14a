//! Application state for the proposal server

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use proposal_pdf::BrandTheme;
use proposal_store::{DocumentStore, FsStore};
use tracing::info;

use crate::config::ServerConfig;
use crate::service::{CoverGenerator, ExportMerger};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub covers: CoverGenerator,
    pub exports: ExportMerger,
    /// Primary brand colour as configured, for the index page
    pub brand_primary: String,
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let theme = config.theme()?;
        let store = FsStore::new(&config.data_dir)?;
        info!("Static assets from {}", config.static_dir.display());

        Ok(Self::from_parts(
            Arc::new(store),
            theme,
            config.brand_blue.clone(),
            config.static_dir.clone(),
            config.max_upload_bytes,
        ))
    }

    pub fn from_parts(
        store: Arc<dyn DocumentStore>,
        theme: BrandTheme,
        brand_primary: String,
        static_dir: PathBuf,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            covers: CoverGenerator::new(Arc::clone(&store), theme, static_dir.clone()),
            exports: ExportMerger::new(Arc::clone(&store)),
            store,
            brand_primary,
            static_dir,
            max_upload_bytes,
        }
    }
}
