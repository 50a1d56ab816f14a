//! Storage traits

use tracing::debug;

use crate::area::Area;
use crate::error::StoreError;
use crate::names::{is_pdf_name, sanitize_file_name};

/// Reserves unique names within an area.
pub trait NameAllocator: Send + Sync {
    /// Claim the first free name among `base_name` and its `_<n>` variants.
    ///
    /// A claimed name is reserved: no later call returns it again.
    fn allocate(&self, area: Area, base_name: &str) -> Result<String, StoreError>;
}

/// A flat document store split into [`Area`]s.
pub trait DocumentStore: NameAllocator {
    /// PDF names in `area`, sorted ascending.
    fn list(&self, area: Area) -> Result<Vec<String>, StoreError>;

    /// Write `bytes` under a freshly allocated name derived from `name`.
    /// Never overwrites; returns the name actually used.
    fn save(&self, area: Area, name: &str, bytes: &[u8]) -> Result<String, StoreError>;

    fn read(&self, area: Area, name: &str) -> Result<Vec<u8>, StoreError>;

    fn exists(&self, area: Area, name: &str) -> bool;

    fn list_modules(&self) -> Result<Vec<String>, StoreError> {
        self.list(Area::Modules)
    }

    /// Store an uploaded module. Names not ending in `.pdf` are skipped.
    fn save_module(&self, name: &str, bytes: &[u8]) -> Result<Option<String>, StoreError> {
        if !is_pdf_name(name) {
            debug!("Ignoring non-PDF upload {:?}", name);
            return Ok(None);
        }
        let sanitized = sanitize_file_name(name);
        self.save(Area::Modules, &sanitized, bytes).map(Some)
    }
}
