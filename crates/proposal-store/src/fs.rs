//! Filesystem-backed store

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::area::Area;
use crate::error::StoreError;
use crate::names::{is_pdf_name, is_plain_file_name, suffix_candidates};
use crate::store::{DocumentStore, NameAllocator};

/// Upper bound on `_<n>` suffixes tried for one name.
const MAX_SUFFIX_ATTEMPTS: usize = 10_000;

/// Stores each area as a subdirectory of `root`.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open a store at `root`, creating the area directories if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        for area in Area::ALL {
            fs::create_dir_all(root.join(area.as_str()))?;
        }
        info!("Document store at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn area_dir(&self, area: Area) -> PathBuf {
        self.root.join(area.as_str())
    }

    fn path_for(&self, area: Area, name: &str) -> Option<PathBuf> {
        is_plain_file_name(name).then(|| self.area_dir(area).join(name))
    }

    /// Create the first free candidate exclusively and hand back its handle.
    fn claim(&self, area: Area, base_name: &str) -> Result<(String, File), StoreError> {
        if !is_plain_file_name(base_name) {
            return Err(StoreError::InvalidName(base_name.to_string()));
        }
        let dir = self.area_dir(area);

        for candidate in suffix_candidates(base_name).take(MAX_SUFFIX_ATTEMPTS) {
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(dir.join(&candidate))
            {
                Ok(file) => return Ok((candidate, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(StoreError::Exhausted(base_name.to_string()))
    }
}

impl NameAllocator for FsStore {
    fn allocate(&self, area: Area, base_name: &str) -> Result<String, StoreError> {
        self.claim(area, base_name).map(|(name, _)| name)
    }
}

impl DocumentStore for FsStore {
    fn list(&self, area: Area) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.area_dir(area))? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) if is_pdf_name(&name) => names.push(name),
                Ok(_) => {}
                Err(raw) => debug!("Skipping non-UTF-8 entry {:?} in {}", raw, area),
            }
        }
        names.sort();
        Ok(names)
    }

    fn save(&self, area: Area, name: &str, bytes: &[u8]) -> Result<String, StoreError> {
        let (stored, mut file) = self.claim(area, name)?;
        let path = self.area_dir(area).join(&stored);

        if let Err(e) = file.write_all(bytes).and_then(|_| file.sync_all()) {
            drop(file);
            if let Err(cleanup) = fs::remove_file(&path) {
                warn!("Failed to remove partial file {}: {}", path.display(), cleanup);
            }
            return Err(e.into());
        }

        debug!("Saved {} bytes to {}/{}", bytes.len(), area, stored);
        Ok(stored)
    }

    fn read(&self, area: Area, name: &str) -> Result<Vec<u8>, StoreError> {
        let path = self
            .path_for(area, name)
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", area, name)))?;
        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(format!("{}/{}", area, name)),
            _ => StoreError::Io(e),
        })
    }

    fn exists(&self, area: Area, name: &str) -> bool {
        self.path_for(area, name).is_some_and(|path| path.is_file())
    }
}
