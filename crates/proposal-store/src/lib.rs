//! Document storage for the proposal builder
//!
//! Uploaded modules, generated covers and merged exports each live in their
//! own [`Area`]. Names are unique per area and never reused.

pub mod area;
pub mod error;
pub mod fs;
pub mod names;
pub mod store;

pub use area::Area;
pub use error::StoreError;
pub use fs::FsStore;
pub use names::{is_pdf_name, sanitize_file_name, timestamped_name};
pub use store::{DocumentStore, NameAllocator};
