//! Server configuration
//!
//! Every option can come from the command line or the environment. A `.env`
//! file is loaded before parsing.

use std::path::PathBuf;

use clap::Parser;
use proposal_pdf::cover::theme::{DEFAULT_NEUTRAL, DEFAULT_PRIMARY, DEFAULT_SECONDARY};
use proposal_pdf::{BrandTheme, PdfError};

/// 50 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Command-line arguments for the proposal server
#[derive(Parser, Debug, Clone)]
#[command(name = "proposal-server")]
#[command(about = "Upload PDF modules, generate covers and export merged proposals")]
pub struct ServerConfig {
    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Directory holding the modules, covers and exports areas
    #[arg(long, env = "PROPOSAL_DATA_DIR", default_value = "uploads")]
    pub data_dir: PathBuf,

    /// Directory with background.png / logo.png, served under /static
    #[arg(long, env = "PROPOSAL_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Maximum request body size in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Primary brand color (banner, accent text)
    #[arg(long, env = "BRAND_BLUE", default_value = DEFAULT_PRIMARY)]
    pub brand_blue: String,

    /// Secondary brand color (accent triangle)
    #[arg(long, env = "BRAND_ORANGE", default_value = DEFAULT_SECONDARY)]
    pub brand_orange: String,

    /// Neutral header fill used without a background image
    #[arg(long, env = "BRAND_GREY", default_value = DEFAULT_NEUTRAL)]
    pub brand_grey: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServerConfig {
    pub fn theme(&self) -> Result<BrandTheme, PdfError> {
        BrandTheme::from_hex(&self.brand_blue, &self.brand_orange, &self.brand_grey)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
