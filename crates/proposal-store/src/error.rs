use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("Unknown area: {0}")]
    UnknownArea(String),

    #[error("No free name left for {0}")]
    Exhausted(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
