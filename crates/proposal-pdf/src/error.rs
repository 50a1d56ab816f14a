use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("Failed to render cover: {0}")]
    RenderError(String),

    #[error("Failed to decode image: {0}")]
    ImageError(String),

    #[error("Invalid color '{0}': expected #rrggbb")]
    InvalidColor(String),

    #[error("PDF operation failed: {0}")]
    OperationError(String),
}
