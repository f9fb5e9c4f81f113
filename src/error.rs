use thiserror::Error;

/// Errors that can occur while loading a source image or exporting a mask
#[derive(Error, Debug)]
pub enum MaskError {
    #[error("Invalid source image: {0}")]
    InvalidImage(String),

    #[error("Failed to decode source image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Failed to decode base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The raster has no pixels, so there is nothing to encode
    #[error("Cannot encode an empty surface ({width}x{height})")]
    EmptySurface { width: u32, height: u32 },

    #[error("Failed to encode mask: {0}")]
    Encoding(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for mask canvas operations
pub type MaskResult<T> = Result<T, MaskError>;
