//! Crate-level error type and `Result` alias.
//!
//! `Decode` is the only variant the high-level helpers treat as a soft failure;
//! everything else is a caller bug or a library fault and is propagated.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Dimensions must be greater than 0, got: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Scale factor must be finite and greater than 0, got: {0}")]
    InvalidScaleFactor(f64),

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Failed to encode image: {0}")]
    Encode(#[source] imageproc::image::ImageError),

    #[error("Resize error: {0}")]
    Resize(#[from] fast_image_resize::ResizeError),

    #[error("Image buffer error: {0}")]
    Buffer(#[from] fast_image_resize::ImageBufferError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    pub fn decode<E: std::fmt::Display>(e: E) -> Self {
        Error::Decode(e.to_string())
    }

    /// Whether this is an "unsupported or corrupt input" outcome rather than a fault.
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, Error::Decode(_))
    }
}
