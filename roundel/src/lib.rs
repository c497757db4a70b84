pub mod config;
pub mod error;
pub mod ext;
pub mod image;

// Re-export commonly used types
pub use config::{DecodeMode, ResampleConfig};
pub use error::{Error, Result};
pub use ext::{BitmapExt, BytesExt};
pub use crate::image::{
    image_to_matrix, resize_image_exact, resize_image_fit, rounded, to_image, to_image_exact,
    to_image_fit, to_rounded_image, Bitmap, Channels, CpuOps, ImageOps, Matrix, PngCompression,
    Size, SuperSampling, DEFAULT_SCALE_FACTOR,
};
