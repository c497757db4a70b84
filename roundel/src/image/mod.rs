//! Supersampled resizing and rounded images

mod decode;
mod encode;
pub mod mask;
mod matrix;
mod ops;
mod supersample;

// Re-export public API
pub use encode::{compress_to_jpeg, compress_to_png, encode_png, PngCompression};
pub use matrix::{Channels, Matrix};
pub use ops::{CpuOps, ImageOps};
pub use supersample::{fit_rounded, fit_truncated, SuperSampling, DEFAULT_SCALE_FACTOR};

use imageproc::image::DynamicImage;

use crate::config::DecodeMode;
use crate::error::{Error, Result};

/// The host-facing image type
pub type Bitmap = DynamicImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Multiply both sides, truncating toward zero
    pub fn scale(&self, factor: f64) -> Size {
        Size::new(
            (self.width as f64 * factor) as u32,
            (self.height as f64 * factor) as u32,
        )
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Size::new(width, height)
    }
}

/// Decode failures become `None`, everything else stays an error
fn soft<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(Error::Decode(reason)) => {
            log::warn!("Failed to decode image: {reason}");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Decode only, no resampling
pub fn to_image(data: &[u8]) -> Option<Bitmap> {
    match decode::decode(data, DecodeMode::Color) {
        Ok(img) => Some(img),
        Err(e) => {
            log::warn!("{e}");
            None
        }
    }
}

fn supersample_bytes(data: &[u8]) -> Result<Option<SuperSampling>> {
    soft(SuperSampling::from_bytes(
        data,
        DecodeMode::Color,
        DEFAULT_SCALE_FACTOR,
    ))
}

/// Supersample, then resize to exactly `width` x `height`
pub fn to_image_exact(data: &[u8], width: u32, height: u32) -> Result<Option<Bitmap>> {
    let Some(mut ss) = supersample_bytes(data)? else {
        return Ok(None);
    };
    ss.resize(width, height)?;
    ss.into_bitmap().map(Some)
}

/// Supersample, then bound the longer side to `size`
pub fn to_image_fit(data: &[u8], size: u32) -> Result<Option<Bitmap>> {
    let Some(mut ss) = supersample_bytes(data)? else {
        return Ok(None);
    };
    ss.resize_to_fit(size)?;
    ss.into_bitmap().map(Some)
}

/// Circular avatar from encoded bytes; `None` if the bytes don't decode
pub fn to_rounded_image(data: &[u8], size: u32) -> Result<Option<Bitmap>> {
    let Some(ss) = supersample_bytes(data)? else {
        return Ok(None);
    };
    round_supersampled(ss, size).map(Some)
}

/// Circular avatar from a bitmap. The mask is applied at the supersampled
/// resolution, before the final downscale.
pub fn rounded(bitmap: &Bitmap, size: u32) -> Result<Bitmap> {
    round_supersampled(SuperSampling::from_bitmap(bitmap, DEFAULT_SCALE_FACTOR)?, size)
}

fn round_supersampled<O: ImageOps>(mut ss: SuperSampling<O>, size: u32) -> Result<Bitmap> {
    ss.apply_circular_mask()?;
    ss.resize_rounded(size)?;
    ss.into_bitmap()
}

/// Bridge a bitmap into a [`Matrix`] through an in-memory lossless PNG
pub fn image_to_matrix(bitmap: &Bitmap) -> Result<Matrix> {
    CpuOps::new().import(bitmap)
}

pub fn resize_image_fit(bitmap: &Bitmap, size: u32) -> Result<Bitmap> {
    let mut ss = SuperSampling::from_bitmap(bitmap, DEFAULT_SCALE_FACTOR)?;
    ss.resize_to_fit(size)?;
    ss.into_bitmap()
}

pub fn resize_image_exact(bitmap: &Bitmap, width: u32, height: u32) -> Result<Bitmap> {
    let mut ss = SuperSampling::from_bitmap(bitmap, DEFAULT_SCALE_FACTOR)?;
    ss.resize(width, height)?;
    ss.into_bitmap()
}

#[test]
fn size_scale_truncates() {
    assert_eq!(Size::new(5, 3).scale(1.5), Size::new(7, 4));
    assert_eq!(Size::new(100, 50).scale(2.0), Size::new(200, 100));
    assert_eq!(Size::new(100, 50).to_string(), "100x50");
}

#[test]
fn size_area_does_not_wrap() {
    assert_eq!(Size::new(65_536, 65_536).area(), 65_536 * 65_536usize);
}
