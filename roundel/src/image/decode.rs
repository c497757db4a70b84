//! Image decoding

use imageproc::image::{load_from_memory, ColorType, DynamicImage, GenericImageView};

use crate::config::DecodeMode;
use crate::error::{Error, Result};

/// Decode image from memory
///
/// Wraps the image crate's load_from_memory and normalises the result so
/// that every decoded image is 8 bits per channel.
pub fn decode(data: &[u8], mode: DecodeMode) -> Result<DynamicImage> {
    let img = load_from_memory(data).map_err(Error::decode)?;

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::Decode(format!("image has no pixels ({width}x{height})")));
    }

    Ok(match mode {
        DecodeMode::Color => DynamicImage::ImageRgb8(img.into_rgb8()),
        DecodeMode::Unchanged => narrow_to_u8(img),
    })
}

/// Keep the channel layout, drop everything above 8 bits per channel
pub(crate) fn narrow_to_u8(img: DynamicImage) -> DynamicImage {
    match img.color() {
        ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => img,
        ColorType::L16 => DynamicImage::ImageLuma8(img.into_luma8()),
        ColorType::La16 => DynamicImage::ImageLumaA8(img.into_luma_alpha8()),
        ColorType::Rgb16 | ColorType::Rgb32F => DynamicImage::ImageRgb8(img.into_rgb8()),
        _ => DynamicImage::ImageRgba8(img.into_rgba8()),
    }
}
