//! Image encoding: JPEG, PNG

use std::borrow::Cow;

use imageproc::image::{ColorType, DynamicImage};

use super::Size;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum PngCompression {
    Fast,
    #[default]
    Default,
    Best,
}

/// Compress an image to JPEG format with the specified quality
///
/// JPEG has no alpha channel, so images carrying one are flattened to RGB first.
pub fn compress_to_jpeg<W>(img: &DynamicImage, writer: &mut W, quality: u8) -> Result<()>
where
    W: std::io::Write,
{
    use imageproc::image::codecs::jpeg::JpegEncoder;
    use imageproc::image::ImageEncoder;

    if img.color().has_alpha() {
        log::warn!("JPEG output drops the alpha channel");
    }

    let img = match img.color() {
        ColorType::L8 | ColorType::Rgb8 => Cow::Borrowed(img),
        _ => Cow::Owned(DynamicImage::ImageRgb8(img.to_rgb8())),
    };

    JpegEncoder::new_with_quality(writer, quality)
        .write_image(
            img.as_bytes(),
            img.width(),
            img.height(),
            img.color().into(),
        )
        .map_err(Error::Encode)?;

    Ok(())
}

/// Compress an image to PNG format with the specified compression level
pub fn compress_to_png<W>(
    img: &DynamicImage,
    writer: &mut W,
    compression: PngCompression,
) -> Result<()>
where
    W: std::io::Write,
{
    use imageproc::image::codecs::png::{CompressionType, FilterType, PngEncoder};
    use imageproc::image::ImageEncoder;

    let compression_type = match compression {
        PngCompression::Fast => CompressionType::Fast,
        PngCompression::Default => CompressionType::Default,
        PngCompression::Best => CompressionType::Best,
    };

    // PNG carries up to 16-bit integer samples; float images are narrowed first
    let img = match img.color() {
        ColorType::Rgb32F | ColorType::Rgba32F => {
            Cow::Owned(DynamicImage::ImageRgba8(img.to_rgba8()))
        }
        _ => Cow::Borrowed(img),
    };

    let is_grayscale = img.color() == ColorType::L8 || img.color() == ColorType::La8;

    let encoder = PngEncoder::new_with_quality(
        writer,
        compression_type,
        if is_grayscale {
            FilterType::NoFilter
        } else {
            FilterType::Adaptive
        },
    );

    encoder
        .write_image(
            img.as_bytes(),
            img.width(),
            img.height(),
            img.color().into(),
        )
        .map_err(Error::Encode)?;

    Ok(())
}

/// Encode to an in-memory PNG
pub fn encode_png(img: &DynamicImage, compression: PngCompression) -> Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(Size::new(img.width(), img.height()).area());
    compress_to_png(img, &mut buffer, compression)?;
    log::trace!(
        "Encoded {}x{} PNG ({} bytes)",
        img.width(),
        img.height(),
        buffer.len()
    );
    Ok(buffer)
}
