//! Pixel operations behind the resampling policy
//!
//! `SuperSampling` only decides sizes and order of operations; every touch of
//! pixel data goes through [`ImageOps`]. [`CpuOps`] is the real implementation,
//! tests swap in doubles that only track shapes.

use fast_image_resize as fr;
use imageproc::image::{DynamicImage, GrayImage};

use super::matrix::{Channels, Matrix};
use super::{decode, encode, mask, Bitmap, PngCompression, Size};
use crate::config::DecodeMode;
use crate::error::{Error, Result};

pub trait ImageOps {
    type Matrix;

    /// Decode encoded bytes. Empty or unreadable input is [`Error::Decode`].
    fn decode(&mut self, data: &[u8], mode: DecodeMode) -> Result<Self::Matrix>;

    /// Bring a host bitmap into matrix form
    fn import(&mut self, bitmap: &Bitmap) -> Result<Self::Matrix>;

    fn size(&self, matrix: &Self::Matrix) -> Size;

    /// Area-interpolated resize to exactly `size`
    fn resize(&mut self, matrix: &Self::Matrix, size: Size) -> Result<Self::Matrix>;

    /// Add an alpha channel if needed and replace it with `mask`
    fn set_alpha(&mut self, matrix: &Self::Matrix, mask: &GrayImage) -> Result<Self::Matrix>;

    fn to_bitmap(&mut self, matrix: Self::Matrix) -> Result<Bitmap>;
}

/// SIMD resizing with fast_image_resize, codecs and channel work with image/imageproc
pub struct CpuOps {
    resizer: fr::Resizer,
}

impl Default for CpuOps {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuOps {
    pub fn new() -> Self {
        Self {
            resizer: fr::Resizer::new(),
        }
    }
}

impl ImageOps for CpuOps {
    type Matrix = Matrix;

    fn decode(&mut self, data: &[u8], mode: DecodeMode) -> Result<Matrix> {
        Matrix::from_dynamic(decode::decode(data, mode)?)
    }

    /// Round trip through an in-memory PNG so every bitmap layout lands in the
    /// same normalised form a decoded file would.
    fn import(&mut self, bitmap: &Bitmap) -> Result<Matrix> {
        let png = encode::encode_png(bitmap, PngCompression::Fast)?;
        self.decode(&png, DecodeMode::Unchanged)
    }

    fn size(&self, matrix: &Matrix) -> Size {
        matrix.size()
    }

    fn resize(&mut self, matrix: &Matrix, size: Size) -> Result<Matrix> {
        if size.is_empty() {
            return Err(Error::InvalidDimensions {
                width: size.width,
                height: size.height,
            });
        }

        // Same size: nothing to interpolate
        if matrix.size() == size {
            return Ok(matrix.clone());
        }

        let algorithm = area_algorithm(matrix.size(), size);
        log::trace!(
            "Resizing {}x{} -> {}x{} with {:?}",
            matrix.width(),
            matrix.height(),
            size.width,
            size.height,
            algorithm
        );

        let src_image = matrix.as_fr()?;
        let mut dst_image =
            fr::images::Image::new(size.width, size.height, matrix.channels().pixel_type());

        self.resizer.resize(
            &src_image,
            &mut dst_image,
            &fr::ResizeOptions::new().resize_alg(algorithm),
        )?;

        Matrix::from_fr(dst_image, matrix.channels())
    }

    fn set_alpha(&mut self, matrix: &Matrix, mask: &GrayImage) -> Result<Matrix> {
        if matrix.size() != Size::new(mask.width(), mask.height()) {
            return Err(Error::InvalidDimensions {
                width: mask.width(),
                height: mask.height(),
            });
        }

        if matrix.channels().has_alpha() {
            log::debug!("Mask replaces the existing alpha channel");
        }

        let rgba = matrix.clone().into_bitmap()?.into_rgba8();
        let masked = mask::set_alpha(&rgba, mask);
        Matrix::from_dynamic(DynamicImage::ImageRgba8(masked))
    }

    fn to_bitmap(&mut self, matrix: Matrix) -> Result<Bitmap> {
        matrix.into_bitmap()
    }
}

/// Area interpolation: a box filter averages exactly the source region each
/// output pixel covers when shrinking. When enlarging there is nothing to
/// average, and area interpolation degrades to bilinear.
fn area_algorithm(from: Size, to: Size) -> fr::ResizeAlg {
    if to.width <= from.width && to.height <= from.height {
        fr::ResizeAlg::Convolution(fr::FilterType::Box)
    } else {
        fr::ResizeAlg::Convolution(fr::FilterType::Bilinear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imageproc::image::{GrayAlphaImage, LumaA, Rgb, RgbImage, Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> Matrix {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) % 256) as u8])
        });
        Matrix::from_dynamic(DynamicImage::ImageRgb8(img)).unwrap()
    }

    #[test]
    fn resize_to_own_size_is_identity() {
        let mut ops = CpuOps::new();
        let matrix = gradient(31, 17);
        let resized = ops.resize(&matrix, matrix.size()).unwrap();
        assert_eq!(resized, matrix);
    }

    #[test]
    fn resize_hits_exact_target() {
        let mut ops = CpuOps::new();
        let matrix = gradient(100, 50);

        let up = ops.resize(&matrix, Size::new(200, 100)).unwrap();
        assert_eq!(up.size(), Size::new(200, 100));
        assert_eq!(up.channels(), Channels::Rgb);

        let down = ops.resize(&up, Size::new(37, 11)).unwrap();
        assert_eq!(down.size(), Size::new(37, 11));
    }

    #[test]
    fn shrinking_a_flat_image_keeps_its_value() {
        let mut ops = CpuOps::new();
        let img = RgbImage::from_pixel(40, 20, Rgb([120, 60, 30]));
        let matrix = Matrix::from_dynamic(DynamicImage::ImageRgb8(img)).unwrap();

        let down = ops.resize(&matrix, Size::new(10, 5)).unwrap();
        assert!(down.as_bytes().chunks(3).all(|p| p == [120, 60, 30]));
    }

    #[test]
    fn zero_target_is_rejected() {
        let mut ops = CpuOps::new();
        let err = ops.resize(&gradient(4, 4), Size::new(0, 4)).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { width: 0, height: 4 }));
    }

    #[test]
    fn set_alpha_adds_a_channel() {
        let mut ops = CpuOps::new();
        let matrix = gradient(8, 8);
        let masked = ops
            .set_alpha(&matrix, &mask::circle_mask(matrix.size()))
            .unwrap();

        assert_eq!(masked.channels(), Channels::Rgba);
        assert_eq!(masked.pixel(0, 0).unwrap()[3], 0);
        assert_eq!(masked.pixel(4, 4).unwrap()[3], 255);
        assert_eq!(&masked.pixel(4, 4).unwrap()[..3], matrix.pixel(4, 4).unwrap());
    }

    #[test]
    fn set_alpha_overwrites_existing_alpha() {
        let mut ops = CpuOps::new();
        let img = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 77]));
        let matrix = Matrix::from_dynamic(DynamicImage::ImageRgba8(img)).unwrap();
        assert!(matrix.channels().has_alpha());

        let masked = ops
            .set_alpha(&matrix, &mask::circle_mask(matrix.size()))
            .unwrap();
        assert_eq!(masked.pixel(0, 0), Some(&[10u8, 20, 30, 0][..]));
        assert_eq!(masked.pixel(4, 4), Some(&[10u8, 20, 30, 255][..]));
    }

    #[test]
    fn set_alpha_rejects_mismatched_mask() {
        let mut ops = CpuOps::new();
        let err = ops
            .set_alpha(&gradient(8, 8), &GrayImage::new(4, 4))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));
    }

    #[test]
    fn import_keeps_grey_alpha_layout() {
        let mut ops = CpuOps::new();
        let bitmap = DynamicImage::ImageLumaA8(GrayAlphaImage::from_pixel(6, 3, LumaA([50, 128])));
        let matrix = ops.import(&bitmap).unwrap();

        assert_eq!(matrix.size(), Size::new(6, 3));
        assert_eq!(matrix.channels(), Channels::GrayAlpha);
        assert_eq!(matrix.pixel(5, 2), Some(&[50u8, 128][..]));
    }
}
