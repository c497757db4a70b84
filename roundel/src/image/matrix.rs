//! Decoded pixel data in the layout the resizer works on

use fast_image_resize as fr;
use imageproc::image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};

use super::Size;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
}

impl Channels {
    pub fn count(self) -> usize {
        match self {
            Channels::Gray => 1,
            Channels::GrayAlpha => 2,
            Channels::Rgb => 3,
            Channels::Rgba => 4,
        }
    }

    pub fn has_alpha(self) -> bool {
        matches!(self, Channels::GrayAlpha | Channels::Rgba)
    }

    pub(crate) fn pixel_type(self) -> fr::PixelType {
        match self {
            Channels::Gray => fr::PixelType::U8,
            Channels::GrayAlpha => fr::PixelType::U8x2,
            Channels::Rgb => fr::PixelType::U8x3,
            Channels::Rgba => fr::PixelType::U8x4,
        }
    }
}

/// Tightly packed 8-bit pixels, row major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    size: Size,
    channels: Channels,
    data: Vec<u8>,
}

impl Matrix {
    pub fn new(size: Size, channels: Channels, data: Vec<u8>) -> Result<Self> {
        if size.is_empty() {
            return Err(Error::InvalidDimensions {
                width: size.width,
                height: size.height,
            });
        }
        if data.len() != size.area() * channels.count() {
            return Err(Error::Buffer(fr::ImageBufferError::InvalidBufferSize));
        }
        Ok(Self {
            size,
            channels,
            data,
        })
    }

    /// Take over the pixels of a decoded image. Anything wider than 8 bits
    /// per channel is narrowed to the nearest 8-bit layout.
    pub(crate) fn from_dynamic(img: DynamicImage) -> Result<Self> {
        let size = Size::new(img.width(), img.height());
        let (channels, data) = match img {
            DynamicImage::ImageLuma8(buf) => (Channels::Gray, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => (Channels::GrayAlpha, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (Channels::Rgb, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (Channels::Rgba, buf.into_raw()),
            other => match super::decode::narrow_to_u8(other) {
                DynamicImage::ImageLuma8(buf) => (Channels::Gray, buf.into_raw()),
                DynamicImage::ImageLumaA8(buf) => (Channels::GrayAlpha, buf.into_raw()),
                DynamicImage::ImageRgb8(buf) => (Channels::Rgb, buf.into_raw()),
                narrowed => (Channels::Rgba, narrowed.into_rgba8().into_raw()),
            },
        };
        Self::new(size, channels, data)
    }

    pub(crate) fn from_fr(img: fr::images::Image<'static>, channels: Channels) -> Result<Self> {
        let size = Size::new(img.width(), img.height());
        Self::new(size, channels, img.into_vec())
    }

    pub(crate) fn as_fr(&self) -> Result<fr::images::ImageRef<'_>> {
        Ok(fr::images::ImageRef::new(
            self.size.width,
            self.size.height,
            &self.data,
            self.channels.pixel_type(),
        )?)
    }

    pub fn into_bitmap(self) -> Result<DynamicImage> {
        let Size { width, height } = self.size;
        let bad_buffer = || Error::Buffer(fr::ImageBufferError::InvalidBufferSize);
        Ok(match self.channels {
            Channels::Gray => GrayImage::from_raw(width, height, self.data)
                .map(DynamicImage::ImageLuma8)
                .ok_or_else(bad_buffer)?,
            Channels::GrayAlpha => GrayAlphaImage::from_raw(width, height, self.data)
                .map(DynamicImage::ImageLumaA8)
                .ok_or_else(bad_buffer)?,
            Channels::Rgb => RgbImage::from_raw(width, height, self.data)
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(bad_buffer)?,
            Channels::Rgba => RgbaImage::from_raw(width, height, self.data)
                .map(DynamicImage::ImageRgba8)
                .ok_or_else(bad_buffer)?,
        })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at (x, y), one byte per channel
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let n = self.channels.count();
        let start = (y as usize * self.size.width as usize + x as usize) * n;
        self.data.get(start..start + n)
    }
}

#[test]
fn rejects_mismatched_buffer() {
    let err = Matrix::new(Size::new(2, 2), Channels::Rgb, vec![0; 11]).unwrap_err();
    assert!(matches!(err, Error::Buffer(_)));

    let err = Matrix::new(Size::new(0, 2), Channels::Gray, vec![]).unwrap_err();
    assert!(matches!(err, Error::InvalidDimensions { width: 0, height: 2 }));
}

#[test]
fn bitmap_round_trip_keeps_pixels() {
    let img = RgbImage::from_fn(3, 2, |x, y| imageproc::image::Rgb([x as u8, y as u8, 9]));
    let matrix = Matrix::from_dynamic(DynamicImage::ImageRgb8(img.clone())).unwrap();

    assert_eq!(matrix.channels(), Channels::Rgb);
    assert_eq!(matrix.pixel(2, 1), Some(&[2u8, 1, 9][..]));
    assert_eq!(matrix.pixel(3, 0), None);
    assert_eq!(matrix.into_bitmap().unwrap().to_rgb8(), img);
}

#[test]
fn alpha_layouts() {
    assert!(Channels::Rgba.has_alpha());
    assert!(Channels::GrayAlpha.has_alpha());
    assert!(!Channels::Rgb.has_alpha());
    assert!(!Channels::Gray.has_alpha());
}
