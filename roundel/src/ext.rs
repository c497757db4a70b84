//! Extension traits so the helpers read as methods on bytes and bitmaps

use crate::error::Result;
use crate::image::{self, Bitmap, Matrix};

pub trait BytesExt {
    /// Decode only; `None` if the bytes aren't an image
    fn to_image(&self) -> Option<Bitmap>;

    fn to_image_exact(&self, width: u32, height: u32) -> Result<Option<Bitmap>>;

    fn to_image_fit(&self, size: u32) -> Result<Option<Bitmap>>;

    fn to_rounded_image(&self, size: u32) -> Result<Option<Bitmap>>;
}

impl BytesExt for [u8] {
    fn to_image(&self) -> Option<Bitmap> {
        image::to_image(self)
    }

    fn to_image_exact(&self, width: u32, height: u32) -> Result<Option<Bitmap>> {
        image::to_image_exact(self, width, height)
    }

    fn to_image_fit(&self, size: u32) -> Result<Option<Bitmap>> {
        image::to_image_fit(self, size)
    }

    fn to_rounded_image(&self, size: u32) -> Result<Option<Bitmap>> {
        image::to_rounded_image(self, size)
    }
}

/// Named apart from `DynamicImage`'s own `resize*` methods, which would shadow these
pub trait BitmapExt {
    fn to_matrix(&self) -> Result<Matrix>;

    fn supersample_exact(&self, width: u32, height: u32) -> Result<Bitmap>;

    fn supersample_fit(&self, size: u32) -> Result<Bitmap>;

    fn rounded(&self, size: u32) -> Result<Bitmap>;
}

impl BitmapExt for Bitmap {
    fn to_matrix(&self) -> Result<Matrix> {
        image::image_to_matrix(self)
    }

    fn supersample_exact(&self, width: u32, height: u32) -> Result<Bitmap> {
        image::resize_image_exact(self, width, height)
    }

    fn supersample_fit(&self, size: u32) -> Result<Bitmap> {
        image::resize_image_fit(self, size)
    }

    fn rounded(&self, size: u32) -> Result<Bitmap> {
        image::rounded(self, size)
    }
}
