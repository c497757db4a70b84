//! Supersampling context: upscale once, then resize down to the final shape

use super::ops::{CpuOps, ImageOps};
use super::{mask, Bitmap, Matrix, Size};
use crate::config::DecodeMode;
use crate::error::{Error, Result};

/// Upscale factor used by every high-level helper
pub const DEFAULT_SCALE_FACTOR: f64 = 2.0;

pub struct SuperSampling<O: ImageOps = CpuOps> {
    ops: O,
    mat: O::Matrix,
    size: Size,
    original: Size,
}

impl SuperSampling<CpuOps> {
    pub fn from_bytes(data: &[u8], mode: DecodeMode, scale_factor: f64) -> Result<Self> {
        Self::decode_with(CpuOps::new(), data, mode, scale_factor)
    }

    pub fn from_matrix(matrix: Matrix, scale_factor: f64) -> Result<Self> {
        Self::with_ops(CpuOps::new(), matrix, scale_factor)
    }

    pub fn from_bitmap(bitmap: &Bitmap, scale_factor: f64) -> Result<Self> {
        let mut ops = CpuOps::new();
        let matrix = ops.import(bitmap)?;
        Self::with_ops(ops, matrix, scale_factor)
    }
}

impl<O: ImageOps> SuperSampling<O> {
    pub fn decode_with(mut ops: O, data: &[u8], mode: DecodeMode, scale_factor: f64) -> Result<Self> {
        let source = ops.decode(data, mode)?;
        Self::with_ops(ops, source, scale_factor)
    }

    /// Upscale `source` by `scale_factor`, truncating each scaled side
    pub fn with_ops(mut ops: O, source: O::Matrix, scale_factor: f64) -> Result<Self> {
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            return Err(Error::InvalidScaleFactor(scale_factor));
        }

        let original = ops.size(&source);
        if original.is_empty() {
            return Err(Error::Decode(format!(
                "source has no pixels ({}x{})",
                original.width, original.height
            )));
        }

        let size = non_empty(original.scale(scale_factor))?;
        log::debug!(
            "Supersampling {}x{} by {scale_factor} -> {}x{}",
            original.width,
            original.height,
            size.width,
            size.height
        );

        let mat = ops.resize(&source, size)?;
        Ok(Self {
            ops,
            mat,
            size,
            original,
        })
    }

    pub fn matrix(&self) -> &O::Matrix {
        &self.mat
    }

    pub fn into_matrix(self) -> O::Matrix {
        self.mat
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

    /// Size of the source before supersampling
    pub fn original_size(&self) -> Size {
        self.original
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.size.aspect_ratio()
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.resize_to(Size::new(width, height))
    }

    pub fn resize_to(&mut self, size: Size) -> Result<()> {
        let resized = self.ops.resize(&self.mat, size)?;
        self.mat = resized;
        self.size = self.ops.size(&self.mat);
        Ok(())
    }

    /// Bound the longer side to `max_size`, truncating the other one
    pub fn resize_to_fit(&mut self, max_size: u32) -> Result<()> {
        let target = fit_truncated(self.size, max_size)?;
        log::debug!("Fit {} -> {}", self.size, target);
        self.resize_to(target)
    }

    /// Make everything outside the inscribed disc transparent
    pub fn apply_circular_mask(&mut self) -> Result<()> {
        let mask = mask::circle_mask(self.size);
        let masked = self.ops.set_alpha(&self.mat, &mask)?;
        self.mat = masked;
        Ok(())
    }

    /// Final resize for rounded output: the shorter side becomes `size`,
    /// rounding the other one half-up
    pub fn resize_rounded(&mut self, size: u32) -> Result<()> {
        let target = fit_rounded(self.size, size)?;
        log::debug!("Rounded fit {} -> {}", self.size, target);
        self.resize_to(target)
    }

    pub fn into_bitmap(mut self) -> Result<Bitmap> {
        self.ops.to_bitmap(self.mat)
    }
}

/// Landscape: width = `max_size`, height = trunc(max_size / aspect).
/// Square and portrait: height = `max_size`, width = trunc(max_size * aspect).
pub fn fit_truncated(current: Size, max_size: u32) -> Result<Size> {
    let aspect = current.aspect_ratio();
    let target = if current.width > current.height {
        Size::new(max_size, (max_size as f64 / aspect) as u32)
    } else {
        Size::new((max_size as f64 * aspect) as u32, max_size)
    };
    non_empty(target)
}

/// Aspect >= 1: height = `size`, width = round(size * aspect).
/// Otherwise: width = `size`, height = round(size / aspect).
///
/// Rounds half-up where [`fit_truncated`] truncates; both are kept as-is.
pub fn fit_rounded(current: Size, size: u32) -> Result<Size> {
    let aspect = current.aspect_ratio();
    let (width, height) = if aspect >= 1.0 {
        ((size as f64 * aspect).round(), size as f64)
    } else {
        (size as f64, (size as f64 / aspect).round())
    };
    non_empty(Size::new(side(width)?, side(height)?))
}

/// A computed side that does not fit in a `u32` is an invalid target
fn side(length: f64) -> Result<u32> {
    if length > u32::MAX as f64 {
        return Err(Error::InvalidDimensions {
            width: u32::MAX,
            height: u32::MAX,
        });
    }
    Ok(length as u32)
}

fn non_empty(size: Size) -> Result<Size> {
    if size.is_empty() {
        return Err(Error::InvalidDimensions {
            width: size.width,
            height: size.height,
        });
    }
    Ok(size)
}
