//! Circular alpha mask

use imageproc::image::{GrayImage, Luma, Rgba, RgbaImage};

use super::Size;

/// Width in pixels of the alpha ramp at the disc boundary
pub const EDGE_FEATHER: f64 = 1.5;

/// Single-channel mask: 255 inside a disc centred on the image, 0 outside,
/// with an anti-aliased edge.
///
/// Pixel centres sit at (x + 0.5, y + 0.5). The disc passes through the
/// centres of the outermost pixels on the shorter axis, so its radius is
/// (min(w, h) - 1) / 2. A corner pixel centre is at least sqrt(2) times that
/// far from the disc centre, and the ramp lies inside the radius, so corners
/// are fully transparent for every mask of 2x2 and up. The ramp is never
/// wider than half the radius, which keeps the centre pixel fully opaque once
/// the shorter side is 3 or more.
pub fn circle_mask(size: Size) -> GrayImage {
    let cx = size.width as f64 / 2.0;
    let cy = size.height as f64 / 2.0;
    let radius = (size.width.min(size.height) as f64 - 1.0).max(0.0) / 2.0;
    let feather = EDGE_FEATHER.min(radius / 2.0);

    log::trace!(
        "Building {}x{} circle mask (radius {radius}, feather {feather})",
        size.width,
        size.height
    );

    if feather <= 0.0 {
        return GrayImage::new(size.width, size.height);
    }

    GrayImage::from_fn(size.width, size.height, |x, y| {
        let dx = x as f64 + 0.5 - cx;
        let dy = y as f64 + 0.5 - cy;
        let coverage = ((radius - dx.hypot(dy)) / feather).clamp(0.0, 1.0);
        Luma([(coverage * 255.0).round() as u8])
    })
}

/// Replace the alpha channel of `img` with `mask`
///
/// Panics if the sizes differ; callers build the mask from the image size.
pub fn set_alpha(img: &RgbaImage, mask: &GrayImage) -> RgbaImage {
    imageproc::map::map_colors2(img, mask, |Rgba([r, g, b, _]), Luma([a])| {
        Rgba([r, g, b, a])
    })
}
