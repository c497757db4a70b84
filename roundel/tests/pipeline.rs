use std::io::Cursor;

use imageproc::image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use roundel::{BitmapExt, BytesExt, Channels, DecodeMode, Matrix, Size, SuperSampling};

fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

fn landscape() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(100, 50, |x, y| {
        Rgb([(x * 2) as u8, (y * 4) as u8, 128])
    }))
}

fn alpha_at(img: &DynamicImage, x: u32, y: u32) -> u8 {
    img.get_pixel(x, y)[3]
}

#[test]
fn jpeg_supersamples_then_fits() {
    let jpeg = encode(&landscape(), ImageFormat::Jpeg);

    let ss = SuperSampling::from_bytes(&jpeg, DecodeMode::Color, 2.0).unwrap();
    assert_eq!(ss.original_size(), Size::new(100, 50));
    assert_eq!(ss.size(), Size::new(200, 100));

    let fitted = jpeg.to_image_fit(50).unwrap().unwrap();
    assert_eq!(fitted.dimensions(), (50, 25));
}

#[test]
fn exact_resize_ignores_aspect() {
    let png = encode(&landscape(), ImageFormat::Png);
    let img = png.to_image_exact(30, 70).unwrap().unwrap();
    assert_eq!(img.dimensions(), (30, 70));
}

#[test]
fn rounded_avatar_has_transparent_corners() {
    let png = encode(&landscape(), ImageFormat::Png);
    let avatar = png.to_rounded_image(60).unwrap().unwrap();

    assert_eq!(avatar.dimensions(), (120, 60));
    assert!(avatar.color().has_alpha());

    for (x, y) in [(0, 0), (119, 0), (0, 59), (119, 59)] {
        assert_eq!(alpha_at(&avatar, x, y), 0, "corner ({x}, {y})");
    }
    // final downscale averages a fully opaque neighbourhood
    assert!(alpha_at(&avatar, 60, 30) >= 250);
}

#[test]
fn rounded_portrait_keeps_width() {
    let portrait = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 90, Rgb([9, 9, 9])));
    let avatar = portrait.rounded(30).unwrap();

    // aspect 80/180, height = round(30 * 2.25) = 68 (67.5 rounds up)
    assert_eq!(avatar.dimensions(), (30, 68));
}

#[test]
fn tiny_supersampled_mask_clears_corners() {
    let source = Matrix::new(Size::new(2, 2), Channels::Rgb, vec![200; 12]).unwrap();
    let mut ss = SuperSampling::from_matrix(source, 1.5).unwrap();
    assert_eq!(ss.size(), Size::new(3, 3));

    ss.apply_circular_mask().unwrap();
    let masked = ss.into_matrix();
    assert_eq!(masked.channels(), Channels::Rgba);

    for (x, y) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
        assert_eq!(masked.pixel(x, y).unwrap()[3], 0, "corner ({x}, {y})");
    }
    assert_eq!(masked.pixel(1, 1).unwrap()[3], 255);
}

#[test]
fn soft_edge_survives_the_pipeline() {
    let square = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, Rgb([200, 10, 10])));
    let avatar = square.rounded(64).unwrap();

    let partial = (0..64)
        .flat_map(|y| (0..64).map(move |x| (x, y)))
        .filter(|&(x, y)| {
            let a = alpha_at(&avatar, x, y);
            a > 0 && a < 255
        })
        .count();
    assert!(partial > 64, "expected an anti-aliased rim, got {partial} partial pixels");
}

#[test]
fn malformed_input_is_absent_not_an_error() {
    let png = encode(&landscape(), ImageFormat::Png);
    let truncated = &png[..png.len() / 2];

    for bytes in [&b"not an image"[..], &[][..], truncated] {
        assert!(bytes.to_image().is_none());
        assert!(bytes.to_image_fit(10).unwrap().is_none());
        assert!(bytes.to_image_exact(10, 10).unwrap().is_none());
        assert!(bytes.to_rounded_image(10).unwrap().is_none());
    }
}

#[test]
fn precondition_violations_are_errors() {
    let png = encode(&landscape(), ImageFormat::Png);

    assert!(png.to_image_exact(0, 10).is_err());
    assert!(png.to_rounded_image(0).is_err());
    assert!(SuperSampling::from_bytes(&png, DecodeMode::Color, 0.0).is_err());
}

#[test]
fn to_image_decodes_without_resampling() {
    let png = encode(&landscape(), ImageFormat::Png);
    let img = png.to_image().unwrap();

    assert_eq!(img.dimensions(), (100, 50));
    assert_eq!(img.to_rgb8(), landscape().to_rgb8());
}

#[test]
fn matrix_round_trip_keeps_dimensions_and_pixels() {
    let bitmap = DynamicImage::ImageRgba8(RgbaImage::from_fn(13, 29, |x, y| {
        Rgba([x as u8, y as u8, (x * y) as u8, 255 - x as u8])
    }));

    let matrix = bitmap.to_matrix().unwrap();
    assert_eq!(matrix.size(), Size::new(13, 29));
    assert_eq!(matrix.channels(), Channels::Rgba);

    let back = matrix.into_bitmap().unwrap();
    assert_eq!(back.dimensions(), (13, 29));
    assert_eq!(back.to_rgba8(), bitmap.to_rgba8());
}

#[test]
fn resizing_to_current_size_is_identity() {
    let mut ss = SuperSampling::from_bitmap(&landscape(), 2.0).unwrap();
    let before = ss.matrix().clone();

    ss.resize(200, 100).unwrap();
    assert_eq!(ss.matrix(), &before);
}

#[test]
fn unchanged_mode_keeps_source_alpha() {
    let translucent = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([1, 2, 3, 77])));
    let png = encode(&translucent, ImageFormat::Png);

    let ss = SuperSampling::from_bytes(&png, DecodeMode::Unchanged, 2.0).unwrap();
    assert_eq!(ss.matrix().channels(), Channels::Rgba);
    assert_eq!(ss.matrix().pixel(10, 10).unwrap()[3], 77);

    let ss = SuperSampling::from_bytes(&png, DecodeMode::Color, 2.0).unwrap();
    assert_eq!(ss.matrix().channels(), Channels::Rgb);
}
