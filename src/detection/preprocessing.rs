use image::{DynamicImage, GrayImage, Luma};
use imageproc::edges::canny;
use imageproc::filter::box_filter;

/// Convert image to grayscale with BT.601 luma weights.
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = img {
        return gray.clone();
    }
    let rgb = img.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let luma = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
        Luma([luma.round().clamp(0.0, 255.0) as u8])
    })
}

/// Apply a box blur with a square kernel of `kernel` pixels.
///
/// The filter is centered, so an even kernel widens to the next odd window.
pub fn apply_box_blur(img: &GrayImage, kernel: u32) -> GrayImage {
    let radius = kernel / 2;
    if radius == 0 {
        return img.clone();
    }
    box_filter(img, radius, radius)
}

/// Detect edges using Canny with a high threshold of twice `low_threshold`
pub fn detect_edges(img: &GrayImage, low_threshold: u32) -> GrayImage {
    let low = low_threshold as f32;
    canny(img, low, low * 2.0)
}
