use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb};
use tempfile::NamedTempFile;

/// Solid white disk on a black RGB background.
pub fn disk_image(width: u32, height: u32, center: (i32, i32), radius: i32) -> DynamicImage {
    let r2 = radius * radius;
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        let dx = x as i32 - center.0;
        let dy = y as i32 - center.1;
        if dx * dx + dy * dy <= r2 {
            Rgb([255u8, 255u8, 255u8])
        } else {
            Rgb([0u8, 0u8, 0u8])
        }
    });
    DynamicImage::ImageRgb8(img)
}

/// All-black RGB image.
pub fn blank_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb([0u8, 0u8, 0u8])))
}

/// Paint a filled diamond `|dx| + |dy| <= radius` into a binary edge map.
///
/// Its border simplifies to the four corners, whose enclosing circle has
/// exactly `radius` pixels.
pub fn paint_diamond(edges: &mut GrayImage, center: (i32, i32), radius: i32) {
    for dy in -radius..=radius {
        let span = radius - dy.abs();
        for dx in -span..=span {
            edges.put_pixel((center.0 + dx) as u32, (center.1 + dy) as u32, Luma([255]));
        }
    }
}

/// Writes `img` to a temporary PNG file that is removed when dropped.
pub fn write_temp_png(img: &DynamicImage) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}

/// Parameters for images drawn at one millimeter per pixel.
pub fn unit_scale_params() -> sizegauge::MeasureParams {
    sizegauge::MeasureParams::new(100, 3, 1.0)
}

pub fn assert_zeroed_failure(result: &sizegauge::MeasurementResult, message: &str) {
    assert_eq!(result.error.as_deref(), Some(message));
    assert_eq!(result.diameter_mm, 0);
    assert_eq!(result.radius_pixels, 0);
    assert_eq!(result.category, sizegauge::Category::None);
    assert!(result.center.is_none());
    assert!(result.annotated_image.is_none());
}
