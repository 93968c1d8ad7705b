//! Byte-level boundary: turning files, raw bytes and `data:` URLs into
//! pixel buffers, and rendered buffers back into encoded images.

use std::io::Cursor;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat, ImageReader, RgbImage};

use crate::error::{MeasureError, Result};
use crate::models::EncodedImage;

/// Decode an image from raw bytes, guessing the format from its header.
pub fn decode_bytes(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(MeasureError::DataUrl("image data is empty".to_string()));
    }
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()
        .map_err(MeasureError::Decode)
}

/// Decode a `data:<mime>;base64,<payload>` string.
///
/// Everything before the first comma is ignored; the payload must be
/// standard base64.
pub fn decode_data_url(data_url: &str) -> Result<DynamicImage> {
    let (_, payload) = data_url
        .split_once(',')
        .ok_or_else(|| MeasureError::DataUrl("expected a data URL with a comma".to_string()))?;
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| MeasureError::DataUrl(format!("invalid base64 payload: {e}")))?;
    decode_bytes(&bytes)
}

/// Open and decode an image file.
pub fn open_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    ImageReader::open(path.as_ref())?
        .with_guessed_format()?
        .decode()
        .map_err(MeasureError::Decode)
}

/// Encode as PNG.
pub fn encode_png(image: &RgbImage) -> Result<EncodedImage> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(MeasureError::Encode)?;
    Ok(EncodedImage::png(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn checkerboard() -> RgbImage {
        RgbImage::from_fn(16, 9, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb([250, 10, 30])
            } else {
                Rgb([0, 128, 255])
            }
        })
    }

    #[test]
    fn png_round_trip_is_pixel_identical() {
        let original = checkerboard();
        let encoded = encode_png(&original).unwrap();
        let decoded = decode_bytes(&encoded.bytes).unwrap().to_rgb8();
        assert_eq!(decoded, original);
    }

    #[test]
    fn data_url_round_trip() {
        let original = checkerboard();
        let url = encode_png(&original).unwrap().to_data_url();
        assert!(url.starts_with("data:image/png;base64,"));
        let decoded = decode_data_url(&url).unwrap().to_rgb8();
        assert_eq!(decoded, original);
    }

    #[test]
    fn data_url_without_comma_is_rejected() {
        assert!(matches!(
            decode_data_url("not a data url"),
            Err(MeasureError::DataUrl(_))
        ));
    }

    #[test]
    fn bad_base64_is_rejected() {
        assert!(matches!(
            decode_data_url("data:image/png;base64,@@@"),
            Err(MeasureError::DataUrl(_))
        ));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = decode_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, MeasureError::Decode(_)));
    }
}
