use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use imageproc::point::Point;
use serde::{Serialize, Serializer};

use crate::error::MeasureError;

/// Smallest circle enclosing a polygon, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnclosingCircle {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl EnclosingCircle {
    pub const ZERO: Self = Self {
        center_x: 0.0,
        center_y: 0.0,
        radius: 0.0,
    };

    /// Radius truncated to whole pixels, the unit every comparison uses.
    pub fn radius_pixels(&self) -> u32 {
        self.radius as u32
    }

    pub fn center(&self) -> Center {
        Center {
            center_x: self.center_x as i32,
            center_y: self.center_y as i32,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        let dx = x - self.center_x;
        let dy = y - self.center_y;
        (dx * dx + dy * dy).sqrt() <= self.radius + 1e-7
    }
}

/// A simplified contour together with its fitted circle.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub polygon: Vec<Point<i32>>,
    pub circle: EnclosingCircle,
}

impl Candidate {
    pub fn radius_pixels(&self) -> u32 {
        self.circle.radius_pixels()
    }
}

/// Size bucket of the measured object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Small,
    Medium,
    Large,
    None,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Small => "Small",
            Category::Medium => "Medium",
            Category::Large => "Large",
            Category::None => "None",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Center {
    pub center_x: i32,
    pub center_y: i32,
}

/// Rendered output in an encoded raster format.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            mime: "image/png",
            bytes,
        }
    }

    /// `data:<mime>;base64,<payload>`, ready for inline display.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedImage")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Serialize for EncodedImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_url())
    }
}

/// Outcome of one measurement run.
///
/// Either the measurement fields are populated and `error` is `None`, or
/// `error` is set and everything else is zeroed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementResult {
    pub diameter_mm: u32,
    pub category: Category,
    pub radius_pixels: u32,
    #[serde(rename = "processed_image")]
    pub annotated_image: Option<EncodedImage>,
    #[serde(flatten)]
    pub center: Option<Center>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MeasurementResult {
    pub fn success(
        diameter_mm: u32,
        category: Category,
        radius_pixels: u32,
        center: Center,
        annotated_image: EncodedImage,
    ) -> Self {
        Self {
            diameter_mm,
            category,
            radius_pixels,
            annotated_image: Some(annotated_image),
            center: Some(center),
            error: None,
        }
    }

    pub fn failure(error: &MeasureError) -> Self {
        Self::failure_message(error.to_string())
    }

    pub fn failure_message(message: impl Into<String>) -> Self {
        Self {
            diameter_mm: 0,
            category: Category::None,
            radius_pixels: 0,
            annotated_image: None,
            center: None,
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
