use thiserror::Error;

/// Everything that can stop a measurement before a result is produced.
///
/// The pipeline never lets one of these escape as a fault: they are folded
/// into a [`MeasurementResult`](crate::MeasurementResult) with `error` set.
#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("could not load image: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed image data: {0}")]
    DataUrl(String),

    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("No contours found")]
    NoContoursFound,

    #[error("No valid circles found")]
    DegenerateCircle,

    #[error("failed to encode annotated image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl MeasureError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = MeasureError> = std::result::Result<T, E>;
