use serde::Deserialize;

use crate::error::{MeasureError, Result};

pub const DEFAULT_THRESHOLD: i32 = 100;
pub const DEFAULT_BLUR: i32 = 3;
/// Millimeters per pixel of a 96 dpi display.
pub const DEFAULT_PIXEL_RATIO: f64 = 0.2645833;

/// Tuning knobs for one measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureParams {
    /// Low Canny threshold; the high threshold is always twice this.
    pub threshold: i32,
    /// Box blur kernel size in pixels.
    pub blur: i32,
    /// Millimeters per pixel.
    pub pixel_ratio: f64,
}

impl Default for MeasureParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            blur: DEFAULT_BLUR,
            pixel_ratio: DEFAULT_PIXEL_RATIO,
        }
    }
}

impl MeasureParams {
    pub fn new(threshold: i32, blur: i32, pixel_ratio: f64) -> Self {
        Self {
            threshold,
            blur,
            pixel_ratio,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.threshold < 1 {
            return Err(MeasureError::invalid(
                "threshold",
                format!("must be at least 1, got {}", self.threshold),
            ));
        }
        if self.blur < 1 {
            return Err(MeasureError::invalid(
                "blur",
                format!("must be at least 1, got {}", self.blur),
            ));
        }
        if !self.pixel_ratio.is_finite() || self.pixel_ratio <= 0.0 {
            return Err(MeasureError::invalid(
                "pixel_ratio",
                format!("must be a positive number, got {}", self.pixel_ratio),
            ));
        }
        Ok(())
    }
}

/// A parameter as it arrives from a loosely typed transport: a JSON number
/// or a string holding one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl LooseValue {
    /// Integer coercion: floats truncate, strings must hold an integer.
    pub fn to_int(&self, name: &'static str) -> Result<i32> {
        let value = match self {
            LooseValue::Int(v) => *v,
            LooseValue::Float(v) if v.is_finite() => v.trunc() as i64,
            LooseValue::Float(v) => {
                return Err(MeasureError::invalid(name, format!("not a number: {v}")));
            }
            LooseValue::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| MeasureError::invalid(name, format!("not an integer: {s:?}")))?,
        };
        i32::try_from(value)
            .map_err(|_| MeasureError::invalid(name, format!("out of range: {value}")))
    }

    pub fn to_float(&self, name: &'static str) -> Result<f64> {
        match self {
            LooseValue::Int(v) => Ok(*v as f64),
            LooseValue::Float(v) => Ok(*v),
            LooseValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| MeasureError::invalid(name, format!("not a number: {s:?}"))),
        }
    }
}

/// Inline measurement request: a `data:` URL plus optional loose parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct MeasureRequest {
    pub image_data: String,
    #[serde(default)]
    pub threshold: Option<LooseValue>,
    #[serde(default)]
    pub blur_amount: Option<LooseValue>,
    #[serde(default)]
    pub pixel_ratio: Option<LooseValue>,
}

impl MeasureRequest {
    /// Coerces the loose fields, falling back to defaults for absent ones.
    /// Range checks are left to [`MeasureParams::validate`].
    pub fn params(&self) -> Result<MeasureParams> {
        let defaults = MeasureParams::default();
        Ok(MeasureParams {
            threshold: match &self.threshold {
                Some(v) => v.to_int("threshold")?,
                None => defaults.threshold,
            },
            blur: match &self.blur_amount {
                Some(v) => v.to_int("blur")?,
                None => defaults.blur,
            },
            pixel_ratio: match &self.pixel_ratio {
                Some(v) => v.to_float("pixel_ratio")?,
                None => defaults.pixel_ratio,
            },
        })
    }
}
