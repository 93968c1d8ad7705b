pub mod codec;
pub mod detection;
pub mod error;
pub mod models;
pub mod params;
pub mod pipeline;

pub use detection::{ColorPolicy, Measurement, MeasurementPipeline, measure};
pub use error::MeasureError;
pub use models::{Candidate, Category, Center, EncodedImage, EnclosingCircle, MeasurementResult};
pub use params::{LooseValue, MeasureParams, MeasureRequest};
pub use pipeline::{DebugConfig, PipelineContext};
