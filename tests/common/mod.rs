mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from sizegauge for tests
pub use sizegauge::{
    Category, Center, ColorPolicy, MeasureError, MeasureParams, MeasureRequest, MeasurementPipeline,
    MeasurementResult,
};
