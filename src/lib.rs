pub mod utils;
pub mod pipeline;
pub mod config;
pub mod helper;
pub mod error;
pub mod modules;

pub use crate::config::config::{DetectorConfig, MeasureConfig};
pub use crate::error::{DetectionError, InvocationError};
pub use crate::modules::detector::{Detection, Detector};
pub use crate::pipeline::pipeline::MeasurementPipeline;
pub use crate::pipeline::result::{emit, serialize, BatchOutcome, BatchResult, ImageResult};
