pub mod detection_parser;
pub mod etl;
pub mod gps;
pub mod kpi;
pub mod normalizer;
pub mod report;

pub use crate::domain::model::{ExtractedBatch, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
