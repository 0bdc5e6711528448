pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use app::pipelines::KpiPipeline;
pub use config::{cli::LocalStorage, toml_config::TomlConfig, CliConfig};
pub use core::etl::EtlEngine;
pub use domain::model::{AssetRecord, Detection, DetectionFormat, KpiGroup, PhotoMetadata, Report};
pub use domain::tags::{Rational, TagDictionary, TagKey, TagValue};
pub use utils::error::{EtlError, Result};
