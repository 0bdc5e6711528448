pub mod kpi_pipeline;

pub use kpi_pipeline::KpiPipeline;
