use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting ETL process...");

        // Extract
        let phase = Instant::now();
        let batch = self.pipeline.extract().await?;
        tracing::info!(
            "📥 Extracted {} source files in {:?}",
            batch.files.len(),
            phase.elapsed()
        );

        // Transform
        let phase = Instant::now();
        let result = self.pipeline.transform(batch).await?;
        tracing::info!(
            "🔄 Normalized {} assets, aggregated {} detections into {} classes in {:?}",
            result.assets.len(),
            result.detection_count,
            result.report.groups.len(),
            phase.elapsed()
        );

        // Load
        let phase = Instant::now();
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("💾 Output saved to {} in {:?}", output_path, phase.elapsed());

        tracing::info!("Total time: {:?}", started.elapsed());
        Ok(output_path)
    }
}
