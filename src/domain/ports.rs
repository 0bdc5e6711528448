use crate::domain::model::{AssetRecord, Detection, DetectionFormat, ExtractedBatch, TransformResult};
use crate::domain::tags::TagDictionary;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// File names directly under `dir`, sorted.
    fn list_files(&self, dir: &str)
        -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn provenance(&self) -> &str;
    fn concurrency(&self) -> usize;
    fn output_formats(&self) -> &[String];
    fn mock_bucket(&self) -> bool;
    fn bundle_name(&self) -> &str {
        "kpi_report.zip"
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ExtractedBatch>;
    async fn transform(&self, batch: ExtractedBatch) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}

/// Raw file bytes to tag dictionary.
pub trait TagDecoder: Send + Sync {
    fn decode(&self, source_name: &str, bytes: &[u8]) -> Result<TagDictionary>;
}

/// One detection grammar.
pub trait DetectionDecoder: Send + Sync {
    fn format(&self) -> DetectionFormat;
    fn decode(&self, content: &str) -> Result<Vec<Detection>>;
}

/// Listing of already-normalized assets from a remote store.
pub trait AssetSource: Send + Sync {
    fn location(&self) -> &str;
    fn scan(&self) -> Vec<AssetRecord>;
}
