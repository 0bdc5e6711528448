use crate::adapters::{ExifTagDecoder, MockBucketSource, SidecarTagDecoder};
use crate::core::detection_parser;
use crate::core::kpi::aggregate;
use crate::core::normalizer::normalize_decoded;
use crate::core::report::assemble;
use crate::core::{ConfigProvider, ExtractedBatch, Pipeline, Storage, TransformResult};
use crate::domain::model::{
    AssetRecord, Report, ScoreRange, SourceFile, SourceKind, SIDECAR_SUFFIX,
};
use crate::domain::ports::{AssetSource, TagDecoder};
use crate::utils::error::{EtlError, Result};
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use zip::write::{FileOptions, ZipWriter};

pub struct KpiPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    image_decoder: Arc<dyn TagDecoder>,
    sidecar_decoder: Arc<dyn TagDecoder>,
    asset_source: Option<Box<dyn AssetSource>>,
}

impl<S: Storage, C: ConfigProvider> KpiPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let asset_source: Option<Box<dyn AssetSource>> = if config.mock_bucket() {
            Some(Box::new(MockBucketSource::new()))
        } else {
            None
        };

        Self {
            storage,
            config,
            image_decoder: Arc::new(ExifTagDecoder),
            sidecar_decoder: Arc::new(SidecarTagDecoder),
            asset_source,
        }
    }

    pub fn with_asset_source(mut self, source: Box<dyn AssetSource>) -> Self {
        self.asset_source = Some(source);
        self
    }

    pub fn with_image_decoder(mut self, decoder: Arc<dyn TagDecoder>) -> Self {
        self.image_decoder = decoder;
        self
    }

    fn input_file(&self, name: &str) -> String {
        Path::new(self.config.input_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }

    /// Decode and normalize photos on blocking tasks, at most `concurrency` at a time.
    async fn normalize_photos(&self, files: Vec<SourceFile>) -> Result<Vec<AssetRecord>> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency().max(1)));
        let mut tasks = JoinSet::new();

        for (order, file) in files.into_iter().enumerate() {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| EtlError::ProcessingError {
                    message: format!("Decoder pool closed: {}", e),
                })?;
            let decoder = match file.kind {
                SourceKind::Sidecar => Arc::clone(&self.sidecar_decoder),
                _ => Arc::clone(&self.image_decoder),
            };
            let location = self.input_file(&file.name);

            tasks.spawn_blocking(move || {
                let _permit = permit;
                (order, decode_asset(decoder.as_ref(), file, location))
            });
        }

        let mut assets = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            let decoded = joined.map_err(|e| EtlError::ProcessingError {
                message: format!("Metadata task failed: {}", e),
            })?;
            assets.push(decoded);
        }

        // 還原輸入順序
        assets.sort_by_key(|(order, _)| *order);
        Ok(assets.into_iter().map(|(_, asset)| asset).collect())
    }
}

fn asset_name(file: &SourceFile) -> String {
    match file.kind {
        SourceKind::Sidecar => file
            .name
            .len()
            .checked_sub(SIDECAR_SUFFIX.len())
            .and_then(|end| file.name.get(..end))
            .unwrap_or(&file.name)
            .to_string(),
        _ => file.name.clone(),
    }
}

/// 同名的 sidecar 取代圖片本身，每個資產只輸出一筆
fn prefer_sidecars(files: Vec<SourceFile>) -> Vec<SourceFile> {
    let sidecar_names: HashSet<String> = files
        .iter()
        .filter(|file| file.kind == SourceKind::Sidecar)
        .map(asset_name)
        .collect();

    files
        .into_iter()
        .filter(|file| {
            let shadowed = file.kind == SourceKind::Image && sidecar_names.contains(&file.name);
            if shadowed {
                tracing::debug!("Using sidecar metadata for {}", file.name);
            }
            !shadowed
        })
        .collect()
}

fn decode_asset(decoder: &dyn TagDecoder, file: SourceFile, location: String) -> AssetRecord {
    let decoded = match &file.content {
        Some(bytes) => decoder.decode(&file.name, bytes),
        None => Err(EtlError::DecodeError {
            source_name: file.name.clone(),
            message: "file could not be read".to_string(),
        }),
    };

    AssetRecord {
        name: asset_name(&file),
        location,
        metadata: normalize_decoded(decoded),
    }
}

fn optional_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer.into_inner().map_err(|e| EtlError::ProcessingError {
        message: format!("Failed to flush CSV output: {}", e),
    })
}

/// 每個類別一列：四個區間計數 + 總數
pub fn kpi_summary_csv(report: &Report) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["class_name".to_string()];
    header.extend(ScoreRange::ALL.iter().map(|r| r.label().to_string()));
    header.push("total".to_string());
    writer.write_record(&header)?;

    for group in &report.groups {
        let mut row = vec![group.class_name().to_string()];
        row.extend(group.score_ranges().map(|(_, count)| count.to_string()));
        row.push(group.total().to_string());
        writer.write_record(&row)?;
    }

    finish_csv(writer)
}

pub fn photo_metadata_csv(assets: &[AssetRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "name",
        "location",
        "date_taken",
        "camera_model",
        "focal_length",
        "latitude",
        "longitude",
        "altitude",
        "other_tag_count",
    ])?;

    for asset in assets {
        let metadata = &asset.metadata;
        writer.write_record(&[
            asset.name.clone(),
            asset.location.clone(),
            metadata.date_taken.clone(),
            metadata.camera_model.clone(),
            metadata.focal_length.clone(),
            optional_number(metadata.latitude),
            optional_number(metadata.longitude),
            optional_number(metadata.altitude),
            metadata.other_tags.len().to_string(),
        ])?;
    }

    finish_csv(writer)
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for KpiPipeline<S, C> {
    async fn extract(&self) -> Result<ExtractedBatch> {
        let input_path = self.config.input_path();
        tracing::debug!("Scanning input directory: {}", input_path);
        let names = self.storage.list_files(input_path).await?;

        let mut files = Vec::new();
        for name in names {
            let Some(kind) = SourceKind::classify(&name) else {
                tracing::debug!("Ignoring unsupported file: {}", name);
                continue;
            };

            // 讀取失敗的檔案仍保留，後續以哨兵值呈現
            let content = match self.storage.read_file(&self.input_file(&name)).await {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    tracing::warn!("⚠️ Failed to read {}: {}", name, e);
                    None
                }
            };
            files.push(SourceFile {
                name,
                kind,
                content,
            });
        }

        Ok(ExtractedBatch { files })
    }

    async fn transform(&self, batch: ExtractedBatch) -> Result<TransformResult> {
        let (photo_files, detection_files): (Vec<_>, Vec<_>) = batch
            .files
            .into_iter()
            .partition(|file| !matches!(file.kind, SourceKind::Detection(_)));

        let mut assets = self.normalize_photos(prefer_sidecars(photo_files)).await?;

        if let Some(source) = &self.asset_source {
            let scanned = source.scan();
            tracing::info!("☁️ {} assets listed from {}", scanned.len(), source.location());
            assets.extend(scanned);
        }

        // 所有檔案的偵測結果合併為單一批次再彙整
        let mut detections = Vec::new();
        for file in &detection_files {
            let (SourceKind::Detection(format), Some(bytes)) = (file.kind, &file.content) else {
                continue;
            };
            let parsed = detection_parser::parse(&String::from_utf8_lossy(bytes), format);
            tracing::debug!("{}: {} detections", file.name, parsed.len());
            detections.extend(parsed);
        }

        let report = assemble(aggregate(&detections), self.config.provenance());

        Ok(TransformResult {
            assets,
            report,
            detection_count: detections.len(),
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let formats = self.config.output_formats();
        let wants = |format: &str| formats.iter().any(|f| f == format);

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            if wants("json") {
                zip.start_file::<_, ()>("kpi_report.json", FileOptions::default())?;
                zip.write_all(serde_json::to_string_pretty(&result.report)?.as_bytes())?;

                zip.start_file::<_, ()>("photo_metadata.json", FileOptions::default())?;
                zip.write_all(serde_json::to_string_pretty(&result.assets)?.as_bytes())?;
            }

            if wants("csv") {
                zip.start_file::<_, ()>("kpi_summary.csv", FileOptions::default())?;
                zip.write_all(&kpi_summary_csv(&result.report)?)?;

                zip.start_file::<_, ()>("photo_metadata.csv", FileOptions::default())?;
                zip.write_all(&photo_metadata_csv(&result.assets)?)?;
            }

            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        let output_path = Path::new(self.config.output_path())
            .join(self.config.bundle_name())
            .to_string_lossy()
            .into_owned();

        tracing::debug!("Writing ZIP bundle ({} bytes) to {}", zip_data.len(), output_path);
        self.storage.write_file(&output_path, &zip_data).await?;
        Ok(output_path)
    }
}
