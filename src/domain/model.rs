use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

pub const NOT_AVAILABLE: &str = "not available";
pub const NO_EXIF: &str = "not available (no EXIF)";
pub const READ_ERROR: &str = "error reading file";

/// 單張照片正規化後的中繼資料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    pub date_taken: String,
    pub camera_model: String,
    pub focal_length: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    pub other_tags: HashMap<String, String>,
}

impl PhotoMetadata {
    /// Record for an image that carries no EXIF at all.
    pub fn without_exif() -> Self {
        Self::with_sentinels(NO_EXIF)
    }

    /// Record for a source whose bytes could not be decoded.
    pub fn unreadable() -> Self {
        Self::with_sentinels(READ_ERROR)
    }

    fn with_sentinels(date_taken: &str) -> Self {
        Self {
            date_taken: date_taken.to_string(),
            camera_model: NOT_AVAILABLE.to_string(),
            focal_length: NOT_AVAILABLE.to_string(),
            latitude: None,
            longitude: None,
            altitude: None,
            other_tags: HashMap::new(),
        }
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// 資產記錄：來源位置 + 中繼資料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub name: String,
    pub location: String,
    pub metadata: PhotoMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    class_name: String,
    score: f64,
}

impl Detection {
    /// Scores are clamped into `[0, 1]`; NaN becomes `0.0`.
    pub fn new(class_name: impl Into<String>, score: f64) -> Self {
        let score = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 1.0)
        };
        Self {
            class_name: class_name.into(),
            score,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn score(&self) -> f64 {
        self.score
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionFormat {
    Json,
    Xml,
}

impl DetectionFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "json" => Some(DetectionFormat::Json),
            "xml" => Some(DetectionFormat::Xml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionFormat::Json => "json",
            DetectionFormat::Xml => "xml",
        }
    }
}

/// Confidence buckets, in display order. The inner cut points are uneven on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreRange {
    VeryLow,
    Low,
    Medium,
    High,
}

impl ScoreRange {
    pub const ALL: [ScoreRange; 4] = [
        ScoreRange::VeryLow,
        ScoreRange::Low,
        ScoreRange::Medium,
        ScoreRange::High,
    ];

    pub fn for_score(score: f64) -> Self {
        if score <= 0.20 {
            ScoreRange::VeryLow
        } else if score <= 0.49 {
            ScoreRange::Low
        } else if score <= 0.79 {
            ScoreRange::Medium
        } else {
            ScoreRange::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreRange::VeryLow => "0-20%",
            ScoreRange::Low => "20-49%",
            ScoreRange::Medium => "50-79%",
            ScoreRange::High => "80-100%",
        }
    }

    fn index(&self) -> usize {
        match self {
            ScoreRange::VeryLow => 0,
            ScoreRange::Low => 1,
            ScoreRange::Medium => 2,
            ScoreRange::High => 3,
        }
    }
}

/// 單一類別的信心分數分布
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiGroup {
    class_name: String,
    counts: [usize; 4],
}

impl KpiGroup {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            counts: [0; 4],
        }
    }

    pub(crate) fn record(&mut self, range: ScoreRange) {
        self.counts[range.index()] += 1;
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn count(&self, range: ScoreRange) -> usize {
        self.counts[range.index()]
    }

    /// `(label, count)` pairs in fixed bucket order.
    pub fn score_ranges(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        ScoreRange::ALL
            .iter()
            .map(move |range| (range.label(), self.count(*range)))
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Share of this bucket in the group, `0.0` for an empty group.
    pub fn fraction(&self, range: ScoreRange) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.count(range) as f64 / total as f64,
        }
    }
}

struct ScoreRangesView<'a>(&'a KpiGroup);

impl Serialize for ScoreRangesView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ScoreRange::ALL.len()))?;
        for (label, count) in self.0.score_ranges() {
            map.serialize_entry(label, &count)?;
        }
        map.end()
    }
}

impl Serialize for KpiGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("KpiGroup", 3)?;
        state.serialize_field("class_name", &self.class_name)?;
        state.serialize_field("score_ranges", &ScoreRangesView(self))?;
        state.serialize_field("total", &self.total())?;
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub groups: Vec<KpiGroup>,
    pub provenance: String,
    pub generated_at: DateTime<Utc>,
}

/// 輸入檔案種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Image,
    /// Pre-extracted tag dictionary stored next to an image (`*.exif.json`).
    Sidecar,
    Detection(DetectionFormat),
}

pub const SIDECAR_SUFFIX: &str = ".exif.json";
pub const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "tif", "tiff", "png", "webp", "heic", "heif"];

impl SourceKind {
    pub fn classify(file_name: &str) -> Option<Self> {
        let lower = file_name.to_lowercase();
        if lower.ends_with(SIDECAR_SUFFIX) {
            return Some(SourceKind::Sidecar);
        }

        let extension = std::path::Path::new(&lower)
            .extension()
            .and_then(|ext| ext.to_str())?
            .to_string();

        if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            Some(SourceKind::Image)
        } else {
            DetectionFormat::from_extension(&extension).map(SourceKind::Detection)
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub kind: SourceKind,
    /// `None` when the file could not be read.
    pub content: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractedBatch {
    pub files: Vec<SourceFile>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub assets: Vec<AssetRecord>,
    pub report: Report,
    pub detection_count: usize,
}
