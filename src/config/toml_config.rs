use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    pub extract: Option<ExtractConfig>,
    pub report: Option<ReportConfig>,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub input_path: String,
    pub mock_bucket: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    pub concurrency: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub provenance: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: Option<String>,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SURVEY_ROOT})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validation::validate_path("source.input_path", &self.source.input_path)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_range("extract.concurrency", self.concurrency(), 1, 64)?;
        validation::validate_output_formats("load.output_formats", &self.load.output_formats)?;

        if let Some(compression) = &self.load.compression {
            validation::validate_file_extensions(
                "load.compression.filename",
                std::slice::from_ref(&compression.filename),
                &["zip"],
            )?;
        }

        if let Some(report) = &self.report {
            let provenance = validation::validate_required_field(
                "report.provenance",
                &report.provenance,
            )?;
            validation::validate_non_empty_string("report.provenance", provenance)?;
        }

        Ok(())
    }

    pub fn concurrency(&self) -> usize {
        self.extract
            .as_ref()
            .and_then(|e| e.concurrency)
            .unwrap_or(4)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref()?.log_level.as_deref()
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.source.input_path
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn provenance(&self) -> &str {
        self.report
            .as_ref()
            .and_then(|r| r.provenance.as_deref())
            .unwrap_or(&self.source.input_path)
    }

    fn concurrency(&self) -> usize {
        TomlConfig::concurrency(self)
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn mock_bucket(&self) -> bool {
        self.source.mock_bucket.unwrap_or(false)
    }

    fn bundle_name(&self) -> &str {
        self.load
            .compression
            .as_ref()
            .map(|c| c.filename.as_str())
            .unwrap_or("kpi_report.zip")
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[pipeline]
name = "survey-kpi"
version = "1.0.0"

[source]
input_path = "./survey/run-1"
mock_bucket = true

[extract]
concurrency = 8

[report]
provenance = "Survey run 1"

[load]
output_path = "./test-output"
output_formats = ["csv", "json"]

[load.compression]
filename = "run1.zip"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.pipeline.name, "survey-kpi");
        assert_eq!(config.input_path(), "./survey/run-1");
        assert_eq!(config.provenance(), "Survey run 1");
        assert_eq!(config.bundle_name(), "run1.zip");
        assert_eq!(TomlConfig::concurrency(&config), 8);
        assert!(config.mock_bucket());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let toml_content = r#"
[pipeline]
name = "minimal"
version = "1.0"

[source]
input_path = "./in"

[load]
output_path = "./out"
output_formats = ["json"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.provenance(), "./in");
        assert_eq!(config.bundle_name(), "kpi_report.zip");
        assert_eq!(TomlConfig::concurrency(&config), 4);
        assert!(!config.mock_bucket());
        assert!(!config.json_logs());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PHOTO_KPI_TEST_ROOT", "/mnt/survey");

        let toml_content = r#"
[pipeline]
name = "test"
version = "1.0"

[source]
input_path = "${PHOTO_KPI_TEST_ROOT}/photos"

[load]
output_path = "./output"
output_formats = ["csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.input_path, "/mnt/survey/photos");

        std::env::remove_var("PHOTO_KPI_TEST_ROOT");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[pipeline]
name = "test"
version = "1.0"

[source]
input_path = "./in"

[report]

[load]
output_path = "./output"
output_formats = ["pdf"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[pipeline]
name = "file-test"
version = "1.0"

[source]
input_path = "./in"

[load]
output_path = "./output"
output_formats = ["csv"]
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "file-test");
    }
}
