pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "cli", derive(clap::Parser))]
#[cfg_attr(feature = "cli", command(name = "photo-kpi-etl"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Normalize photo metadata and aggregate detection KPIs")
)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    #[cfg_attr(feature = "cli", arg(long, default_value = "./input"))]
    pub input_path: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "./output"))]
    pub output_path: String,

    /// Provenance string stamped on the report; defaults to the input path
    #[cfg_attr(feature = "cli", arg(long))]
    pub provenance: Option<String>,

    #[cfg_attr(feature = "cli", arg(long, default_value = "4"))]
    pub concurrency: usize,

    #[cfg_attr(
        feature = "cli",
        arg(long, value_delimiter = ',', default_value = "json,csv")
    )]
    pub output_formats: Vec<String>,

    #[cfg_attr(feature = "cli", arg(long, help = "Append assets from the mock bucket scan"))]
    pub mock_bucket: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn provenance(&self) -> &str {
        self.provenance.as_deref().unwrap_or(&self.input_path)
    }

    fn concurrency(&self) -> usize {
        self.concurrency
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn mock_bucket(&self) -> bool {
        self.mock_bucket
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input_path", &self.input_path)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_range("concurrency", self.concurrency, 1, 64)?;
        validation::validate_output_formats("output_formats", &self.output_formats)?;
        if let Some(provenance) = &self.provenance {
            validation::validate_non_empty_string("provenance", provenance)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CliConfig {
        CliConfig {
            input_path: "./input".to_string(),
            output_path: "./output".to_string(),
            provenance: None,
            concurrency: 4,
            output_formats: vec!["json".to_string(), "csv".to_string()],
            mock_bucket: false,
            verbose: false,
        }
    }

    #[test]
    fn test_provenance_defaults_to_input_path() {
        let mut config = config();
        assert_eq!(config.provenance(), "./input");

        config.provenance = Some("survey 2024-03".to_string());
        assert_eq!(config.provenance(), "survey 2024-03");
    }

    #[test]
    fn test_validation() {
        assert!(config().validate().is_ok());

        let mut bad = config();
        bad.concurrency = 0;
        assert!(bad.validate().is_err());

        let mut bad = config();
        bad.output_formats = vec!["pdf".to_string()];
        assert!(bad.validate().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_parse_flags() {
        use clap::Parser;

        let config = CliConfig::parse_from([
            "photo-kpi-etl",
            "--input-path",
            "/data/run1",
            "--output-formats",
            "json",
            "--mock-bucket",
        ]);
        assert_eq!(config.input_path, "/data/run1");
        assert_eq!(config.output_formats, vec!["json".to_string()]);
        assert!(config.mock_bucket);
        assert_eq!(config.concurrency, 4);
    }
}
