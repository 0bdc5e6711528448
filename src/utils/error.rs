use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("XML parsing error: {message}")]
    XmlError { message: String },

    #[error("Failed to decode '{source_name}': {message}")]
    DecodeError {
        source_name: String,
        message: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Io,
    Decoding,
    Processing,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::IoError(_) => ErrorCategory::Io,
            EtlError::XmlError { .. } | EtlError::DecodeError { .. } => ErrorCategory::Decoding,
            EtlError::SerializationError(_) | EtlError::CsvError(_) | EtlError::ZipError(_) => {
                ErrorCategory::Export
            }
            EtlError::ProcessingError { .. } | EtlError::ValidationError { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 單一檔案解碼失敗不影響整批
            ErrorCategory::Decoding => ErrorSeverity::Low,
            ErrorCategory::Processing => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Export => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the command line flags or the TOML configuration file"
            }
            ErrorCategory::Io => "Check that the input and output directories exist and are accessible",
            ErrorCategory::Decoding => "The file is skipped; re-export it from its source tool",
            ErrorCategory::Processing => "Inspect the input files for unexpected content",
            ErrorCategory::Export => "Check free disk space and write permissions on the output path",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("配置錯誤 ({}): {}", field, reason)
            }
            EtlError::MissingConfigError { field } => format!("缺少必要配置: {}", field),
            EtlError::IoError(e) => format!("檔案存取失敗: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
