use thiserror::Error;

/// Message shown when an upload lacks one of the feature columns.
pub const MISSING_COLUMNS_MESSAGE: &str =
    "CSV must have recency, frequency, and monetary columns.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("{}", MISSING_COLUMNS_MESSAGE)]
    MissingColumns { missing: Vec<String> },
}

#[derive(Error, Debug)]
pub enum RfmError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{0}")]
    SchemaError(#[from] SchemaError),

    #[error("Row {row}: column '{column}' {message}")]
    ParseError {
        row: usize,
        column: String,
        message: String,
    },

    #[error("Invalid upload: {message}")]
    MalformedUpload { message: String },

    #[error("Form validation failed: {}", .field_errors.join(" "))]
    ValidationError { field_errors: Vec<String> },

    #[error("Upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("Model error: {message}")]
    ModelError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The uploaded form or file was not acceptable.
    Input,
    Model,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RfmError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RfmError::CsvError(_)
            | RfmError::SchemaError(_)
            | RfmError::ParseError { .. }
            | RfmError::MalformedUpload { .. }
            | RfmError::ValidationError { .. }
            | RfmError::PayloadTooLarge { .. } => ErrorCategory::Input,
            RfmError::ModelError { .. } | RfmError::SerializationError(_) => ErrorCategory::Model,
            RfmError::ConfigError { .. }
            | RfmError::ConfigValidationError { .. }
            | RfmError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            RfmError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Model => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// HTTP status used when this error ends a request.
    pub fn status_code(&self) -> u16 {
        match self {
            RfmError::ValidationError { .. } | RfmError::SchemaError(_) => 200,
            RfmError::CsvError(_) | RfmError::ParseError { .. } | RfmError::MalformedUpload { .. } => {
                400
            }
            RfmError::PayloadTooLarge { .. } => 413,
            _ => 500,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RfmError::SchemaError(e) => e.to_string(),
            RfmError::CsvError(e) => format!("The uploaded file is not valid CSV: {}", e),
            RfmError::ParseError { .. } | RfmError::MalformedUpload { .. } => self.to_string(),
            RfmError::ValidationError { field_errors } => field_errors.join(" "),
            RfmError::PayloadTooLarge { .. } => self.to_string(),
            RfmError::ModelError { .. } | RfmError::SerializationError(_) => {
                "Prediction failed. Please try again later.".to_string()
            }
            RfmError::ConfigError { .. }
            | RfmError::ConfigValidationError { .. }
            | RfmError::InvalidConfigValueError { .. } => format!("Configuration problem: {}", self),
            RfmError::IoError(_) => "An internal error occurred.".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => {
                "Upload a comma-separated file with a header row containing recency, frequency and monetary"
            }
            ErrorCategory::Model => "Check that the model artifact matches the expected feature layout",
            ErrorCategory::Configuration => "Review the configuration file and command line flags",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, RfmError>;
