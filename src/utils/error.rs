use thiserror::Error;

#[derive(Error, Debug)]
pub enum GreetingError {
    #[error("Roster request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Roster CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid date '{value}' for {field}: {reason}")]
    InvalidDateError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Delivery error: {message}")]
    DeliveryError { message: String },
}

/// Coarse grouping used in log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Api,
    Config,
    Data,
    Delivery,
    Io,
}

/// Drives the process exit code: Low=0, Medium=2, High=1, Critical=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GreetingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GreetingError::ApiError(_) => ErrorCategory::Api,
            GreetingError::CsvError(_)
            | GreetingError::SerializationError(_)
            | GreetingError::InvalidDateError { .. }
            | GreetingError::ProcessingError { .. } => ErrorCategory::Data,
            GreetingError::IoError(_) => ErrorCategory::Io,
            GreetingError::ConfigError { .. }
            | GreetingError::ConfigValidationError { .. }
            | GreetingError::InvalidConfigValueError { .. }
            | GreetingError::MissingConfigError { .. } => ErrorCategory::Config,
            GreetingError::DeliveryError { .. } => ErrorCategory::Delivery,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Retryable
            GreetingError::ApiError(_) | GreetingError::DeliveryError { .. } => {
                ErrorSeverity::Medium
            }
            GreetingError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            GreetingError::ApiError(_) => {
                "Check the roster endpoint URL and your network connection, then retry"
            }
            GreetingError::CsvError(_) => "Check the roster file for malformed CSV rows",
            GreetingError::IoError(_) => "Check file permissions and that the paths exist",
            GreetingError::SerializationError(_) => "Check that the roster payload is valid JSON",
            GreetingError::InvalidDateError { .. } => {
                "Use calendar dates in YYYY-MM-DD format, e.g. 1990-03-05"
            }
            GreetingError::ConfigError { .. }
            | GreetingError::ConfigValidationError { .. }
            | GreetingError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and run again"
            }
            GreetingError::MissingConfigError { .. } => {
                "Add the missing field to the configuration"
            }
            GreetingError::ProcessingError { .. } => {
                "Check the roster contents against the expected name,birthdate shape"
            }
            GreetingError::DeliveryError { .. } => "Check the delivery target, then retry",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Api => format!("Could not reach the roster source: {}", self),
            ErrorCategory::Config => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Roster data problem: {}", self),
            ErrorCategory::Delivery => format!("Could not deliver greetings: {}", self),
            ErrorCategory::Io => format!("File system problem: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, GreetingError>;
