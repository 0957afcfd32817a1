use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardingError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("No valid bookings found in {source_name}")]
    NoBookings { source_name: String },

    #[error("Configuration error in '{field}': {message}")]
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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Output,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BoardingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoBookings { .. } => ErrorCategory::Input,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::ZipError(_) | Self::CsvError(_) | Self::SerializationError(_) => {
                ErrorCategory::Output
            }
            Self::IoError(_) => ErrorCategory::Input,
            Self::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 使用者上傳的檔案內容問題，修正檔案後重跑即可
            Self::NoBookings { .. } => ErrorSeverity::Medium,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ProcessingError { .. } => ErrorSeverity::High,
            Self::ZipError(_)
            | Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::NoBookings { .. } => {
                "Check that each row has a booking ID followed by seats, e.g. `101\tA1,B1`"
                    .to_string()
            }
            Self::ConfigValidationError { field, .. } => {
                format!("Fix the '{}' entry in your configuration file", field)
            }
            Self::InvalidConfigValueError { field, .. } => {
                format!("Provide a valid value for '{}'", field)
            }
            Self::MissingConfigError { field } => {
                format!("Add the required '{}' setting", field)
            }
            Self::IoError(_) => {
                "Verify the input file exists and the output directory is writable".to_string()
            }
            Self::ZipError(_) | Self::CsvError(_) | Self::SerializationError(_) => {
                "Retry with a different output format or disable bundling".to_string()
            }
            Self::ProcessingError { .. } => "Re-run with --verbose for details".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NoBookings { .. } => "No valid bookings found in file".to_string(),
            Self::IoError(e) => format!("Could not access a file: {}", e),
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => format!("Configuration problem: {}", self),
            _ => format!("Failed to process file: {}", self),
        }
    }

    /// 嚴重程度對應的程序退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, BoardingError>;
