use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Invalid domain name '{name}': no '.' separator")]
    InvalidName { name: String },

    #[error("Storage error: {0}")]
    StorageError(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
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
    Data,
    Storage,
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

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::InvalidName { .. } => ErrorCategory::Data,
            EtlError::StorageError(_) => ErrorCategory::Storage,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::IoError(_) | EtlError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            // 鎖定或忙碌的資料庫通常重試即可
            ErrorCategory::Storage if self.is_busy() => ErrorSeverity::Medium,
            ErrorCategory::Storage => ErrorSeverity::Critical,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    fn is_busy(&self) -> bool {
        matches!(
            self,
            EtlError::StorageError(rusqlite::Error::SqliteFailure(e, _))
                if matches!(
                    e.code,
                    rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
                )
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::InvalidName { .. } => {
                "Fix or remove the malformed row in `domains`, or rerun with --on-invalid-name skip"
            }
            EtlError::StorageError(_) if self.is_busy() => {
                "The database is in use by another process; retry once it is released"
            }
            EtlError::StorageError(_) => {
                "Check that the database path is correct and that the `domains` and `rules` tables have the expected columns"
            }
            EtlError::IoError(_) => "Check file permissions and available disk space",
            EtlError::SerializationError(_) => "Report this as a bug; the run report could not be serialized",
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command line flags"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::InvalidName { name } => {
                format!("Domain '{}' has no suffix; the run was aborted and nothing was committed", name)
            }
            EtlError::StorageError(e) => format!("Database operation failed: {}", e),
            EtlError::IoError(e) => format!("File operation failed: {}", e),
            EtlError::SerializationError(e) => format!("Could not write report: {}", e),
            EtlError::ConfigError { message } => format!("Configuration problem: {}", message),
            EtlError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            EtlError::InvalidConfigValueError { field, value, reason } => {
                format!("'{}' is not a valid value for '{}': {}", value, field, reason)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
