use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to scan {}: {source}", path.display())]
    ScanError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {}: {message}", path.display())]
    ManifestParseError { path: PathBuf, message: String },

    #[error(
        "Duplicate module '{name}' in {} (already registered from {})",
        duplicate.display(),
        existing.display()
    )]
    DuplicateModuleError {
        name: String,
        existing: PathBuf,
        duplicate: PathBuf,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    FileSystem,
    Manifest,
    Registry,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AuditError {
    pub fn scan(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ScanError {
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IoError(_) | Self::ScanError { .. } => ErrorCategory::FileSystem,
            Self::ManifestParseError { .. } => ErrorCategory::Manifest,
            Self::DuplicateModuleError { .. } => ErrorCategory::Registry,
            Self::SerializationError(_) | Self::CsvError(_) => ErrorCategory::Output,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 單一模組的問題，不影響其他模組
            ErrorCategory::Manifest | ErrorCategory::Registry => ErrorSeverity::Medium,
            ErrorCategory::FileSystem | ErrorCategory::Output => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::IoError(_) | Self::ScanError { .. } => {
                "Check that the path exists and is readable by the current user"
            }
            Self::ManifestParseError { .. } => {
                "Make sure the build file declares `public class <Name> : <Base>` on one line"
            }
            Self::DuplicateModuleError { .. } => {
                "Rename one of the modules or remove the overlapping root from the configuration"
            }
            Self::SerializationError(_) | Self::CsvError(_) => {
                "Check that the output directory is writable"
            }
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => {
                "Review the configuration file and command-line flags"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::FileSystem => format!("Could not read the source tree: {}", self),
            ErrorCategory::Manifest => format!("Could not understand a build file: {}", self),
            ErrorCategory::Registry => format!("Module registry conflict: {}", self),
            ErrorCategory::Output => format!("Could not write the report: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
