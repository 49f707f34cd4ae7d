use crate::utils::error::{AuditError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AuditError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(AuditError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// A missing root would silently shrink the header sets and inflate the findings.
pub fn validate_directory_exists(field_name: &str, path: &Path) -> Result<()> {
    validate_path(field_name, &path.to_string_lossy())?;
    if !path.is_dir() {
        return Err(AuditError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.display().to_string(),
            reason: "Directory does not exist".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AuditError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// File extensions are given without the leading dot, e.g. `h` or `cpp`.
pub fn validate_extensions(field_name: &str, extensions: &[String]) -> Result<()> {
    if extensions.is_empty() {
        return Err(AuditError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    for extension in extensions {
        validate_non_empty_string(field_name, extension)?;
        if extension.contains('.') || extension.contains('/') || extension.contains('\\') {
            return Err(AuditError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: extension.clone(),
                reason: "Extension must be a bare suffix such as 'h', without a dot".to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, values: &[String], allowed: &[&str]) -> Result<()> {
    for value in values {
        if !allowed.contains(&value.as_str()) {
            return Err(AuditError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.clone(),
                reason: format!("Supported values: {}", allowed.join(", ")),
            });
        }
    }
    Ok(())
}
