use crate::domain::model::ModuleCategory;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_MANIFEST_EXTENSION: &str = "cs";
pub const DEFAULT_BASE_TYPE: &str = "ModuleRules";
pub const DEFAULT_HEADER_EXTENSIONS: &[&str] = &["h"];
pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &["cpp", "h"];

/// A directory tree scanned for build modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub category: ModuleCategory,
    /// Resolve modules from this root. Roots with `analyze = false` only provide dependencies.
    #[serde(default)]
    pub analyze: bool,
}

/// File naming conventions used while building the registry and scanning sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    pub manifest_extension: String,
    pub base_type: String,
    pub header_extensions: Vec<String>,
    pub source_extensions: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            manifest_extension: DEFAULT_MANIFEST_EXTENSION.to_string(),
            base_type: DEFAULT_BASE_TYPE.to_string(),
            header_extensions: DEFAULT_HEADER_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            source_extensions: DEFAULT_SOURCE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

fn has_extension(path: &std::path::Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}

impl ScanOptions {
    pub fn is_manifest(&self, path: &std::path::Path) -> bool {
        has_extension(path, std::slice::from_ref(&self.manifest_extension))
    }

    pub fn is_header(&self, path: &std::path::Path) -> bool {
        has_extension(path, &self.header_extensions)
    }

    pub fn is_source(&self, path: &std::path::Path) -> bool {
        has_extension(path, &self.source_extensions)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// When a dependency is proven used, also clear every module it declares itself.
    ///
    /// This mirrors the long-standing behaviour of the audit and is on by default.
    /// A used module does not obviously make its own dependencies necessary for
    /// the including module, so the flag exists to compare both readings.
    pub excuse_transitive: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            excuse_transitive: true,
        }
    }
}
