#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::app::report::OUTPUT_FORMATS;
use crate::core::ConfigProvider;
use crate::domain::options::{ResolveOptions, RootConfig, ScanOptions};
use crate::utils::error::{AuditError, Result};
use crate::utils::validation::{self, Validate};

pub const DEFAULT_OUTPUT_PATH: &str = "./output";

/// Fully merged run configuration, passed explicitly into discovery and resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub roots: Vec<RootConfig>,
    pub scan: ScanOptions,
    pub resolve: ResolveOptions,
    pub only_modules: Vec<String>,
    pub output_path: String,
    pub output_formats: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            scan: ScanOptions::default(),
            resolve: ResolveOptions::default(),
            only_modules: Vec::new(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            output_formats: vec!["text".to_string()],
        }
    }
}

impl ConfigProvider for AnalysisConfig {
    fn roots(&self) -> &[RootConfig] {
        &self.roots
    }

    fn scan_options(&self) -> &ScanOptions {
        &self.scan
    }

    fn resolve_options(&self) -> ResolveOptions {
        self.resolve
    }

    fn only_modules(&self) -> &[String] {
        &self.only_modules
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }
}

impl Validate for AnalysisConfig {
    fn validate(&self) -> Result<()> {
        if self.roots.is_empty() {
            return Err(AuditError::MissingConfigError {
                field: "roots".to_string(),
            });
        }
        if !self.roots.iter().any(|root| root.analyze) {
            return Err(AuditError::ConfigValidationError {
                field: "roots".to_string(),
                message: "at least one root must be marked for analysis".to_string(),
            });
        }
        for root in &self.roots {
            validation::validate_directory_exists("roots.path", &root.path)?;
        }

        validation::validate_non_empty_string("analysis.base_type", &self.scan.base_type)?;
        validation::validate_extensions(
            "analysis.manifest_extension",
            std::slice::from_ref(&self.scan.manifest_extension),
        )?;
        validation::validate_extensions("analysis.header_extensions", &self.scan.header_extensions)?;
        validation::validate_extensions("analysis.source_extensions", &self.scan.source_extensions)?;

        validation::validate_path("output.path", &self.output_path)?;
        validation::validate_one_of("output.formats", &self.output_formats, OUTPUT_FORMATS)?;
        Ok(())
    }
}
