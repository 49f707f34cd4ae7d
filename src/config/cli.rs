use crate::config::{AnalysisConfig, TomlConfig};
use crate::domain::model::ModuleCategory;
use crate::domain::options::RootConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "redundant-deps")]
#[command(about = "Find declared module dependencies that are never needed")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Root scanned only as a dependency provider (repeatable)
    #[arg(long = "provider-root", value_name = "DIR")]
    pub provider_roots: Vec<PathBuf>,

    /// Root whose modules are analyzed (repeatable)
    #[arg(long = "target-root", value_name = "DIR")]
    pub target_roots: Vec<PathBuf>,

    #[arg(long, default_value = "Runtime")]
    pub provider_category: ModuleCategory,

    #[arg(long, default_value = "Developer")]
    pub target_category: ModuleCategory,

    /// Only analyze these modules
    #[arg(long = "module", value_delimiter = ',')]
    pub only_modules: Vec<String>,

    /// Do not clear a used dependency's own dependencies
    #[arg(long)]
    pub no_transitive_excuse: bool,

    #[arg(long)]
    pub output_path: Option<String>,

    /// Report formats: text, json, csv
    #[arg(long = "format", value_delimiter = ',')]
    pub formats: Vec<String>,

    /// Exit with status 4 when any redundant dependency is found
    #[arg(long)]
    pub fail_on_redundant: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl CliConfig {
    /// Load the optional TOML file, then apply command-line overrides on top.
    pub fn to_analysis_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?.into_analysis_config(),
            None => AnalysisConfig::default(),
        };

        config
            .roots
            .extend(self.provider_roots.iter().map(|path| RootConfig {
                path: path.clone(),
                category: self.provider_category,
                analyze: false,
            }));
        config
            .roots
            .extend(self.target_roots.iter().map(|path| RootConfig {
                path: path.clone(),
                category: self.target_category,
                analyze: true,
            }));

        if self.no_transitive_excuse {
            config.resolve.excuse_transitive = false;
        }
        if !self.only_modules.is_empty() {
            config.only_modules = self.only_modules.clone();
        }
        if let Some(output_path) = &self.output_path {
            config.output_path = output_path.clone();
        }
        if !self.formats.is_empty() {
            config.output_formats = self.formats.clone();
        }

        Ok(config)
    }
}
