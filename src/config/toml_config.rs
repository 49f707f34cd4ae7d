use crate::config::AnalysisConfig;
use crate::domain::options::{ResolveOptions, RootConfig, ScanOptions};
use crate::utils::error::{AuditError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap_or_else(|e| panic!("regex: {e}")));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub analysis: AnalysisSection,
    #[serde(default)]
    pub roots: Vec<RootConfig>,
    pub output: Option<OutputSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSection {
    pub base_type: Option<String>,
    pub manifest_extension: Option<String>,
    pub header_extensions: Option<Vec<String>>,
    pub source_extensions: Option<Vec<String>>,
    pub excuse_transitive: Option<bool>,
    pub only_modules: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub path: Option<String>,
    pub formats: Option<Vec<String>>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AuditError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AuditError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ENGINE_ROOT})
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 套用預設值，轉成執行用的配置
    pub fn into_analysis_config(self) -> AnalysisConfig {
        let defaults = AnalysisConfig::default();
        let scan_defaults = ScanOptions::default();
        let analysis = self.analysis;
        let output = self.output.unwrap_or_default();

        AnalysisConfig {
            roots: self.roots,
            scan: ScanOptions {
                manifest_extension: analysis
                    .manifest_extension
                    .unwrap_or(scan_defaults.manifest_extension),
                base_type: analysis.base_type.unwrap_or(scan_defaults.base_type),
                header_extensions: analysis
                    .header_extensions
                    .unwrap_or(scan_defaults.header_extensions),
                source_extensions: analysis
                    .source_extensions
                    .unwrap_or(scan_defaults.source_extensions),
            },
            resolve: ResolveOptions {
                excuse_transitive: analysis
                    .excuse_transitive
                    .unwrap_or(defaults.resolve.excuse_transitive),
            },
            only_modules: analysis.only_modules.unwrap_or_default(),
            output_path: output.path.unwrap_or(defaults.output_path),
            output_formats: output.formats.unwrap_or(defaults.output_formats),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.clone().into_analysis_config().validate()
    }
}
