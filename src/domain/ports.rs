use crate::app::report::AnalysisReport;
use crate::core::registry::Discovery;
use crate::domain::options::{ResolveOptions, RootConfig, ScanOptions};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Read access to the module source trees.
pub trait SourceTree: Send + Sync {
    /// Every file under `dir`, recursively, in a stable order.
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn roots(&self) -> &[RootConfig];
    fn scan_options(&self) -> &ScanOptions;
    fn resolve_options(&self) -> ResolveOptions;
    /// Restrict resolution to these module names; empty means every analyzed module.
    fn only_modules(&self) -> &[String];
    fn output_formats(&self) -> &[String];
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn discover(&self) -> Result<Discovery>;
    async fn resolve(&self, discovery: Discovery) -> Result<AnalysisReport>;
    async fn emit(&self, report: &AnalysisReport) -> Result<Vec<String>>;
}
