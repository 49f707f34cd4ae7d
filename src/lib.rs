pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{AnalysisConfig, TomlConfig};

pub use adapters::{LocalSourceTree, LocalStorage, MemorySourceTree};
pub use app::pipelines::AuditPipeline;
pub use app::report::AnalysisReport;
pub use core::{
    engine::{AuditEngine, AuditOutcome},
    registry::{discover_modules, Discovery, ModuleRegistry},
    resolver::resolve,
};
pub use domain::model::{Module, ModuleCategory, Resolution};
pub use domain::options::{ResolveOptions, RootConfig, ScanOptions};
pub use utils::error::{AuditError, Result};
