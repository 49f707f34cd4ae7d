use crate::app::report::{file_name_for, AnalysisReport};
use crate::core::registry::{discover_modules, Discovery};
use crate::core::resolver::resolve;
use crate::domain::model::{FailureEntry, FailureStage};
use crate::domain::ports::{ConfigProvider, Pipeline, SourceTree, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Discovers modules under the configured roots, resolves the analyzed ones
/// and writes the report in every configured format.
pub struct AuditPipeline<S: Storage, T: SourceTree, C: ConfigProvider> {
    storage: S,
    tree: T,
    config: C,
}

impl<S: Storage, T: SourceTree, C: ConfigProvider> AuditPipeline<S, T, C> {
    pub fn new(storage: S, tree: T, config: C) -> Self {
        Self {
            storage,
            tree,
            config,
        }
    }

    /// Analyzed modules to resolve, filtered by the allow-list and sorted by name.
    fn select_targets(&self, discovery: &Discovery) -> Vec<String> {
        let only = self.config.only_modules();
        for name in only {
            if !discovery.targets.contains(name) {
                tracing::warn!("⚠️ Requested module '{}' was not found under an analyzed root", name);
            }
        }

        let mut targets: Vec<String> = discovery
            .targets
            .iter()
            .filter(|name| only.is_empty() || only.contains(name))
            .cloned()
            .collect();
        targets.sort();
        targets
    }
}

#[async_trait]
impl<S: Storage, T: SourceTree, C: ConfigProvider> Pipeline for AuditPipeline<S, T, C> {
    async fn discover(&self) -> Result<Discovery> {
        let discovery =
            discover_modules(self.config.roots(), &self.tree, self.config.scan_options());
        tracing::info!(
            "Registry holds {} modules, {} under analyzed roots",
            discovery.registry.len(),
            discovery.targets.len()
        );
        Ok(discovery)
    }

    async fn resolve(&self, discovery: Discovery) -> Result<AnalysisReport> {
        let targets = self.select_targets(&discovery);
        let Discovery {
            registry,
            mut failures,
            ..
        } = discovery;
        let scan = self.config.scan_options();
        let options = self.config.resolve_options();

        tracing::info!("🔎 Resolving {} modules", targets.len());
        let mut resolutions = Vec::with_capacity(targets.len());
        for name in &targets {
            let Some(module) = registry.get(name) else {
                continue;
            };
            match resolve(module, &registry, &self.tree, scan, options) {
                Ok(resolution) => {
                    if !resolution.is_clean() {
                        tracing::info!(
                            "{}: {} redundant dependencies",
                            name,
                            resolution.redundant.len()
                        );
                    }
                    resolutions.push(resolution);
                }
                Err(e) => {
                    tracing::error!("❌ Failed to resolve {}: {}", name, e);
                    failures.push(FailureEntry {
                        stage: FailureStage::Resolve,
                        path: module.directory.clone(),
                        module: Some(name.clone()),
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(AnalysisReport::new(
            &registry,
            resolutions,
            failures,
            options.excuse_transitive,
        ))
    }

    async fn emit(&self, report: &AnalysisReport) -> Result<Vec<String>> {
        let mut written = Vec::new();
        for format in self.config.output_formats() {
            let rendered = report.render(format)?;
            let path = self
                .storage
                .write_file(&file_name_for(format), rendered.as_bytes())
                .await?;
            tracing::debug!("Wrote {} report to {}", format, path);
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::source_tree::MemorySourceTree;
    use crate::config::AnalysisConfig;
    use crate::core::engine::AuditEngine;
    use crate::domain::model::{ManifestDecl, ModuleCategory};
    use crate::domain::options::RootConfig;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(path.to_string())
        }
    }

    fn manifest(name: &str, public: &[&str], private: &[&str]) -> String {
        ManifestDecl {
            name: name.to_string(),
            public_dependencies: public.iter().map(|s| s.to_string()).collect(),
            private_dependencies: private.iter().map(|s| s.to_string()).collect(),
        }
        .render("ModuleRules")
    }

    fn tree() -> MemorySourceTree {
        MemorySourceTree::new()
            .with_file("/engine/Core/Core.Build.cs", manifest("Core", &[], &[]))
            .with_file("/engine/Core/Public/CoreMinimal.h", "")
            .with_file("/engine/Json/Json.Build.cs", manifest("Json", &["Core"], &[]))
            .with_file("/engine/Json/Public/JsonObject.h", "")
            .with_file("/game/Game/Game.Build.cs", manifest("Game", &["Core"], &["Json", "Slate"]))
            .with_file("/game/Game/Private/Game.cpp", "#include \"CoreMinimal.h\"\n")
            .with_file("/game/Tools/Tools.Build.cs", manifest("Tools", &["Core"], &[]))
            .with_file("/game/Tools/Private/Tools.cpp", "#include \"CoreMinimal.h\"\n")
    }

    fn config() -> AnalysisConfig {
        AnalysisConfig {
            roots: vec![
                RootConfig {
                    path: PathBuf::from("/engine"),
                    category: ModuleCategory::Runtime,
                    analyze: false,
                },
                RootConfig {
                    path: PathBuf::from("/game"),
                    category: ModuleCategory::Developer,
                    analyze: true,
                },
            ],
            output_formats: vec!["text".to_string(), "csv".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_only_analyzed_roots_are_resolved() {
        let pipeline = AuditPipeline::new(MockStorage::new(), tree(), config());

        let discovery = pipeline.discover().await.unwrap();
        assert_eq!(discovery.registry.len(), 4);

        let report = pipeline.resolve(discovery).await.unwrap();
        assert_eq!(report.summary.modules_analyzed, 2);
        assert_eq!(report.modules.len(), 1);

        let game = &report.modules[0];
        assert_eq!(game.module, "Game");
        let names: Vec<&str> = game.redundant.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Json", "Slate"]);
        assert!(game.redundant[1].unknown);
    }

    #[tokio::test]
    async fn test_only_modules_filter() {
        let mut config = config();
        config.only_modules = vec!["Tools".to_string()];
        let pipeline = AuditPipeline::new(MockStorage::new(), tree(), config);

        let discovery = pipeline.discover().await.unwrap();
        let report = pipeline.resolve(discovery).await.unwrap();

        assert_eq!(report.summary.modules_analyzed, 1);
        assert!(!report.has_redundancy());
    }

    #[tokio::test]
    async fn test_engine_writes_every_format() {
        let storage = MockStorage::new();
        let pipeline = AuditPipeline::new(storage.clone(), tree(), config());
        let engine = AuditEngine::new(pipeline);

        let outcome = engine.run().await.unwrap();
        assert_eq!(
            outcome.outputs,
            vec!["redundant-deps.txt", "redundant-deps.csv"]
        );

        let text = storage.get_file("redundant-deps.txt").await.unwrap();
        let text = String::from_utf8(text).unwrap();
        assert!(text.contains("Module: Game has the following redundant dependencies: Json, Slate (unknown module)"));

        let csv = storage.get_file("redundant-deps.csv").await.unwrap();
        assert!(String::from_utf8(csv).unwrap().contains("Game,Json,private,false"));
    }

    #[tokio::test]
    async fn test_unreadable_source_is_a_module_failure() {
        struct FailingReads(MemorySourceTree);

        impl SourceTree for FailingReads {
            fn list_files(&self, dir: &std::path::Path) -> Result<Vec<PathBuf>> {
                self.0.list_files(dir)
            }

            fn read_to_string(&self, path: &std::path::Path) -> Result<String> {
                if path.extension().is_some_and(|e| e == "cpp") && path.starts_with("/game/Game") {
                    return Err(crate::utils::error::AuditError::scan(
                        path,
                        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
                    ));
                }
                self.0.read_to_string(path)
            }
        }

        let pipeline = AuditPipeline::new(MockStorage::new(), FailingReads(tree()), config());
        let discovery = pipeline.discover().await.unwrap();
        let report = pipeline.resolve(discovery).await.unwrap();

        assert_eq!(report.summary.modules_analyzed, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].stage, FailureStage::Resolve);
        assert_eq!(report.failures[0].module.as_deref(), Some("Game"));
    }
}
