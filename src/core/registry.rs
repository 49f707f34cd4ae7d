use crate::core::headers::inventory_headers;
use crate::core::manifest::parse_manifest;
use crate::domain::model::{FailureEntry, FailureStage, Module, ModuleCategory};
use crate::domain::options::{RootConfig, ScanOptions};
use crate::domain::ports::SourceTree;
use crate::utils::error::{AuditError, Result};
use std::collections::HashMap;
use std::path::Path;

/// All known modules, keyed by name. Read-only once discovery finishes.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, Module>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a module. A second module with an existing name is rejected
    /// and the first registration stays in place.
    pub fn register(&mut self, module: Module) -> Result<()> {
        if let Some(existing) = self.modules.get(&module.name) {
            return Err(AuditError::DuplicateModuleError {
                name: module.name.clone(),
                existing: existing.manifest_path.clone(),
                duplicate: module.manifest_path,
            });
        }
        self.modules.insert(module.name.clone(), module);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Result of scanning every configured root.
#[derive(Debug, Default)]
pub struct Discovery {
    pub registry: ModuleRegistry,
    /// Modules found under analyzed roots, in discovery order.
    pub targets: Vec<String>,
    pub failures: Vec<FailureEntry>,
}

/// Build the registry from `roots`, in order.
///
/// Files that are not build modules are skipped silently. Unreadable roots,
/// broken manifests and duplicate names are recorded as failures and the
/// rest of the scan continues.
pub fn discover_modules<T: SourceTree + ?Sized>(
    roots: &[RootConfig],
    tree: &T,
    options: &ScanOptions,
) -> Discovery {
    let mut discovery = Discovery::default();

    for root in roots {
        tracing::info!("🔍 Discovering {} modules under {}", root.category, root.path.display());

        let files = match tree.list_files(&root.path) {
            Ok(files) => files,
            Err(e) => {
                tracing::error!("❌ Failed to scan root {}: {}", root.path.display(), e);
                discovery.failures.push(FailureEntry {
                    stage: FailureStage::Scan,
                    path: root.path.clone(),
                    module: None,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let mut found = 0usize;
        for manifest_path in files.iter().filter(|p| options.is_manifest(p)) {
            let module = match load_module(tree, manifest_path, root.category, options) {
                Ok(Some(module)) => module,
                Ok(None) => continue,
                Err((stage, e)) => {
                    tracing::warn!("⚠️ Skipping {}: {}", manifest_path.display(), e);
                    discovery.failures.push(FailureEntry {
                        stage,
                        path: manifest_path.clone(),
                        module: None,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let name = module.name.clone();
            tracing::debug!(
                "Registered module {} ({} headers, {} declared dependencies)",
                name,
                module.header_count(),
                module.declared_dependencies().count()
            );

            match discovery.registry.register(module) {
                Ok(()) => {
                    found += 1;
                    if root.analyze {
                        discovery.targets.push(name);
                    }
                }
                Err(e) => {
                    tracing::warn!("⚠️ {}", e);
                    discovery.failures.push(FailureEntry {
                        stage: FailureStage::Registry,
                        path: manifest_path.clone(),
                        module: Some(name),
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!("Found {} modules under {}", found, root.path.display());
    }

    discovery
}

/// Read, parse and inventory one manifest. `Ok(None)` means "not a build module".
fn load_module<T: SourceTree + ?Sized>(
    tree: &T,
    manifest_path: &Path,
    category: ModuleCategory,
    options: &ScanOptions,
) -> std::result::Result<Option<Module>, (FailureStage, AuditError)> {
    let contents = tree
        .read_to_string(manifest_path)
        .map_err(|e| (FailureStage::Manifest, e))?;

    let decl = match parse_manifest(manifest_path, &contents, &options.base_type)
        .map_err(|e| (FailureStage::Manifest, e))?
    {
        Some(decl) => decl,
        None => return Ok(None),
    };

    let directory = manifest_path.parent().unwrap_or(manifest_path);
    let headers =
        inventory_headers(tree, directory, options).map_err(|e| (FailureStage::Headers, e))?;

    Ok(Some(Module::new(
        decl,
        manifest_path.to_path_buf(),
        category,
        headers,
    )))
}
