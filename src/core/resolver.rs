//! Redundant dependency detection.
//!
//! Resolution runs in two phases. [`collect_evidence`] scans a module's
//! sources and records every include the module does not satisfy with its own
//! headers, in file order then line order. [`apply_evidence`] then walks that
//! evidence in the same order and narrows the candidate list, which starts as
//! every declared dependency.
//!
//! The candidate list shrinks while the evidence is applied, so a later include
//! only sees the candidates still left. Reordering the evidence can change the
//! result; callers that need reproducible output must list files in a stable
//! order.

use crate::core::registry::ModuleRegistry;
use crate::domain::model::{IncludeEvidence, Justification, Module, Resolution};
use crate::domain::options::{ResolveOptions, ScanOptions};
use crate::domain::ports::SourceTree;
use crate::utils::error::Result;
use regex::Regex;
use std::sync::LazyLock;

static INCLUDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"#include *"([^"]*)"#).unwrap_or_else(|e| panic!("regex: {e}")));

/// Base names of the quoted include targets in `contents`, with 1-based line numbers.
pub fn extract_includes(contents: &str) -> Vec<(usize, String)> {
    let mut includes = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        for caps in INCLUDE_RE.captures_iter(line) {
            let target = &caps[1];
            // Only '/' separates directories; a backslash stays part of the name.
            let base = target.rsplit('/').next().unwrap_or(target);
            includes.push((index + 1, base.to_string()));
        }
    }
    includes
}

/// Phase one: includes in `module`'s sources that its own headers do not satisfy.
pub fn collect_evidence<T: SourceTree + ?Sized>(
    module: &Module,
    tree: &T,
    options: &ScanOptions,
) -> Result<Vec<IncludeEvidence>> {
    let mut evidence = Vec::new();

    for file in tree.list_files(&module.directory)? {
        if !options.is_source(&file) {
            continue;
        }
        let contents = tree.read_to_string(&file)?;
        for (line, header) in extract_includes(&contents) {
            if module.has_header(&header) {
                continue;
            }
            evidence.push(IncludeEvidence {
                file: file.clone(),
                line,
                header,
            });
        }
    }

    Ok(evidence)
}

/// Phase two: narrow the declared dependencies of `module` using `evidence`, in order.
///
/// For each include, the candidate list is walked by position while it is
/// being edited: a known module owning the included header is proven used and
/// its first occurrence removed. With [`ResolveOptions::excuse_transitive`]
/// set, the first occurrence of each module it declares is removed as well.
/// The cursor always advances one slot, so the candidate that slides into a
/// removed slot is not checked against the same include, and a name declared
/// twice needs two matches to disappear.
pub fn apply_evidence(
    module: &Module,
    registry: &ModuleRegistry,
    evidence: &[IncludeEvidence],
    options: ResolveOptions,
) -> Resolution {
    let mut candidates: Vec<&str> = module.declared_dependencies().collect();
    let mut justifications = Vec::new();

    for include in evidence {
        let mut index = 0;
        while index < candidates.len() {
            let name = candidates[index];
            index += 1;

            let Some(dependency) = registry.get(name) else {
                continue;
            };
            if !dependency.has_header(&include.header) {
                continue;
            }

            // NOTE: a direct use of `name` says nothing about whether this module
            // needs `name`'s own dependencies, yet they are cleared here too.
            // Disable with `excuse_transitive = false`.
            if options.excuse_transitive {
                for transitive in dependency.declared_dependencies() {
                    if transitive == name {
                        continue;
                    }
                    if let Some(position) = candidates.iter().position(|c| *c == transitive) {
                        candidates.remove(position);
                        justifications.push(Justification::ExcusedBy {
                            dependency: transitive.to_string(),
                            via: name.to_string(),
                        });
                    }
                }
            }

            if let Some(position) = candidates.iter().position(|c| *c == name) {
                candidates.remove(position);
            }
            justifications.push(Justification::DirectInclude {
                dependency: name.to_string(),
                header: include.header.clone(),
                file: include.file.clone(),
                line: include.line,
            });
        }
    }

    let redundant: Vec<String> = candidates.into_iter().map(str::to_string).collect();

    let mut unknown: Vec<String> = Vec::new();
    for name in module.declared_dependencies() {
        if !registry.contains(name) && !unknown.iter().any(|u| u == name) {
            unknown.push(name.to_string());
        }
    }

    Resolution {
        module: module.name.clone(),
        redundant,
        unknown,
        justifications,
    }
}

/// Resolve one module: [`collect_evidence`] followed by [`apply_evidence`].
pub fn resolve<T: SourceTree + ?Sized>(
    module: &Module,
    registry: &ModuleRegistry,
    tree: &T,
    scan: &ScanOptions,
    options: ResolveOptions,
) -> Result<Resolution> {
    let evidence = collect_evidence(module, tree, scan)?;
    tracing::debug!(
        "{}: {} includes not satisfied by its own headers",
        module.name,
        evidence.len()
    );

    let resolution = apply_evidence(module, registry, &evidence, options);
    for name in &resolution.unknown {
        tracing::warn!(
            "⚠️ {} declares unknown module '{}', reported as redundant",
            module.name,
            name
        );
    }
    Ok(resolution)
}
