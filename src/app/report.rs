use crate::core::registry::ModuleRegistry;
use crate::domain::model::{
    DependencyVisibility, FailureEntry, Justification, ModuleCategory, Resolution,
};
use crate::utils::error::{AuditError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

pub const OUTPUT_FORMATS: &[&str] = &["text", "json", "csv"];

#[derive(Debug, Clone, Serialize)]
pub struct RedundantDependency {
    pub name: String,
    pub visibility: Option<DependencyVisibility>,
    /// No module of this name exists in the registry.
    pub unknown: bool,
}

/// Findings for one analyzed module that has at least one redundant dependency.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleFindings {
    pub module: String,
    pub category: Option<ModuleCategory>,
    pub directory: Option<PathBuf>,
    pub redundant: Vec<RedundantDependency>,
    pub justifications: Vec<Justification>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportSummary {
    pub modules_registered: usize,
    pub modules_analyzed: usize,
    pub modules_with_redundancy: usize,
    pub redundant_dependencies: usize,
    pub unknown_dependencies: usize,
    pub failures: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub excuse_transitive: bool,
    pub summary: ReportSummary,
    pub modules: Vec<ModuleFindings>,
    pub failures: Vec<FailureEntry>,
}

impl AnalysisReport {
    pub fn new(
        registry: &ModuleRegistry,
        resolutions: Vec<Resolution>,
        failures: Vec<FailureEntry>,
        excuse_transitive: bool,
    ) -> Self {
        let mut summary = ReportSummary {
            modules_registered: registry.len(),
            modules_analyzed: resolutions.len(),
            failures: failures.len(),
            ..Default::default()
        };

        let mut modules = Vec::new();
        for resolution in resolutions {
            if resolution.is_clean() {
                continue;
            }
            let module = registry.get(&resolution.module);
            let mut names: Vec<&String> = Vec::new();
            for name in &resolution.redundant {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
            let redundant: Vec<RedundantDependency> = names
                .into_iter()
                .map(|name| RedundantDependency {
                    name: name.clone(),
                    visibility: module.and_then(|m| m.visibility_of(name)),
                    unknown: resolution.unknown.contains(name),
                })
                .collect();

            summary.modules_with_redundancy += 1;
            summary.redundant_dependencies += redundant.len();
            summary.unknown_dependencies += redundant.iter().filter(|d| d.unknown).count();

            modules.push(ModuleFindings {
                module: resolution.module,
                category: module.map(|m| m.category),
                directory: module.map(|m| m.directory.clone()),
                redundant,
                justifications: resolution.justifications,
            });
        }

        Self {
            generated_at: Utc::now(),
            excuse_transitive,
            summary,
            modules,
            failures,
        }
    }

    pub fn has_redundancy(&self) -> bool {
        !self.modules.is_empty()
    }

    pub fn render(&self, format: &str) -> Result<String> {
        match format {
            "text" => Ok(self.render_text()),
            "json" => self.render_json(),
            "csv" => self.render_csv(),
            other => Err(AuditError::InvalidConfigValueError {
                field: "output.formats".to_string(),
                value: other.to_string(),
                reason: format!("Valid formats: {}", OUTPUT_FORMATS.join(", ")),
            }),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();

        for findings in &self.modules {
            let names: Vec<String> = findings
                .redundant
                .iter()
                .map(|d| {
                    if d.unknown {
                        format!("{} (unknown module)", d.name)
                    } else {
                        d.name.clone()
                    }
                })
                .collect();
            let _ = writeln!(
                out,
                "Module: {} has the following redundant dependencies: {}",
                findings.module,
                names.join(", ")
            );
        }

        if !self.failures.is_empty() {
            let _ = writeln!(out, "\nFailed ({}):", self.failures.len());
            for failure in &self.failures {
                let _ = writeln!(
                    out,
                    "  [{:?}] {}: {}",
                    failure.stage,
                    failure.path.display(),
                    failure.message
                );
            }
        }

        let _ = writeln!(
            out,
            "\n{} of {} analyzed modules have redundant dependencies ({} total, {} unknown); {} modules registered",
            self.summary.modules_with_redundancy,
            self.summary.modules_analyzed,
            self.summary.redundant_dependencies,
            self.summary.unknown_dependencies,
            self.summary.modules_registered
        );
        out
    }

    pub fn render_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// One row per redundant dependency.
    pub fn render_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["module", "dependency", "visibility", "unknown"])?;

        for findings in &self.modules {
            for dependency in &findings.redundant {
                let visibility = match dependency.visibility {
                    Some(DependencyVisibility::Public) => "public",
                    Some(DependencyVisibility::Private) => "private",
                    None => "",
                };
                writer.write_record([
                    findings.module.as_str(),
                    dependency.name.as_str(),
                    visibility,
                    if dependency.unknown { "true" } else { "false" },
                ])?;
            }
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AuditError::IoError(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

pub fn file_name_for(format: &str) -> String {
    let extension = match format {
        "text" => "txt",
        other => other,
    };
    format!("redundant-deps.{}", extension)
}
