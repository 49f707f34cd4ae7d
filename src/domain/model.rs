use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which root a module was discovered under. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ModuleCategory {
    #[default]
    Developer,
    Runtime,
    Editor,
}

impl fmt::Display for ModuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Developer => "Developer",
            Self::Runtime => "Runtime",
            Self::Editor => "Editor",
        };
        f.write_str(name)
    }
}

impl FromStr for ModuleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "developer" => Ok(Self::Developer),
            "runtime" => Ok(Self::Runtime),
            "editor" => Ok(Self::Editor),
            other => Err(format!(
                "unknown module category '{}' (expected Developer, Runtime or Editor)",
                other
            )),
        }
    }
}

/// Whether a dependency was declared in the public or the private list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyVisibility {
    Public,
    Private,
}

/// What the manifest text declares, before the module directory is inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDecl {
    pub name: String,
    pub public_dependencies: Vec<String>,
    pub private_dependencies: Vec<String>,
}

impl ManifestDecl {
    /// Render a minimal build descriptor that parses back to this declaration.
    pub fn render(&self, base_type: &str) -> String {
        let list = |names: &[String]| {
            names
                .iter()
                .map(|name| format!("\"{}\"", name))
                .collect::<Vec<_>>()
                .join(", ")
        };

        format!(
            "using UnrealBuildTool;\n\n\
             public class {name} : {base}\n\
             {{\n\
             \tpublic {name}(ReadOnlyTargetRules Target) : base(Target)\n\
             \t{{\n\
             \t\tPublicDependencyModuleNames.AddRange(new string[] {{ {public} }});\n\
             \t\tPrivateDependencyModuleNames.AddRange(new string[] {{ {private} }});\n\
             \t}}\n\
             }}\n",
            name = self.name,
            base = base_type,
            public = list(&self.public_dependencies),
            private = list(&self.private_dependencies),
        )
    }
}

/// One build unit: its manifest declaration plus the headers it physically owns.
#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    pub directory: PathBuf,
    pub manifest_path: PathBuf,
    pub category: ModuleCategory,
    pub public_dependencies: Vec<String>,
    pub private_dependencies: Vec<String>,
    headers: HashSet<String>,
}

impl Module {
    pub fn new(
        decl: ManifestDecl,
        manifest_path: PathBuf,
        category: ModuleCategory,
        headers: HashSet<String>,
    ) -> Self {
        let directory = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Self {
            name: decl.name,
            directory,
            manifest_path,
            category,
            public_dependencies: decl.public_dependencies,
            private_dependencies: decl.private_dependencies,
            headers,
        }
    }

    /// Public dependencies followed by private ones, in declaration order.
    pub fn declared_dependencies(&self) -> impl Iterator<Item = &str> {
        self.public_dependencies
            .iter()
            .chain(self.private_dependencies.iter())
            .map(String::as_str)
    }

    pub fn has_header(&self, header_name: &str) -> bool {
        self.headers.contains(header_name)
    }

    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    pub fn visibility_of(&self, dependency: &str) -> Option<DependencyVisibility> {
        if self.public_dependencies.iter().any(|d| d == dependency) {
            Some(DependencyVisibility::Public)
        } else if self.private_dependencies.iter().any(|d| d == dependency) {
            Some(DependencyVisibility::Private)
        } else {
            None
        }
    }
}

/// An include directive found in a module's sources that the module does not satisfy itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncludeEvidence {
    pub file: PathBuf,
    pub line: usize,
    /// Base name of the include target.
    pub header: String,
}

/// Why a declared dependency was taken off the redundant list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Justification {
    /// The module includes one of the dependency's headers directly.
    DirectInclude {
        dependency: String,
        header: String,
        file: PathBuf,
        line: usize,
    },
    /// The dependency is declared by another dependency that was proven used.
    ExcusedBy { dependency: String, via: String },
}

/// Outcome of resolving one module against the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub module: String,
    /// Declared dependencies not proven necessary, in declaration order.
    /// A name declared in both lists can appear twice.
    pub redundant: Vec<String>,
    /// Declared dependencies with no module of that name in the registry.
    pub unknown: Vec<String>,
    pub justifications: Vec<Justification>,
}

impl Resolution {
    pub fn is_clean(&self) -> bool {
        self.redundant.is_empty()
    }
}

/// Stage of the run at which a per-file or per-module failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Scan,
    Manifest,
    Headers,
    Registry,
    Resolve,
}

/// A failure local to one root, file or module. Never aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureEntry {
    pub stage: FailureStage,
    pub path: PathBuf,
    pub module: Option<String>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(name: &str, public: &[&str], private: &[&str]) -> ManifestDecl {
        ManifestDecl {
            name: name.to_string(),
            public_dependencies: public.iter().map(|s| s.to_string()).collect(),
            private_dependencies: private.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_module_directory_is_manifest_parent() {
        let module = Module::new(
            decl("Foo", &["Core"], &[]),
            PathBuf::from("/game/Source/Foo/Foo.Build.cs"),
            ModuleCategory::Developer,
            HashSet::new(),
        );
        assert_eq!(module.directory, PathBuf::from("/game/Source/Foo"));
    }

    #[test]
    fn test_declared_dependencies_public_first() {
        let module = Module::new(
            decl("Foo", &["A", "B"], &["C"]),
            PathBuf::from("Foo/Foo.Build.cs"),
            ModuleCategory::Runtime,
            HashSet::new(),
        );
        let deps: Vec<&str> = module.declared_dependencies().collect();
        assert_eq!(deps, vec!["A", "B", "C"]);
        assert_eq!(module.visibility_of("C"), Some(DependencyVisibility::Private));
        assert_eq!(module.visibility_of("Z"), None);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("editor".parse::<ModuleCategory>().unwrap(), ModuleCategory::Editor);
        assert_eq!(" Runtime ".parse::<ModuleCategory>().unwrap(), ModuleCategory::Runtime);
        assert!("Plugin".parse::<ModuleCategory>().is_err());
    }
}
