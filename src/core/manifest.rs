//! Lexical extraction of module declarations from build-rule manifests.
//!
//! Only three markers are recognised: the `public class <Name> : <Base>`
//! declaration and the `PublicDependencyModuleNames { ... }` /
//! `PrivateDependencyModuleNames { ... }` blocks.

use crate::domain::model::ManifestDecl;
use crate::utils::error::{AuditError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static BASE_CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"public class (?:.*):(.*)").unwrap_or_else(|e| panic!("regex: {e}"))
});

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"public class\s+(.*)\s?:").unwrap_or_else(|e| panic!("regex: {e}"))
});

static PUBLIC_DEPS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)PublicDependencyModuleNames.*?\{(.*?)\}")
        .unwrap_or_else(|e| panic!("regex: {e}"))
});

static PRIVATE_DEPS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)PrivateDependencyModuleNames.*?\{(.*?)\}")
        .unwrap_or_else(|e| panic!("regex: {e}"))
});

static QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)""#).unwrap_or_else(|e| panic!("regex: {e}")));

/// Parse a manifest's text.
///
/// Returns `Ok(None)` when the declared base type is not `base_type`, i.e. the
/// file is some other C# source and not a build module.
pub fn parse_manifest(path: &Path, contents: &str, base_type: &str) -> Result<Option<ManifestDecl>> {
    let base = match BASE_CLASS_RE.captures(contents) {
        Some(caps) => caps[1].trim().to_string(),
        None => return Ok(None),
    };
    if base != base_type {
        tracing::trace!("Skipping {}: base type '{}'", path.display(), base);
        return Ok(None);
    }

    let name = NAME_RE
        .captures(contents)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default();
    if name.is_empty() {
        return Err(AuditError::ManifestParseError {
            path: path.to_path_buf(),
            message: "could not extract the module name from the class declaration".to_string(),
        });
    }

    Ok(Some(ManifestDecl {
        name,
        public_dependencies: dependency_block(&PUBLIC_DEPS_RE, contents),
        private_dependencies: dependency_block(&PRIVATE_DEPS_RE, contents),
    }))
}

fn dependency_block(block_re: &Regex, contents: &str) -> Vec<String> {
    block_re
        .captures(contents)
        .map(|caps| parse_name_list(&caps[1]))
        .unwrap_or_default()
}

/// Quoted tokens of a dependency block, stripped and de-duplicated in order.
fn parse_name_list(block: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in QUOTED_RE.captures_iter(block) {
        let name = caps[1].trim().trim_end_matches(',').trim();
        if name.is_empty() || names.iter().any(|n| n == name) {
            continue;
        }
        names.push(name.to_string());
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "ModuleRules";

    fn parse(contents: &str) -> Option<ManifestDecl> {
        parse_manifest(Path::new("Test.Build.cs"), contents, BASE).unwrap()
    }

    #[test]
    fn test_parse_typical_build_file() {
        let contents = r#"
using UnrealBuildTool;

public class Gfx : ModuleRules
{
    public Gfx(ReadOnlyTargetRules Target) : base(Target)
    {
        PCHUsage = PCHUsageMode.UseExplicitOrSharedPCHs;

        PublicDependencyModuleNames.AddRange(
            new string[]
            {
                "Core",
                "Math",
            }
        );

        PrivateDependencyModuleNames.AddRange(new string[] { "RHI", "RenderCore" });
    }
}
"#;
        let decl = parse(contents).unwrap();
        assert_eq!(decl.name, "Gfx");
        assert_eq!(decl.public_dependencies, vec!["Core", "Math"]);
        assert_eq!(decl.private_dependencies, vec!["RHI", "RenderCore"]);
    }

    #[test]
    fn test_other_base_type_is_not_a_module() {
        let contents = "public class GameTarget : TargetRules\n{\n}\n";
        assert!(parse(contents).is_none());
    }

    #[test]
    fn test_plain_csharp_is_not_a_module() {
        assert!(parse("namespace Tools { static class Helper { } }").is_none());
    }

    #[test]
    fn test_missing_blocks_yield_empty_lists() {
        let decl = parse("public class Leaf : ModuleRules\n{\n}\n").unwrap();
        assert_eq!(decl.name, "Leaf");
        assert!(decl.public_dependencies.is_empty());
        assert!(decl.private_dependencies.is_empty());
    }

    #[test]
    fn test_missing_name_is_parse_error() {
        let result = parse_manifest(Path::new("Broken.Build.cs"), "public class :ModuleRules", BASE);
        let err = result.unwrap_err();
        assert!(matches!(err, AuditError::ManifestParseError { .. }));
    }

    #[test]
    fn test_unquoted_tokens_are_ignored_and_duplicates_dropped() {
        let contents = r#"
public class Foo : ModuleRules
{
    PublicDependencyModuleNames.AddRange(new string[] { "Core", SomeConstant, "Core" , "Engine",});
}
"#;
        let decl = parse(contents).unwrap();
        assert_eq!(decl.public_dependencies, vec!["Core", "Engine"]);
    }

    #[test]
    fn test_render_round_trip() {
        let decl = ManifestDecl {
            name: "Foo".to_string(),
            public_dependencies: vec!["A".to_string(), "B".to_string()],
            private_dependencies: vec!["C".to_string()],
        };
        let first = parse(&decl.render(BASE)).unwrap();
        assert_eq!(first, decl);

        let second = parse(&first.render(BASE)).unwrap();
        assert_eq!(second, first);
    }

    #[test]
    fn test_crlf_line_endings() {
        let contents = "public class Foo : ModuleRules\r\n{\r\n  PrivateDependencyModuleNames.Add(new [] {\r\n \"Core\"\r\n });\r\n}\r\n";
        let decl = parse(contents).unwrap();
        assert_eq!(decl.name, "Foo");
        assert_eq!(decl.private_dependencies, vec!["Core"]);
    }
}
