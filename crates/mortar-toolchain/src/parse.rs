//! TOML parsing, serialization, validation, and discovery for toolchain
//! definition files.
//!
//! Component definitions are stored as `.toolchain.toml` files in the
//! `toolchains/` directory of a site configuration; compiler family
//! definitions use the same format under a `[compiler]`-shaped document.

use std::path::{Path, PathBuf};

use crate::compiler::CompilerDefinition;
use crate::composition::ComponentDefinition;
use crate::error::{Result, ToolchainError};
use crate::version::Version;

/// A validation issue found in a definition file.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity: "error" or "warning".
    pub severity: &'static str,
    /// Human-readable description.
    pub message: String,
}

/// Load a component definition from a `.toolchain.toml` file.
pub fn load_component_toml(path: &Path) -> Result<ComponentDefinition> {
    if !path.exists() {
        return Err(ToolchainError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_component_toml(&content)
}

/// Parse a component definition from a TOML string.
pub fn parse_component_toml(toml_str: &str) -> Result<ComponentDefinition> {
    let component: ComponentDefinition = toml::from_str(toml_str)?;
    Ok(component)
}

/// Serialize a component definition to pretty TOML.
pub fn component_to_toml(component: &ComponentDefinition) -> Result<String> {
    let toml_str = toml::to_string_pretty(component)?;
    Ok(toml_str)
}

/// Parse a compiler family definition from a TOML string.
pub fn parse_compiler_toml(toml_str: &str) -> Result<CompilerDefinition> {
    let compiler: CompilerDefinition = toml::from_str(toml_str)?;
    Ok(compiler)
}

/// Serialize a compiler family definition to pretty TOML.
pub fn compiler_to_toml(compiler: &CompilerDefinition) -> Result<String> {
    let toml_str = toml::to_string_pretty(compiler)?;
    Ok(toml_str)
}

/// Validate a component definition for structural correctness.
///
/// Returns `Ok(())` if valid, or `Err(issues)` with a list of problems.
pub fn validate_component(
    component: &ComponentDefinition,
) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    if component.name.is_empty() {
        issues.push(ValidationIssue {
            severity: "error",
            message: "component has no name".into(),
        });
    }

    if let Some(threshold) = &component.deprecation_threshold {
        if let Err(e) = Version::parse(threshold) {
            issues.push(ValidationIssue {
                severity: "error",
                message: format!("deprecation threshold is not a valid version: {e}"),
            });
        }
    }

    for lib in &component.banned_shared_libs {
        if lib.is_empty() {
            issues.push(ValidationIssue {
                severity: "error",
                message: "banned shared library entry is empty".into(),
            });
        }
    }

    if component.module_names.is_empty() {
        issues.push(ValidationIssue {
            severity: "warning",
            message: format!("component '{}' names no environment module", component.name),
        });
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Validate a compiler family definition for structural correctness.
pub fn validate_compiler(
    compiler: &CompilerDefinition,
) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    if compiler.fortran_flag_vars.is_empty() {
        issues.push(ValidationIssue {
            severity: "warning",
            message: "compiler names no Fortran flag variables; version-gated \
                      exclusions will never apply"
                .into(),
        });
    }

    // Every option referenced by a front-end restriction must exist in
    // the option map.
    let referenced = compiler
        .shared_options
        .iter()
        .chain(&compiler.c_only_options)
        .chain(&compiler.fortran_only_options)
        .chain(compiler.unique_options.iter().map(|o| &o.name));
    for option in referenced {
        if !compiler.supports_option(option) {
            issues.push(ValidationIssue {
                severity: "error",
                message: format!("option '{option}' is not in the option map"),
            });
        }
    }

    for exclusion in &compiler.unsupported_fortran_flags {
        match (Version::parse(&exclusion.min), Version::parse(&exclusion.max)) {
            (Ok(min), Ok(max)) => {
                if min >= max {
                    issues.push(ValidationIssue {
                        severity: "error",
                        message: format!(
                            "exclusion range [{}, {}) is empty",
                            exclusion.min, exclusion.max
                        ),
                    });
                }
            }
            (min, max) => {
                for bound in [min.err(), max.err()].into_iter().flatten() {
                    issues.push(ValidationIssue {
                        severity: "error",
                        message: format!("exclusion range bound: {bound}"),
                    });
                }
            }
        }
        if exclusion.flags.is_empty() {
            issues.push(ValidationIssue {
                severity: "warning",
                message: format!(
                    "exclusion range [{}, {}) strips no flags",
                    exclusion.min, exclusion.max
                ),
            });
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Discover all `.toolchain.toml` files in a site's `toolchains/` directory.
///
/// Returns a list of (component_name, file_path) pairs.
pub fn discover_components(site_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let toolchains_dir = site_dir.join("toolchains");
    if !toolchains_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut components = Vec::new();
    let entries = std::fs::read_dir(&toolchains_dir)?;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
            if file_name.ends_with(".toolchain.toml") {
                let name = file_name
                    .strip_suffix(".toolchain.toml")
                    .unwrap()
                    .to_string();
                components.push((name, path));
            }
        }
    }
    components.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(components)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_round_trip() {
        let original = ComponentDefinition::flexiblas();
        let toml_str = component_to_toml(&original).unwrap();
        let parsed = parse_component_toml(&toml_str).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn compiler_round_trip() {
        let original = CompilerDefinition::clang_flang();
        let toml_str = compiler_to_toml(&original).unwrap();
        let parsed = parse_compiler_toml(&toml_str).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn parse_minimal_component() {
        let toml_str = r#"
name = "MKL"
module-names = ["imkl"]
banned-shared-libs = ["libmkl_rt"]

[settings]
blas-family = "MKL"
"#;
        let component = parse_component_toml(toml_str).unwrap();
        assert_eq!(component.name, "MKL");
        assert_eq!(component.banned_shared_libs, ["libmkl_rt"]);
        assert_eq!(component.settings.get("blas-family").unwrap(), "MKL");
        assert!(component.deprecation_threshold.is_none());
    }

    #[test]
    fn parse_invalid_returns_error() {
        assert!(parse_component_toml("this is not valid toml [[[").is_err());
    }

    #[test]
    fn validate_stock_definitions() {
        assert!(validate_component(&ComponentDefinition::openmpi()).is_ok());
        assert!(validate_compiler(&CompilerDefinition::clang_flang()).is_ok());
    }

    #[test]
    fn validate_bad_threshold() {
        let mut component = ComponentDefinition::openblas();
        component.deprecation_threshold = Some("not a version!".into());
        let issues = validate_component(&component).unwrap_err();
        assert!(issues.iter().any(|i| i.message.contains("threshold")));
    }

    #[test]
    fn validate_unnamed_component() {
        let component = ComponentDefinition::named("");
        let issues = validate_component(&component).unwrap_err();
        assert!(issues.iter().any(|i| i.message.contains("no name")));
    }

    #[test]
    fn validate_empty_exclusion_range() {
        let mut compiler = CompilerDefinition::clang_flang();
        compiler.unsupported_fortran_flags[0].max = "19".into();
        let issues = validate_compiler(&compiler).unwrap_err();
        assert!(issues.iter().any(|i| i.message.contains("is empty")));
    }

    #[test]
    fn validate_dangling_option_reference() {
        let mut compiler = CompilerDefinition::clang_flang();
        compiler.c_only_options.push("no_such_option".into());
        let issues = validate_compiler(&compiler).unwrap_err();
        assert!(issues
            .iter()
            .any(|i| i.message.contains("no_such_option")));
    }

    #[test]
    fn discover_components_finds_files() {
        let dir = tempfile::tempdir().unwrap();
        let toolchains_dir = dir.path().join("toolchains");
        std::fs::create_dir_all(&toolchains_dir).unwrap();

        let toml_str = component_to_toml(&ComponentDefinition::fftw()).unwrap();
        std::fs::write(toolchains_dir.join("fftw.toolchain.toml"), &toml_str).unwrap();
        std::fs::write(toolchains_dir.join("openmpi.toolchain.toml"), &toml_str).unwrap();
        // Non-.toolchain.toml file should be ignored
        std::fs::write(toolchains_dir.join("notes.txt"), "ignore me").unwrap();

        let found = discover_components(dir.path()).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].0, "fftw");
        assert_eq!(found[1].0, "openmpi");
    }

    #[test]
    fn discover_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_components(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn load_not_found() {
        let result = load_component_toml(Path::new("/nonexistent/x.toolchain.toml"));
        assert!(matches!(result.unwrap_err(), ToolchainError::NotFound { .. }));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scalapack.toolchain.toml");
        let toml_str = component_to_toml(&ComponentDefinition::scalapack()).unwrap();
        std::fs::write(&path, &toml_str).unwrap();

        let component = load_component_toml(&path).unwrap();
        assert_eq!(component.name, "ScaLAPACK");
    }
}
