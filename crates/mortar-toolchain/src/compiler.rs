//! Compiler family definitions.
//!
//! A [`CompilerDefinition`] is a pure data table: the option names a
//! compiler family supports, the flags each option emits, which options
//! only apply to the C or Fortran front-ends, and the per-architecture
//! optimization flags. Flag resolution over these tables lives in
//! [`crate::flags`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::arch::{self, ArchFamily, ArchFlag, Vendor};
use crate::error::{Result, ToolchainError};
use crate::flags::VersionGatedExclusion;

/// Option name used for the default optimization level.
pub const DEFAULT_OPT_LEVEL: &str = "defaultopt";

/// The flag(s) an option emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagSpec {
    /// A single literal flag (possibly empty).
    Literal(String),
    /// A list of flags emitted together.
    List(Vec<String>),
    /// A pair of alternatives selected by the option's boolean value.
    Toggle {
        /// Flag emitted when the option is enabled.
        enabled: String,
        /// Flag emitted when the option is disabled.
        disabled: String,
    },
}

impl FlagSpec {
    /// Flatten into the flag strings to emit for a given option value.
    pub fn render(&self, enabled: bool) -> Vec<String> {
        match self {
            FlagSpec::Literal(s) if s.is_empty() => Vec::new(),
            FlagSpec::Literal(s) => vec![s.clone()],
            FlagSpec::List(flags) => flags.clone(),
            FlagSpec::Toggle { enabled: on, disabled: off } => {
                vec![if enabled { on.clone() } else { off.clone() }]
            }
        }
    }
}

/// A toolchain option unique to one compiler family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OptionSpec {
    /// Option name.
    pub name: String,
    /// Whether the option is enabled by default.
    pub default: bool,
    /// Human-readable description.
    pub help: String,
}

/// Full definition of a compiler family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CompilerDefinition {
    /// Family name (e.g., "LLVM").
    pub family: String,
    /// C compiler executable.
    pub cc: String,
    /// C++ compiler executable.
    pub cxx: String,
    /// Fortran 77 compiler executable.
    pub f77: String,
    /// Fortran 90 compiler executable.
    pub f90: String,
    /// Default Fortran compiler executable.
    pub fc: String,
    /// Options unique to this family, with defaults and descriptions.
    pub unique_options: Vec<OptionSpec>,
    /// Option name to emitted flag(s).
    pub option_map: BTreeMap<String, FlagSpec>,
    /// Options applied to every front-end.
    pub shared_options: Vec<String>,
    /// Options applied only to the C/C++ front-end.
    pub c_only_options: Vec<String>,
    /// Options applied only to the Fortran front-end.
    pub fortran_only_options: Vec<String>,
    /// Names of the Fortran flag variables this family populates.
    pub fortran_flag_vars: Vec<String>,
    /// Flags for native-hardware optimization, per (family, vendor).
    pub optimal_arch_flags: Vec<ArchFlag>,
    /// Flags for a generic portable baseline, per (family, vendor).
    pub generic_arch_flags: Vec<ArchFlag>,
    /// Math support libraries.
    pub math_libs: Vec<String>,
    /// Multithreading support libraries.
    pub thread_libs: Vec<String>,
    /// Version ranges whose Fortran front-end rejects certain flags.
    pub unsupported_fortran_flags: Vec<VersionGatedExclusion>,
}

impl CompilerDefinition {
    /// Whether an option name is known to this family.
    pub fn supports_option(&self, option: &str) -> bool {
        self.option_map.contains_key(option)
    }

    /// Look up the flag spec for an option.
    ///
    /// Unknown options are a configuration mistake and fail with
    /// [`ToolchainError::UnsupportedOption`].
    pub fn flags_for_option(&self, option: &str) -> Result<&FlagSpec> {
        self.option_map
            .get(option)
            .ok_or_else(|| ToolchainError::UnsupportedOption {
                option: option.to_string(),
                family: self.family.clone(),
            })
    }

    /// Flags for optimizing on the build host's own hardware.
    pub fn optimal_arch_flag(&self, family: ArchFamily, vendor: Vendor) -> Option<&str> {
        arch::lookup(&self.optimal_arch_flags, family, vendor)
    }

    /// Flags for a generic baseline binary.
    pub fn generic_arch_flag(&self, family: ArchFamily, vendor: Vendor) -> Option<&str> {
        arch::lookup(&self.generic_arch_flags, family, vendor)
    }

    /// The Clang/Flang compiler family.
    ///
    /// Clang accepts a handful of vectorization and math flags that Flang
    /// only gained later, so the Fortran flag variables carry a
    /// version-gated exclusion list for the affected releases.
    pub fn clang_flang() -> Self {
        let mut option_map = BTreeMap::new();
        option_map.insert("unroll".into(), FlagSpec::Literal("-funroll-loops".into()));
        option_map.insert(
            "loop-vectorize".into(),
            FlagSpec::List(vec!["-fvectorize".into()]),
        );
        option_map.insert(
            "basic-block-vectorize".into(),
            FlagSpec::List(vec!["-fslp-vectorize".into()]),
        );
        option_map.insert("optarch".into(), FlagSpec::Literal(String::new()));
        // Clang has no direct equivalents for the precision modes; these
        // pick the closest combination of its fast-math flags. 'strict',
        // 'precise' and 'defaultprec' are all ISO C++ and IEEE compliant.
        option_map.insert(
            "strict".into(),
            FlagSpec::List(vec!["-fno-fast-math".into()]),
        );
        option_map.insert(
            "precise".into(),
            FlagSpec::List(vec!["-fno-unsafe-math-optimizations".into()]),
        );
        option_map.insert("defaultprec".into(), FlagSpec::List(Vec::new()));
        option_map.insert(
            "loose".into(),
            FlagSpec::List(vec![
                "-ffast-math".into(),
                "-fno-unsafe-math-optimizations".into(),
            ]),
        );
        option_map.insert(
            "veryloose".into(),
            FlagSpec::List(vec!["-ffast-math".into()]),
        );
        option_map.insert(
            "vectorize".into(),
            FlagSpec::Toggle {
                enabled: "-fvectorize".into(),
                disabled: "-fno-vectorize".into(),
            },
        );
        option_map.insert(
            DEFAULT_OPT_LEVEL.into(),
            FlagSpec::List(vec!["-O2".into()]),
        );
        option_map.insert(
            "lld_undefined_version".into(),
            FlagSpec::List(vec!["-Wl,--undefined-version".into()]),
        );
        option_map.insert(
            "no_unused_args".into(),
            FlagSpec::List(vec!["-Wno-unused-command-line-argument".into()]),
        );

        Self {
            family: "LLVM".into(),
            cc: "clang".into(),
            cxx: "clang++".into(),
            f77: "flang".into(),
            f90: "flang".into(),
            fc: "flang".into(),
            option_map,
            unique_options: vec![
                OptionSpec {
                    name: "loop-vectorize".into(),
                    default: false,
                    help: "Loop vectorization".into(),
                },
                OptionSpec {
                    name: "basic-block-vectorize".into(),
                    default: false,
                    help: "Basic block vectorization".into(),
                },
                // https://github.com/madler/zlib/issues/856
                OptionSpec {
                    name: "lld_undefined_version".into(),
                    default: true,
                    help: "-Wl,--undefined-version - Allow unused version in version script"
                        .into(),
                },
                OptionSpec {
                    name: "no_unused_args".into(),
                    default: true,
                    help: "-Wno-unused-command-line-argument - Avoid some failures in CMake \
                           correctly recognizing feature due to linker warnings"
                        .into(),
                },
            ],
            shared_options: vec!["lld_undefined_version".into()],
            c_only_options: vec!["no_unused_args".into()],
            fortran_only_options: Vec::new(),
            fortran_flag_vars: vec!["FCFLAGS".into(), "FFLAGS".into(), "F90FLAGS".into()],
            optimal_arch_flags: vec![
                // no support for march=native on POWER
                ArchFlag::new(ArchFamily::Power, Vendor::Power, "-mcpu=native"),
                ArchFlag::new(ArchFamily::Power, Vendor::PowerLe, "-mcpu=native"),
                ArchFlag::new(ArchFamily::X86_64, Vendor::Amd, "-march=native"),
                ArchFlag::new(ArchFamily::X86_64, Vendor::Intel, "-march=native"),
            ],
            generic_arch_flags: vec![
                // default for -mabi is system-dependent
                ArchFlag::new(ArchFamily::RiscV64, Vendor::RiscV, "-march=rv64gc -mabi=lp64d"),
                ArchFlag::new(ArchFamily::X86_64, Vendor::Amd, "-march=x86-64 -mtune=generic"),
                ArchFlag::new(
                    ArchFamily::X86_64,
                    Vendor::Intel,
                    "-march=x86-64 -mtune=generic",
                ),
            ],
            math_libs: vec!["m".into()],
            thread_libs: vec!["pthread".into()],
            unsupported_fortran_flags: vec![VersionGatedExclusion::new(
                "19",
                "21",
                [
                    "-fslp-vectorize",
                    "-fvectorize",
                    "-fno-vectorize",
                    "-fno-unsafe-math-optimizations",
                ],
            )],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clang_flang_defaults() {
        let def = CompilerDefinition::clang_flang();
        assert_eq!(def.cc, "clang");
        assert_eq!(def.fc, "flang");
        assert!(def.supports_option("vectorize"));
        assert!(def.supports_option(DEFAULT_OPT_LEVEL));
        assert!(!def.supports_option("interprocedural"));
    }

    #[test]
    fn unknown_option_is_an_error() {
        let def = CompilerDefinition::clang_flang();
        let err = def.flags_for_option("interprocedural").unwrap_err();
        assert!(matches!(
            err,
            ToolchainError::UnsupportedOption { ref option, ref family }
                if option == "interprocedural" && family == "LLVM"
        ));
    }

    #[test]
    fn toggle_renders_by_value() {
        let def = CompilerDefinition::clang_flang();
        let spec = def.flags_for_option("vectorize").unwrap();
        assert_eq!(spec.render(true), vec!["-fvectorize"]);
        assert_eq!(spec.render(false), vec!["-fno-vectorize"]);
    }

    #[test]
    fn empty_literal_renders_nothing() {
        let def = CompilerDefinition::clang_flang();
        let spec = def.flags_for_option("optarch").unwrap();
        assert!(spec.render(true).is_empty());
    }

    #[test]
    fn arch_tables() {
        let def = CompilerDefinition::clang_flang();
        assert_eq!(
            def.optimal_arch_flag(ArchFamily::X86_64, Vendor::Amd),
            Some("-march=native")
        );
        assert_eq!(
            def.optimal_arch_flag(ArchFamily::Power, Vendor::PowerLe),
            Some("-mcpu=native")
        );
        // POWER has a native entry but no generic baseline.
        assert_eq!(def.generic_arch_flag(ArchFamily::Power, Vendor::Power), None);
        assert_eq!(
            def.generic_arch_flag(ArchFamily::RiscV64, Vendor::RiscV),
            Some("-march=rv64gc -mabi=lp64d")
        );
    }
}
