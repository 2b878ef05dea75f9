//! Named toolchain catalog.
//!
//! Known toolchain families are registered explicitly with the catalog
//! during process-wide initialization; the host framework then
//! instantiates a composition per (name, version). `clear` gives tests a
//! defined teardown point.

use std::collections::BTreeMap;

use crate::compiler::CompilerDefinition;
use crate::composition::{
    ComponentDefinition, CompositionOverrides, ToolchainComposition,
};
use crate::error::{Result, ToolchainError};

/// Symbolic name of the "use the system-installed toolchain" marker.
pub const SYSTEM_TOOLCHAIN: &str = "system";

/// Static description of a toolchain family, before a version is chosen.
#[derive(Debug, Clone)]
pub struct ToolchainSpec {
    /// Toolchain name (e.g., "lompi").
    pub name: String,
    /// Compiler family.
    pub compiler: CompilerDefinition,
    /// Library/MPI components, in merge order.
    pub components: Vec<ComponentDefinition>,
    /// Acceptable parent toolchains to fall back to.
    pub subtoolchains: Vec<String>,
    /// Versions below this are considered obsolete.
    pub deprecation_threshold: Option<String>,
    /// Whether the family is optional (not installed by default).
    pub optional: bool,
}

impl ToolchainSpec {
    /// Instantiate the family for one target version.
    pub fn instantiate(&self, version: &str) -> Result<ToolchainComposition> {
        ToolchainComposition::compose(
            self.name.clone(),
            version,
            self.compiler.clone(),
            self.components.clone(),
            self.subtoolchains.clone(),
            CompositionOverrides {
                settings: BTreeMap::new(),
                deprecation_threshold: self.deprecation_threshold.clone(),
            },
        )
    }
}

/// Registry of toolchain families, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ToolchainCatalog {
    entries: BTreeMap<String, ToolchainSpec>,
}

impl ToolchainCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a toolchain family. Duplicate names are an error.
    pub fn register(&mut self, spec: ToolchainSpec) -> Result<()> {
        if self.entries.contains_key(&spec.name) {
            return Err(ToolchainError::AlreadyRegistered {
                name: spec.name.clone(),
            });
        }
        tracing::debug!(toolchain = %spec.name, "registered toolchain family");
        self.entries.insert(spec.name.clone(), spec);
        Ok(())
    }

    /// Look up a family by name.
    pub fn get(&self, name: &str) -> Option<&ToolchainSpec> {
        self.entries.get(name)
    }

    /// Instantiate a registered family for one target version.
    pub fn instantiate(&self, name: &str, version: &str) -> Result<ToolchainComposition> {
        let spec = self
            .entries
            .get(name)
            .ok_or_else(|| ToolchainError::UnknownToolchain {
                name: name.to_string(),
            })?;
        spec.instantiate(version)
    }

    /// Whether a (toolchain, version) pair is deprecated.
    pub fn is_deprecated(&self, name: &str, version: &str) -> Result<bool> {
        Ok(self.instantiate(name, version)?.is_deprecated())
    }

    /// Registered family names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Number of registered families.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all registrations (teardown point between build runs).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// The stock catalog: the Clang/Flang compiler toolchain and the
/// composite families built on top of it.
pub fn default_catalog() -> ToolchainCatalog {
    let compiler = CompilerDefinition::clang_flang();
    let mut catalog = ToolchainCatalog::new();

    let entries = [
        // Compiler-only toolchain.
        ToolchainSpec {
            name: "llvm".into(),
            compiler: compiler.clone(),
            components: Vec::new(),
            subtoolchains: vec![SYSTEM_TOOLCHAIN.into()],
            deprecation_threshold: None,
            optional: false,
        },
        // Compiler + OpenMPI. Versions before 2023 predate the Flang
        // releases this pairing needs.
        ToolchainSpec {
            name: "lompi".into(),
            compiler: compiler.clone(),
            components: vec![ComponentDefinition::openmpi()],
            subtoolchains: vec!["llvm".into()],
            deprecation_threshold: Some("2023".into()),
            optional: false,
        },
        // Compiler + FlexiBLAS + FFTW.
        ToolchainSpec {
            name: "lfbf".into(),
            compiler: compiler.clone(),
            components: vec![
                ComponentDefinition::flexiblas(),
                ComponentDefinition::fftw(),
            ],
            subtoolchains: vec!["llvm".into()],
            deprecation_threshold: None,
            optional: true,
        },
        // Compiler + OpenBLAS + FFTW.
        ToolchainSpec {
            name: "lolf".into(),
            compiler: compiler.clone(),
            components: vec![
                ComponentDefinition::openblas(),
                ComponentDefinition::fftw(),
            ],
            subtoolchains: vec!["llvm".into()],
            deprecation_threshold: None,
            optional: true,
        },
        // The full stack: compiler + OpenMPI + FlexiBLAS + ScaLAPACK +
        // FFTW. FlexiBLAS comes after OpenMPI so its BLAS/LAPACK settings
        // win the merge.
        ToolchainSpec {
            name: "lfoss".into(),
            compiler,
            components: vec![
                ComponentDefinition::openmpi(),
                ComponentDefinition::flexiblas(),
                ComponentDefinition::scalapack(),
                ComponentDefinition::fftw(),
            ],
            subtoolchains: vec!["lompi".into(), "lolf".into(), "lfbf".into()],
            deprecation_threshold: Some("2023".into()),
            optional: false,
        },
    ];

    for spec in entries {
        // Names are distinct literals; registration cannot collide.
        catalog
            .register(spec)
            .unwrap_or_else(|e| unreachable!("stock catalog registration failed: {e}"));
    }
    catalog
}
