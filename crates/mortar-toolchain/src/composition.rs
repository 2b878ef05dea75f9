//! Toolchain composition.
//!
//! A toolchain bundles a compiler family with zero or more library/MPI
//! components. Compositions are assembled by explicit ordered merge:
//! every component contributes named settings, a banned shared-library
//! list, and optionally a deprecation threshold; later components in the
//! list override earlier ones, and explicit overrides win over all of
//! them. Derived fields are computed once at construction and the
//! instance is immutable afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::compiler::CompilerDefinition;
use crate::error::Result;
use crate::version::{is_symbolic, normalize_release, Version};

/// One component of a toolchain (a math library, an MPI implementation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ComponentDefinition {
    /// Component name.
    pub name: String,
    /// Environment module(s) the component is provided by.
    pub module_names: Vec<String>,
    /// Named configuration values the component contributes.
    pub settings: BTreeMap<String, String>,
    /// Shared libraries (names, file names, or paths) that must not be
    /// linked into any installed binary when this component is active.
    pub banned_shared_libs: Vec<String>,
    /// Version threshold below which toolchains using this component are
    /// considered obsolete.
    pub deprecation_threshold: Option<String>,
}

impl ComponentDefinition {
    /// A component with just a name; everything else empty.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module_names: Vec::new(),
            settings: BTreeMap::new(),
            banned_shared_libs: Vec::new(),
            deprecation_threshold: None,
        }
    }

    /// The OpenMPI component.
    pub fn openmpi() -> Self {
        let mut c = Self::named("OpenMPI");
        c.module_names = vec!["OpenMPI".into()];
        c.settings.insert("mpi-family".into(), "OpenMPI".into());
        c
    }

    /// The FlexiBLAS BLAS/LAPACK dispatch layer.
    ///
    /// Binaries must go through the dispatch library, so direct linking
    /// against the backend is banned.
    pub fn flexiblas() -> Self {
        let mut c = Self::named("FlexiBLAS");
        c.module_names = vec!["FlexiBLAS".into()];
        c.settings.insert("blas-family".into(), "FlexiBLAS".into());
        c.settings.insert("blas-lib".into(), "flexiblas".into());
        c.settings.insert("blas-lib-mt".into(), "flexiblas".into());
        c.settings.insert("lapack-family".into(), "FlexiBLAS".into());
        c.settings.insert("lapack-is-blas".into(), "true".into());
        c.banned_shared_libs = vec!["libopenblas".into()];
        c
    }

    /// The OpenBLAS component.
    pub fn openblas() -> Self {
        let mut c = Self::named("OpenBLAS");
        c.module_names = vec!["OpenBLAS".into()];
        c.settings.insert("blas-family".into(), "OpenBLAS".into());
        c.settings.insert("blas-lib".into(), "openblas".into());
        c.settings.insert("blas-lib-mt".into(), "openblas".into());
        c.settings.insert("lapack-family".into(), "OpenBLAS".into());
        c.settings.insert("lapack-is-blas".into(), "true".into());
        c
    }

    /// The ScaLAPACK component.
    pub fn scalapack() -> Self {
        let mut c = Self::named("ScaLAPACK");
        c.module_names = vec!["ScaLAPACK".into()];
        c.settings
            .insert("scalapack-family".into(), "ScaLAPACK".into());
        c.settings.insert("scalapack-lib".into(), "scalapack".into());
        c
    }

    /// The FFTW component.
    pub fn fftw() -> Self {
        let mut c = Self::named("FFTW");
        c.module_names = vec!["FFTW".into()];
        c.settings.insert("fft-family".into(), "FFTW".into());
        c.settings.insert("fft-lib".into(), "fftw3".into());
        c
    }
}

/// Explicit overrides applied after the component merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CompositionOverrides {
    /// Setting values that win over any component contribution.
    pub settings: BTreeMap<String, String>,
    /// Deprecation threshold that wins over any component contribution.
    pub deprecation_threshold: Option<String>,
}

/// A named, versioned toolchain assembled from ordered components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainComposition {
    name: String,
    version: String,
    compiler: CompilerDefinition,
    components: Vec<ComponentDefinition>,
    subtoolchains: Vec<String>,
    settings: BTreeMap<String, String>,
    banned_shared_libs: Vec<String>,
    deprecation_threshold: Option<String>,
    deprecated: bool,
}

impl ToolchainComposition {
    /// Merge components into a composition for one target version.
    ///
    /// Settings merge in declaration order with later components
    /// overriding earlier ones; `overrides` wins over everything. The
    /// banned-library list is the concatenation of each component's own
    /// list, in component order, duplicates preserved. The deprecation
    /// verdict is computed here, once, from the resolved version.
    pub fn compose(
        name: impl Into<String>,
        version: impl Into<String>,
        compiler: CompilerDefinition,
        components: Vec<ComponentDefinition>,
        subtoolchains: Vec<String>,
        overrides: CompositionOverrides,
    ) -> Result<Self> {
        let name = name.into();
        let version = version.into();

        let mut settings = BTreeMap::new();
        let mut banned_shared_libs = Vec::new();
        let mut deprecation_threshold = None;
        for component in &components {
            for (key, value) in &component.settings {
                settings.insert(key.clone(), value.clone());
            }
            banned_shared_libs.extend(component.banned_shared_libs.iter().cloned());
            if component.deprecation_threshold.is_some() {
                deprecation_threshold = component.deprecation_threshold.clone();
            }
        }
        for (key, value) in &overrides.settings {
            settings.insert(key.clone(), value.clone());
        }
        if overrides.deprecation_threshold.is_some() {
            deprecation_threshold = overrides.deprecation_threshold;
        }

        let deprecated = match &deprecation_threshold {
            Some(threshold) => deprecated_before(threshold, &version)?,
            None => false,
        };
        tracing::debug!(
            toolchain = %name,
            %version,
            components = components.len(),
            deprecated,
            "composed toolchain"
        );

        Ok(Self {
            name,
            version,
            compiler,
            components,
            subtoolchains,
            settings,
            banned_shared_libs,
            deprecation_threshold,
            deprecated,
        })
    }

    /// Toolchain name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target version this instance was composed for.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The compiler family definition.
    pub fn compiler(&self) -> &CompilerDefinition {
        &self.compiler
    }

    /// The ordered component list.
    pub fn components(&self) -> &[ComponentDefinition] {
        &self.components
    }

    /// Acceptable parent toolchains this composition can fall back to.
    pub fn subtoolchains(&self) -> &[String] {
        &self.subtoolchains
    }

    /// Merged settings table.
    pub fn settings(&self) -> &BTreeMap<String, String> {
        &self.settings
    }

    /// Look up one merged setting.
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    /// Shared libraries which are not allowed to be linked in any
    /// installed binary/library, aggregated over all components.
    pub fn banned_linked_shared_libs(&self) -> &[String] {
        &self.banned_shared_libs
    }

    /// The threshold the deprecation verdict was computed against.
    pub fn deprecation_threshold(&self) -> Option<&str> {
        self.deprecation_threshold.as_deref()
    }

    /// Whether this toolchain version is deprecated.
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }
}

/// Whether `version` sorts below `threshold`.
///
/// Year-half suffixes are normalized first (`2023b` compares as
/// `2023.07`); symbolic versions never count as deprecated.
pub fn deprecated_before(threshold: &str, version: &str) -> Result<bool> {
    let normalized = normalize_release(version);
    if is_symbolic(&normalized) {
        return Ok(false);
    }
    Ok(Version::parse(&normalized)? < Version::parse(threshold)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolchainError;

    fn with_banned(name: &str, banned: &[&str]) -> ComponentDefinition {
        let mut c = ComponentDefinition::named(name);
        c.banned_shared_libs = banned.iter().map(|s| s.to_string()).collect();
        c
    }

    #[test]
    fn banned_libs_keep_order_and_duplicates() {
        let tc = ToolchainComposition::compose(
            "tc",
            "2024a",
            CompilerDefinition::clang_flang(),
            vec![
                with_banned("A", &["libX"]),
                with_banned("B", &[]),
                with_banned("C", &["libY", "libX"]),
            ],
            Vec::new(),
            CompositionOverrides::default(),
        )
        .unwrap();
        assert_eq!(tc.banned_linked_shared_libs(), ["libX", "libY", "libX"]);
    }

    #[test]
    fn later_components_win_settings() {
        let mut a = ComponentDefinition::named("A");
        a.settings.insert("blas-family".into(), "OpenBLAS".into());
        a.settings.insert("only-a".into(), "kept".into());
        let mut b = ComponentDefinition::named("B");
        b.settings.insert("blas-family".into(), "FlexiBLAS".into());

        let tc = ToolchainComposition::compose(
            "tc",
            "2024a",
            CompilerDefinition::clang_flang(),
            vec![a, b],
            Vec::new(),
            CompositionOverrides::default(),
        )
        .unwrap();
        assert_eq!(tc.setting("blas-family"), Some("FlexiBLAS"));
        assert_eq!(tc.setting("only-a"), Some("kept"));
    }

    #[test]
    fn explicit_overrides_win_over_components() {
        let mut a = ComponentDefinition::named("A");
        a.settings.insert("blas-family".into(), "OpenBLAS".into());
        a.deprecation_threshold = Some("2023".into());

        let overrides = CompositionOverrides {
            settings: BTreeMap::from([("blas-family".to_string(), "Custom".to_string())]),
            deprecation_threshold: Some("2025".into()),
        };
        let tc = ToolchainComposition::compose(
            "tc",
            "2024a",
            CompilerDefinition::clang_flang(),
            vec![a],
            Vec::new(),
            overrides,
        )
        .unwrap();
        assert_eq!(tc.setting("blas-family"), Some("Custom"));
        // 2024a < 2025, so the overriding threshold makes it deprecated.
        assert!(tc.is_deprecated());
        assert_eq!(tc.deprecation_threshold(), Some("2025"));
    }

    #[test]
    fn later_component_threshold_wins() {
        let mut a = ComponentDefinition::named("A");
        a.deprecation_threshold = Some("2025".into());
        let mut b = ComponentDefinition::named("B");
        b.deprecation_threshold = Some("2023".into());

        let tc = ToolchainComposition::compose(
            "tc",
            "2024a",
            CompilerDefinition::clang_flang(),
            vec![a, b],
            Vec::new(),
            CompositionOverrides::default(),
        )
        .unwrap();
        assert!(!tc.is_deprecated());
    }

    #[test]
    fn no_threshold_means_not_deprecated() {
        let tc = ToolchainComposition::compose(
            "tc",
            "1970",
            CompilerDefinition::clang_flang(),
            vec![ComponentDefinition::openmpi()],
            Vec::new(),
            CompositionOverrides::default(),
        )
        .unwrap();
        assert!(!tc.is_deprecated());
    }

    #[test]
    fn deprecation_thresholds() {
        assert!(deprecated_before("2023", "2022b").unwrap());
        assert!(!deprecated_before("2023", "2023a").unwrap());
        assert!(!deprecated_before("2023", "2023").unwrap());
        assert!(!deprecated_before("2023", "system").unwrap());
    }

    #[test]
    fn malformed_version_fails_at_construction() {
        let err = ToolchainComposition::compose(
            "tc",
            "20 23",
            CompilerDefinition::clang_flang(),
            vec![],
            Vec::new(),
            CompositionOverrides {
                settings: BTreeMap::new(),
                deprecation_threshold: Some("2023".into()),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ToolchainError::Parse { .. }));
    }

    #[test]
    fn component_presets() {
        let flexi = ComponentDefinition::flexiblas();
        assert_eq!(flexi.banned_shared_libs, ["libopenblas"]);
        assert_eq!(flexi.settings.get("lapack-is-blas").unwrap(), "true");
        assert!(ComponentDefinition::fftw().banned_shared_libs.is_empty());
    }
}
