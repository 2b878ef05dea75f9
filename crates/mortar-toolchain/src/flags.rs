//! Version-gated flag exclusion.
//!
//! Some flags a compiler family's C front-end accepts are rejected by its
//! Fortran front-end in certain release ranges. Each exclusion names a
//! half-open version range `[min, max)` and the flags to strip from the
//! Fortran flag variables when the active compiler version falls inside it.

use serde::{Deserialize, Serialize};

use crate::compiler::CompilerDefinition;
use crate::error::Result;
use crate::version::Version;

/// Flags unsupported inside a half-open version range `[min, max)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VersionGatedExclusion {
    /// Lowest affected version (inclusive).
    pub min: String,
    /// First unaffected version (exclusive).
    pub max: String,
    /// Flags to strip inside the range.
    pub flags: Vec<String>,
}

impl VersionGatedExclusion {
    /// Build an exclusion entry.
    pub fn new<I, S>(min: impl Into<String>, max: impl Into<String>, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            min: min.into(),
            max: max.into(),
            flags: flags.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a version falls inside `[min, max)`.
    pub fn contains(&self, version: &Version) -> Result<bool> {
        let min = Version::parse(&self.min)?;
        let max = Version::parse(&self.max)?;
        Ok(*version >= min && *version < max)
    }
}

/// Filter the values queued for a flag variable through the compiler's
/// version-gated exclusion table.
///
/// Only the Fortran-designated variables are ever filtered; any other
/// variable is returned unchanged regardless of version. Exclusion ranges
/// are checked in declaration order and the first range containing
/// `version` wins.
pub fn resolve_flags(
    compiler: &CompilerDefinition,
    version: &str,
    variable: &str,
    values: &[String],
) -> Result<Vec<String>> {
    if !compiler.fortran_flag_vars.iter().any(|v| v == variable) {
        return Ok(values.to_vec());
    }

    let parsed = Version::parse(version)?;
    let mut unsupported = None;
    for exclusion in &compiler.unsupported_fortran_flags {
        if exclusion.contains(&parsed)? {
            unsupported = Some(&exclusion.flags);
            break;
        }
    }

    let Some(unsupported) = unsupported else {
        tracing::debug!(family = %compiler.family, version, "no unsupported Fortran flags for this version");
        return Ok(values.to_vec());
    };

    tracing::debug!(
        family = %compiler.family,
        version,
        variable,
        ?unsupported,
        "removing unsupported Fortran flags"
    );
    Ok(values
        .iter()
        .filter(|v| !unsupported.iter().any(|u| u == *v))
        .cloned()
        .collect())
}
