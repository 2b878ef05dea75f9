//! Build lifecycle steps and the context passed to hooks.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use mortar_toolchain::ToolchainComposition;
use serde::{Deserialize, Serialize};

use crate::error::{HookError, Result};

/// A named step in the build lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildStep {
    /// Marker step fired once at the start of a build run.
    Start,
    Fetch,
    Configure,
    Build,
    Test,
    Install,
    SanityCheck,
    /// Marker step fired once at the end of a build run.
    End,
}

impl BuildStep {
    /// The steps a recipe actually executes, in order. `Start` and `End`
    /// are hook-only markers and are not included.
    pub const RECIPE_STEPS: [BuildStep; 5] = [
        BuildStep::Configure,
        BuildStep::Build,
        BuildStep::Test,
        BuildStep::Install,
        BuildStep::SanityCheck,
    ];

    /// Canonical step name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStep::Start => "start",
            BuildStep::Fetch => "fetch",
            BuildStep::Configure => "configure",
            BuildStep::Build => "build",
            BuildStep::Test => "test",
            BuildStep::Install => "install",
            BuildStep::SanityCheck => "sanity-check",
            BuildStep::End => "end",
        }
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildStep {
    type Err = HookError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "start" => Ok(BuildStep::Start),
            "fetch" => Ok(BuildStep::Fetch),
            "configure" => Ok(BuildStep::Configure),
            "build" => Ok(BuildStep::Build),
            "test" => Ok(BuildStep::Test),
            "install" => Ok(BuildStep::Install),
            "sanity-check" => Ok(BuildStep::SanityCheck),
            "end" => Ok(BuildStep::End),
            other => Err(HookError::UnknownStep {
                name: other.to_string(),
            }),
        }
    }
}

/// Whether a hook runs before or after its step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepQualifier {
    Pre,
    Post,
}

/// The in-progress build context handed to hooks and recipe steps.
#[derive(Debug, Clone, Default)]
pub struct StepContext {
    /// Name of the package being built.
    pub package: String,
    /// Version of the package being built.
    pub version: String,
    /// The toolchain the package is built with, once resolved.
    pub toolchain: Option<ToolchainComposition>,
    /// Free-form extra context values.
    pub extras: BTreeMap<String, String>,
}

impl StepContext {
    /// Context for one package build.
    pub fn new(package: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            version: version.into(),
            toolchain: None,
            extras: BTreeMap::new(),
        }
    }

    /// Attach the resolved toolchain.
    pub fn with_toolchain(mut self, toolchain: ToolchainComposition) -> Self {
        self.toolchain = Some(toolchain);
        self
    }
}
