//! Compiler/toolchain definitions and flag resolution for the Mortar
//! build framework.
//!
//! A toolchain is a named, versioned bundle of a compiler family plus
//! math/MPI library components. This crate holds the definition tables
//! and the three small computations the framework needs over them:
//!
//! - **Flag resolution** — filter queued compiler flags through
//!   version-gated exclusion ranges (some Fortran front-ends reject
//!   flags their C siblings accept).
//! - **Banned-library aggregation** — collect, in component order, the
//!   shared libraries that must not be linked into installed artifacts.
//! - **Deprecation policy** — decide whether a (toolchain, version) pair
//!   is too old to use, with loose version ordering that understands
//!   year-half release names like `2023b`.
//!
//! Everything here is a pure function or an immutable instance over
//! in-memory tables; execution, module files, and I/O orchestration live
//! in the host framework.

pub mod arch;
pub mod catalog;
pub mod compiler;
pub mod composition;
pub mod error;
pub mod flags;
pub mod parse;
pub mod version;

// Re-exports for convenience.
pub use arch::{ArchFamily, ArchFlag, Vendor};
pub use catalog::{default_catalog, ToolchainCatalog, ToolchainSpec, SYSTEM_TOOLCHAIN};
pub use compiler::{CompilerDefinition, FlagSpec, OptionSpec, DEFAULT_OPT_LEVEL};
pub use composition::{
    deprecated_before, ComponentDefinition, CompositionOverrides, ToolchainComposition,
};
pub use error::{Result, ToolchainError};
pub use flags::{resolve_flags, VersionGatedExclusion};
pub use parse::{
    compiler_to_toml, component_to_toml, discover_components, load_component_toml,
    parse_compiler_toml, parse_component_toml, validate_compiler, validate_component,
    ValidationIssue,
};
pub use version::{is_symbolic, normalize_release, Version};
