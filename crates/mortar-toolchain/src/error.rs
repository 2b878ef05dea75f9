//! Error types for toolchain resolution.

use std::path::PathBuf;

/// Errors that can occur while resolving toolchain definitions.
#[derive(Debug, thiserror::Error)]
pub enum ToolchainError {
    /// Version string could not be decomposed into comparable components.
    #[error("cannot parse version '{input}': {detail}")]
    Parse {
        /// The offending version string.
        input: String,
        /// Description of what made it unparseable.
        detail: String,
    },

    /// Requested flag option is not in the compiler's supported-option table.
    #[error("unsupported option '{option}' for compiler family '{family}'")]
    UnsupportedOption {
        /// The option name that was requested.
        option: String,
        /// The compiler family that rejected it.
        family: String,
    },

    /// Toolchain name not present in the catalog.
    #[error("unknown toolchain: {name}")]
    UnknownToolchain { name: String },

    /// Toolchain already registered under this name.
    #[error("toolchain '{name}' already registered")]
    AlreadyRegistered { name: String },

    /// Validation error in a component definition.
    #[error("validation error: {detail}")]
    Validation { detail: String },

    /// Definition file not found.
    #[error("definition file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error reading/writing definition files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for toolchain operations.
pub type Result<T> = std::result::Result<T, ToolchainError>;
