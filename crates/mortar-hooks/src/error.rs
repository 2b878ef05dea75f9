//! Error types for hook and recipe registries.

/// Errors that can occur during hook/recipe operations.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// Step name not recognized.
    #[error("unknown build step: {name}")]
    UnknownStep { name: String },

    /// Recipe already registered under this name.
    #[error("recipe '{name}' already registered")]
    DuplicateRecipe { name: String },

    /// No recipe registered under this name.
    #[error("recipe not found: {name}")]
    RecipeNotFound { name: String },

    /// A build step failed.
    #[error("step '{step}' failed: {detail}")]
    StepFailed { step: String, detail: String },
}

/// Result type alias for hook operations.
pub type Result<T> = std::result::Result<T, HookError>;
