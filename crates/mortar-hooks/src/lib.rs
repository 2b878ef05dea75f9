//! Build lifecycle hooks and recipe registries for the Mortar build
//! framework.
//!
//! The framework walks each package through a fixed sequence of build
//! steps. Sites extend that lifecycle in two ways:
//!
//! - **Hooks** — callbacks registered for a (step, pre/post) pair, run
//!   with the in-progress build context.
//! - **Recipes** — per-package build implementations overriding the
//!   default step behavior.
//!
//! Both are plain registries populated by explicit calls during
//! process-wide initialization, with `clear` as the teardown point
//! between build runs.

pub mod error;
pub mod recipe;
pub mod registry;
pub mod step;

// Re-exports for convenience.
pub use error::{HookError, Result};
pub use recipe::{run_build, BuildRecipe, DefaultRecipe, RecipeFactory, RecipeRegistry};
pub use registry::{HookFn, HookRegistry};
pub use step::{BuildStep, StepContext, StepQualifier};
