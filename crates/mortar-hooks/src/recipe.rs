//! Build recipes.
//!
//! A recipe implements the per-package build steps. Every step has a
//! default implementation that logs and succeeds, so a recipe only
//! overrides the steps it actually customizes. Recipes are registered by
//! name in a [`RecipeRegistry`] via explicit calls, and
//! [`run_build`] drives a recipe through the lifecycle, firing pre/post
//! hooks around each step.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{HookError, Result};
use crate::registry::HookRegistry;
use crate::step::{BuildStep, StepContext, StepQualifier};

/// The per-package build contract.
///
/// Implementations override individual steps; the defaults are no-ops
/// that log the step and succeed.
pub trait BuildRecipe: Send {
    /// Recipe name, used for registration and logging.
    fn name(&self) -> &str;

    /// Configure the package source for building.
    fn configure_step(&mut self, ctx: &StepContext) -> Result<()> {
        tracing::debug!(recipe = %self.name(), package = %ctx.package, "configure step");
        Ok(())
    }

    /// Compile the package.
    fn build_step(&mut self, ctx: &StepContext) -> Result<()> {
        tracing::debug!(recipe = %self.name(), package = %ctx.package, "build step");
        Ok(())
    }

    /// Run the package's test suite.
    fn test_step(&mut self, ctx: &StepContext) -> Result<()> {
        tracing::debug!(recipe = %self.name(), package = %ctx.package, "test step");
        Ok(())
    }

    /// Install the built artifacts.
    fn install_step(&mut self, ctx: &StepContext) -> Result<()> {
        tracing::debug!(recipe = %self.name(), package = %ctx.package, "install step");
        Ok(())
    }

    /// Check the installation for completeness and policy violations.
    fn sanity_check_step(&mut self, ctx: &StepContext) -> Result<()> {
        tracing::debug!(recipe = %self.name(), package = %ctx.package, "sanity check step");
        Ok(())
    }
}

impl fmt::Debug for dyn BuildRecipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildRecipe")
            .field("name", &self.name())
            .finish()
    }
}

/// A recipe that only uses the default steps.
#[derive(Debug, Clone)]
pub struct DefaultRecipe {
    name: String,
}

impl DefaultRecipe {
    /// A default recipe under the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl BuildRecipe for DefaultRecipe {
    fn name(&self) -> &str {
        &self.name
    }
}

fn run_step(recipe: &mut dyn BuildRecipe, step: BuildStep, ctx: &StepContext) -> Result<()> {
    match step {
        BuildStep::Configure => recipe.configure_step(ctx),
        BuildStep::Build => recipe.build_step(ctx),
        BuildStep::Test => recipe.test_step(ctx),
        BuildStep::Install => recipe.install_step(ctx),
        BuildStep::SanityCheck => recipe.sanity_check_step(ctx),
        // Marker and fetch steps have no recipe action.
        BuildStep::Start | BuildStep::Fetch | BuildStep::End => Ok(()),
    }
}

/// Drive a recipe through the build lifecycle.
///
/// Fires the `Start` hooks, then for each recipe step the pre-hooks, the
/// step itself, and the post-hooks, then the `End` hooks. Stops at the
/// first failing step; hooks after a failed step do not run. Returns the
/// steps that completed.
pub fn run_build(
    recipe: &mut dyn BuildRecipe,
    hooks: &HookRegistry,
    ctx: &StepContext,
) -> Result<Vec<BuildStep>> {
    hooks.dispatch(BuildStep::Start, StepQualifier::Pre, ctx);

    let mut completed = Vec::new();
    for step in BuildStep::RECIPE_STEPS {
        hooks.dispatch(step, StepQualifier::Pre, ctx);
        run_step(recipe, step, ctx)?;
        hooks.dispatch(step, StepQualifier::Post, ctx);
        completed.push(step);
    }

    hooks.dispatch(BuildStep::End, StepQualifier::Post, ctx);
    Ok(completed)
}

/// A factory producing fresh recipe instances.
pub type RecipeFactory = Box<dyn Fn() -> Box<dyn BuildRecipe> + Send + Sync>;

/// Registry of build recipes, keyed by name.
#[derive(Default)]
pub struct RecipeRegistry {
    factories: BTreeMap<String, RecipeFactory>,
}

impl fmt::Debug for RecipeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecipeRegistry")
            .field("recipes", &self.names())
            .finish()
    }
}

impl RecipeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a recipe factory. Duplicate names are an error.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn() -> Box<dyn BuildRecipe> + Send + Sync + 'static,
    ) -> Result<()> {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(HookError::DuplicateRecipe { name });
        }
        tracing::debug!(recipe = %name, "registered recipe");
        self.factories.insert(name, Box::new(factory));
        Ok(())
    }

    /// Instantiate a fresh recipe by name.
    pub fn create(&self, name: &str) -> Result<Box<dyn BuildRecipe>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| HookError::RecipeNotFound {
                name: name.to_string(),
            })?;
        Ok(factory())
    }

    /// Registered recipe names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Number of registered recipes.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no recipes are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Drop all registrations (teardown point between build runs).
    pub fn clear(&mut self) {
        self.factories.clear();
    }
}
