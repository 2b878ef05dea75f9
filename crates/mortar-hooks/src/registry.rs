//! Explicit hook registry.
//!
//! Hooks are registered by explicit calls during process-wide
//! initialization, keyed by (step, pre/post qualifier), and dispatched in
//! registration order. `clear` is the defined teardown point between
//! build runs, so tests never see another test's hooks.

use std::fmt;

use crate::step::{BuildStep, StepContext, StepQualifier};

/// A registered hook callback.
pub type HookFn = Box<dyn Fn(&StepContext) + Send + Sync>;

struct HookEntry {
    step: BuildStep,
    qualifier: StepQualifier,
    name: String,
    callback: HookFn,
}

/// Registry of build lifecycle hooks.
#[derive(Default)]
pub struct HookRegistry {
    entries: Vec<HookEntry>,
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.entries.len())
            .finish()
    }
}

impl HookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook for a (step, qualifier) pair.
    ///
    /// Multiple hooks may share a pair; they run in registration order.
    pub fn register(
        &mut self,
        step: BuildStep,
        qualifier: StepQualifier,
        name: impl Into<String>,
        callback: impl Fn(&StepContext) + Send + Sync + 'static,
    ) {
        let name = name.into();
        tracing::debug!(%step, ?qualifier, hook = %name, "registered hook");
        self.entries.push(HookEntry {
            step,
            qualifier,
            name,
            callback: Box::new(callback),
        });
    }

    /// Run every hook registered for (step, qualifier), in registration
    /// order. Returns how many hooks ran.
    pub fn dispatch(
        &self,
        step: BuildStep,
        qualifier: StepQualifier,
        ctx: &StepContext,
    ) -> usize {
        let mut ran = 0;
        for entry in &self.entries {
            if entry.step == step && entry.qualifier == qualifier {
                tracing::debug!(%step, ?qualifier, hook = %entry.name, "dispatching hook");
                (entry.callback)(ctx);
                ran += 1;
            }
        }
        ran
    }

    /// Names of the hooks registered for a (step, qualifier) pair.
    pub fn hooks_for(&self, step: BuildStep, qualifier: StepQualifier) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.step == step && e.qualifier == qualifier)
            .map(|e| e.name.as_str())
            .collect()
    }

    /// Total number of registered hooks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all registrations (teardown point between build runs).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn dispatch_runs_matching_hooks_only() {
        let mut registry = HookRegistry::new();
        let pre_count = Arc::new(AtomicUsize::new(0));
        let post_count = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&pre_count);
        registry.register(BuildStep::Configure, StepQualifier::Pre, "pre-configure", {
            move |_ctx| {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });
        let c = Arc::clone(&post_count);
        registry.register(
            BuildStep::Configure,
            StepQualifier::Post,
            "post-configure",
            move |_ctx| {
                c.fetch_add(1, Ordering::SeqCst);
            },
        );

        let ctx = StepContext::new("zlib", "1.3.1");
        assert_eq!(registry.dispatch(BuildStep::Configure, StepQualifier::Pre, &ctx), 1);
        assert_eq!(pre_count.load(Ordering::SeqCst), 1);
        assert_eq!(post_count.load(Ordering::SeqCst), 0);

        assert_eq!(registry.dispatch(BuildStep::Build, StepQualifier::Pre, &ctx), 0);
    }

    #[test]
    fn hooks_run_in_registration_order() {
        let mut registry = HookRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for label in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            registry.register(BuildStep::Start, StepQualifier::Pre, label, move |_ctx| {
                order.lock().unwrap().push(label);
            });
        }

        let ctx = StepContext::new("zlib", "1.3.1");
        assert_eq!(registry.dispatch(BuildStep::Start, StepQualifier::Pre, &ctx), 3);
        assert_eq!(*order.lock().unwrap(), ["first", "second", "third"]);
    }

    #[test]
    fn hooks_receive_the_context() {
        let mut registry = HookRegistry::new();
        let seen = Arc::new(Mutex::new(String::new()));
        let s = Arc::clone(&seen);
        registry.register(BuildStep::Install, StepQualifier::Post, "record", move |ctx| {
            *s.lock().unwrap() = format!("{}-{}", ctx.package, ctx.version);
        });

        let ctx = StepContext::new("zlib", "1.3.1");
        registry.dispatch(BuildStep::Install, StepQualifier::Post, &ctx);
        assert_eq!(*seen.lock().unwrap(), "zlib-1.3.1");
    }

    #[test]
    fn clear_is_a_teardown_point() {
        let mut registry = HookRegistry::new();
        registry.register(BuildStep::Start, StepQualifier::Pre, "hello", |_ctx| {});
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.hooks_for(BuildStep::Start, StepQualifier::Pre),
            ["hello"]
        );

        registry.clear();
        assert!(registry.is_empty());
        let ctx = StepContext::new("zlib", "1.3.1");
        assert_eq!(registry.dispatch(BuildStep::Start, StepQualifier::Pre, &ctx), 0);
    }
}
