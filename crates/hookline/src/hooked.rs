//! Wrapped functions with a mutable pre hook chain.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::error::{HookError, HookResult};
use crate::hook::{HookSet, PreHook};
use crate::next::{Next, TargetFn, run_chain};

struct Shared<A, R, C> {
    target: Arc<TargetFn<A, R, C>>,
    pres: RwLock<Vec<PreHook<A, R, C>>>,
}

/// A function wrapped with an ordered chain of pre hooks.
///
/// `A` is the argument pack (a tuple for multi-argument functions), `R` the
/// result and `C` the receiver handed to hooks and the target.
///
/// Cloning a `Hooked` is cheap and yields a handle to the same hook list,
/// so a hook registered through one clone runs for calls through any other.
///
/// Every call snapshots the hook list before running it. A hook that
/// registers or removes hooks, or calls the wrapped function again, only
/// changes what later calls see.
pub struct Hooked<A, R, C = ()> {
    shared: Arc<Shared<A, R, C>>,
}

impl<A, R> Hooked<A, R> {
    /// Wrap a plain function.
    #[must_use]
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self::fallible(move |_: &(), args| Ok(func(args)))
    }

    /// Call the wrapped function.
    ///
    /// # Errors
    ///
    /// Returns whatever error a hook or the target produced, including
    /// [`HookError::DoubleNext`] from a misbehaving hook.
    pub fn invoke(&self, args: A) -> HookResult<R>
    where
        A: Clone,
    {
        self.invoke_on(&(), args)
    }
}

impl<A, R, C> Hooked<A, R, C> {
    /// Wrap a method-like function that takes a receiver.
    #[must_use]
    pub fn with_receiver<F>(func: F) -> Self
    where
        F: Fn(&C, A) -> R + Send + Sync + 'static,
    {
        Self::fallible(move |receiver: &C, args| Ok(func(receiver, args)))
    }

    /// Wrap a function that can fail on its own.
    #[must_use]
    pub fn fallible<F>(func: F) -> Self
    where
        F: Fn(&C, A) -> HookResult<R> + Send + Sync + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                target: Arc::new(func),
                pres: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Call the wrapped function on `receiver`.
    ///
    /// # Errors
    ///
    /// Returns whatever error a hook or the target produced.
    pub fn invoke_on(&self, receiver: &C, args: A) -> HookResult<R>
    where
        A: Clone,
    {
        let snapshot = self.read_pres().clone();
        run_chain(&snapshot, self.shared.target.as_ref(), receiver, args)
    }

    /// Append hooks to the end of the chain.
    ///
    /// Accepts a single hook, a list, or nested lists (see [`HookSet`]).
    ///
    /// # Errors
    ///
    /// Returns [`HookError::NoHooksPassed`] if the set is empty once
    /// flattened. Nothing is registered in that case.
    pub fn pre(&self, hooks: impl Into<HookSet<A, R, C>>) -> HookResult<()> {
        let hooks = hooks.into().flatten();
        if hooks.is_empty() {
            return Err(HookError::NoHooksPassed);
        }

        let mut pres = self.write_pres();
        for hook in &hooks {
            debug!(hook_id = %hook.id(), hook_name = ?hook.name(), "Pre hook registered");
        }
        pres.extend(hooks);
        Ok(())
    }

    /// Build a hook from a closure, register it and return its handle.
    ///
    /// The handle can later be passed to [`Hooked::remove_pre`].
    pub fn pre_fn<F>(&self, func: F) -> PreHook<A, R, C>
    where
        F: Fn(&Next<'_, A, R, C>, A) -> HookResult<R> + Send + Sync + 'static,
    {
        let hook = PreHook::new(func);
        debug!(hook_id = %hook.id(), "Pre hook registered");
        self.write_pres().push(hook.clone());
        hook
    }

    /// Remove hooks and return how many were removed.
    ///
    /// With `None` the whole chain is cleared. With `Some(hook)` every
    /// registration of that hook is removed and the rest keep their order.
    /// Removing a hook that is not registered is a no-op.
    pub fn remove_pre(&self, hook: Option<&PreHook<A, R, C>>) -> usize {
        let mut pres = self.write_pres();
        let before = pres.len();

        match hook {
            None => pres.clear(),
            Some(hook) => pres.retain(|registered| !registered.same_as(hook)),
        }

        let removed = before.saturating_sub(pres.len());
        debug!(
            hook_id = ?hook.map(PreHook::id),
            removed,
            remaining = pres.len(),
            "Pre hooks removed"
        );
        removed
    }

    /// Number of registered hooks, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_pres().len()
    }

    /// Whether no hooks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_pres().is_empty()
    }

    /// Whether `other` is a handle to the same wrapped function.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Whether `hook` is registered at least once.
    #[must_use]
    pub fn contains(&self, hook: &PreHook<A, R, C>) -> bool {
        self.read_pres()
            .iter()
            .any(|registered| registered.same_as(hook))
    }

    // The list is never left half-updated, so a poisoned lock is still usable.
    fn read_pres(&self) -> RwLockReadGuard<'_, Vec<PreHook<A, R, C>>> {
        self.shared
            .pres
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_pres(&self) -> RwLockWriteGuard<'_, Vec<PreHook<A, R, C>>> {
        self.shared
            .pres
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A, R, C> Clone for Hooked<A, R, C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A, R, C> fmt::Debug for Hooked<A, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooked")
            .field("pre_hooks", &self.len())
            .finish_non_exhaustive()
    }
}
