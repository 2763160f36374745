//! Continuations and chain dispatch.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::trace;

use crate::error::{HookError, HookResult};
use crate::hook::PreHook;

/// Boxed target: receives the receiver and the final arguments.
pub(crate) type TargetFn<A, R, C> = dyn Fn(&C, A) -> HookResult<R> + Send + Sync;

/// Call-once state owned by a single continuation.
#[derive(Debug, Default)]
struct CallOnce {
    invoked: AtomicBool,
}

impl CallOnce {
    fn claim(&self) -> HookResult<()> {
        if self.invoked.swap(true, Ordering::AcqRel) {
            Err(HookError::DoubleNext)
        } else {
            Ok(())
        }
    }

    fn is_spent(&self) -> bool {
        self.invoked.load(Ordering::Acquire)
    }
}

/// The rest of the chain, as seen from inside a hook.
///
/// A `Next` is built fresh for every hook activation and may be called at
/// most once. Calling it again returns [`HookError::DoubleNext`].
pub struct Next<'a, A, R, C = ()> {
    remaining: &'a [PreHook<A, R, C>],
    target: &'a TargetFn<A, R, C>,
    receiver: &'a C,
    received: A,
    once: CallOnce,
}

impl<'a, A, R, C> Next<'a, A, R, C> {
    fn new(
        remaining: &'a [PreHook<A, R, C>],
        target: &'a TargetFn<A, R, C>,
        receiver: &'a C,
        received: A,
    ) -> Self {
        Self {
            remaining,
            target,
            receiver,
            received,
            once: CallOnce::default(),
        }
    }

    /// The receiver the wrapped function was invoked on.
    #[must_use]
    pub fn receiver(&self) -> &'a C {
        self.receiver
    }

    /// The arguments the current hook was called with.
    #[must_use]
    pub fn received(&self) -> &A {
        &self.received
    }

    /// Whether this continuation has already been used.
    #[must_use]
    pub fn is_called(&self) -> bool {
        self.once.is_spent()
    }
}

impl<A: Clone, R, C> Next<'_, A, R, C> {
    /// Forward `args` to the next hook, or to the target if no hooks remain.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::DoubleNext`] if this continuation was already
    /// called, and otherwise whatever the rest of the chain returns.
    pub fn call(&self, args: A) -> HookResult<R> {
        self.once.claim()?;
        run_chain(self.remaining, self.target, self.receiver, args)
    }

    /// Forward the arguments the current hook received, unchanged.
    ///
    /// # Errors
    ///
    /// Same as [`Next::call`].
    pub fn apply_same(&self) -> HookResult<R> {
        self.call(self.received.clone())
    }
}

impl<A, R, C> fmt::Debug for Next<'_, A, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("remaining", &self.remaining.len())
            .field("called", &self.once.is_spent())
            .finish_non_exhaustive()
    }
}

/// Run `hooks` followed by `target`, starting with `args`.
pub(crate) fn run_chain<A: Clone, R, C>(
    hooks: &[PreHook<A, R, C>],
    target: &TargetFn<A, R, C>,
    receiver: &C,
    args: A,
) -> HookResult<R> {
    let Some((hook, rest)) = hooks.split_first() else {
        trace!("Calling hooked target");
        return target(receiver, args);
    };

    trace!(
        hook_id = %hook.id(),
        hook_name = ?hook.name(),
        remaining = rest.len(),
        "Running pre hook"
    );

    let next = Next::new(rest, target, receiver, args.clone());
    hook.run(&next, args)
}
