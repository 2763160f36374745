//! Pre hook handles and hook sets.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::HookResult;
use crate::next::Next;

/// Boxed hook body: receives the continuation and the current arguments.
type HookFn<A, R, C> = dyn Fn(&Next<'_, A, R, C>, A) -> HookResult<R> + Send + Sync;

/// Stable identity of a registered hook.
///
/// Clones of a [`PreHook`] share the same id, so removal by handle removes
/// every registration of that hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(Uuid);

impl HookId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for HookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A hook that runs before the target of a [`Hooked`](crate::Hooked) function.
///
/// The hook gets a [`Next`] continuation and the arguments it was called
/// with. Forwarding (possibly transformed) arguments is `next.call(args)`;
/// returning anything else short-circuits the chain.
pub struct PreHook<A, R, C = ()> {
    id: HookId,
    name: Option<String>,
    func: Arc<HookFn<A, R, C>>,
}

impl<A, R, C> PreHook<A, R, C> {
    /// Create a new hook from a closure.
    #[must_use]
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Next<'_, A, R, C>, A) -> HookResult<R> + Send + Sync + 'static,
    {
        Self {
            id: HookId::new(),
            name: None,
            func: Arc::new(func),
        }
    }

    /// Create a named hook. The name only shows up in logs.
    #[must_use]
    pub fn named<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Next<'_, A, R, C>, A) -> HookResult<R> + Send + Sync + 'static,
    {
        Self {
            name: Some(name.into()),
            ..Self::new(func)
        }
    }

    /// Identity shared by all clones of this hook.
    #[must_use]
    pub fn id(&self) -> HookId {
        self.id
    }

    /// Optional human-readable name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether `other` is the same hook (same identity).
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.id == other.id
    }

    pub(crate) fn run(&self, next: &Next<'_, A, R, C>, args: A) -> HookResult<R> {
        (self.func)(next, args)
    }
}

impl<A, R, C> Clone for PreHook<A, R, C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            func: Arc::clone(&self.func),
        }
    }
}

impl<A, R, C> fmt::Debug for PreHook<A, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreHook")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// One or more hooks, possibly nested, as accepted by `pre`.
///
/// Nested sets are flattened depth-first, keeping their order.
pub enum HookSet<A, R, C = ()> {
    /// A single hook.
    One(PreHook<A, R, C>),
    /// A sequence of sets.
    Many(Vec<HookSet<A, R, C>>),
}

impl<A, R, C> HookSet<A, R, C> {
    /// Flatten into registration order.
    #[must_use]
    pub fn flatten(self) -> Vec<PreHook<A, R, C>> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(self, out: &mut Vec<PreHook<A, R, C>>) {
        match self {
            Self::One(hook) => out.push(hook),
            Self::Many(sets) => {
                for set in sets {
                    set.flatten_into(out);
                }
            },
        }
    }
}

impl<A, R, C> fmt::Debug for HookSet<A, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One(hook) => f.debug_tuple("One").field(hook).finish(),
            Self::Many(sets) => f.debug_tuple("Many").field(sets).finish(),
        }
    }
}

impl<A, R, C> From<PreHook<A, R, C>> for HookSet<A, R, C> {
    fn from(hook: PreHook<A, R, C>) -> Self {
        Self::One(hook)
    }
}

impl<A, R, C> From<&PreHook<A, R, C>> for HookSet<A, R, C> {
    fn from(hook: &PreHook<A, R, C>) -> Self {
        Self::One(hook.clone())
    }
}

impl<A, R, C> From<Vec<PreHook<A, R, C>>> for HookSet<A, R, C> {
    fn from(hooks: Vec<PreHook<A, R, C>>) -> Self {
        Self::Many(hooks.into_iter().map(Self::One).collect())
    }
}

impl<A, R, C> From<Vec<HookSet<A, R, C>>> for HookSet<A, R, C> {
    fn from(sets: Vec<HookSet<A, R, C>>) -> Self {
        Self::Many(sets)
    }
}

impl<A, R, C, const N: usize> From<[PreHook<A, R, C>; N]> for HookSet<A, R, C> {
    fn from(hooks: [PreHook<A, R, C>; N]) -> Self {
        Self::Many(hooks.into_iter().map(Self::One).collect())
    }
}

impl<A, R, C> FromIterator<PreHook<A, R, C>> for HookSet<A, R, C> {
    fn from_iter<I: IntoIterator<Item = PreHook<A, R, C>>>(iter: I) -> Self {
        Self::Many(iter.into_iter().map(Self::One).collect())
    }
}
