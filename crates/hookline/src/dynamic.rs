//! Untyped facade over the hook engine.
//!
//! Hosts that hold loosely typed values (scripting bridges, hook wiring read
//! from configuration) cannot rely on the type system to tell functions from
//! data or hooks from hooked functions. [`Value`] carries that distinction at
//! runtime, and the operations here report the corresponding
//! [`HookError`]s instead.

use std::fmt;
use std::sync::Arc;

use crate::error::{HookError, HookResult};
use crate::hook::{HookId, HookSet, PreHook};
use crate::hooked::Hooked;
use crate::next::Next;

/// Positional arguments of a dynamic call.
pub type DynArgs = Vec<Value>;

type DynFn = dyn Fn(&Value, DynArgs) -> HookResult<Value> + Send + Sync;

/// A loosely typed value.
#[derive(Clone)]
pub enum Value {
    /// Plain data.
    Data(serde_json::Value),
    /// A callable function.
    Function(DynFunction),
    /// A pre hook.
    Hook(DynHook),
    /// A function that already carries a hook chain.
    Hooked(DynHooked),
    /// A sequence of values.
    List(Vec<Value>),
}

impl Value {
    /// The `null` value, also used as the default receiver.
    #[must_use]
    pub fn null() -> Self {
        Self::Data(serde_json::Value::Null)
    }

    /// Wrap plain data.
    #[must_use]
    pub fn data(value: impl Into<serde_json::Value>) -> Self {
        Self::Data(value.into())
    }

    /// The data payload, if this is a data value.
    #[must_use]
    pub fn as_data(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Data(value) => Some(value),
            _ => None,
        }
    }

    /// Short description of the value's kind, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Data(serde_json::Value::Null) => "null",
            Self::Data(serde_json::Value::Bool(_)) => "boolean",
            Self::Data(serde_json::Value::Number(_)) => "number",
            Self::Data(serde_json::Value::String(_)) => "string",
            Self::Data(serde_json::Value::Array(_)) => "array",
            Self::Data(serde_json::Value::Object(_)) => "object",
            Self::Function(_) => "function",
            Self::Hook(_) => "hook",
            Self::Hooked(_) => "hooked function",
            Self::List(_) => "list",
        }
    }

    /// Call this value as a function on `receiver`.
    ///
    /// # Errors
    ///
    /// [`HookError::NotAFunction`] unless this is a function or a hooked
    /// function, and otherwise whatever the call returns.
    pub fn call(&self, receiver: &Value, args: DynArgs) -> HookResult<Value> {
        match self {
            Self::Function(func) => func.call(receiver, args),
            Self::Hooked(hooked) => hooked.invoke_on(receiver, args),
            other => Err(HookError::NotAFunction {
                what: other.kind().to_string(),
            }),
        }
    }

    fn collect_hooks(self, out: &mut Vec<PreHook<DynArgs, Value, Value>>) -> HookResult<()> {
        match self {
            Self::Hook(hook) => {
                out.push(hook.inner);
                Ok(())
            },
            Self::List(items) => items
                .into_iter()
                .try_for_each(|item| item.collect_hooks(out)),
            other => Err(HookError::InvalidHook {
                what: other.kind().to_string(),
            }),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Data(a), Self::Data(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Arc::ptr_eq(&a.func, &b.func),
            (Self::Hook(a), Self::Hook(b)) => a.id() == b.id(),
            (Self::Hooked(a), Self::Hooked(b)) => a.inner.same_as(&b.inner),
            (Self::List(a), Self::List(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(value) => write!(f, "Data({value})"),
            Self::Function(func) => fmt::Debug::fmt(func, f),
            Self::Hook(hook) => fmt::Debug::fmt(hook, f),
            Self::Hooked(hooked) => fmt::Debug::fmt(hooked, f),
            Self::List(items) => f.debug_list().entries(items).finish(),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Self::Data(value)
    }
}

impl From<DynFunction> for Value {
    fn from(func: DynFunction) -> Self {
        Self::Function(func)
    }
}

impl From<DynHook> for Value {
    fn from(hook: DynHook) -> Self {
        Self::Hook(hook)
    }
}

impl From<DynHooked> for Value {
    fn from(hooked: DynHooked) -> Self {
        Self::Hooked(hooked)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

/// A dynamically typed function: `(receiver, args) -> value`.
#[derive(Clone)]
pub struct DynFunction {
    func: Arc<DynFn>,
}

impl DynFunction {
    /// Create a function from a closure.
    #[must_use]
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Value, DynArgs) -> HookResult<Value> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }

    /// Call the function.
    ///
    /// # Errors
    ///
    /// Whatever the function returns.
    pub fn call(&self, receiver: &Value, args: DynArgs) -> HookResult<Value> {
        (self.func)(receiver, args)
    }
}

impl fmt::Debug for DynFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Function")
    }
}

/// A dynamically typed pre hook.
#[derive(Clone)]
pub struct DynHook {
    inner: PreHook<DynArgs, Value, Value>,
}

impl DynHook {
    /// Create a hook from a closure.
    #[must_use]
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&DynNext<'_, '_>, DynArgs) -> HookResult<Value> + Send + Sync + 'static,
    {
        Self {
            inner: PreHook::new(move |next: &Next<'_, DynArgs, Value, Value>, args| {
                func(&DynNext { inner: next }, args)
            }),
        }
    }

    /// Identity shared by all clones of this hook.
    #[must_use]
    pub fn id(&self) -> HookId {
        self.inner.id()
    }
}

impl fmt::Debug for DynHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hook({})", self.inner.id())
    }
}

/// Continuation handed to a [`DynHook`].
pub struct DynNext<'n, 'a> {
    inner: &'n Next<'a, DynArgs, Value, Value>,
}

impl DynNext<'_, '_> {
    /// Forward `args` down the chain.
    ///
    /// # Errors
    ///
    /// [`HookError::DoubleNext`] on a second call, otherwise whatever the
    /// rest of the chain returns.
    pub fn call(&self, args: DynArgs) -> HookResult<Value> {
        self.inner.call(args)
    }

    /// Forward the arguments the current hook received, unchanged.
    ///
    /// # Errors
    ///
    /// [`HookError::ArgumentsNotAllowed`] if `args` is not empty, and
    /// otherwise the same as [`DynNext::call`].
    pub fn apply_same(&self, args: DynArgs) -> HookResult<Value> {
        if !args.is_empty() {
            return Err(HookError::ArgumentsNotAllowed { count: args.len() });
        }
        self.inner.apply_same()
    }

    /// The receiver the hooked function was invoked on.
    #[must_use]
    pub fn receiver(&self) -> &Value {
        self.inner.receiver()
    }

    /// The arguments the current hook was called with.
    #[must_use]
    pub fn received(&self) -> &[Value] {
        self.inner.received()
    }
}

impl fmt::Debug for DynNext<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.inner, f)
    }
}

/// A dynamically typed function with a pre hook chain.
#[derive(Clone)]
pub struct DynHooked {
    inner: Hooked<DynArgs, Value, Value>,
    target: DynFunction,
}

impl DynHooked {
    /// Call with a `null` receiver.
    ///
    /// # Errors
    ///
    /// Whatever a hook or the target returns.
    pub fn invoke(&self, args: DynArgs) -> HookResult<Value> {
        self.invoke_on(&Value::null(), args)
    }

    /// Call on `receiver`.
    ///
    /// # Errors
    ///
    /// Whatever a hook or the target returns.
    pub fn invoke_on(&self, receiver: &Value, args: DynArgs) -> HookResult<Value> {
        self.inner.invoke_on(receiver, args)
    }

    /// Register hooks from a hook value or a (possibly nested) list of them.
    ///
    /// # Errors
    ///
    /// [`HookError::InvalidHook`] if any item is not a hook, and
    /// [`HookError::NoHooksPassed`] if there are none. Nothing is
    /// registered on error.
    pub fn pre(&self, hooks: impl Into<Value>) -> HookResult<()> {
        let mut collected = Vec::new();
        hooks.into().collect_hooks(&mut collected)?;
        self.inner.pre(HookSet::from(collected))
    }

    /// Remove one hook (every registration of it), or all hooks with `None`.
    pub fn remove_pre(&self, hook: Option<&DynHook>) -> usize {
        self.inner.remove_pre(hook.map(|hook| &hook.inner))
    }

    /// Number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether no hooks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The unhooked target.
    #[must_use]
    pub fn target(&self) -> &DynFunction {
        &self.target
    }
}

impl fmt::Debug for DynHooked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynHooked")
            .field("pre_hooks", &self.inner.len())
            .finish_non_exhaustive()
    }
}

/// Wrap a function value with an empty hook chain.
///
/// # Errors
///
/// [`HookError::AlreadyWrapped`] for a value that already carries a chain
/// and [`HookError::NotAFunction`] for anything that is not a function.
pub fn wrap(value: Value) -> HookResult<DynHooked> {
    match value {
        Value::Function(target) => {
            let func = target.clone();
            Ok(DynHooked {
                inner: Hooked::fallible(move |receiver: &Value, args| func.call(receiver, args)),
                target,
            })
        },
        Value::Hooked(_) => Err(HookError::AlreadyWrapped {
            what: "hooked function".to_string(),
        }),
        other => Err(HookError::NotAFunction {
            what: other.kind().to_string(),
        }),
    }
}
