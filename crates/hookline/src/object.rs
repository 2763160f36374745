//! Batch hooking of an object's methods, keyed by method name.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{HookError, HookResult};
use crate::hook::{HookSet, PreHook};
use crate::hooked::Hooked;

type MethodFn<T, A, R> = dyn Fn(&T, A) -> R + Send + Sync;

enum Member<T, A, R> {
    Method(Arc<MethodFn<T, A, R>>),
    Hooked(Hooked<A, R, T>),
    Value(serde_json::Value),
}

impl<T, A, R> Member<T, A, R> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Method(_) => "method",
            Self::Hooked(_) => "hooked method",
            Self::Value(_) => "value",
        }
    }
}

/// An object whose methods can each carry their own pre hook chain.
///
/// Methods share one signature `Fn(&T, A) -> R` and receive the owned
/// object as their receiver. Plain data members can sit next to them, the
/// way object properties mix functions and values.
///
/// Methods must be selected with [`hook_methods`](Self::hook_methods) or
/// [`hook_all`](Self::hook_all) before hooks can be attached to them.
pub struct HookableObject<T, A, R> {
    target: T,
    members: BTreeMap<String, Member<T, A, R>>,
}

impl<T, A, R> HookableObject<T, A, R>
where
    T: 'static,
    A: 'static,
    R: 'static,
{
    /// Create an object with no members.
    #[must_use]
    pub fn new(target: T) -> Self {
        Self {
            target,
            members: BTreeMap::new(),
        }
    }

    /// Add a method member. Replaces any member with the same name.
    #[must_use]
    pub fn with_method<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&T, A) -> R + Send + Sync + 'static,
    {
        self.members
            .insert(name.into(), Member::Method(Arc::new(func)));
        self
    }

    /// Add a plain data member. Replaces any member with the same name.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.members.insert(name.into(), Member::Value(value));
        self
    }

    /// Make every method hookable. Returns the hooked names in order.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::AlreadyWrapped`] if any method is already
    /// hookable, and [`HookError::InvalidHookName`] if a method name is not
    /// an identifier. Nothing is changed on error.
    pub fn hook_all(&mut self) -> HookResult<Vec<String>> {
        let names: Vec<String> = self
            .members
            .iter()
            .filter(|(_, member)| !matches!(member, Member::Value(_)))
            .map(|(name, _)| name.clone())
            .collect();
        self.hook_methods(names)
    }

    /// Make the selected methods hookable.
    ///
    /// # Errors
    ///
    /// Validation runs over the whole selection before anything changes:
    /// - [`HookError::InvalidHookName`] for a name that is not an identifier
    /// - [`HookError::UnknownHookName`] for a name with no member
    /// - [`HookError::NotAFunction`] for a data member
    /// - [`HookError::AlreadyWrapped`] for a method that is already hookable
    ///   or is selected twice
    pub fn hook_methods<I, S>(&mut self, names: I) -> HookResult<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selected = Vec::new();
        let mut seen = HashSet::new();

        for name in names {
            let name = name.as_ref();
            validate_name(name)?;

            match self.members.get(name) {
                None => return Err(unknown(name)),
                Some(Member::Value(_)) => {
                    return Err(HookError::NotAFunction {
                        what: format!("member `{name}` is a value"),
                    });
                },
                Some(Member::Hooked(_)) => return Err(already_hooked(name)),
                Some(Member::Method(_)) => {
                    if !seen.insert(name.to_string()) {
                        return Err(already_hooked(name));
                    }
                    selected.push(name.to_string());
                },
            }
        }

        for name in &selected {
            if let Some(member) = self.members.get_mut(name)
                && let Member::Method(func) = member
            {
                let func = Arc::clone(func);
                *member = Member::Hooked(Hooked::with_receiver(move |target: &T, args| {
                    func(target, args)
                }));
                debug!(method = %name, "Method made hookable");
            }
        }

        info!(count = selected.len(), "Object methods hooked");
        Ok(selected)
    }

    /// Append pre hooks to a hookable method.
    ///
    /// # Errors
    ///
    /// [`HookError::InvalidHookName`] or [`HookError::UnknownHookName`] if
    /// `name` is not a hookable method, and [`HookError::NoHooksPassed`] if
    /// `hooks` is empty.
    pub fn pre(&self, name: &str, hooks: impl Into<HookSet<A, R, T>>) -> HookResult<()> {
        self.hooked(name)?.pre(hooks)
    }

    /// Remove pre hooks from a hookable method.
    ///
    /// `None` clears the method's chain. Returns how many hooks were removed.
    ///
    /// # Errors
    ///
    /// [`HookError::InvalidHookName`] or [`HookError::UnknownHookName`] if
    /// `name` is not a hookable method.
    pub fn remove_pre(&self, name: &str, hook: Option<&PreHook<A, R, T>>) -> HookResult<usize> {
        Ok(self.hooked(name)?.remove_pre(hook))
    }

    /// Call a method with the object as receiver.
    ///
    /// Hookable methods run through their chain; other methods are called
    /// directly.
    ///
    /// # Errors
    ///
    /// [`HookError::UnknownHookName`] if there is no such member,
    /// [`HookError::NotAFunction`] if it is a data member, and any error
    /// produced by the chain.
    pub fn call(&self, name: &str, args: A) -> HookResult<R>
    where
        A: Clone,
    {
        match self.members.get(name) {
            None => Err(unknown(name)),
            Some(Member::Method(func)) => Ok(func(&self.target, args)),
            Some(Member::Hooked(hooked)) => hooked.invoke_on(&self.target, args),
            Some(Member::Value(_)) => Err(HookError::NotAFunction {
                what: format!("member `{name}` is a value"),
            }),
        }
    }

    /// A data member by name.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&serde_json::Value> {
        match self.members.get(name) {
            Some(Member::Value(value)) => Some(value),
            _ => None,
        }
    }

    /// The owned object.
    #[must_use]
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Whether `name` is a hookable method.
    #[must_use]
    pub fn is_hooked(&self, name: &str) -> bool {
        matches!(self.members.get(name), Some(Member::Hooked(_)))
    }

    /// Names of all hookable methods, sorted.
    #[must_use]
    pub fn hooked_names(&self) -> Vec<&str> {
        self.members
            .iter()
            .filter(|(_, member)| matches!(member, Member::Hooked(_)))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    fn hooked(&self, name: &str) -> HookResult<&Hooked<A, R, T>> {
        validate_name(name)?;
        match self.members.get(name) {
            Some(Member::Hooked(hooked)) => Ok(hooked),
            _ => Err(unknown(name)),
        }
    }
}

impl<T: fmt::Debug, A, R> fmt::Debug for HookableObject<T, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: BTreeMap<&str, &str> = self
            .members
            .iter()
            .map(|(name, member)| (name.as_str(), member.kind()))
            .collect();
        f.debug_struct("HookableObject")
            .field("target", &self.target)
            .field("members", &members)
            .finish()
    }
}

/// Whether `name` is usable as a hook name: an identifier made of ASCII
/// letters, digits, `_` and `$`, not starting with a digit.
#[must_use]
pub fn is_valid_hook_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let ident = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$';
    !first.is_ascii_digit() && ident(first) && chars.all(ident)
}

fn validate_name(name: &str) -> HookResult<()> {
    if is_valid_hook_name(name) {
        Ok(())
    } else {
        Err(HookError::InvalidHookName {
            name: name.to_string(),
        })
    }
}

fn unknown(name: &str) -> HookError {
    HookError::UnknownHookName {
        name: name.to_string(),
    }
}

fn already_hooked(name: &str) -> HookError {
    HookError::AlreadyWrapped {
        what: format!("method `{name}`"),
    }
}
