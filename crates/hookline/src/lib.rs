//! Hookline - pre hook chains for functions and object methods.
//!
//! Wrapping a function yields a [`Hooked`] handle. Hooks registered with
//! [`Hooked::pre`] run in registration order before the target. Each hook
//! gets a [`Next`] continuation and the current arguments, and can:
//! - forward the arguments, transformed or not, with `next.call(args)`
//! - re-forward what it received with `next.apply_same()`
//! - short-circuit by returning its own value without calling `next`
//!
//! A continuation can be called at most once; a second call fails with
//! [`HookError::DoubleNext`].
//!
//! [`HookableObject`] applies the same chains to the methods of an object,
//! keyed by method name, and the [`dynamic`] module exposes the engine to
//! loosely typed hosts.
//!
//! # Example
//!
//! ```rust
//! use hookline::{Hooked, HookResult};
//!
//! # fn main() -> HookResult<()> {
//! let sum = Hooked::new(|(a, b): (i32, i32)| a + b);
//! sum.pre_fn(|next, (a, b)| next.call((a + 1, b)));
//!
//! assert_eq!(sum.invoke((1, 1))?, 3);
//!
//! sum.remove_pre(None);
//! assert_eq!(sum.invoke((1, 1))?, 2);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod dynamic;
mod error;
mod hook;
mod hooked;
mod next;
mod object;

pub use error::{HookError, HookResult};
pub use hook::{HookId, HookSet, PreHook};
pub use hooked::Hooked;
pub use next::Next;
pub use object::{HookableObject, is_valid_hook_name};
