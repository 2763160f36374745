//! Prelude module - commonly used types for convenient import.
//!
//! Use `use hookline::prelude::*;` to import all essential types.

// Errors
pub use crate::{HookError, HookResult};

// Hook chains
pub use crate::{HookId, HookSet, Hooked, Next, PreHook};

// Object batch hooking
pub use crate::HookableObject;
