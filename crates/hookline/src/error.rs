//! Hook chain error types.

use thiserror::Error;

/// Errors raised while wrapping functions, registering hooks or running a chain.
///
/// Every variant is a contract violation by the caller or by a hook. None of
/// them are transient, so nothing in this crate retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// A non-callable value was given where a function was expected.
    #[error("not a function: {what}")]
    NotAFunction {
        /// Description of the offending value.
        what: String,
    },

    /// The value is already wrapped by a hook chain.
    #[error("already hooked: {what}")]
    AlreadyWrapped {
        /// Description of the offending value.
        what: String,
    },

    /// `pre` was called without any hooks.
    #[error("no pre hooks passed")]
    NoHooksPassed,

    /// An item passed to `pre` is not a hook.
    #[error("pre hook should be a function, got {what}")]
    InvalidHook {
        /// Description of the offending item.
        what: String,
    },

    /// A continuation was called a second time.
    #[error("next was called a second time in a pre hook")]
    DoubleNext,

    /// `apply_same` received explicit arguments.
    #[error("arguments are not allowed in apply_same (got {count})")]
    ArgumentsNotAllowed {
        /// Number of arguments that were passed.
        count: usize,
    },

    /// The name was never made hookable on the object.
    #[error("unknown hook name: {name}")]
    UnknownHookName {
        /// The requested name.
        name: String,
    },

    /// The name is not a valid identifier.
    #[error("invalid hook name: {name:?}")]
    InvalidHookName {
        /// The rejected name.
        name: String,
    },
}

/// Result type for hook operations.
pub type HookResult<T> = Result<T, HookError>;
