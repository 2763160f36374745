//! Demo subcommands.

pub(crate) mod logger;
pub(crate) mod math;
pub(crate) mod sum;
