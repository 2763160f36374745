//! Sum demo: a hook that overrides the result for one input.

use anyhow::Result;
use colored::Colorize;
use hookline::{HookResult, Hooked};
use tracing::debug;

/// A sum where `1 + 1` is hooked to give `3`.
pub(crate) fn hooked_sum() -> Hooked<(i64, i64), i64> {
    let sum = Hooked::new(|(a, b): (i64, i64)| a.saturating_add(b));
    sum.pre_fn(|next, (a, b)| {
        if a == 1 && b == 1 {
            debug!("Overriding 1 + 1");
            return Ok(3);
        }
        next.call((a, b))
    });
    sum
}

/// Sum `a` and `b` through the hooked function.
pub(crate) fn evaluate(a: i64, b: i64) -> HookResult<i64> {
    hooked_sum().invoke((a, b))
}

/// Print the sum demo.
pub(crate) fn run_sum(a: i64, b: i64) -> Result<()> {
    let total = evaluate(a, b)?;
    println!("{a} + {b} = {}", total.to_string().green().bold());
    Ok(())
}
