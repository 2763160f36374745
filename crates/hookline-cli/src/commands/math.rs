//! Math demo: batch hooking an object's methods.

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use colored::Colorize;
use hookline::{HookResult, HookableObject, Next, PreHook};
use serde_json::json;
use tracing::info;

type Operands = (f64, f64);

/// Receiver for the math methods.
#[derive(Debug, Default)]
pub(crate) struct Math;

fn math_object() -> HookableObject<Math, Operands, f64> {
    HookableObject::new(Math)
        .with_method("max", |_: &Math, (a, b): Operands| a.max(b))
        .with_method("min", |_: &Math, (a, b): Operands| a.min(b))
        .with_value("pi", json!(std::f64::consts::PI))
}

/// Run the demo and collect every line it produces.
pub(crate) fn transcript(a: f64, b: f64) -> HookResult<Vec<String>> {
    let mut math = math_object();
    let hooked = math.hook_all()?;
    info!(methods = ?hooked, "Math methods hooked");

    let notes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&notes);
    math.pre(
        "max",
        PreHook::named(
            "max-logger",
            move |next: &Next<'_, Operands, f64, Math>, args: Operands| {
                info!(a = args.0, b = args.1, "max method called");
                sink.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push("max method called".to_string());
                next.call(args)
            },
        ),
    )?;

    let max = math.call("max", (a, b))?;
    let min = math.call("min", (a, b))?;

    let mut lines = std::mem::take(&mut *notes.lock().unwrap_or_else(PoisonError::into_inner));
    lines.push(format!("max({a}, {b}) = {max}"));
    lines.push(format!("min({a}, {b}) = {min}"));
    if let Some(pi) = math.value("pi") {
        lines.push(format!("pi = {pi}"));
    }
    Ok(lines)
}

/// Print the math demo.
pub(crate) fn run_math(a: f64, b: f64) -> Result<()> {
    println!("{}", "Hooked math object".cyan().bold());
    for line in transcript(a, b)? {
        println!("  {line}");
    }
    Ok(())
}
