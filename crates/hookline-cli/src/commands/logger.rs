//! Logger demo: a counting hook on string concatenation.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use colored::Colorize;
use hookline::{HookResult, Hooked};
use tracing::info;

use crate::config::DemoConfig;

const OVERRIDDEN: &str = "The target function was overridden";

/// Run the demo and collect every line it produces.
pub(crate) fn transcript(demo: &DemoConfig) -> HookResult<Vec<String>> {
    let concat = Hooked::new(|(a, b): (String, String)| format!("{a}{b}"));
    let args = || (demo.first.clone(), demo.second.clone());
    let mut lines = Vec::new();

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let counter_hook = concat.pre_fn(move |next, (a, b): (String, String)| {
        let n = counter.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        next.call((format!("concatenation #{n}: {a}"), b))
    });

    for _ in 0..demo.times {
        lines.push(concat.invoke(args())?);
    }

    concat.remove_pre(Some(&counter_hook));
    lines.push(concat.invoke(args())?);

    concat.remove_pre(None);
    concat.pre_fn(|_, _| Ok(OVERRIDDEN.to_string()));
    lines.push(concat.invoke(("Doesn't matter what goes here".to_string(), String::new()))?);

    info!(
        counted = calls.load(Ordering::SeqCst),
        "Logger demo finished"
    );
    Ok(lines)
}

/// Print the logger demo.
pub(crate) fn run_logger(demo: &DemoConfig) -> Result<()> {
    println!("{}", "Hooked concatenation".cyan().bold());
    for line in transcript(demo)? {
        println!("  {line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_matches_demo() {
        let lines = transcript(&DemoConfig::default()).unwrap();
        assert_eq!(
            lines,
            vec![
                "concatenation #1: Hello world!",
                "concatenation #2: Hello world!",
                "concatenation #3: Hello world!",
                "Hello world!",
                OVERRIDDEN,
            ]
        );
    }

    #[test]
    fn test_transcript_without_counted_calls() {
        let demo = DemoConfig {
            first: "a".to_string(),
            second: "b".to_string(),
            times: 0,
        };
        assert_eq!(transcript(&demo).unwrap(), vec!["ab", OVERRIDDEN]);
    }
}
