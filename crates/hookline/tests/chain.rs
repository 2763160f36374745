//! End-to-end behaviour of hook chains on wrapped functions.

#![allow(clippy::arithmetic_side_effects, clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use hookline::{HookError, HookSet, Hooked, Next, PreHook};
use hookline_test::{CallProbe, Pair, Sequencer, init_test_tracing, sum};

type Hook = PreHook<Pair, i64>;

fn probed_target(probe: &CallProbe<Pair>) -> Hooked<Pair, i64> {
    let probe = probe.clone();
    Hooked::new(move |args: Pair| {
        probe.record(args);
        sum(args)
    })
}

fn probed_hook<F>(probe: &CallProbe<Pair>, transform: F) -> Hook
where
    F: Fn(Pair) -> Pair + Send + Sync + 'static,
{
    let probe = probe.clone();
    PreHook::new(move |next: &Next<'_, Pair, i64>, args: Pair| {
        probe.record(args);
        next.call(transform(args))
    })
}

#[test]
fn calls_target_when_no_hooks() {
    let target = CallProbe::new("target");
    let hooked = probed_target(&target);

    assert_eq!(hooked.invoke((1, 0)).unwrap(), 1);
    assert!(target.called_once());
    assert!(target.called_with(&(1, 0)));
}

#[test]
fn hook_modifies_arguments() {
    let target = CallProbe::new("target");
    let hooked = probed_target(&target);
    hooked.pre_fn(|next, (a, b)| next.call((b, a)));

    hooked.invoke((1, 2)).unwrap();
    assert!(target.called_with(&(2, 1)));
}

#[test]
fn result_is_not_swallowed() {
    let target = CallProbe::new("target");
    let hooked = probed_target(&target);
    hooked.pre_fn(|next, args| next.call(args));

    assert_eq!(hooked.invoke((1, 1)).unwrap(), 2);
    assert!(target.called_with(&(1, 1)));
}

#[test]
fn increments_first_argument() {
    let hooked = Hooked::new(sum);
    hooked.pre_fn(|next, (a, b)| next.call((a + 1, b)));

    assert_eq!(hooked.invoke((1, 1)).unwrap(), 3);
}

#[test]
fn hooks_run_in_registration_order() {
    init_test_tracing();

    let seq = Sequencer::new();
    let pre1 = CallProbe::with_sequencer("pre1", &seq);
    let pre2 = CallProbe::with_sequencer("pre2", &seq);
    let target = CallProbe::with_sequencer("target", &seq);

    let hooked = probed_target(&target);
    hooked.pre(probed_hook(&pre1, |(a, b)| (a + 1, b))).unwrap();
    hooked.pre(probed_hook(&pre2, |(a, b)| (a, b + 1))).unwrap();

    hooked.invoke((1, 1)).unwrap();

    assert!(target.called_with(&(2, 2)));
    assert!(pre2.called_with(&(2, 1)));
    assert!(pre1.called_before(&pre2));
    assert!(pre2.called_before(&target));
}

#[test]
fn hooks_passed_together_keep_order() {
    let seq = Sequencer::new();
    let pre1 = CallProbe::with_sequencer("pre1", &seq);
    let pre2 = CallProbe::with_sequencer("pre2", &seq);
    let target = CallProbe::new("target");

    let hooked = probed_target(&target);
    hooked
        .pre([
            probed_hook(&pre1, |(a, b)| (a + 1, b)),
            probed_hook(&pre2, |(a, b)| (a, b + 1)),
        ])
        .unwrap();

    hooked.invoke((1, 1)).unwrap();
    assert!(target.called_with(&(2, 2)));
    assert!(pre1.called_before(&pre2));
}

#[test]
fn nested_hook_sets_are_flattened() {
    let seq = Sequencer::new();
    let pre1 = CallProbe::with_sequencer("pre1", &seq);
    let pre2 = CallProbe::with_sequencer("pre2", &seq);
    let pre3 = CallProbe::with_sequencer("pre3", &seq);
    let target = CallProbe::new("target");

    let hooked = probed_target(&target);
    hooked
        .pre(vec![
            HookSet::from(probed_hook(&pre1, |(a, b)| (a * 10, b))),
            HookSet::from(vec![
                probed_hook(&pre2, |(a, b)| (a + 1, b)),
                probed_hook(&pre3, |(a, b)| (a, b * 10)),
            ]),
        ])
        .unwrap();

    assert_eq!(hooked.len(), 3);
    hooked.invoke((1, 1)).unwrap();
    assert!(target.called_with(&(11, 10)));
    assert!(pre1.called_before(&pre2));
    assert!(pre2.called_before(&pre3));
}

#[test]
fn forwarding_chain_composes_transforms() {
    let hooked = Hooked::new(sum);
    hooked.pre_fn(|next, (a, b)| next.call((a * 2, b)));
    hooked.pre_fn(|next, (a, b)| next.call((a + 3, b - 1)));
    hooked.pre_fn(|next, (a, b)| next.call((a, b * b)));

    // ((1 * 2) + 3) + (4 - 1)^2
    assert_eq!(hooked.invoke((1, 4)).unwrap(), 5 + 9);
}

#[test]
fn short_circuit_skips_target_and_later_hooks() {
    let target = CallProbe::new("target");
    let later = CallProbe::new("later");
    let hooked = probed_target(&target);

    hooked.pre_fn(|_, _| Ok(99));
    hooked.pre(probed_hook(&later, |args| args)).unwrap();

    assert_eq!(hooked.invoke((5, 0)).unwrap(), 99);
    assert!(!target.was_called());
    assert!(!later.was_called());
}

#[test]
fn hook_can_override_result_conditionally() {
    let hooked = Hooked::new(sum);
    hooked.pre_fn(|next, (a, b)| {
        if a == 1 && b == 1 {
            return Ok(3);
        }
        next.call((a, b))
    });

    assert_eq!(hooked.invoke((2, 2)).unwrap(), 4);
    assert_eq!(hooked.invoke((1, 1)).unwrap(), 3);
}

#[test]
fn double_next_is_rejected_after_first_call_completes() {
    let target = CallProbe::new("target");
    let hooked = probed_target(&target);

    hooked.pre_fn(|next, args| {
        next.call(args)?;
        next.call(args)
    });

    assert_eq!(hooked.invoke((1, 2)), Err(HookError::DoubleNext));
    assert!(target.called_once());
}

#[test]
fn double_next_error_propagates_through_outer_hooks() {
    let target = CallProbe::new("target");
    let outer = CallProbe::new("outer");
    let hooked = probed_target(&target);

    hooked.pre(probed_hook(&outer, |args| args)).unwrap();
    hooked.pre_fn(|next, args| {
        let first = next.call(args)?;
        next.call((first, 0))
    });

    assert_eq!(hooked.invoke((1, 1)), Err(HookError::DoubleNext));
    assert!(outer.called_once());
    assert!(target.called_once());
}

#[test]
fn apply_same_redelivers_received_arguments() {
    let target = CallProbe::new("target");
    let hooked = probed_target(&target);

    hooked.pre_fn(|next, (a, b)| next.call((a + 1, b + 1)));
    hooked.pre_fn(|next, _| next.apply_same());

    assert_eq!(hooked.invoke((1, 1)).unwrap(), 4);
    assert!(target.called_with(&(2, 2)));
}

#[test]
fn apply_same_after_call_is_double_next() {
    let hooked = Hooked::new(sum);
    hooked.pre_fn(|next, args| {
        next.call(args)?;
        next.apply_same()
    });

    assert_eq!(hooked.invoke((1, 1)), Err(HookError::DoubleNext));
}

#[test]
fn remove_pre_removes_only_that_hook() {
    let pre1 = CallProbe::new("pre1");
    let pre2 = CallProbe::new("pre2");
    let target = CallProbe::new("target");

    let hooked = probed_target(&target);
    let hook1 = probed_hook(&pre1, |args| args);
    let hook2 = probed_hook(&pre2, |(a, b)| (a + 100, b));
    hooked.pre(&hook1).unwrap();
    hooked.pre(&hook2).unwrap();

    assert_eq!(hooked.remove_pre(Some(&hook2)), 1);
    hooked.invoke((1, 0)).unwrap();

    assert!(pre1.called_once());
    assert!(!pre2.was_called());
    assert!(target.called_with(&(1, 0)));
}

#[test]
fn remove_pre_removes_every_occurrence_and_keeps_order() {
    let seq = Sequencer::new();
    let first = CallProbe::with_sequencer("first", &seq);
    let second = CallProbe::with_sequencer("second", &seq);
    let dup = CallProbe::with_sequencer("dup", &seq);

    let hooked = Hooked::new(sum);
    let dup_hook = probed_hook(&dup, |args| args);
    hooked
        .pre(vec![
            dup_hook.clone(),
            probed_hook(&first, |args| args),
            dup_hook.clone(),
            probed_hook(&second, |args| args),
            dup_hook.clone(),
        ])
        .unwrap();

    assert_eq!(hooked.remove_pre(Some(&dup_hook)), 3);
    assert_eq!(hooked.len(), 2);

    hooked.invoke((0, 0)).unwrap();
    assert!(!dup.was_called());
    assert!(first.called_before(&second));
}

#[test]
fn removing_unknown_hook_is_noop() {
    let hooked = Hooked::new(sum);
    hooked.pre_fn(|next, (a, b)| next.call((a + 1, b)));
    let stranger: Hook = PreHook::new(|next: &Next<'_, Pair, i64>, args| next.call(args));

    assert_eq!(hooked.remove_pre(Some(&stranger)), 0);
    assert_eq!(hooked.invoke((1, 1)).unwrap(), 3);
}

#[test]
fn remove_pre_without_hook_clears_all() {
    let pre1 = CallProbe::new("pre1");
    let pre2 = CallProbe::new("pre2");
    let target = CallProbe::new("target");

    let hooked = probed_target(&target);
    hooked.pre(probed_hook(&pre1, |args| args)).unwrap();
    hooked.pre(probed_hook(&pre2, |(a, b)| (a + 100, b))).unwrap();

    assert_eq!(hooked.remove_pre(None), 2);
    hooked.invoke((1, 0)).unwrap();

    assert!(!pre1.was_called());
    assert!(!pre2.was_called());
    assert!(target.called_with(&(1, 0)));

    // Clearing an empty chain is idempotent.
    assert_eq!(hooked.remove_pre(None), 0);
}

#[test]
fn duplicate_registration_runs_twice() {
    let probe = CallProbe::new("dup");
    let hooked = Hooked::new(sum);
    let hook = probed_hook(&probe, |(a, b)| (a + 1, b));

    hooked.pre(&hook).unwrap();
    hooked.pre(&hook).unwrap();

    assert_eq!(hooked.invoke((0, 0)).unwrap(), 2);
    assert_eq!(probe.call_count(), 2);
}

#[test]
fn empty_pre_is_rejected() {
    let hooked = Hooked::new(sum);
    assert_eq!(hooked.pre(Vec::<Hook>::new()), Err(HookError::NoHooksPassed));
}

#[derive(Debug, PartialEq, Eq)]
struct Account {
    owner: String,
    balance: i64,
}

#[test]
fn receiver_reaches_hooks_and_target() {
    let hook_saw = CallProbe::new("hook receiver");
    let target_saw = CallProbe::new("target receiver");

    let target_probe = target_saw.clone();
    let deposit = Hooked::with_receiver(move |account: &Account, amount: i64| {
        target_probe.record(account.owner.clone());
        account.balance + amount
    });

    let hook_probe = hook_saw.clone();
    deposit.pre_fn(move |next: &Next<'_, i64, i64, Account>, amount| {
        hook_probe.record(next.receiver().owner.clone());
        next.call(amount)
    });
    deposit.pre_fn(|next, _| next.apply_same());

    let account = Account {
        owner: "ada".to_string(),
        balance: 10,
    };

    assert_eq!(deposit.invoke_on(&account, 5).unwrap(), 15);
    assert_eq!(hook_saw.calls(), vec!["ada".to_string()]);
    assert_eq!(target_saw.calls(), vec!["ada".to_string()]);
}

#[test]
fn fallible_target_error_propagates() {
    let hooked: Hooked<i64, i64> = Hooked::fallible(|_: &(), value: i64| {
        if value < 0 {
            Err(HookError::NotAFunction {
                what: "negative".to_string(),
            })
        } else {
            Ok(value)
        }
    });
    hooked.pre_fn(|next, value| next.call(value - 5));

    assert_eq!(hooked.invoke(10), Ok(5));
    assert!(matches!(
        hooked.invoke(1),
        Err(HookError::NotAFunction { .. })
    ));
}

#[test]
fn registration_during_dispatch_affects_next_call_only() {
    let target = CallProbe::new("target");
    let hooked = probed_target(&target);

    let handle = hooked.clone();
    let installed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&installed);
    hooked.pre_fn(move |next, args| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            handle.pre_fn(|next, (a, b)| next.call((a + 100, b)));
        }
        next.call(args)
    });

    hooked.invoke((1, 0)).unwrap();
    assert!(target.called_with(&(1, 0)));
    assert_eq!(hooked.len(), 2);

    hooked.invoke((1, 0)).unwrap();
    assert!(target.called_with(&(101, 0)));
}

#[test]
fn removal_during_dispatch_does_not_break_current_call() {
    let later = CallProbe::new("later");
    let hooked = Hooked::new(sum);
    let later_hook = probed_hook(&later, |(a, b)| (a, b + 1));

    let handle = hooked.clone();
    hooked.pre_fn(move |next, args| {
        handle.remove_pre(None);
        next.call(args)
    });
    hooked.pre(&later_hook).unwrap();

    assert_eq!(hooked.invoke((1, 1)).unwrap(), 3);
    assert!(later.called_once());
    assert!(hooked.is_empty());
    assert_eq!(hooked.invoke((1, 1)).unwrap(), 2);
}

#[test]
fn reentrant_invocation_uses_fresh_continuations() {
    let hooked: Hooked<i64, i64> = Hooked::new(|value| value);
    let handle = hooked.clone();
    hooked.pre_fn(move |next, value| {
        if value > 0 {
            let inner = handle.invoke(value - 1)?;
            next.call(inner + value)
        } else {
            next.call(value)
        }
    });

    // 3 + 2 + 1 + 0
    assert_eq!(hooked.invoke(3).unwrap(), 6);
}

#[test]
fn concurrent_invocations_share_hooks() {
    let hooked = Hooked::new(sum);
    hooked.pre_fn(|next, (a, b)| next.call((a + 1, b)));

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4_i64)
            .map(|i| {
                let hooked = hooked.clone();
                scope.spawn(move || hooked.invoke((i, i)))
            })
            .collect();

        for (i, handle) in (0..4_i64).zip(handles) {
            assert_eq!(handle.join().unwrap(), Ok(2 * i + 1));
        }
    });
}
