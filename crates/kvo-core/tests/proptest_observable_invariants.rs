//! Property-based invariant tests for `Observable`.
//!
//! 1. After any sequence of `set` calls, `get()` returns the last value.
//! 2. `version()` equals the number of committed writes.
//! 3. Every live subscriber sees every write as `(old, new)`, in order.
//! 4. Earlier subscribers are always called before later ones.
//! 5. A disposed subscriber is never called again, and disposal is idempotent.
//! 6. Failing subscribers never stop the pass; every failure reaches the sink.

use kvo_core::{CollectErrors, Observable, ObservableConfig, Subscription};
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

// ── Strategies ────────────────────────────────────────────────────────────

fn writes_strategy(max_len: usize) -> impl Strategy<Value = Vec<i64>> {
    proptest::collection::vec(any::<i64>(), 1..=max_len)
}

/// `(write_index, subscriber_index)` pairs: dispose subscriber `s` right
/// before write `w`.
fn disposals_strategy() -> impl Strategy<Value = Vec<(usize, usize)>> {
    proptest::collection::vec((0usize..16, 0usize..6), 0..=8)
}

type CallLog = Rc<RefCell<Vec<(usize, i64, i64)>>>;

fn subscribe_logging(obs: &Observable<i64>, count: usize, log: &CallLog) -> Vec<Subscription> {
    (0..count)
        .map(|idx| {
            let log = Rc::clone(log);
            obs.subscribe(move |old, new| log.borrow_mut().push((idx, *old, *new)))
        })
        .collect()
}

// ── Value and version ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn last_write_wins(initial in any::<i64>(), writes in writes_strategy(64)) {
        let obs = Observable::new(initial);
        for w in &writes {
            obs.set(*w);
        }
        prop_assert_eq!(obs.get(), *writes.last().unwrap());
        prop_assert_eq!(obs.version(), writes.len() as u64);
    }

    #[test]
    fn strings_last_write_wins(writes in proptest::collection::vec(".{0,12}", 1..=32)) {
        let obs = Observable::new(String::new());
        for w in &writes {
            obs.set(w.clone());
        }
        prop_assert_eq!(obs.get(), writes.last().unwrap().clone());
    }
}

// ── Ordering ──────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn every_subscriber_sees_every_write_in_registration_order(
        initial in any::<i64>(),
        writes in writes_strategy(32),
        subscribers in 1usize..6,
    ) {
        let obs = Observable::new(initial);
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        let _subs = subscribe_logging(&obs, subscribers, &log);

        for w in &writes {
            obs.set(*w);
        }

        let log = log.borrow();
        prop_assert_eq!(log.len(), writes.len() * subscribers);

        let mut previous = initial;
        for (pass, w) in writes.iter().enumerate() {
            let calls = &log[pass * subscribers..(pass + 1) * subscribers];
            for (idx, call) in calls.iter().enumerate() {
                prop_assert_eq!(*call, (idx, previous, *w));
            }
            previous = *w;
        }
    }
}

// ── Disposal ──────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn disposed_subscribers_stay_silent(
        writes in writes_strategy(16),
        disposals in disposals_strategy(),
    ) {
        let obs = Observable::new(0i64);
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        let subs = subscribe_logging(&obs, 6, &log);
        let mut disposed_at: [Option<usize>; 6] = [None; 6];

        for (pass, w) in writes.iter().enumerate() {
            for &(at, idx) in &disposals {
                if at == pass {
                    // Disposing twice must be harmless.
                    obs.unsubscribe(subs[idx]);
                    obs.unsubscribe(subs[idx]);
                    disposed_at[idx].get_or_insert(pass);
                }
            }
            let before = log.borrow().len();
            obs.set(*w);
            let called: Vec<usize> = log.borrow()[before..].iter().map(|c| c.0).collect();
            let expected: Vec<usize> = (0..6)
                .filter(|idx| disposed_at[*idx].is_none())
                .collect();
            prop_assert_eq!(called, expected);
        }
    }
}

// ── Failure containment ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn failures_never_stop_the_pass(
        writes in writes_strategy(16),
        failing in proptest::collection::vec(proptest::bool::ANY, 1..=6),
    ) {
        let sink = CollectErrors::new();
        let obs = Observable::with_config(
            0i64,
            ObservableConfig::new().with_error_sink(sink.clone()),
        );
        let calls = Rc::new(RefCell::new(0usize));

        for fails in &failing {
            let calls = Rc::clone(&calls);
            let fails = *fails;
            let _ = obs.try_subscribe(move |_, _| {
                *calls.borrow_mut() += 1;
                if fails { Err("subscriber refused") } else { Ok(()) }
            });
        }

        for w in &writes {
            obs.set(*w);
        }

        let failing_count = failing.iter().filter(|f| **f).count();
        prop_assert_eq!(*calls.borrow(), failing.len() * writes.len());
        prop_assert_eq!(sink.len(), failing_count * writes.len());
        prop_assert_eq!(obs.get(), *writes.last().unwrap());
    }
}
