#![forbid(unsafe_code)]

//! Observable value wrapper with ordered, fail-soft change notification.
//!
//! # Design
//!
//! [`Observable<T>`] wraps a value of type `T` in shared, reference-counted
//! storage. Every `set` commits the new value, bumps the version and then
//! runs a notification pass: each subscriber registered at that moment is
//! called with `(old, new)`, in registration order.
//!
//! Writes are never suppressed. Assigning the value that is already stored
//! still notifies; use [`Observable::set_if_changed`] to opt into
//! `PartialEq` suppression.
//!
//! # Performance
//!
//! | Operation       | Complexity                    |
//! |-----------------|-------------------------------|
//! | `get()`         | O(1) + one clone of `T`       |
//! | `set()`         | O(S) + one clone of `T` when S > 0 |
//! | `subscribe()`   | O(1) amortized                |
//! | `unsubscribe()` | O(S)                          |
//!
//! # Failure Modes
//!
//! - **Failing subscriber**: an `Err` from a fallible subscriber, or a panic
//!   from any subscriber, is caught, wrapped in a [`CallbackError`] and sent
//!   to the configured [`ErrorSink`]. The pass continues with the next
//!   subscriber and `set` returns normally. Panics are only caught when the
//!   binary unwinds (`panic = "unwind"`). A sink that panics is contained
//!   the same way and logged at `ERROR`.
//! - **Re-entrant set**: no interior borrow is held while subscribers run,
//!   so a subscriber may call `set` on the observable it is watching. The
//!   value is committed immediately; its `(old, new)` pass is queued and
//!   runs after the current pass finishes, so every subscriber sees changes
//!   in commit order. Cycles between observables are not detected.
//! - **Subscriber leak**: a bare [`Subscription`] that is never passed to
//!   `unsubscribe` keeps its callback alive as long as the observable. Use
//!   [`Observable::subscribe_scoped`] to tie the callback to a guard.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::config::ObservableConfig;
use super::subscription::{Subscription, SubscriptionGuard};
use crate::error::{BoxError, CallbackError, SubscriptionError};
use crate::sink::ErrorSink;

static NEXT_OBSERVABLE_ID: AtomicU64 = AtomicU64::new(1);

/// Every subscriber is stored in fallible form; infallible ones always
/// return `Ok`.
type Callback<T> = Rc<dyn Fn(&T, &T) -> Result<(), BoxError>>;

struct Subscriber<T> {
    handle: Subscription,
    callback: Callback<T>,
}

/// A committed change waiting for its notification pass.
struct PendingPass<T> {
    old: T,
    new: T,
    version: u64,
}

struct ObservableState<T> {
    value: T,
    version: u64,
    next_slot: u64,
    /// Registration order is notification order.
    subscribers: Vec<Subscriber<T>>,
    /// Set while a pass is running; re-entrant writes queue behind it.
    notifying: bool,
    pending: VecDeque<PendingPass<T>>,
}

/// Immutable identity plus the mutable state.
struct Shared<T> {
    id: u64,
    name: String,
    error_sink: Rc<dyn ErrorSink>,
    state: RefCell<ObservableState<T>>,
}

/// A shared, version-tracked value with change notification.
///
/// Cloning an `Observable` creates a new handle to the **same** state; both
/// handles see the same value and share subscribers. The subscriber list is
/// released when the last handle is dropped, which invalidates every
/// outstanding [`Subscription`].
///
/// `Observable` is `!Send` and `!Sync`: all access happens on one thread.
///
/// # Invariants
///
/// 1. `get()` returns the value passed to the most recent `set` (or the
///    result of the most recent `update`).
/// 2. `version` increments by exactly 1 on each committed mutation.
/// 3. Subscribers are notified in registration order.
/// 4. A pass iterates the subscriber list as it was when the pass began.
/// 5. A disposed subscription is never called by a pass that begins after
///    the disposal.
pub struct Observable<T> {
    shared: Rc<Shared<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("Observable")
            .field("name", &self.shared.name)
            .field("value", &state.value)
            .field("version", &state.version)
            .field("subscriber_count", &state.subscribers.len())
            .finish()
    }
}

impl<T: Clone + 'static> Observable<T> {
    /// Create a new observable with the given initial value.
    ///
    /// The initial version is 0, no subscribers are registered and
    /// subscriber failures are ignored.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::with_config(value, ObservableConfig::default())
    }

    /// Create a new observable with an explicit name and error sink.
    #[must_use]
    pub fn with_config(value: T, config: ObservableConfig) -> Self {
        let id = NEXT_OBSERVABLE_ID.fetch_add(1, Ordering::Relaxed);
        let name = config.name.unwrap_or_else(|| format!("observable#{id}"));
        Self {
            shared: Rc::new(Shared {
                id,
                name,
                error_sink: config.error_sink,
                state: RefCell::new(ObservableState {
                    value,
                    version: 0,
                    next_slot: 0,
                    subscribers: Vec::new(),
                    notifying: false,
                    pending: VecDeque::new(),
                }),
            }),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.shared.state.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    ///
    /// # Panics
    ///
    /// Panics if `f` mutates this observable: `set`, `set_if_changed`,
    /// `update`, any `subscribe` variant, `unsubscribe` or `try_unsubscribe`
    /// (including by dropping a [`SubscriptionGuard`] for it).
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.state.borrow().value)
    }

    /// Store `value` and notify every subscriber with `(old, new)`.
    ///
    /// Notification happens even when `value` equals the stored value.
    /// Called from inside a pass, the value is committed at once and its
    /// pass runs when the current one finishes.
    pub fn set(&self, value: T) {
        let start = {
            let mut state = self.shared.state.borrow_mut();
            state.version += 1;
            let old = std::mem::replace(&mut state.value, value);
            if state.subscribers.is_empty() && !state.notifying {
                return;
            }
            let pass = PendingPass {
                old,
                new: state.value.clone(),
                version: state.version,
            };
            state.pending.push_back(pass);
            !std::mem::replace(&mut state.notifying, true)
        };
        if start {
            self.drain();
        }
    }

    /// Compute a new value from a copy of the current one, then commit it
    /// like [`set`](Self::set).
    ///
    /// `f` runs without any borrow held, so it may read the observable. If
    /// `f` panics nothing is committed: value and version are unchanged.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut next = self.get();
        f(&mut next);
        self.set(next);
    }

    /// Register `callback`, to be called with `(old, new)` on every
    /// subsequent change. It is not called for the current value.
    pub fn subscribe(&self, callback: impl Fn(&T, &T) + 'static) -> Subscription {
        self.register(Rc::new(move |old: &T, new: &T| {
            callback(old, new);
            Ok::<(), BoxError>(())
        }))
    }

    /// Register a fallible callback. An `Err` is routed to the error sink
    /// and does not stop the pass.
    pub fn try_subscribe<E>(
        &self,
        callback: impl Fn(&T, &T) -> Result<(), E> + 'static,
    ) -> Subscription
    where
        E: Into<BoxError>,
    {
        self.register(Rc::new(move |old: &T, new: &T| {
            callback(old, new).map_err(Into::<BoxError>::into)
        }))
    }

    /// Like [`subscribe`](Self::subscribe), but the returned guard
    /// unsubscribes when dropped.
    pub fn subscribe_scoped(&self, callback: impl Fn(&T, &T) + 'static) -> SubscriptionGuard {
        let handle = self.subscribe(callback);
        self.guard(handle)
    }

    /// Like [`try_subscribe`](Self::try_subscribe), but the returned guard
    /// unsubscribes when dropped.
    pub fn try_subscribe_scoped<E>(
        &self,
        callback: impl Fn(&T, &T) -> Result<(), E> + 'static,
    ) -> SubscriptionGuard
    where
        E: Into<BoxError>,
    {
        let handle = self.try_subscribe(callback);
        self.guard(handle)
    }

    /// Remove a subscription. Unknown, foreign and already-disposed handles
    /// are ignored.
    pub fn unsubscribe(&self, handle: Subscription) {
        if let Err(err) = self.try_unsubscribe(handle) {
            tracing::trace!(observable = %self.shared.name, %err, "unsubscribe ignored");
        }
    }

    /// Remove a subscription, reporting handles that are not live here.
    pub fn try_unsubscribe(&self, handle: Subscription) -> Result<(), SubscriptionError> {
        if handle.observable_id() != self.shared.id {
            return Err(SubscriptionError::ForeignObservable {
                subscription: handle,
            });
        }
        // The removed callback is dropped after the borrow ends: its
        // captures may include a guard for this same observable.
        let removed = {
            let mut state = self.shared.state.borrow_mut();
            let index = state
                .subscribers
                .iter()
                .position(|s| s.handle == handle)
                .ok_or(SubscriptionError::NotSubscribed {
                    subscription: handle,
                })?;
            state.subscribers.remove(index)
        };
        tracing::trace!(observable = %self.shared.name, subscription = %handle, "unsubscribed");
        drop(removed);
        Ok(())
    }

    /// Whether `handle` is currently registered on this observable.
    #[must_use]
    pub fn is_subscribed(&self, handle: Subscription) -> bool {
        handle.observable_id() == self.shared.id
            && self
                .shared
                .state
                .borrow()
                .subscribers
                .iter()
                .any(|s| s.handle == handle)
    }

    /// Current version number. Increments by 1 on each committed mutation.
    /// Useful for dirty-checking in render loops.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.shared.state.borrow().version
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.state.borrow().subscribers.len()
    }

    /// Name used in logs and errors.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    fn register(&self, callback: Callback<T>) -> Subscription {
        let handle = {
            let mut state = self.shared.state.borrow_mut();
            let handle = Subscription::from_parts(self.shared.id, state.next_slot);
            state.next_slot += 1;
            state.subscribers.push(Subscriber { handle, callback });
            handle
        };
        tracing::trace!(observable = %self.shared.name, subscription = %handle, "subscribed");
        handle
    }

    fn guard(&self, handle: Subscription) -> SubscriptionGuard {
        let weak = Rc::downgrade(&self.shared);
        SubscriptionGuard::new(handle, move |handle| {
            if let Some(shared) = weak.upgrade() {
                Observable { shared }.unsubscribe(handle);
            }
        })
    }

    /// Run queued passes in commit order until none are left.
    fn drain(&self) {
        let _running = NotifyingReset(&self.shared.state);
        loop {
            let (pass, snapshot) = {
                let mut state = self.shared.state.borrow_mut();
                let Some(pass) = state.pending.pop_front() else {
                    break;
                };
                let snapshot: Vec<(Subscription, Callback<T>)> = state
                    .subscribers
                    .iter()
                    .map(|s| (s.handle, Rc::clone(&s.callback)))
                    .collect();
                (pass, snapshot)
            };
            self.notify(&pass, &snapshot);
        }
    }

    /// Run one notification pass over a snapshot of the subscriber list.
    fn notify(&self, pass: &PendingPass<T>, snapshot: &[(Subscription, Callback<T>)]) {
        tracing::trace!(
            observable = %self.shared.name,
            version = pass.version,
            subscribers = snapshot.len(),
            "notification pass"
        );

        for (handle, callback) in snapshot {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| callback(&pass.old, &pass.new)));
            let error = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(source)) => CallbackError::Failed {
                    observable: self.shared.name.clone(),
                    subscription: *handle,
                    source,
                },
                Err(payload) => CallbackError::from_panic(&self.shared.name, *handle, payload),
            };
            tracing::debug!(
                observable = %self.shared.name,
                subscription = %handle,
                "subscriber failed; routing to error sink"
            );
            let sink = &self.shared.error_sink;
            if panic::catch_unwind(AssertUnwindSafe(|| sink.report(error))).is_err() {
                tracing::error!(
                    observable = %self.shared.name,
                    subscription = %handle,
                    "error sink panicked; failure dropped"
                );
            }
        }
    }
}

/// Clears the in-pass flag when draining ends, including by unwinding.
struct NotifyingReset<'a, T>(&'a RefCell<ObservableState<T>>);

impl<T> Drop for NotifyingReset<'_, T> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.0.try_borrow_mut() {
            state.notifying = false;
            state.pending.clear();
        }
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Store `value` and notify, unless it equals the stored value. Returns
    /// whether a mutation was committed.
    pub fn set_if_changed(&self, value: T) -> bool {
        if self.shared.state.borrow().value == value {
            return false;
        }
        self.set(value);
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
