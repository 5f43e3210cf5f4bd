#![forbid(unsafe_code)]

//! Subscription handles and their RAII guard.

use std::fmt;

/// Opaque handle for one registered callback.
///
/// A handle names exactly one observable (the one that issued it) and one
/// slot in that observable's subscriber list. Slots are never reused, so a
/// disposed handle can never alias a later subscription.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subscription {
    observable: u64,
    slot: u64,
}

impl Subscription {
    pub(crate) const fn from_parts(observable: u64, slot: u64) -> Self {
        Self { observable, slot }
    }

    pub(crate) const fn observable_id(self) -> u64 {
        self.observable
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Subscription({}:{})", self.observable, self.slot)
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}", self.observable, self.slot)
    }
}

/// Disposes its [`Subscription`] when dropped.
///
/// The guard holds only a weak reference to the observable: it does not keep
/// the observable alive, and dropping it after the observable is gone does
/// nothing.
#[must_use = "dropping the guard immediately unsubscribes the callback"]
pub struct SubscriptionGuard {
    handle: Subscription,
    release: Option<Box<dyn FnOnce(Subscription)>>,
}

impl SubscriptionGuard {
    pub(crate) fn new(handle: Subscription, release: impl FnOnce(Subscription) + 'static) -> Self {
        Self {
            handle,
            release: Some(Box::new(release)),
        }
    }

    /// The guarded handle.
    #[must_use]
    pub fn handle(&self) -> Subscription {
        self.handle
    }

    /// Unsubscribe now. Equivalent to dropping the guard.
    pub fn dispose(mut self) {
        self.release_now();
    }

    /// Detach the guard and return the bare handle. The callback stays
    /// registered until someone calls `unsubscribe` with the handle.
    #[must_use]
    pub fn forget(mut self) -> Subscription {
        self.release = None;
        self.handle
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release(self.handle);
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for SubscriptionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionGuard")
            .field("handle", &self.handle)
            .field("armed", &self.release.is_some())
            .finish()
    }
}
