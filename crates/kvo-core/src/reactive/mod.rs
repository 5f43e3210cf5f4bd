#![forbid(unsafe_code)]

//! Reactive value bindings.
//!
//! This module provides the change-tracking primitives:
//!
//! - [`Observable`]: a shared, version-tracked value wrapper that notifies
//!   subscriber callbacks with `(old, new)` on every mutation.
//! - [`Subscription`]: opaque, comparable handle for one registered callback.
//! - [`SubscriptionGuard`]: RAII guard that unsubscribes on drop.
//! - [`ObservableConfig`]: name and error sink for a new observable.
//!
//! # Architecture
//!
//! `Observable<T>` uses `Rc` + `RefCell` for single-threaded shared
//! ownership. Subscribers are kept in an ordered list; each notification
//! pass iterates a snapshot of that list taken when the pass begins.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per committed mutation.
//! 2. Subscribers are notified in registration order.
//! 3. Every `set` notifies, including writes of an equal value.
//! 4. A failing subscriber never stops the pass and never fails `set`.

pub mod config;
pub mod observable;
pub mod subscription;

pub use config::ObservableConfig;
pub use observable::Observable;
pub use subscription::{Subscription, SubscriptionGuard};
