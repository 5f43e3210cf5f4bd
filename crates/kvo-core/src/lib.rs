#![forbid(unsafe_code)]

//! Core: observable properties with ordered, fail-soft change notification.
//!
//! # Primary responsibilities
//! - **Observable**: a value container with `get`/`set` and explicit
//!   subscriber registration.
//! - **Subscription**: handles and guards pairing every subscribe with a
//!   dispose.
//! - **Error sinks**: where subscriber failures go instead of the caller of
//!   `set`.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use kvo_core::Observable;
//!
//! let name = Observable::new(String::new());
//! let label = Rc::new(RefCell::new(String::new()));
//!
//! let label_clone = Rc::clone(&label);
//! let guard = name.subscribe_scoped(move |_old, new: &String| {
//!     *label_clone.borrow_mut() = new.clone();
//! });
//!
//! name.set("Hello".to_string());
//! assert_eq!(*label.borrow(), "Hello");
//!
//! drop(guard);
//! name.set("ignored".to_string());
//! assert_eq!(*label.borrow(), "Hello");
//! ```
//!
//! # Logging
//! Subscribe, unsubscribe and notification passes are reported as `tracing`
//! events at `TRACE`; routed subscriber failures at `DEBUG`. Install a
//! subscriber in the host binary to see them.

pub mod error;
pub mod reactive;
pub mod sink;

pub use error::{BoxError, CallbackError, SubscriptionError};
pub use reactive::{Observable, ObservableConfig, Subscription, SubscriptionGuard};
pub use sink::{CollectErrors, ErrorSink, IgnoreErrors, LogErrors};
