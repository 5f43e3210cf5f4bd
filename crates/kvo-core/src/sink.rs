#![forbid(unsafe_code)]

//! Destinations for subscriber failures.
//!
//! A notification pass never returns an error to the caller of `set`. Any
//! [`CallbackError`] raised by a subscriber is handed to the observable's
//! [`ErrorSink`] and the pass moves on to the next subscriber.
//!
//! Sinks run synchronously inside the notification pass, after the failing
//! subscriber returned and before the next one runs.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::CallbackError;

/// Receives subscriber failures.
pub trait ErrorSink {
    fn report(&self, error: CallbackError);
}

impl<F: Fn(CallbackError)> ErrorSink for F {
    fn report(&self, error: CallbackError) {
        self(error)
    }
}

/// Drops every failure. This is the default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreErrors;

impl ErrorSink for IgnoreErrors {
    fn report(&self, _error: CallbackError) {}
}

/// Emits each failure as a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogErrors;

impl ErrorSink for LogErrors {
    fn report(&self, error: CallbackError) {
        tracing::warn!(
            observable = error.observable(),
            subscription = %error.subscription(),
            panicked = error.is_panic(),
            "{error}"
        );
    }
}

/// Keeps every failure in memory, in report order.
///
/// Clones share the same buffer, so one clone can be installed on an
/// observable while another is inspected.
#[derive(Clone, Default)]
pub struct CollectErrors {
    errors: Rc<RefCell<Vec<CallbackError>>>,
}

impl CollectErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of failures collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }

    /// Remove and return everything collected so far.
    pub fn take(&self) -> Vec<CallbackError> {
        std::mem::take(&mut *self.errors.borrow_mut())
    }
}

impl ErrorSink for CollectErrors {
    fn report(&self, error: CallbackError) {
        self.errors.borrow_mut().push(error);
    }
}

impl fmt::Debug for CollectErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectErrors")
            .field("len", &self.len())
            .finish()
    }
}
