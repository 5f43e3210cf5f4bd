#![forbid(unsafe_code)]

//! Error types for observation.
//!
//! | Error | Raised by | Reaches caller of `set`? |
//! |-------|-----------|--------------------------|
//! | [`SubscriptionError`] | [`Observable::try_unsubscribe`] | n/a |
//! | [`CallbackError`] | a subscriber during a notification pass | Never; routed to the [`ErrorSink`] |
//!
//! [`Observable::try_unsubscribe`]: crate::Observable::try_unsubscribe
//! [`ErrorSink`]: crate::sink::ErrorSink

use thiserror::Error;

use crate::reactive::Subscription;

/// Error type a fallible subscriber may return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Strict-mode failure when disposing a subscription.
///
/// The lenient [`Observable::unsubscribe`](crate::Observable::unsubscribe)
/// never produces this; it treats both cases as no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    /// The handle was issued by a different observable.
    #[error("subscription {subscription} does not belong to this observable")]
    ForeignObservable { subscription: Subscription },
    /// The handle was already disposed (or the guard already dropped).
    #[error("subscription {subscription} is not subscribed")]
    NotSubscribed { subscription: Subscription },
}

/// A subscriber failed during a notification pass.
#[derive(Debug, Error)]
pub enum CallbackError {
    /// A fallible subscriber returned `Err`.
    #[error("subscriber {subscription} of '{observable}' failed: {source}")]
    Failed {
        observable: String,
        subscription: Subscription,
        #[source]
        source: BoxError,
    },
    /// A subscriber panicked.
    #[error("subscriber {subscription} of '{observable}' panicked: {message}")]
    Panicked {
        observable: String,
        subscription: Subscription,
        message: String,
    },
}

impl CallbackError {
    /// Handle of the subscriber that failed.
    #[must_use]
    pub fn subscription(&self) -> Subscription {
        match self {
            Self::Failed { subscription, .. } | Self::Panicked { subscription, .. } => *subscription,
        }
    }

    /// Name of the observable whose pass the failure happened in.
    #[must_use]
    pub fn observable(&self) -> &str {
        match self {
            Self::Failed { observable, .. } | Self::Panicked { observable, .. } => observable,
        }
    }

    /// Whether the subscriber panicked rather than returning `Err`.
    #[must_use]
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked { .. })
    }

    /// Build a `Panicked` error from a `catch_unwind` payload.
    pub(crate) fn from_panic(
        observable: &str,
        subscription: Subscription,
        payload: Box<dyn std::any::Any + Send>,
    ) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::Panicked {
            observable: observable.to_string(),
            subscription,
            message,
        }
    }
}
