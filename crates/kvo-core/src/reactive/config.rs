#![forbid(unsafe_code)]

//! Construction-time settings for [`Observable`](super::Observable).

use std::fmt;
use std::rc::Rc;

use crate::sink::{ErrorSink, IgnoreErrors};

/// Configuration for a new observable.
///
/// ```
/// use kvo_core::{Observable, ObservableConfig};
/// use kvo_core::sink::LogErrors;
///
/// let age = Observable::with_config(
///     0_i64,
///     ObservableConfig::new().with_name("user.age").with_error_sink(LogErrors),
/// );
/// assert_eq!(age.name(), "user.age");
/// ```
#[derive(Clone)]
pub struct ObservableConfig {
    /// Name used in logs and in [`CallbackError`](crate::CallbackError)s.
    /// Defaults to `observable#<id>`.
    pub name: Option<String>,
    /// Where subscriber failures go. Defaults to [`IgnoreErrors`].
    pub error_sink: Rc<dyn ErrorSink>,
}

impl Default for ObservableConfig {
    fn default() -> Self {
        Self {
            name: None,
            error_sink: Rc::new(IgnoreErrors),
        }
    }
}

impl ObservableConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the observable's name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the sink for subscriber failures.
    #[must_use]
    pub fn with_error_sink(mut self, sink: impl ErrorSink + 'static) -> Self {
        self.error_sink = Rc::new(sink);
        self
    }

    /// Set a sink that is already shared with other observables.
    #[must_use]
    pub fn with_shared_error_sink(mut self, sink: Rc<dyn ErrorSink>) -> Self {
        self.error_sink = sink;
        self
    }
}

impl fmt::Debug for ObservableConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableConfig")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
