#![forbid(unsafe_code)]

//! Headless profile view: three labels bound to observable fields.
//!
//! # Lifecycle
//!
//! | Call | Effect |
//! |------|--------|
//! | [`ProfileView::load`] | subscribes one label updater per field |
//! | actions (`tap_*`, `text_did_change`) | write the fields; labels follow |
//! | [`ProfileView::teardown`] | disposes every subscription from `load` |
//!
//! Each field has exactly one notification path to its label, so one write
//! produces one label update.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use kvo_core::{LogErrors, Observable, ObservableConfig, SubscriptionGuard};
use serde::Serialize;

use crate::model::{KeyValueError, User};

/// Text shown by [`ProfileView::tap_update_name`].
pub const UPDATED_NAME: &str = "Hello";
/// Age written directly by [`ProfileView::tap_update_age`].
pub const DIRECT_AGE: i64 = 27;
/// Age then written by key by [`ProfileView::tap_update_age`].
pub const KEYED_AGE: i64 = 100;

/// A text display. Clones share the same text.
#[derive(Clone, Default)]
pub struct Label {
    text: Rc<RefCell<Option<String>>>,
    updates: Rc<Cell<u64>>,
}

impl Label {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text, `None` until first set.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.text.borrow().clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.borrow_mut() = Some(text.into());
        self.updates.set(self.updates.get() + 1);
    }

    /// How many times the text was set.
    #[must_use]
    pub fn updates(&self) -> u64 {
        self.updates.get()
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Label")
            .field("text", &self.text.borrow())
            .field("updates", &self.updates())
            .finish()
    }
}

/// Texts of the three labels at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelSnapshot {
    pub name: Option<String>,
    pub age: Option<String>,
    pub text: Option<String>,
}

impl fmt::Display for LabelSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |t: &Option<String>| t.clone().unwrap_or_else(|| "-".to_string());
        writeln!(f, "name: {}", show(&self.name))?;
        writeln!(f, "age:  {}", show(&self.age))?;
        writeln!(f, "text: {}", show(&self.text))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Unloaded,
    Loaded,
    TornDown,
}

/// A profile screen with name, age and echo labels plus a text input.
pub struct ProfileView {
    user: User,
    input_text: Observable<Option<String>>,
    name_label: Label,
    age_label: Label,
    text_label: Label,
    tokens: Vec<SubscriptionGuard>,
    state: ViewState,
}

impl ProfileView {
    #[must_use]
    pub fn new(user: User) -> Self {
        let input_text = Observable::with_config(
            None,
            ObservableConfig::new()
                .with_name("view.input_text")
                .with_error_sink(LogErrors),
        );
        Self {
            user,
            input_text,
            name_label: Label::new(),
            age_label: Label::new(),
            text_label: Label::new(),
            tokens: Vec::new(),
            state: ViewState::Unloaded,
        }
    }

    /// Bind the labels. Calling `load` on a loaded view does nothing.
    pub fn load(&mut self) {
        if self.state == ViewState::Loaded {
            return;
        }

        let label = self.name_label.clone();
        self.tokens.push(
            self.user
                .name
                .subscribe_scoped(move |_, name: &String| label.set_text(name.clone())),
        );

        let label = self.age_label.clone();
        self.tokens.push(
            self.user
                .age
                .subscribe_scoped(move |_, age: &i64| label.set_text(age.to_string())),
        );

        let label = self.text_label.clone();
        self.tokens.push(self.input_text.subscribe_scoped(
            move |_, text: &Option<String>| {
                if let Some(text) = text {
                    label.set_text(text.clone());
                }
            },
        ));

        self.state = ViewState::Loaded;
        tracing::debug!(subscriptions = self.tokens.len(), "profile view loaded");
    }

    /// Dispose every binding made by [`load`](Self::load). Idempotent.
    pub fn teardown(&mut self) {
        if self.state != ViewState::Loaded {
            return;
        }
        let count = self.tokens.len();
        for token in self.tokens.drain(..) {
            token.dispose();
        }
        self.state = ViewState::TornDown;
        tracing::debug!(disposed = count, "profile view torn down");
    }

    /// Name button: sets the name to [`UPDATED_NAME`].
    pub fn tap_update_name(&self) {
        self.user.name.set(UPDATED_NAME.to_string());
    }

    /// Age button: sets the age directly, then again by key.
    pub fn tap_update_age(&self) -> Result<(), KeyValueError> {
        self.user.age.set(DIRECT_AGE);
        self.user.set_value("age", KEYED_AGE)
    }

    /// The text input changed; `None` means the field has no text.
    pub fn text_did_change(&self, text: Option<&str>) {
        self.input_text.set(text.map(str::to_string));
    }

    #[must_use]
    pub fn snapshot(&self) -> LabelSnapshot {
        LabelSnapshot {
            name: self.name_label.text(),
            age: self.age_label.text(),
            text: self.text_label.text(),
        }
    }

    #[must_use]
    pub fn state(&self) -> ViewState {
        self.state
    }

    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    #[must_use]
    pub fn input_text(&self) -> &Observable<Option<String>> {
        &self.input_text
    }

    #[must_use]
    pub fn name_label(&self) -> &Label {
        &self.name_label
    }

    #[must_use]
    pub fn age_label(&self) -> &Label {
        &self.age_label
    }

    #[must_use]
    pub fn text_label(&self) -> &Label {
        &self.text_label
    }
}

impl fmt::Debug for ProfileView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileView")
            .field("state", &self.state)
            .field("labels", &self.snapshot())
            .field("subscriptions", &self.tokens.len())
            .finish()
    }
}
