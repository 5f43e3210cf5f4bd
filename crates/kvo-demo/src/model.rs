#![forbid(unsafe_code)]

//! The user model and its key-based accessors.
//!
//! Each field is an [`Observable`], so views subscribe to the field itself.
//! [`User::set_value`] writes a field by key name and goes through the same
//! observable, so key-based and direct writes notify identically.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use kvo_core::{ErrorSink, LogErrors, Observable, ObservableConfig};
use thiserror::Error;

/// Failure of a key-based read or write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyValueError {
    #[error("unknown key '{0}'")]
    UnknownKey(String),
    #[error("key '{key}' holds {expected}, got {found}")]
    TypeMismatch {
        key: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

/// Observable fields of a [`User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserKey {
    Name,
    Age,
}

impl UserKey {
    pub const ALL: [UserKey; 2] = [UserKey::Name, UserKey::Age];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Age => "age",
        }
    }

    const fn kind(self) -> &'static str {
        match self {
            Self::Name => FieldValue::TEXT,
            Self::Age => FieldValue::INT,
        }
    }
}

impl FromStr for UserKey {
    type Err = KeyValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| KeyValueError::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dynamically typed field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
}

impl FieldValue {
    const TEXT: &'static str = "text";
    const INT: &'static str = "an integer";

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => Self::TEXT,
            Self::Int(_) => Self::INT,
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
        }
    }
}

/// A user with an observable name and age.
#[derive(Debug, Clone)]
pub struct User {
    pub name: Observable<String>,
    pub age: Observable<i64>,
}

impl Default for User {
    fn default() -> Self {
        Self::new()
    }
}

impl User {
    /// Empty name, age 0; subscriber failures are logged.
    #[must_use]
    pub fn new() -> Self {
        Self::with_error_sink(Rc::new(LogErrors))
    }

    /// Like [`new`](Self::new) with both fields reporting to `sink`.
    #[must_use]
    pub fn with_error_sink(sink: Rc<dyn ErrorSink>) -> Self {
        let config = |key: UserKey| {
            ObservableConfig::new()
                .with_name(format!("user.{key}"))
                .with_shared_error_sink(Rc::clone(&sink))
        };
        Self {
            name: Observable::with_config(String::new(), config(UserKey::Name)),
            age: Observable::with_config(0, config(UserKey::Age)),
        }
    }

    /// Write a field by key name.
    pub fn set_value(&self, key: &str, value: impl Into<FieldValue>) -> Result<(), KeyValueError> {
        let key: UserKey = key.parse()?;
        match (key, value.into()) {
            (UserKey::Name, FieldValue::Text(name)) => self.name.set(name),
            (UserKey::Age, FieldValue::Int(age)) => self.age.set(age),
            (key, value) => {
                return Err(KeyValueError::TypeMismatch {
                    key: key.as_str(),
                    expected: key.kind(),
                    found: value.kind(),
                });
            }
        }
        tracing::debug!(%key, "value set by key");
        Ok(())
    }

    /// Read a field by key name.
    pub fn value(&self, key: &str) -> Result<FieldValue, KeyValueError> {
        Ok(match key.parse()? {
            UserKey::Name => FieldValue::Text(self.name.get()),
            UserKey::Age => FieldValue::Int(self.age.get()),
        })
    }
}
