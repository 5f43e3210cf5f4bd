#![forbid(unsafe_code)]

//! Headless profile-view demo for `kvo-core`.
//!
//! A [`User`](model::User) with observable `name` and `age`, a
//! [`ProfileView`](view::ProfileView) whose labels follow those fields and an
//! input-text field, and a scripted session that drives the view the way
//! button taps and typing would.

pub mod app;
pub mod cli;
pub mod model;
pub mod view;
