#![forbid(unsafe_code)]

//! Scripted demo session.

use crate::cli::Opts;
use crate::model::{KeyValueError, User};
use crate::view::{LabelSnapshot, ProfileView};

/// Load a fresh profile view, replay the actions selected by `opts`, tear
/// the view down and return the labels as they were before teardown.
pub fn run_session(opts: &Opts) -> Result<LabelSnapshot, KeyValueError> {
    let mut view = ProfileView::new(User::new());
    view.load();

    if !opts.no_taps {
        view.tap_update_name();
        view.tap_update_age()?;
    }
    for text in &opts.texts {
        view.text_did_change(Some(text.as_str()));
    }
    if opts.clear_text {
        view.text_did_change(None);
    }

    let snapshot = view.snapshot();
    view.teardown();
    tracing::info!(
        name = ?snapshot.name,
        age = ?snapshot.age,
        text = ?snapshot.text,
        "session finished"
    );
    Ok(snapshot)
}
