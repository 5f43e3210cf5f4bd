//! End-to-end behavior of the profile view and the scripted session.

use std::cell::Cell;
use std::rc::Rc;

use kvo_core::{CollectErrors, ErrorSink};
use kvo_demo::app::run_session;
use kvo_demo::cli::Opts;
use kvo_demo::model::User;
use kvo_demo::view::{LabelSnapshot, ProfileView, ViewState};

fn opts(texts: &[&str]) -> Opts {
    Opts {
        texts: texts.iter().map(|t| t.to_string()).collect(),
        clear_text: false,
        no_taps: false,
        json: false,
        log: "warn".to_string(),
    }
}

#[test]
fn name_button_sets_hello() {
    let mut view = ProfileView::new(User::new());
    view.load();
    view.tap_update_name();

    assert_eq!(view.user().name.get(), "Hello");
    assert_eq!(view.name_label().text().as_deref(), Some("Hello"));
}

#[test]
fn age_button_notifies_through_a_single_path() {
    let user = User::new();
    let calls = Rc::new(Cell::new(0u32));
    let calls_clone = Rc::clone(&calls);
    let _probe = user
        .age
        .subscribe_scoped(move |_, _| calls_clone.set(calls_clone.get() + 1));

    let mut view = ProfileView::new(user);
    view.load();
    view.tap_update_age().unwrap();

    // Two writes (27, then 100 by key), one label update each.
    assert_eq!(calls.get(), 2);
    assert_eq!(view.age_label().updates(), 2);
    assert_eq!(view.age_label().text().as_deref(), Some("100"));
}

#[test]
fn typing_echoes_into_text_label() {
    let mut view = ProfileView::new(User::new());
    view.load();
    view.text_did_change(Some("h"));
    view.text_did_change(Some("hi"));
    assert_eq!(view.text_label().text().as_deref(), Some("hi"));
    assert_eq!(view.text_label().updates(), 2);
}

#[test]
fn teardown_releases_every_subscription() {
    let mut view = ProfileView::new(User::new());
    view.load();
    assert_eq!(view.user().name.subscriber_count(), 1);
    assert_eq!(view.user().age.subscriber_count(), 1);
    assert_eq!(view.input_text().subscriber_count(), 1);

    view.teardown();
    view.teardown();
    assert_eq!(view.state(), ViewState::TornDown);
    assert_eq!(view.user().name.subscriber_count(), 0);
    assert_eq!(view.user().age.subscriber_count(), 0);
    assert_eq!(view.input_text().subscriber_count(), 0);

    view.tap_update_name();
    assert_eq!(view.name_label().text(), None);
}

#[test]
fn reload_after_teardown_rebinds() {
    let mut view = ProfileView::new(User::new());
    view.load();
    view.teardown();
    view.load();
    assert_eq!(view.state(), ViewState::Loaded);
    view.tap_update_name();
    assert_eq!(view.name_label().updates(), 1);
}

#[test]
fn model_failures_reach_the_shared_sink() {
    let sink = CollectErrors::new();
    let shared: Rc<dyn ErrorSink> = Rc::new(sink.clone());
    let user = User::with_error_sink(shared);
    let _bad = user
        .name
        .try_subscribe_scoped(|_, _| Err("name label detached"));

    let mut view = ProfileView::new(user);
    view.load();
    view.tap_update_name();

    assert_eq!(view.name_label().text().as_deref(), Some("Hello"));
    let errors = sink.take();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].observable(), "user.name");
}

#[test]
fn scripted_session_matches_button_flow() {
    let snapshot = run_session(&opts(&["typed"])).unwrap();
    assert_eq!(
        snapshot,
        LabelSnapshot {
            name: Some("Hello".into()),
            age: Some("100".into()),
            text: Some("typed".into()),
        }
    );
}

#[test]
fn scripted_session_without_taps_leaves_model_labels_empty() {
    let mut o = opts(&[]);
    o.no_taps = true;
    o.clear_text = true;
    let snapshot = run_session(&o).unwrap();
    assert_eq!(snapshot.name, None);
    assert_eq!(snapshot.age, None);
    assert_eq!(snapshot.text, None);
}

#[test]
fn snapshot_serializes_as_json() {
    let snapshot = run_session(&opts(&[])).unwrap();
    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "name": "Hello", "age": "100", "text": null })
    );
}
