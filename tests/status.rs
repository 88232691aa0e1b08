//! Status panel behavior over a recording backend.

mod common;

use std::sync::mpsc;

use common::RecordingBackend;
use formset::FieldPath;
use formset::render::{Control, WidgetRegistry};
use formset::session::{StatusPanel, StatusUpdate};

fn update(action: fn(String, String) -> StatusUpdate) -> StatusUpdate {
    action("twitch".to_string(), "MyChannel".to_string())
}

fn add() -> StatusUpdate {
    update(|module, channel| StatusUpdate::Add { module, channel })
}

#[test]
fn rows_follow_the_channel_lifecycle() {
    let mut backend = RecordingBackend::new();
    let mut registry = WidgetRegistry::new();
    let mut panel = StatusPanel::new(&mut backend, &mut registry);
    assert!(panel.is_empty());

    panel.apply(&mut backend, &mut registry, add());
    assert_eq!(panel.len(), 1);
    // Adding the same channel twice keeps one row.
    panel.apply(&mut backend, &mut registry, add());
    assert_eq!(panel.len(), 1);

    let state_path = FieldPath::from_segments(["status", "twitch", "mychannel", "state"]);
    let indicator = registry.find(&state_path).unwrap();
    assert_eq!(backend.control(indicator), &Control::Indicator { on: false });

    panel.apply(
        &mut backend,
        &mut registry,
        update(|module, channel| StatusUpdate::Online { module, channel }),
    );
    assert_eq!(backend.control(indicator), &Control::Indicator { on: true });

    panel.apply(
        &mut backend,
        &mut registry,
        StatusUpdate::Viewers {
            module: "twitch".to_string(),
            channel: "MyChannel".to_string(),
            count: 123456,
        },
    );
    let viewers_path = FieldPath::from_segments(["status", "twitch", "mychannel", "viewers"]);
    let viewers = registry.find(&viewers_path).unwrap();
    assert_eq!(backend.widget(viewers).text.as_deref(), Some("123k"));

    panel.apply(
        &mut backend,
        &mut registry,
        update(|module, channel| StatusUpdate::Offline { module, channel }),
    );
    assert_eq!(backend.control(indicator), &Control::Indicator { on: false });

    panel.apply(
        &mut backend,
        &mut registry,
        update(|module, channel| StatusUpdate::Remove { module, channel }),
    );
    assert!(panel.is_empty());
    assert!(!backend.is_alive(indicator));
    assert!(registry.find(&state_path).is_none());
}

#[test]
fn drain_consumes_every_queued_update() {
    let mut backend = RecordingBackend::new();
    let mut registry = WidgetRegistry::new();
    let mut panel = StatusPanel::new(&mut backend, &mut registry);

    let (tx, rx) = mpsc::channel();
    tx.send(add()).unwrap();
    tx.send(update(|module, channel| StatusUpdate::Online { module, channel }))
        .unwrap();

    panel.drain(&mut backend, &mut registry, &rx);
    assert_eq!(panel.len(), 1);
    let indicator = registry
        .find(&FieldPath::from_segments(["status", "twitch", "mychannel", "state"]))
        .unwrap();
    assert_eq!(backend.control(indicator), &Control::Indicator { on: true });
}
