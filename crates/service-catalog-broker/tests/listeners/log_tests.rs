// crates/service-catalog-broker/tests/listeners/log_tests.rs
// ============================================================================
// Module: LogListener Tests
// Description: Tests for the JSON-lines lifecycle logger.
// ============================================================================

use std::sync::Arc;

use service_catalog_broker::LogListener;
use service_catalog_core::EntryId;
use service_catalog_core::Listener;
use service_catalog_core::ListenerError;
use service_catalog_core::Registration;

use super::common::FailingWriter;
use super::common::SharedBuffer;
use super::common::attributes;
use super::common::controller_with;
use super::common::sample_entry;

// ============================================================================
// SECTION: Record Shape
// ============================================================================

#[test]
fn log_listener_writes_one_line_per_event() {
    let buffer = SharedBuffer::new();
    let listener = LogListener::new(buffer.clone());
    let first = sample_entry("gw1/svc", 80);
    let second = sample_entry("gw1/svc", 443);

    listener.on_create(&first).unwrap();
    listener.on_update(&first, &second).unwrap();
    listener.on_delete(&second).unwrap();

    let lines = buffer.lines();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["event"], "create");
    assert_eq!(lines[1]["event"], "update");
    assert_eq!(lines[2]["event"], "delete");
    for line in &lines {
        assert_eq!(line["id"], "gw1/svc");
        assert_eq!(line["created"], "2023-11-14T22:13:20Z");
        assert!(line.get("entry").is_none());
        assert!(line.get("previous").is_none());
    }
    assert_eq!(lines[1]["updated"], "2023-11-14T22:13:20.443Z");
}

#[test]
fn log_listener_with_entries_embeds_bodies() {
    let buffer = SharedBuffer::new();
    let listener = LogListener::with_entries(buffer.clone());
    let first = sample_entry("svc", 80);
    let second = sample_entry("svc", 443);

    listener.on_update(&first, &second).unwrap();

    let lines = buffer.lines();
    assert_eq!(lines[0]["entry"]["port"], 443);
    assert_eq!(lines[0]["entry"]["id"], "svc");
    assert_eq!(lines[0]["previous"]["port"], 80);
}

#[test]
fn log_listener_reports_name() {
    let listener = LogListener::new(SharedBuffer::new());
    assert_eq!(listener.name(), "log");
    let renamed = LogListener::new(SharedBuffer::new()).named("audit");
    assert_eq!(renamed.name(), "audit");
}

// ============================================================================
// SECTION: Failure Paths
// ============================================================================

#[test]
fn log_listener_maps_write_errors() {
    let listener = LogListener::new(FailingWriter);
    let result = listener.on_create(&sample_entry("svc", 80));
    assert!(matches!(result, Err(ListenerError::LogWriteFailed(_))));
}

#[test]
fn failing_log_does_not_undo_mutation() {
    let controller = controller_with(Arc::new(LogListener::new(FailingWriter)));
    let id = controller.add(Registration::new(attributes(80))).unwrap();
    assert_eq!(controller.get(&id).unwrap().id, id);
}

// ============================================================================
// SECTION: Controller Integration
// ============================================================================

#[test]
fn controller_mutations_are_logged_in_order() {
    let buffer = SharedBuffer::new();
    let controller = controller_with(Arc::new(LogListener::new(buffer.clone())));
    let id = EntryId::new("gw1/api");

    controller.update(&id, Registration::new(attributes(80))).unwrap();
    controller.update(&id, Registration::new(attributes(81))).unwrap();
    controller.delete(&id).unwrap();

    let events: Vec<String> = buffer
        .lines()
        .iter()
        .map(|line| line["event"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(events, ["create", "update", "delete"]);
}
