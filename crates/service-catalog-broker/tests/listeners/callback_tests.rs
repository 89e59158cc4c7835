// crates/service-catalog-broker/tests/listeners/callback_tests.rs
// ============================================================================
// Module: CallbackListener Tests
// Description: Tests for the synchronous callback listener.
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use service_catalog_broker::CallbackListener;
use service_catalog_core::EntryId;
use service_catalog_core::LifecycleKind;
use service_catalog_core::Listener;
use service_catalog_core::ListenerError;
use service_catalog_core::Registration;

use super::common::attributes;
use super::common::controller_with;
use super::common::sample_entry;

#[test]
fn callback_listener_invokes_handler() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let listener = CallbackListener::new("recorder", move |event| {
        sink.lock().unwrap().push((event.kind, event.id.to_string()));
        Ok(())
    });

    let entry = sample_entry("a/b", 80);
    listener.on_create(&entry).unwrap();
    listener.on_delete(&entry).unwrap();

    assert_eq!(listener.name(), "recorder");
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(LifecycleKind::Create, "a/b".to_string()), (LifecycleKind::Delete, "a/b".to_string())]
    );
}

#[test]
fn callback_listener_propagates_handler_error() {
    let listener = CallbackListener::new("rejecting", |_event| {
        Err(ListenerError::DeliveryFailed("downstream unavailable".to_string()))
    });
    let result = listener.on_create(&sample_entry("svc", 80));
    assert_eq!(result, Err(ListenerError::DeliveryFailed("downstream unavailable".to_string())));
}

#[test]
fn callback_sees_committed_state() {
    let observed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&observed);
    let controller = controller_with(Arc::new(CallbackListener::new("observer", move |event| {
        sink.lock().unwrap().push(event.clone());
        Ok(())
    })));
    let id = EntryId::new("svc");

    controller.update(&id, Registration::new(attributes(80))).unwrap();
    controller.update(&id, Registration::new(attributes(90))).unwrap();

    let events = observed.lock().unwrap();
    assert_eq!(events.len(), 2);
    let update = &events[1];
    assert_eq!(update.kind, LifecycleKind::Update);
    assert_eq!(update.previous.as_ref().unwrap().attribute("port"), Some(&serde_json::json!(80)));
    assert_eq!(update.entry.attribute("port"), Some(&serde_json::json!(90)));
    assert_eq!(update.entry.created_at, update.previous.as_ref().unwrap().created_at);
    drop(events);
}

#[test]
fn panicking_callback_is_isolated() {
    let controller = controller_with(Arc::new(CallbackListener::new("panicky", |_event| {
        panic!("listener bug");
    })));
    let id = controller.add(Registration::new(attributes(80))).unwrap();
    controller.delete(&id).unwrap();
    assert_eq!(controller.list(1, 10).unwrap().total, 0);
}
