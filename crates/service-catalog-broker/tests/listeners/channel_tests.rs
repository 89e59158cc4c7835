// crates/service-catalog-broker/tests/listeners/channel_tests.rs
// ============================================================================
// Module: ChannelListener Tests
// Description: Tests for the bounded channel listener.
// ============================================================================

use std::sync::Arc;

use service_catalog_broker::CatalogEvent;
use service_catalog_broker::ChannelListener;
use service_catalog_core::LifecycleKind;
use service_catalog_core::Listener;
use service_catalog_core::ListenerError;
use service_catalog_core::Registration;
use tokio::sync::mpsc;

use super::common::attributes;
use super::common::controller_with;
use super::common::sample_entry;

#[test]
fn channel_listener_enqueues_events() {
    let (sender, mut receiver) = mpsc::channel(4);
    let listener = ChannelListener::new(sender);
    let first = sample_entry("svc", 80);
    let second = sample_entry("svc", 81);

    listener.on_create(&first).unwrap();
    listener.on_update(&first, &second).unwrap();

    assert_eq!(receiver.try_recv().unwrap(), CatalogEvent::created(&first));
    let update = receiver.try_recv().unwrap();
    assert_eq!(update.kind, LifecycleKind::Update);
    assert_eq!(update.entry, second);
    assert_eq!(update.previous, Some(first));
    assert!(receiver.try_recv().is_err());
}

#[test]
fn channel_listener_fails_when_full() {
    let (sender, _receiver) = mpsc::channel(1);
    let listener = ChannelListener::with_name(sender, "pubsub");
    let entry = sample_entry("svc", 80);

    listener.on_create(&entry).unwrap();
    let result = listener.on_delete(&entry);

    assert!(matches!(result, Err(ListenerError::DeliveryFailed(_))));
    assert_eq!(listener.name(), "pubsub");
}

#[test]
fn channel_listener_fails_when_receiver_dropped() {
    let (sender, receiver) = mpsc::channel(1);
    drop(receiver);
    let listener = ChannelListener::new(sender);
    let result = listener.on_create(&sample_entry("svc", 80));
    assert!(matches!(result, Err(ListenerError::DeliveryFailed(_))));
}

#[tokio::test]
async fn channel_listener_feeds_async_consumer() {
    let (sender, mut receiver) = mpsc::channel(8);
    let controller = controller_with(Arc::new(ChannelListener::new(sender)));

    let id = controller.add(Registration::new(attributes(80))).unwrap();
    controller.delete(&id).unwrap();

    let created = receiver.recv().await.unwrap();
    assert_eq!(created.kind, LifecycleKind::Create);
    assert_eq!(created.id, id);
    let deleted = receiver.recv().await.unwrap();
    assert_eq!(deleted.kind, LifecycleKind::Delete);
    assert_eq!(deleted.entry.attribute("port"), Some(&serde_json::json!(80)));
}

#[test]
fn full_channel_does_not_block_mutations() {
    let (sender, _receiver) = mpsc::channel(1);
    let controller = controller_with(Arc::new(ChannelListener::new(sender)));
    for port in 0 .. 5 {
        controller.add(Registration::new(attributes(port))).unwrap();
    }
    assert_eq!(controller.list(1, 10).unwrap().total, 5);
}
