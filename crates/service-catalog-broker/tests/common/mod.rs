// crates/service-catalog-broker/tests/common/mod.rs
// ============================================================================
// Module: Listener Test Helpers
// Description: Shared fixtures for broker listener tests.
// ============================================================================

use std::io;
use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;

use serde_json::json;
use service_catalog_core::Attributes;
use service_catalog_core::CatalogController;
use service_catalog_core::ControllerConfig;
use service_catalog_core::Entry;
use service_catalog_core::EntryId;
use service_catalog_core::InMemoryStorage;
use service_catalog_core::Listener;
use service_catalog_core::SharedStorage;
use service_catalog_core::Timestamp;

/// Cloneable in-memory writer.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock().unwrap()).into_owned()
    }

    pub fn lines(&self) -> Vec<serde_json::Value> {
        self.to_string_lossy()
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writer that always fails.
pub struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn sample_entry(id: &str, port: u16) -> Entry {
    let mut attributes = Attributes::new();
    attributes.insert("type".to_string(), json!("http"));
    attributes.insert("port".to_string(), json!(port));
    Entry {
        id: EntryId::new(id),
        attributes,
        created_at: Timestamp::from_unix_millis(1_700_000_000_000),
        updated_at: Timestamp::from_unix_millis(1_700_000_000_000 + i64::from(port)),
    }
}

pub fn attributes(port: u16) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert("port".to_string(), json!(port));
    attributes
}

pub fn controller_with(listener: Arc<dyn Listener>) -> CatalogController {
    CatalogController::new(
        SharedStorage::from_storage(InMemoryStorage::new()),
        vec![listener],
        ControllerConfig::default(),
    )
    .unwrap()
}
