use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use shared::{encode_points, parse_points, Point3, ZONE_POINT_COUNT};

use super::RemoteSync;
use crate::error::ZoneError;

#[derive(Debug, Default)]
struct Inner {
    payload: Mutex<Option<String>>,
    fail_publish: AtomicBool,
    fail_download: AtomicBool,
    publishes: AtomicUsize,
    downloads: AtomicUsize,
}

/// In-process zone store. Payloads go through the text codec so the
/// round trip matches the HTTP store. Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct MemoryRemote {
    inner: Arc<Inner>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with a raw text payload
    pub fn with_payload(payload: impl Into<String>) -> Self {
        let remote = Self::new();
        remote.set_payload(payload);
        remote
    }

    pub fn set_payload(&self, payload: impl Into<String>) {
        if let Ok(mut slot) = self.inner.payload.lock() {
            *slot = Some(payload.into());
        }
    }

    /// Last published or preloaded payload
    pub fn payload(&self) -> Option<String> {
        self.inner.payload.lock().ok().and_then(|slot| slot.clone())
    }

    pub fn set_fail_publish(&self, fail: bool) {
        self.inner.fail_publish.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_download(&self, fail: bool) {
        self.inner.fail_download.store(fail, Ordering::SeqCst);
    }

    /// Publish calls seen, failed ones included
    pub fn publish_count(&self) -> usize {
        self.inner.publishes.load(Ordering::SeqCst)
    }

    pub fn download_count(&self) -> usize {
        self.inner.downloads.load(Ordering::SeqCst)
    }
}

impl RemoteSync for MemoryRemote {
    async fn publish(&self, points: [Point3; ZONE_POINT_COUNT]) -> Result<(), ZoneError> {
        self.inner.publishes.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_publish.load(Ordering::SeqCst) {
            return Err(ZoneError::network("memory store rejected upload"));
        }
        self.set_payload(encode_points(&points));
        Ok(())
    }

    async fn download(&self) -> Result<Vec<Point3>, ZoneError> {
        self.inner.downloads.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_download.load(Ordering::SeqCst) {
            return Err(ZoneError::network("memory store unreachable"));
        }
        let payload = self
            .payload()
            .ok_or_else(|| ZoneError::network("no zone published"))?;
        Ok(parse_points(&payload)?)
    }
}
