use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;
use wayfarer_core::Coordinate;

use crate::error::LocationError;

#[derive(Debug, Clone, PartialEq)]
pub enum LocationUpdate {
    Fix(Coordinate),
    Error(LocationError),
}

/// Identifies one `watch` subscription.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct WatchHandle(u64);

/// Source of the device position.
///
/// Updates from `watch` go to the given channel until `unwatch` is called
/// with the returned handle.
#[async_trait]
pub trait LocationTracker: Send + Sync {
    async fn get_once(&self) -> Result<Coordinate, LocationError>;

    fn watch(&self, updates: UnboundedSender<LocationUpdate>) -> WatchHandle;

    fn unwatch(&self, handle: WatchHandle);
}

/// A tracker that always reports the same fix, or none at all.
#[derive(Debug, Clone, Default)]
pub struct FixedLocationTracker {
    position: Option<Coordinate>,
}

impl FixedLocationTracker {
    pub fn new(position: Option<Coordinate>) -> Self {
        Self { position }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocationTracker for FixedLocationTracker {
    async fn get_once(&self) -> Result<Coordinate, LocationError> {
        self.position.ok_or(LocationError::Unavailable)
    }

    fn watch(&self, updates: UnboundedSender<LocationUpdate>) -> WatchHandle {
        if let Some(position) = self.position {
            if updates.send(LocationUpdate::Fix(position)).is_err() {
                debug!("Location watcher closed before the first fix");
            }
        }
        WatchHandle(0)
    }

    fn unwatch(&self, _handle: WatchHandle) {}
}

#[derive(Default)]
struct ManualTrackerInner {
    last: Option<Result<Coordinate, LocationError>>,
    watchers: HashMap<WatchHandle, UnboundedSender<LocationUpdate>>,
    next_handle: u64,
}

/// A tracker fed by its host, e.g. a GPS daemon or a test.
///
/// Every pushed fix is fanned out to the current watchers and remembered for
/// `get_once`.
#[derive(Default)]
pub struct ManualLocationTracker {
    inner: Mutex<ManualTrackerInner>,
}

impl ManualLocationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_fix(&self, position: Coordinate) {
        let mut inner = self.inner.lock();
        inner.last = Some(Ok(position));
        broadcast(&mut inner.watchers, LocationUpdate::Fix(position));
    }

    pub fn push_error(&self, error: LocationError) {
        let mut inner = self.inner.lock();
        inner.last = Some(Err(error.clone()));
        broadcast(&mut inner.watchers, LocationUpdate::Error(error));
    }

    pub fn watcher_count(&self) -> usize {
        self.inner.lock().watchers.len()
    }
}

fn broadcast(
    watchers: &mut HashMap<WatchHandle, UnboundedSender<LocationUpdate>>,
    update: LocationUpdate,
) {
    // Drop watchers whose receiver is gone
    watchers.retain(|handle, sender| {
        let delivered = sender.send(update.clone()).is_ok();
        if !delivered {
            debug!("Dropping closed location watcher {:?}", handle);
        }
        delivered
    });
}

#[async_trait]
impl LocationTracker for ManualLocationTracker {
    async fn get_once(&self) -> Result<Coordinate, LocationError> {
        self.inner
            .lock()
            .last
            .clone()
            .unwrap_or(Err(LocationError::Unavailable))
    }

    fn watch(&self, updates: UnboundedSender<LocationUpdate>) -> WatchHandle {
        let mut inner = self.inner.lock();
        inner.next_handle += 1;
        let handle = WatchHandle(inner.next_handle);

        if let Some(Ok(position)) = &inner.last {
            if updates.send(LocationUpdate::Fix(*position)).is_err() {
                debug!("Location watcher {:?} closed before the first fix", handle);
                return handle;
            }
        }

        inner.watchers.insert(handle, updates);
        handle
    }

    fn unwatch(&self, handle: WatchHandle) {
        self.inner.lock().watchers.remove(&handle);
    }
}
