//! GC Manager
//!
//! Drives background sweeps of registered expiration lists. Every list gets
//! its own sweeper task, and each sweep runs on the blocking pool, so a slow
//! eviction callback on one list never holds back the others.
//!
//! Sweepers run on a small runtime owned by the manager, so lists can be
//! registered from any thread and outlive the caller's runtime.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::cache::unix_time;
use crate::error::{CacheError, Result};
use crate::expires::ExpiresList;

/// Default sweep interval of the shared manager.
pub const DEFAULT_GC_INTERVAL: Duration = Duration::from_secs(1);

const MIN_GC_INTERVAL: Duration = Duration::from_millis(10);

static SHARED_MANAGER: OnceLock<GcManager> = OnceLock::new();

// == GC Manager ==
/// Registry of expiration lists with one sweeper task per list.
pub struct GcManager {
    interval: Duration,
    /// Built on first registration
    runtime: Mutex<Option<Runtime>>,
    sweepers: Mutex<HashMap<u64, JoinHandle<()>>>,
}

impl GcManager {
    // == Constructor ==
    /// Creates a manager ticking every `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_GC_INTERVAL),
            runtime: Mutex::new(None),
            sweepers: Mutex::new(HashMap::new()),
        }
    }

    /// Process-wide manager. Uses [`DEFAULT_GC_INTERVAL`] unless
    /// [`GcManager::init_shared`] ran first.
    pub fn shared() -> &'static GcManager {
        Self::init_shared(DEFAULT_GC_INTERVAL)
    }

    /// Process-wide manager ticking every `interval`. The interval only
    /// applies if the shared manager does not exist yet.
    pub fn init_shared(interval: Duration) -> &'static GcManager {
        SHARED_MANAGER.get_or_init(|| GcManager::new(interval))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    // == Add ==
    /// Registers a list for background sweeping. Safe to call from any
    /// thread, inside or outside a tokio runtime.
    ///
    /// Returns `Ok(false)` if the list was already registered.
    pub fn add(&self, list: Arc<ExpiresList>) -> Result<bool> {
        let mut sweepers = self.sweepers.lock();
        if sweepers.contains_key(&list.id()) {
            return Ok(false);
        }

        let handle = self.runtime_handle()?;
        let id = list.id();
        sweepers.insert(id, spawn_sweeper(&handle, list, self.interval));
        info!(list = id, interval_ms = self.interval.as_millis() as u64, "expiration list registered");
        Ok(true)
    }

    fn runtime_handle(&self) -> Result<Handle> {
        let mut runtime = self.runtime.lock();
        if let Some(runtime) = runtime.as_ref() {
            return Ok(runtime.handle().clone());
        }

        let built = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("expires-gc")
            .enable_time()
            .build()
            .map_err(|e| CacheError::Internal(format!("failed to start expiration runtime: {}", e)))?;
        let handle = built.handle().clone();
        *runtime = Some(built);
        Ok(handle)
    }

    // == Remove ==
    /// Stops sweeping the list with the given id.
    pub fn remove(&self, list_id: u64) -> bool {
        match self.sweepers.lock().remove(&list_id) {
            Some(sweeper) => {
                sweeper.abort();
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, list_id: u64) -> bool {
        self.sweepers.lock().contains_key(&list_id)
    }

    pub fn len(&self) -> usize {
        self.sweepers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sweepers.lock().is_empty()
    }

    // == Shutdown ==
    /// Aborts every sweeper. Sweeps already running on the blocking pool
    /// finish. Lists may be registered again afterwards.
    pub fn shutdown(&self) {
        let sweepers: Vec<_> = self.sweepers.lock().drain().collect();
        for (_, sweeper) in sweepers {
            sweeper.abort();
        }
    }
}

impl Drop for GcManager {
    fn drop(&mut self) {
        self.shutdown();
        // Must not block: the manager may be dropped inside another runtime
        if let Some(runtime) = self.runtime.lock().take() {
            runtime.shutdown_background();
        }
    }
}

impl std::fmt::Debug for GcManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcManager")
            .field("interval", &self.interval)
            .field("lists", &self.len())
            .finish()
    }
}

fn spawn_sweeper(handle: &Handle, list: Arc<ExpiresList>, interval: Duration) -> JoinHandle<()> {
    handle.spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let now = unix_time();
            let target = list.clone();
            match tokio::task::spawn_blocking(move || target.sweep(now)).await {
                Ok(0) => {}
                Ok(removed) => debug!(list = list.id(), removed, "expiration sweep"),
                Err(e) => warn!(list = list.id(), error = %e, "expiration sweep failed"),
            }
        }
    })
}
