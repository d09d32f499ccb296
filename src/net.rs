//! Connectivity status, injected rather than ambient.
//!
//! Services ask a [`Connectivity`] provider whether the network is
//! reachable before deciding between the remote call and the cache.
//! The platform's network observer owns the actual detection and flips
//! a [`SharedConnectivity`] from wherever it runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Reports whether the network is currently considered reachable.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Shared flag a network-status observer can flip from another task.
#[derive(Clone)]
pub struct SharedConnectivity {
    online: Arc<AtomicBool>,
}

impl SharedConnectivity {
    pub fn new(initially_online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(initially_online)),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Relaxed);
    }
}

impl Default for SharedConnectivity {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity for SharedConnectivity {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }
}
