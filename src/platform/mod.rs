//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall clock (ms) that drives deferred transitions
//! - Run seeds
//! - Storage (LocalStorage on web, in-memory elsewhere)

use crate::persistence::SnapshotStore;

/// Milliseconds since an arbitrary origin, never decreasing within a run
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> u64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    ORIGIN.get_or_init(Instant::now).elapsed().as_millis() as u64
}

/// Seed for a new run
#[cfg(target_arch = "wasm32")]
pub fn run_seed() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub fn run_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// The platform's persistent store
#[cfg(target_arch = "wasm32")]
pub fn open_store() -> impl SnapshotStore {
    crate::persistence::LocalStore::open()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn open_store() -> impl SnapshotStore {
    crate::persistence::MemoryStore::new()
}
