//! Save/load of the session snapshot
//!
//! One JSON record under a fixed key, overwritten on every save. There is no
//! schema version: serde defaults let older or partial records load, and
//! anything unreadable is discarded in favour of a fresh session.

pub mod store;

#[cfg(target_arch = "wasm32")]
pub use store::LocalStore;
pub use store::{MemoryStore, PersistError, SnapshotStore};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::consts::SESSION_STORAGE_KEY;
use crate::game::Session;

/// Serialize `value` as JSON under `key`
pub fn write_json<S, T>(store: &mut S, key: &str, value: &T) -> Result<(), PersistError>
where
    S: SnapshotStore + ?Sized,
    T: Serialize,
{
    let json = serde_json::to_string(value)?;
    store.write(key, &json)
}

/// Read JSON under `key`; absent, unreadable or malformed records are `None`
pub fn read_json<S, T>(store: &S, key: &str) -> Option<T>
where
    S: SnapshotStore + ?Sized,
    T: DeserializeOwned,
{
    let json = match store.read(key) {
        Ok(Some(json)) => json,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Could not read '{}': {}", key, e);
            return None;
        }
    };
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Discarding malformed '{}': {}", key, e);
            None
        }
    }
}

/// Overwrite the saved session
pub fn save<S: SnapshotStore + ?Sized>(store: &mut S, session: &Session) -> Result<(), PersistError> {
    write_json(store, SESSION_STORAGE_KEY, session)?;
    log::debug!(
        "Session saved (planet {}, score {})",
        session.current_stage,
        session.score
    );
    Ok(())
}

/// Load the saved session, if there is a usable one
pub fn load<S: SnapshotStore + ?Sized>(store: &S) -> Option<Session> {
    let session = read_json::<_, Session>(store, SESSION_STORAGE_KEY)?.repaired()?;
    log::info!(
        "Loaded saved session for {} (planet {}, score {})",
        session.pilot_name,
        session.current_stage,
        session.score
    );
    Some(session)
}

/// Erase the saved session
pub fn clear<S: SnapshotStore + ?Sized>(store: &mut S) -> Result<(), PersistError> {
    store.remove(SESSION_STORAGE_KEY)?;
    log::info!("Saved session cleared");
    Ok(())
}
