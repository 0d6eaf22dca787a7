//! Window-state persistence over the durable store, and reconciliation of
//! stored snapshots against the seeded default window set.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use portal_host::LocalStore;

use crate::model::{
    DesktopState, WindowRecord, WindowsSnapshot, WINDOWS_SNAPSHOT_SCHEMA_VERSION, Z_INDEX_FLOOR,
};

/// Durable-store key holding the serialized window registry.
pub const WINDOWS_STATE_KEY: &str = "portal.windows.v1";

#[derive(Debug, Error)]
/// Failure writing the window registry through to the durable store.
pub enum PersistenceError {
    /// The snapshot could not be serialized to JSON.
    #[error("serialize window snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The durable store rejected the write.
    #[error("store window snapshot: {0}")]
    Store(String),
}

/// Serializes the full window registry and writes it to the durable store.
///
/// Called after every mutating operation (write-through, no batching).
///
/// # Errors
///
/// Returns [`PersistenceError`] when serialization or the store write fails.
pub async fn persist_windows<S: LocalStore + ?Sized>(
    store: &S,
    state: &DesktopState,
) -> Result<(), PersistenceError> {
    let raw = serde_json::to_string(&state.snapshot())?;
    store
        .store_item(WINDOWS_STATE_KEY, &raw)
        .await
        .map_err(PersistenceError::Store)
}

// Lenient mirror of [`WindowsSnapshot`] used only on the load path: records
// are kept as raw values so one unreadable record drops alone instead of
// discarding the whole blob.
#[derive(Deserialize)]
struct StoredSnapshot {
    #[serde(default)]
    schema_version: u32,
    #[serde(default)]
    windows: Vec<Value>,
}

/// Loads the persisted window snapshot, or `None` when the blob is absent,
/// unreadable, or written by a newer schema.
///
/// Corrupt data is never partially trusted at the blob level; callers fall
/// back to the seeded default window set.
pub async fn load_windows_snapshot<S: LocalStore + ?Sized>(store: &S) -> Option<WindowsSnapshot> {
    let raw = match store.load_item(WINDOWS_STATE_KEY).await {
        Ok(raw) => raw?,
        Err(err) => {
            log::warn!("window state load failed: {err}");
            return None;
        }
    };
    let stored: StoredSnapshot = match serde_json::from_str(&raw) {
        Ok(stored) => stored,
        Err(err) => {
            log::warn!("window state blob is corrupt, using defaults: {err}");
            return None;
        }
    };
    if stored.schema_version > WINDOWS_SNAPSHOT_SCHEMA_VERSION {
        log::warn!(
            "window state schema {} is newer than supported {}, using defaults",
            stored.schema_version,
            WINDOWS_SNAPSHOT_SCHEMA_VERSION
        );
        return None;
    }

    let mut windows = Vec::with_capacity(stored.windows.len());
    for raw_record in stored.windows {
        match serde_json::from_value::<WindowRecord>(raw_record) {
            Ok(record) => windows.push(record),
            Err(err) => log::warn!("dropping unreadable stored window record: {err}"),
        }
    }
    Some(WindowsSnapshot {
        schema_version: WINDOWS_SNAPSHOT_SCHEMA_VERSION,
        windows,
    })
}

/// Merges a stored snapshot into `state`, which holds the seeded default
/// window set.
///
/// Per stored record: a record matching a live id patches that window's
/// mutable fields; an unmatched record of a dynamic kind is re-inserted as
/// a live window; anything else is silently dropped. Records never remove
/// seeded windows. Afterwards the z-counter is reseeded to
/// `max(stored max, live max, floor)` so seeded defaults cannot under-seed
/// the counter.
pub fn reconcile_snapshot(state: &mut DesktopState, snapshot: WindowsSnapshot) {
    let stored_max = snapshot
        .windows
        .iter()
        .map(|w| w.z_index)
        .max()
        .unwrap_or(Z_INDEX_FLOOR);

    for stored in snapshot.windows {
        if let Some(window) = state.window_mut(&stored.id) {
            window.x = stored.x;
            window.y = stored.y;
            window.z_index = stored.z_index;
            window.is_open = stored.is_open;
            window.is_minimized = stored.is_minimized;
            window.width = stored.width;
            window.height = stored.height;
            if !stored.icon.is_empty() {
                window.icon = stored.icon;
            }
            if !stored.content.is_null() {
                window.content = stored.content;
            }
        } else if stored.kind.is_dynamic() {
            let mut record = stored;
            if record.icon.is_empty() {
                record.icon = record.kind.icon().to_string();
            }
            state.windows.push(record);
        }
        // Unmatched singleton-kind records are stale; drop them.
    }

    let live_max = state
        .windows
        .iter()
        .map(|w| w.z_index)
        .max()
        .unwrap_or(Z_INDEX_FLOOR);
    state.z_counter = stored_max.max(live_max).max(Z_INDEX_FLOOR);
}
