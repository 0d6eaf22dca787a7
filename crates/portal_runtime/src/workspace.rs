//! Sibling durable stores the portal keeps next to window state: saved user
//! files, custom navigation links, and desktop icon positions.
//!
//! Each store persists write-through under its own key and degrades to
//! empty on absent or corrupt data. None of them touch window state.

use std::collections::HashMap;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use portal_host::LocalStore;

use crate::{model::AppKind, persistence::PersistenceError};

/// Durable-store key holding saved user files.
pub const USER_FILES_KEY: &str = "portal.files.v1";
/// Durable-store key holding user-added navigation links.
pub const CUSTOM_LINKS_KEY: &str = "portal.links.v1";
/// Durable-store key holding desktop icon positions.
pub const ICON_POSITIONS_KEY: &str = "portal.icons.v1";

/// A document or drawing saved out of a scratch window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFile {
    pub id: String,
    pub title: String,
    /// Which scratch editor owns the content format.
    pub app: AppKind,
    /// Opaque editor payload, round-tripped verbatim.
    pub content: Value,
    pub saved_at_unix_ms: u64,
}

/// A user-added navigation link shown beside the built-in ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomLink {
    pub name: String,
    pub url: String,
}

/// Desktop icon position, keyed by icon id in [`IconPositions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconPosition {
    pub x: i32,
    pub y: i32,
}

/// Icon-id to position map for desktop shortcuts.
pub type IconPositions = HashMap<String, IconPosition>;

async fn load_collection<S: LocalStore + ?Sized, T: DeserializeOwned + Default>(
    store: &S,
    key: &str,
) -> T {
    match portal_host::load_item_typed(store, key).await {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(err) => {
            log::warn!("stored collection {key} is unreadable, starting empty: {err}");
            T::default()
        }
    }
}

async fn persist_collection<S: LocalStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), PersistenceError> {
    let raw = serde_json::to_string(value)?;
    store
        .store_item(key, &raw)
        .await
        .map_err(PersistenceError::Store)
}

/// Loads saved user files; empty when absent or unreadable.
pub async fn load_user_files<S: LocalStore + ?Sized>(store: &S) -> Vec<UserFile> {
    load_collection(store, USER_FILES_KEY).await
}

/// Writes the user-file list through to the durable store.
///
/// # Errors
///
/// Returns [`PersistenceError`] when serialization or the store write fails.
pub async fn persist_user_files<S: LocalStore + ?Sized>(
    store: &S,
    files: &[UserFile],
) -> Result<(), PersistenceError> {
    persist_collection(store, USER_FILES_KEY, &files).await
}

/// Adds `file`, replacing any saved file with the same id.
pub fn upsert_user_file(files: &mut Vec<UserFile>, file: UserFile) {
    match files.iter_mut().find(|f| f.id == file.id) {
        Some(existing) => *existing = file,
        None => files.push(file),
    }
}

/// Removes the file with `id`. Returns whether anything was removed.
pub fn delete_user_file(files: &mut Vec<UserFile>, id: &str) -> bool {
    let before = files.len();
    files.retain(|f| f.id != id);
    files.len() != before
}

/// Retitles the file with `id`. Returns whether a file was found.
pub fn rename_user_file(files: &mut [UserFile], id: &str, title: &str) -> bool {
    match files.iter_mut().find(|f| f.id == id) {
        Some(file) => {
            file.title = title.to_string();
            true
        }
        None => false,
    }
}

/// Loads custom navigation links; empty when absent or unreadable.
pub async fn load_custom_links<S: LocalStore + ?Sized>(store: &S) -> Vec<CustomLink> {
    load_collection(store, CUSTOM_LINKS_KEY).await
}

/// Writes the custom-link list through to the durable store.
///
/// # Errors
///
/// Returns [`PersistenceError`] when serialization or the store write fails.
pub async fn persist_custom_links<S: LocalStore + ?Sized>(
    store: &S,
    links: &[CustomLink],
) -> Result<(), PersistenceError> {
    persist_collection(store, CUSTOM_LINKS_KEY, &links).await
}

/// Prefixes `https://` onto links entered without a scheme.
pub fn normalize_link_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Appends a link with a normalized url. Empty names or urls are rejected.
pub fn add_custom_link(links: &mut Vec<CustomLink>, name: &str, url: &str) -> bool {
    if name.is_empty() || url.is_empty() {
        return false;
    }
    links.push(CustomLink {
        name: name.to_string(),
        url: normalize_link_url(url),
    });
    true
}

/// Removes the link at `index`. Returns whether the index was in range.
pub fn remove_custom_link(links: &mut Vec<CustomLink>, index: usize) -> bool {
    if index < links.len() {
        links.remove(index);
        true
    } else {
        false
    }
}

/// Loads desktop icon positions; empty when absent or unreadable.
pub async fn load_icon_positions<S: LocalStore + ?Sized>(store: &S) -> IconPositions {
    load_collection(store, ICON_POSITIONS_KEY).await
}

/// Writes the icon-position map through to the durable store.
///
/// # Errors
///
/// Returns [`PersistenceError`] when serialization or the store write fails.
pub async fn persist_icon_positions<S: LocalStore + ?Sized>(
    store: &S,
    positions: &IconPositions,
) -> Result<(), PersistenceError> {
    persist_collection(store, ICON_POSITIONS_KEY, positions).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use portal_host::MemoryLocalStore;
    use serde_json::json;

    use super::*;

    fn sample_file(id: &str, title: &str) -> UserFile {
        UserFile {
            id: id.to_string(),
            title: title.to_string(),
            app: AppKind::Notepad,
            content: json!("hello"),
            saved_at_unix_ms: portal_host::next_monotonic_timestamp_ms(),
        }
    }

    #[test]
    fn user_files_round_trip_and_mutate() {
        let store = MemoryLocalStore::default();
        let mut files = Vec::new();

        upsert_user_file(&mut files, sample_file("f1", "notes"));
        upsert_user_file(&mut files, sample_file("f2", "sketch"));
        assert!(rename_user_file(&mut files, "f1", "todo list"));
        assert!(!rename_user_file(&mut files, "missing", "x"));

        // Re-saving an existing id replaces it rather than duplicating.
        upsert_user_file(&mut files, sample_file("f2", "sketch v2"));
        assert_eq!(files.len(), 2);

        block_on(persist_user_files(&store, &files)).expect("persist");
        let loaded = block_on(load_user_files(&store));
        assert_eq!(loaded, files);

        let mut loaded = loaded;
        assert!(delete_user_file(&mut loaded, "f1"));
        assert!(!delete_user_file(&mut loaded, "f1"));
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "sketch v2");
    }

    #[test]
    fn custom_links_normalize_urls_and_remove_by_index() {
        let store = MemoryLocalStore::default();
        let mut links = Vec::new();

        assert!(add_custom_link(&mut links, "Example", "example.com"));
        assert!(add_custom_link(&mut links, "Secure", "https://secure.example"));
        assert!(!add_custom_link(&mut links, "", "example.com"));
        assert_eq!(links[0].url, "https://example.com");
        assert_eq!(links[1].url, "https://secure.example");

        block_on(persist_custom_links(&store, &links)).expect("persist");
        let mut loaded = block_on(load_custom_links(&store));
        assert_eq!(loaded, links);

        assert!(remove_custom_link(&mut loaded, 0));
        assert!(!remove_custom_link(&mut loaded, 5));
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Secure");
    }

    #[test]
    fn icon_positions_round_trip_per_id() {
        let store = MemoryLocalStore::default();
        let mut positions = IconPositions::default();
        positions.insert("notepad".to_string(), IconPosition { x: 16, y: 96 });
        positions.insert("paint".to_string(), IconPosition { x: 16, y: 192 });

        block_on(persist_icon_positions(&store, &positions)).expect("persist");
        assert_eq!(block_on(load_icon_positions(&store)), positions);
    }

    #[test]
    fn unreadable_collections_start_empty() {
        let store = MemoryLocalStore::default();
        block_on(store.store_item(USER_FILES_KEY, "][")).expect("seed");
        assert_eq!(block_on(load_user_files(&store)), Vec::new());
        assert_eq!(block_on(load_custom_links(&store)), Vec::new());
    }
}
