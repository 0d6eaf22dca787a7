//! Durable key-value storage contracts and baseline adapters.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Object-safe boxed future used by [`LocalStore`] async methods.
pub type LocalStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service for durable string-keyed JSON blobs.
///
/// The portal keeps several independent stores in one shared keyspace
/// (window state, user files, custom links, icon positions), so
/// implementations must not assume exclusive ownership of the namespace.
pub trait LocalStore {
    /// Loads the raw JSON string stored under `key`.
    fn load_item<'a>(
        &'a self,
        key: &'a str,
    ) -> LocalStoreFuture<'a, Result<Option<String>, String>>;

    /// Stores a raw JSON string under `key`, replacing any prior value.
    fn store_item<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> LocalStoreFuture<'a, Result<(), String>>;

    /// Removes the value stored under `key`.
    fn remove_item<'a>(&'a self, key: &'a str) -> LocalStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op store for unsupported targets and baseline tests.
pub struct NoopLocalStore;

impl LocalStore for NoopLocalStore {
    fn load_item<'a>(
        &'a self,
        _key: &'a str,
    ) -> LocalStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn store_item<'a>(
        &'a self,
        _key: &'a str,
        _raw_json: &'a str,
    ) -> LocalStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn remove_item<'a>(&'a self, _key: &'a str) -> LocalStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory store keyed by string, shared across clones.
pub struct MemoryLocalStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl LocalStore for MemoryLocalStore {
    fn load_item<'a>(
        &'a self,
        key: &'a str,
    ) -> LocalStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { Ok(self.inner.borrow().get(key).cloned()) })
    }

    fn store_item<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> LocalStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .insert(key.to_string(), raw_json.to_string());
            Ok(())
        })
    }

    fn remove_item<'a>(&'a self, key: &'a str) -> LocalStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().remove(key);
            Ok(())
        })
    }
}

/// Loads and deserializes a typed value through a [`LocalStore`] implementation.
///
/// # Errors
///
/// Returns an error when the store or JSON deserialization fails.
pub async fn load_item_typed<S: LocalStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load_item(key).await? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    Ok(Some(value))
}

/// Serializes and stores a typed value through a [`LocalStore`] implementation.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub async fn store_item_typed<S: LocalStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.store_item(key, &raw).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct StoredThing {
        pinned: bool,
    }

    #[test]
    fn memory_store_round_trip_and_remove() {
        let store = MemoryLocalStore::default();
        let store_obj: &dyn LocalStore = &store;

        block_on(store_obj.store_item("portal.key", "{\"k\":1}")).expect("store");
        assert_eq!(
            block_on(store_obj.load_item("portal.key")).expect("load"),
            Some("{\"k\":1}".to_string())
        );
        block_on(store_obj.remove_item("portal.key")).expect("remove");
        assert_eq!(
            block_on(store_obj.load_item("portal.key")).expect("load"),
            None
        );
    }

    #[test]
    fn memory_store_clones_share_state() {
        let store = MemoryLocalStore::default();
        let clone = store.clone();
        block_on(store.store_item("shared", "1")).expect("store");
        assert_eq!(
            block_on(clone.load_item("shared")).expect("load"),
            Some("1".to_string())
        );
    }

    #[test]
    fn typed_helpers_round_trip() {
        let store = MemoryLocalStore::default();
        let store_obj: &dyn LocalStore = &store;
        block_on(store_item_typed(
            store_obj,
            "portal.thing",
            &StoredThing { pinned: true },
        ))
        .expect("store typed value");

        let loaded: Option<StoredThing> =
            block_on(load_item_typed(store_obj, "portal.thing")).expect("load typed value");
        assert_eq!(loaded, Some(StoredThing { pinned: true }));
    }

    #[test]
    fn typed_load_rejects_malformed_json() {
        let store = MemoryLocalStore::default();
        block_on(store.store_item("portal.bad", "not json")).expect("store");
        let result: Result<Option<StoredThing>, String> =
            block_on(load_item_typed(&store, "portal.bad"));
        assert!(result.is_err());
    }

    #[test]
    fn noop_store_is_empty_and_successful() {
        let store = NoopLocalStore;
        let store_obj: &dyn LocalStore = &store;
        assert_eq!(block_on(store_obj.load_item("k")).expect("load"), None);
        block_on(store_obj.store_item("k", "{}")).expect("store");
        block_on(store_obj.remove_item("k")).expect("remove");
    }
}
