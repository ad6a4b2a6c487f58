//! `localStorage` and wall clock for the leaderboard

use game_core::store::{Clock, KeyValueStore, StoreError};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// Key-value store over `window.localStorage`
///
/// Private browsing and sandboxed frames can deny storage; every operation
/// then reports `Unavailable` and the leaderboard degrades to empty.
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("Storage: localStorage unavailable, scores will not persist");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StoreError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("localStorage".to_string()))
    }
}

fn describe(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StoreError::Read(describe(e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StoreError::Write(describe(e)))
    }
}

/// Epoch milliseconds from `Date.now()`
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}
