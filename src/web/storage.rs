//! localStorage-backed settings.

use web_sys::Storage;

use crate::game::SettingsStore;

/// Boolean flags in `window.localStorage`, stored as `"true"` / `"false"`.
/// Without storage (private mode, sandboxed iframe) flags read false and writes are dropped.
pub struct LocalStorageSettings {
    storage: Option<Storage>,
}

impl LocalStorageSettings {
    pub fn from_window() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage unavailable; settings will not persist");
        }
        Self { storage }
    }
}

/// Only the exact string `"true"` enables a flag.
pub fn parse_flag(raw: Option<&str>) -> bool {
    raw == Some("true")
}

impl SettingsStore for LocalStorageSettings {
    fn get_flag(&self, key: &str) -> bool {
        let raw = self.storage.as_ref().and_then(|s| s.get_item(key).ok().flatten());
        parse_flag(raw.as_deref())
    }

    fn set_flag(&mut self, key: &str, value: bool) {
        let Some(storage) = self.storage.as_ref() else {
            return;
        };
        if let Err(err) = storage.set_item(key, if value { "true" } else { "false" }) {
            log::warn!("Could not persist {key}: {err:?}");
        }
    }
}
