use std::cell::RefCell;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use crate::cookie::{build_cookie, decode_muted, encode_muted, find_cookie};
#[cfg(target_arch = "wasm32")]
use crate::options::{ControllerOptions, MuteStorage};
#[cfg(target_arch = "wasm32")]
use gloo_storage::{errors::StorageError, LocalStorage, Storage};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use web_sys::HtmlDocument;

/// Error type for mute flag persistence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("no browser document available")]
    NoDocument,
    #[error("cookie access failed: {0}")]
    Cookie(String),
    #[error("local storage access failed: {0}")]
    Storage(String),
}

/// Persists the global mute flag across sessions.
pub trait MuteStore {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<bool>, StoreError>;
    fn save(&mut self, muted: bool) -> Result<(), StoreError>;
}

/// In-process store. Clones share the same slot, so a caller can keep a
/// clone to observe what the controller wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryMuteStore {
    value: Rc<RefCell<Option<bool>>>,
}

impl MemoryMuteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(muted: bool) -> Self {
        Self {
            value: Rc::new(RefCell::new(Some(muted))),
        }
    }

    pub fn stored(&self) -> Option<bool> {
        *self.value.borrow()
    }
}

impl MuteStore for MemoryMuteStore {
    fn load(&self) -> Result<Option<bool>, StoreError> {
        Ok(self.stored())
    }

    fn save(&mut self, muted: bool) -> Result<(), StoreError> {
        *self.value.borrow_mut() = Some(muted);
        Ok(())
    }
}

/// Mute flag stored as a `"1"`/`"0"` cookie.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct CookieMuteStore {
    key: String,
    days: u32,
}

#[cfg(target_arch = "wasm32")]
impl CookieMuteStore {
    pub fn new(key: impl Into<String>, days: u32) -> Self {
        Self {
            key: key.into(),
            days,
        }
    }

    fn document() -> Result<HtmlDocument, StoreError> {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|doc| doc.dyn_into::<HtmlDocument>().ok())
            .ok_or(StoreError::NoDocument)
    }
}

#[cfg(target_arch = "wasm32")]
impl MuteStore for CookieMuteStore {
    fn load(&self) -> Result<Option<bool>, StoreError> {
        let cookies = Self::document()?
            .cookie()
            .map_err(|e| StoreError::Cookie(format!("{e:?}")))?;
        Ok(find_cookie(&cookies, &self.key).and_then(decode_muted))
    }

    fn save(&mut self, muted: bool) -> Result<(), StoreError> {
        let cookie = build_cookie(&self.key, encode_muted(muted), self.days, chrono::Utc::now());
        Self::document()?
            .set_cookie(&cookie)
            .map_err(|e| StoreError::Cookie(format!("{e:?}")))
    }
}

/// Mute flag stored in `localStorage`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorageMuteStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageMuteStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

#[cfg(target_arch = "wasm32")]
impl MuteStore for LocalStorageMuteStore {
    fn load(&self) -> Result<Option<bool>, StoreError> {
        match LocalStorage::get::<String>(&self.key) {
            Ok(value) => Ok(decode_muted(&value)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(e) => Err(StoreError::Storage(e.to_string())),
        }
    }

    fn save(&mut self, muted: bool) -> Result<(), StoreError> {
        LocalStorage::set(&self.key, encode_muted(muted))
            .map_err(|e| StoreError::Storage(e.to_string()))
    }
}

/// Browser store selected by [`ControllerOptions::mute_storage`].
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub enum WebMuteStore {
    Cookie(CookieMuteStore),
    LocalStorage(LocalStorageMuteStore),
}

#[cfg(target_arch = "wasm32")]
impl WebMuteStore {
    pub fn from_options(options: &ControllerOptions) -> Self {
        match options.mute_storage {
            MuteStorage::Cookie => {
                Self::Cookie(CookieMuteStore::new(options.mute_key(), options.mute_cookie_days))
            }
            MuteStorage::LocalStorage => {
                Self::LocalStorage(LocalStorageMuteStore::new(options.mute_key()))
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl MuteStore for WebMuteStore {
    fn load(&self) -> Result<Option<bool>, StoreError> {
        match self {
            Self::Cookie(store) => store.load(),
            Self::LocalStorage(store) => store.load(),
        }
    }

    fn save(&mut self, muted: bool) -> Result<(), StoreError> {
        match self {
            Self::Cookie(store) => store.save(muted),
            Self::LocalStorage(store) => store.save(muted),
        }
    }
}
