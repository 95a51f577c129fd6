//! Session persistence for the page. In the browser the snapshot lives in
//! `localStorage`; anywhere else, or when storage is blocked, it is kept in
//! memory for the lifetime of the page.

use blogforge_app::domain::{
    MemorySessionStore, SessionAction, SessionContainer, SessionState, SessionStore, StoreError,
};

pub const INTERRUPTED_MESSAGE: &str = "The previous generation was interrupted.";

#[cfg(feature = "hydrate")]
mod local {
    use blogforge_app::domain::{
        decode_state, encode_state, SessionState, SessionStore, StoreError, STORAGE_KEY,
    };

    pub struct LocalStorageSessionStore {
        storage: web_sys::Storage,
    }

    impl LocalStorageSessionStore {
        pub fn open() -> Result<Self, StoreError> {
            let window =
                web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".into()))?;
            let storage = window
                .local_storage()
                .map_err(|_| StoreError::Unavailable("localStorage access denied".into()))?
                .ok_or_else(|| StoreError::Unavailable("localStorage missing".into()))?;
            Ok(Self { storage })
        }
    }

    impl SessionStore for LocalStorageSessionStore {
        fn load(&self) -> Result<Option<SessionState>, StoreError> {
            let raw = self
                .storage
                .get_item(STORAGE_KEY)
                .map_err(|_| StoreError::Unavailable("read failed".into()))?;
            raw.as_deref().map(decode_state).transpose()
        }

        fn save(&self, state: &SessionState) -> Result<(), StoreError> {
            let raw = encode_state(state)?;
            self.storage
                .set_item(STORAGE_KEY, &raw)
                .map_err(|_| StoreError::Unavailable("write failed (quota?)".into()))
        }

        fn clear(&self) -> Result<(), StoreError> {
            self.storage
                .remove_item(STORAGE_KEY)
                .map_err(|_| StoreError::Unavailable("remove failed".into()))
        }
    }
}

#[cfg(feature = "hydrate")]
pub use local::LocalStorageSessionStore;

/// The store the page's session container writes through.
pub enum BrowserStore {
    #[cfg(feature = "hydrate")]
    Local(LocalStorageSessionStore),
    Memory(MemorySessionStore),
}

impl BrowserStore {
    /// Opens `localStorage` once; falls back to memory when it is missing.
    pub fn open() -> Self {
        #[cfg(feature = "hydrate")]
        match LocalStorageSessionStore::open() {
            Ok(store) => return Self::Local(store),
            Err(e) => leptos::logging::warn!("Session will not survive a reload: {}", e),
        }
        Self::Memory(MemorySessionStore::new())
    }
}

impl SessionStore for BrowserStore {
    fn load(&self) -> Result<Option<SessionState>, StoreError> {
        match self {
            #[cfg(feature = "hydrate")]
            Self::Local(store) => store.load(),
            Self::Memory(store) => store.load(),
        }
    }

    fn save(&self, state: &SessionState) -> Result<(), StoreError> {
        match self {
            #[cfg(feature = "hydrate")]
            Self::Local(store) => store.save(state),
            Self::Memory(store) => store.save(state),
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        match self {
            #[cfg(feature = "hydrate")]
            Self::Local(store) => store.clear(),
            Self::Memory(store) => store.clear(),
        }
    }
}

/// Loads the saved session. A session saved mid-generation has lost its
/// request, so it is moved back to the structure step with an error.
pub fn resume<S: SessionStore>(store: S) -> SessionContainer<S> {
    let mut container = SessionContainer::load(store);
    if container.state().is_generating() {
        if let Err(e) =
            container.dispatch(SessionAction::GenerationFailed(INTERRUPTED_MESSAGE.to_string()))
        {
            leptos::logging::warn!("Could not save recovered session: {}", e);
        }
    }
    container
}
