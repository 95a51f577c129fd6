use super::session::{reduce, SessionAction, SessionError, SessionState};
use std::sync::Mutex;

/// Fixed key the session snapshot is stored under.
pub const STORAGE_KEY: &str = "blog_generator_state";

/// Persistence port for the session snapshot.
pub trait SessionStore {
    fn load(&self) -> Result<Option<SessionState>, StoreError>;
    fn save(&self, state: &SessionState) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("stored session is corrupt: {0}")]
    Corrupt(String),
}

pub fn encode_state(state: &SessionState) -> Result<String, StoreError> {
    serde_json::to_string(state).map_err(|e| StoreError::Corrupt(e.to_string()))
}

pub fn decode_state(raw: &str) -> Result<SessionState, StoreError> {
    serde_json::from_str(raw).map_err(|e| StoreError::Corrupt(e.to_string()))
}

/// Keeps the encoded snapshot in memory.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, StoreError> {
        self.slot
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionState>, StoreError> {
        self.slot()?.as_deref().map(decode_state).transpose()
    }

    fn save(&self, state: &SessionState) -> Result<(), StoreError> {
        let raw = encode_state(state)?;
        *self.slot()? = Some(raw);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot()? = None;
        Ok(())
    }
}

/// Session state plus the store it is mirrored to. Loads once on
/// construction and saves after every accepted action.
pub struct SessionContainer<S> {
    state: SessionState,
    store: S,
}

impl<S: SessionStore> SessionContainer<S> {
    /// A missing or unreadable snapshot starts a fresh session.
    pub fn load(store: S) -> Self {
        let state = store.load().ok().flatten().unwrap_or_default();
        Self { state, store }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Applies `action`. A rejected action leaves state and store untouched.
    /// A failed save still keeps the new in-memory state.
    pub fn dispatch(&mut self, action: SessionAction) -> Result<&SessionState, SessionError> {
        self.state = reduce(&self.state, action)?;
        self.store.save(&self.state)?;
        Ok(&self.state)
    }

    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.state = SessionState::default();
        self.store.clear()?;
        Ok(())
    }
}
