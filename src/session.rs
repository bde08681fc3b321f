//! Session and identity
//!
//! Single owner of the authenticated identity: mutated only by the auth
//! service (login/logout/refresh), read everywhere through accessors.
//! Exactly two keys are persisted — the bearer token and the cached
//! profile — through a pluggable storage backend.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use crate::models::User;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Two-key persistence backend (the browser original used local storage)
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory storage, the default backend
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

#[derive(Default)]
struct SessionState {
    token: Option<String>,
    user: Option<User>,
}

/// Holder of the current session, hydrated from storage on construction
pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    pub fn new(storage: Box<dyn SessionStorage>) -> Self {
        let token = storage.get(TOKEN_KEY);
        let user = storage.get(USER_KEY).and_then(|json| {
            serde_json::from_str(&json)
                .map_err(|e| tracing::warn!("discarding cached profile: {}", e))
                .ok()
        });
        Self {
            storage,
            state: RwLock::new(SessionState { token, user }),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::default()))
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().ok()?.token.clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.read().ok()?.user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Install a fresh session after login
    pub(crate) fn establish(&self, token: String, user: Option<User>) {
        self.storage.set(TOKEN_KEY, &token);
        match &user {
            Some(user) => self.persist_user(user),
            None => self.storage.remove(USER_KEY),
        }
        if let Ok(mut state) = self.state.write() {
            state.token = Some(token);
            state.user = user;
        }
    }

    /// Replace the cached profile after a refresh
    pub(crate) fn update_user(&self, user: User) {
        self.persist_user(&user);
        if let Ok(mut state) = self.state.write() {
            state.user = Some(user);
        }
    }

    /// Drop the session; always succeeds locally
    pub(crate) fn clear(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
        if let Ok(mut state) = self.state.write() {
            state.token = None;
            state.user = None;
        }
    }

    fn persist_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => self.storage.set(USER_KEY, &json),
            Err(e) => tracing::warn!("failed to cache profile: {}", e),
        }
    }
}
