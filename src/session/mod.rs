//! Session lifecycle.
//!
//! A [`Session`] is created once at startup from a [`SessionStore`] and passed
//! to every view that needs the token. Logout goes through
//! [`Session::teardown`]; nothing else reads the store directly.

pub mod store;

pub use store::{SessionStore, TOKEN_KEY};

use crate::error::TaskboardError;
use crate::models::BearerToken;

#[derive(Debug, Clone)]
pub struct Session {
    store: SessionStore,
}

impl Session {
    pub fn init(store: SessionStore) -> Self {
        tracing::debug!(path = %store.path().display(), "session initialized");
        Self { store }
    }

    /// Token for the next call. Read on every access; the decision is never cached.
    pub fn token(&self) -> Option<BearerToken> {
        self.store.get().map(BearerToken::new)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Token or a `NOT_AUTHENTICATED` error.
    pub fn require_token(&self) -> Result<BearerToken, TaskboardError> {
        self.token().ok_or_else(TaskboardError::not_authenticated)
    }

    pub fn establish(&self, token: &str) -> Result<(), TaskboardError> {
        self.store.set(token)
    }

    /// Drops the local token. The backend is not told.
    pub fn teardown(&self) -> Result<(), TaskboardError> {
        self.store.clear()
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}
