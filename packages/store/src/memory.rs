use std::sync::{Arc, Mutex};

use crate::credential::{normalize, TokenStore};

/// In-memory TokenStore for testing and short-lived sessions.
///
/// Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `token`.
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.set(token);
        store
    }
}

impl TokenStore for MemoryStore {
    fn get(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn set(&self, token: &str) {
        *self.token.lock().unwrap() = normalize(token);
    }

    fn clear(&self) {
        self.token.lock().unwrap().take();
    }
}
