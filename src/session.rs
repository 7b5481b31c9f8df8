use web_sys::Storage;

const SESSION_KEY_PREFIX: &str = "cw_session_";

/// Durable per-client session identifier storage over `localStorage`.
///
/// The key is derived from the client identifier so distinct clients on
/// the same browser profile do not collide. A browser with storage
/// disabled degrades to no persistence; this is never surfaced to the
/// user. The widget enforces no expiry.
pub struct SessionStore {
    key: String,
}

impl SessionStore {
    pub fn new(client_id: &str) -> Self {
        Self {
            key: format!("{SESSION_KEY_PREFIX}{client_id}"),
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    fn storage() -> Option<Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// Previously stored session identifier for this client, if any.
    pub fn load(&self) -> Option<String> {
        Self::storage()?.get_item(&self.key).ok()?
    }

    /// Persist the session identifier, overwriting any prior value.
    pub fn save(&self, session_id: &str) {
        let Some(storage) = Self::storage() else {
            log::warn!("chat-widget: local storage unavailable, session will not persist");
            return;
        };
        if storage.set_item(&self.key, session_id).is_err() {
            log::warn!("chat-widget: failed to persist session id");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_scoped_per_client() {
        let a = SessionStore::new("acme");
        let b = SessionStore::new("globex");
        assert_eq!(a.storage_key(), "cw_session_acme");
        assert_eq!(b.storage_key(), "cw_session_globex");
        assert_ne!(a.storage_key(), b.storage_key());
    }
}
