//! Session-backed cart store.
//!
//! [`boutique_core::CartStore`] is synchronous while session access is async,
//! so a request snapshots the stored cart up front, runs the cart service
//! against the snapshot, and flushes the last written value afterwards.

use boutique_core::{CART_STORAGE_KEY, CartService, CartStore, StoreError};
use tower_sessions::Session;
use tracing::warn;

use crate::middleware::CART_SESSION_KEY;

/// A [`CartStore`] over one request's session.
#[derive(Debug, Default)]
pub struct SessionCartStore {
    stored: Option<String>,
    read_error: Option<String>,
    written: Option<String>,
}

impl SessionCartStore {
    /// Snapshot the cart currently held by `session`.
    ///
    /// A session read failure is kept and reported on the first
    /// [`CartStore::load`], so the cart service treats it like any
    /// other unreadable store.
    pub async fn load(session: &Session) -> Self {
        match session.get::<String>(CART_SESSION_KEY).await {
            Ok(stored) => Self {
                stored,
                ..Self::default()
            },
            Err(e) => Self {
                read_error: Some(e.to_string()),
                ..Self::default()
            },
        }
    }

    /// Whether the cart service wrote anything.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.written.is_some()
    }

    /// Write the pending cart back to `session`. Does nothing if the cart
    /// service never saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the write.
    pub async fn flush(self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        match self.written {
            Some(value) => session.insert(CART_SESSION_KEY, value).await,
            None => Ok(()),
        }
    }
}

impl CartStore for SessionCartStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        if key != CART_STORAGE_KEY {
            return Ok(None);
        }
        if let Some(e) = &self.read_error {
            return Err(StoreError::Unavailable(e.clone()));
        }
        Ok(self.written.clone().or_else(|| self.stored.clone()))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if key != CART_STORAGE_KEY {
            return Err(StoreError::Unavailable(format!("unknown session key '{key}'")));
        }
        self.written = Some(value.to_owned());
        Ok(())
    }
}

/// Run `f` against the session's cart, then persist any change.
///
/// Read-only calls leave the session untouched, so no session cookie is
/// issued for them. Session write failures are logged and dropped; the
/// response still reflects the in-memory cart.
pub async fn with_cart<T, F>(session: &Session, f: F) -> T
where
    F: FnOnce(&mut CartService<&mut SessionCartStore>) -> T,
{
    let mut store = SessionCartStore::load(session).await;
    let result = {
        let mut service = CartService::hydrated(&mut store);
        f(&mut service)
    };

    if store.is_dirty()
        && let Err(e) = store.flush(session).await
    {
        warn!(error = %e, "Failed to write cart to session");
    }

    result
}
