use std::sync::Arc;

use parking_lot::RwLock;

/// Header carrying the CSRF session token
pub const SESSION_ID_HEADER: &str = "X-Transmission-Session-Id";

/// Cached `X-Transmission-Session-Id` token.
///
/// Shared by every request to the same daemon for the lifetime of the
/// process. Reads and writes are a pointer swap; the lock is never held
/// across an await. Two concurrent sends may both refresh a stale token,
/// which only costs one extra round trip.
#[derive(Debug, Default)]
pub struct SessionStore {
    token: RwLock<Option<Arc<str>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token
    pub fn with_token(token: impl Into<Arc<str>>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    pub fn get(&self) -> Option<Arc<str>> {
        self.token.read().clone()
    }

    /// Replace the cached token, returning the previous one.
    pub fn replace(&self, token: impl Into<Arc<str>>) -> Option<Arc<str>> {
        self.token.write().replace(token.into())
    }
}
