use async_trait::async_trait;

use crate::error::BackendError;
use crate::models::{AddRequest, BackendKind};

/// Protocol adapter for one download client.
///
/// An adapter owns its client's request shape, authentication handshake and
/// success classification. It must not retry beyond what its protocol
/// requires and must not mutate the shared payload.
#[async_trait]
pub trait Adapter: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Hand the torrent to the client.
    ///
    /// Returns the client specific response body, if the protocol has one.
    async fn add_torrent(
        &self,
        request: &AddRequest<'_>,
    ) -> Result<Option<serde_json::Value>, BackendError>;
}
