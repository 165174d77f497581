use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use transmission::{SessionStore, TorrentAddArgs, TransmissionClient};
use transport::Transport;

use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::models::{AddRequest, BackendKind};
use crate::traits::Adapter;

/// Transmission adapter (JSON RPC with session-token handshake)
pub struct TransmissionAdapter {
    client: TransmissionClient,
}

impl TransmissionAdapter {
    pub fn new(
        config: &BackendConfig,
        transport: Arc<dyn Transport>,
        session: Arc<SessionStore>,
        timeout: Option<Duration>,
    ) -> Self {
        let client = TransmissionClient::new(transport, config.url.clone())
            .with_auth(&config.username, &config.password)
            .with_session(session)
            .timeout(timeout);
        Self { client }
    }
}

/// `metainfo` when the payload was downloaded, otherwise the link itself
fn add_args(request: &AddRequest<'_>) -> TorrentAddArgs {
    match request.payload {
        Some(payload) => TorrentAddArgs::with_metainfo(payload.as_bytes()),
        None => TorrentAddArgs::with_filename(request.reference.as_str()),
    }
    .paused(request.add_paused)
}

#[async_trait]
impl Adapter for TransmissionAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::Transmission
    }

    async fn add_torrent(
        &self,
        request: &AddRequest<'_>,
    ) -> Result<Option<serde_json::Value>, BackendError> {
        let body = self.client.torrent_add(&add_args(request)).await?;
        Ok(Some(body))
    }
}
