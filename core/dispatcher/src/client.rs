use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use transmission::SessionStore;
use transport::Transport;

use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::impls::{QBittorrentAdapter, TransmissionAdapter};
use crate::models::{AddRequest, BackendKind};
use crate::traits::Adapter;

/// Unified adapter (enum dispatch).
///
/// Built per send from the configuration snapshot; the Transmission
/// session cache is passed in so tokens outlive a single send.
pub enum AdapterClient {
    Transmission(TransmissionAdapter),
    QBittorrent(QBittorrentAdapter),
}

impl AdapterClient {
    pub fn from_config(
        kind: BackendKind,
        config: &BackendConfig,
        transport: Arc<dyn Transport>,
        session: Arc<SessionStore>,
        timeout: Option<Duration>,
    ) -> Self {
        match kind {
            BackendKind::Transmission => Self::Transmission(TransmissionAdapter::new(
                config, transport, session, timeout,
            )),
            BackendKind::QBittorrent => {
                Self::QBittorrent(QBittorrentAdapter::new(config, transport, timeout))
            }
        }
    }
}

#[async_trait]
impl Adapter for AdapterClient {
    fn kind(&self) -> BackendKind {
        match self {
            Self::Transmission(a) => a.kind(),
            Self::QBittorrent(a) => a.kind(),
        }
    }

    async fn add_torrent(
        &self,
        request: &AddRequest<'_>,
    ) -> Result<Option<serde_json::Value>, BackendError> {
        match self {
            Self::Transmission(a) => a.add_torrent(request).await,
            Self::QBittorrent(a) => a.add_torrent(request).await,
        }
    }
}
