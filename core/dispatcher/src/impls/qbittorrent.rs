use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use qbittorrent::{AddTorrentRequest, QBittorrentClient, QBittorrentError};
use transport::Transport;

use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::models::{AddRequest, BackendKind};
use crate::traits::Adapter;

/// Steps of one qBittorrent add.
///
/// `FirstAttempt -> (done | Authenticate -> RetryAttempt -> done | fail)`;
/// nothing leads back to `Authenticate`, so a send logs in at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddState {
    FirstAttempt,
    Authenticate,
    RetryAttempt,
}

/// qBittorrent adapter (WebUI API, cookie session with login on 403)
pub struct QBittorrentAdapter {
    client: QBittorrentClient,
    username: String,
    password: String,
}

impl QBittorrentAdapter {
    pub fn new(
        config: &BackendConfig,
        transport: Arc<dyn Transport>,
        timeout: Option<Duration>,
    ) -> Self {
        let client = QBittorrentClient::new(transport, config.url.clone())
            .with_basic_auth(&config.username, &config.password)
            .timeout(timeout);
        Self {
            client,
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }
}

/// Uploaded file when the payload was downloaded, otherwise the link itself
fn add_request(request: &AddRequest<'_>) -> AddTorrentRequest {
    match request.payload {
        Some(payload) => AddTorrentRequest::with_file(payload.bytes()),
        None => AddTorrentRequest::with_url(request.reference.as_str()),
    }
    .paused(request.add_paused)
}

fn auth_error(err: QBittorrentError) -> BackendError {
    match err {
        QBittorrentError::Auth(message) => BackendError::Auth(message),
        other => BackendError::Auth(other.to_string()),
    }
}

#[async_trait]
impl Adapter for QBittorrentAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::QBittorrent
    }

    async fn add_torrent(
        &self,
        request: &AddRequest<'_>,
    ) -> Result<Option<serde_json::Value>, BackendError> {
        let add = add_request(request);

        let mut state = AddState::FirstAttempt;
        loop {
            state = match state {
                AddState::FirstAttempt => match self.client.add_torrent(&add).await {
                    Ok(()) => return Ok(None),
                    Err(QBittorrentError::Forbidden) => AddState::Authenticate,
                    Err(e) => return Err(e.into()),
                },
                AddState::Authenticate => {
                    tracing::debug!("qBittorrent rejected the request, logging in");
                    self.client
                        .login(&self.username, &self.password)
                        .await
                        .map_err(auth_error)?;
                    AddState::RetryAttempt
                }
                AddState::RetryAttempt => {
                    return match self.client.add_torrent(&add).await {
                        Ok(()) => Ok(None),
                        Err(e) => Err(BackendError::AddTorrent(e.to_string())),
                    };
                }
            };
        }
    }
}
