use std::sync::Arc;
use std::time::Duration;

use transport::{HttpRequest, Transport};

use crate::error::SendError;
use crate::models::{TorrentPayload, TorrentReference};

/// Downloads the `.torrent` file behind a reference, at most once per send.
pub struct PayloadFetcher {
    transport: Arc<dyn Transport>,
    timeout: Option<Duration>,
}

impl PayloadFetcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            timeout: None,
        }
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch the payload when it is wanted and the reference is http(s).
    ///
    /// Returns `Ok(None)` when clients should get the reference itself.
    pub async fn fetch(
        &self,
        reference: &TorrentReference,
        want_payload: bool,
    ) -> Result<Option<TorrentPayload>, SendError> {
        if !want_payload || !reference.is_fetchable() {
            return Ok(None);
        }

        let request = HttpRequest::get(reference.as_str()).timeout(self.timeout);
        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|e| SendError::Download(e.to_string()))?;

        if !response.is_success() {
            let reason = response.status.canonical_reason().unwrap_or("unknown status");
            return Err(SendError::Download(format!(
                "{} {}",
                response.status.as_u16(),
                reason
            )));
        }

        tracing::debug!("Downloaded torrent file ({} bytes)", response.body.len());
        Ok(Some(TorrentPayload::new(response.body)))
    }
}
