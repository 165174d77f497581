use transport::StatusCode;

use crate::client::QBittorrentClient;
use crate::error::QBittorrentError;
use crate::models::AddTorrentRequest;

impl QBittorrentClient {
    /// Add new torrent(s) via URLs or file upload
    /// POST /api/v2/torrents/add
    ///
    /// A 403 is reported as [`QBittorrentError::Forbidden`] so callers can
    /// log in and retry.
    pub async fn add_torrent(&self, request: &AddTorrentRequest) -> crate::Result<()> {
        let http = self.post("/torrents/add")?.multipart(request.to_form());

        let response = self.transport().execute(http).await?;

        let status = response.status;
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::FORBIDDEN {
            return Err(QBittorrentError::Forbidden);
        }
        if status == StatusCode::UNSUPPORTED_MEDIA_TYPE {
            return Err(QBittorrentError::InvalidTorrent(
                "Invalid torrent URL or file".into(),
            ));
        }
        Err(QBittorrentError::Api {
            status_code: status.as_u16(),
            message: response.text(),
        })
    }
}
