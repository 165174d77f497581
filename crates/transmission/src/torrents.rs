use crate::client::TransmissionClient;
use crate::models::{AddedTorrent, TorrentAddArgs};

impl TransmissionClient {
    /// Add a torrent by URL or by metainfo.
    /// RPC method `torrent-add`
    ///
    /// Returns the raw response body.
    pub async fn torrent_add(&self, args: &TorrentAddArgs) -> crate::Result<serde_json::Value> {
        let body = self.call("torrent-add", args).await?;

        match AddedTorrent::from_response(&body) {
            Some(torrent) if torrent.duplicate => {
                tracing::debug!(
                    "Torrent already present in Transmission: {}",
                    torrent.hash_string.unwrap_or_default()
                );
            }
            Some(torrent) => {
                tracing::debug!(
                    "Added torrent with hash: {}",
                    torrent.hash_string.unwrap_or_default()
                );
            }
            None => {}
        }

        Ok(body)
    }
}
