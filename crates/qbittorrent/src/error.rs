use thiserror::Error;

#[derive(Debug, Error)]
pub enum QBittorrentError {
    #[error(transparent)]
    Transport(#[from] transport::TransportError),

    #[error("Authentication failed: {0}")]
    Auth(String),

    /// 403 from the WebUI: not logged in or session expired
    #[error("Forbidden")]
    Forbidden,

    #[error("API error: {status_code} - {message}")]
    Api { status_code: u16, message: String },

    #[error("Invalid torrent: {0}")]
    InvalidTorrent(String),
}
