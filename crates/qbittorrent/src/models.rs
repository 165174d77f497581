use bytes::Bytes;
use transport::MultipartForm;

/// File name qBittorrent sees for an uploaded `.torrent`
const UPLOAD_FILE_NAME: &str = "_.torrent";

/// Where the torrent comes from
#[derive(Debug, Clone, PartialEq)]
pub enum TorrentSource {
    /// URLs separated by newlines (HTTP, HTTPS, magnet links)
    Urls(String),
    /// Raw `.torrent` content uploaded as a file field
    File(Bytes),
}

/// Request to add a torrent
/// POST /api/v2/torrents/add
#[derive(Debug, Clone, PartialEq)]
pub struct AddTorrentRequest {
    pub source: TorrentSource,
    /// Add in paused state
    pub paused: bool,
}

impl AddTorrentRequest {
    /// Create a new request with a single URL
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            source: TorrentSource::Urls(url.into()),
            paused: false,
        }
    }

    /// Create a new request uploading `.torrent` content
    pub fn with_file(content: Bytes) -> Self {
        Self {
            source: TorrentSource::File(content),
            paused: false,
        }
    }

    pub fn paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    /// Build the multipart body. `paused` is only sent when set.
    pub fn to_form(&self) -> MultipartForm {
        let form = match &self.source {
            TorrentSource::Urls(urls) => MultipartForm::new().text("urls", urls.clone()),
            TorrentSource::File(content) => {
                MultipartForm::new().file("torrents", UPLOAD_FILE_NAME, content.clone())
            }
        };
        if self.paused {
            form.text("paused", "true")
        } else {
            form
        }
    }
}
