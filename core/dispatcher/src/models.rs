use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{BackendError, SendError};

/// Supported download clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    #[serde(rename = "Transmission")]
    Transmission,
    #[serde(rename = "qBittorrent")]
    QBittorrent,
}

impl BackendKind {
    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::Transmission => "Transmission",
            BackendKind::QBittorrent => "qBittorrent",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Link to a torrent: an HTTP(S) URL of a `.torrent` file or a non
/// fetchable URI such as a magnet link.
///
/// The original string is kept verbatim; clients receive exactly what the
/// caller passed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentReference {
    raw: String,
    url: Url,
}

impl TorrentReference {
    pub fn parse(reference: &str) -> Result<Self, SendError> {
        let url = Url::parse(reference)
            .map_err(|e| SendError::InvalidReference(format!("{}: {}", reference, e)))?;
        Ok(Self {
            raw: reference.to_string(),
            url,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Only http and https links are ever downloaded
    pub fn is_fetchable(&self) -> bool {
        matches!(self.url.scheme(), "http" | "https")
    }
}

impl FromStr for TorrentReference {
    type Err = SendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TorrentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Raw `.torrent` file content, shared read-only by all clients of a send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentPayload(Bytes);

impl TorrentPayload {
    pub fn new(content: impl Into<Bytes>) -> Self {
        Self(content.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Cheap reference-counted handle to the content
    pub fn bytes(&self) -> Bytes {
        self.0.clone()
    }
}

/// What every adapter receives for one send
#[derive(Debug, Clone, Copy)]
pub struct AddRequest<'a> {
    pub reference: &'a TorrentReference,
    /// Present only when uploading by file was requested and the reference
    /// is fetchable
    pub payload: Option<&'a TorrentPayload>,
    pub add_paused: bool,
}

/// Successful send
#[derive(Debug, Clone, PartialEq)]
pub struct SendResult {
    /// The earliest configured client that accepted the torrent
    pub backend: BackendKind,
    /// Client specific response (the RPC body for Transmission)
    pub body: Option<serde_json::Value>,
}

/// Result of one adapter call, captured so it never aborts its siblings
#[derive(Debug)]
pub struct AdapterOutcome {
    pub backend: BackendKind,
    pub result: Result<Option<serde_json::Value>, BackendError>,
}

/// One entry of [`SendError::AllBackendsFailed`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendFailure {
    pub backend: BackendKind,
    pub message: String,
}

impl fmt::Display for BackendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.backend, self.message)
    }
}
