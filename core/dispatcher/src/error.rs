use qbittorrent::QBittorrentError;
use thiserror::Error;
use transmission::TransmissionError;
use transport::TransportError;

use crate::models::BackendFailure;

/// Failure of a single client. Always captured by the dispatcher, never
/// returned to the caller on its own.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Unexpected HTTP status
    #[error("request error: {status}")]
    Request { status: u16 },

    /// HTTP succeeded but the response body reports a failure
    #[error("transmission error: {message}")]
    Protocol { message: String },

    /// The re-authentication step failed
    #[error("failed to authorize: {0}")]
    Auth(String),

    /// Adding failed even after re-authenticating
    #[error("failed to add torrent: {0}")]
    AddTorrent(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl From<TransmissionError> for BackendError {
    fn from(err: TransmissionError) -> Self {
        match err {
            TransmissionError::Transport(e) => BackendError::Transport(e),
            TransmissionError::Request { status } => BackendError::Request { status },
            TransmissionError::Protocol { message } => BackendError::Protocol { message },
        }
    }
}

impl From<QBittorrentError> for BackendError {
    fn from(err: QBittorrentError) -> Self {
        match err {
            QBittorrentError::Transport(e) => BackendError::Transport(e),
            QBittorrentError::Auth(message) => BackendError::Auth(message),
            QBittorrentError::Forbidden => BackendError::Request { status: 403 },
            QBittorrentError::Api { status_code, .. } => BackendError::Request {
                status: status_code,
            },
            QBittorrentError::InvalidTorrent(message) => BackendError::AddTorrent(message),
        }
    }
}

/// Caller facing error of [`crate::Dispatcher::send`]
#[derive(Debug, Error)]
pub enum SendError {
    #[error("invalid torrent reference: {0}")]
    InvalidReference(String),

    #[error("no torrent clients are enabled")]
    NoBackendsEnabled,

    /// The `.torrent` file could not be downloaded; no client was contacted
    #[error("failed to download torrent: {0}")]
    Download(String),

    /// Every enabled client was tried and none accepted the torrent.
    /// Entries are in configuration order.
    #[error("all enabled clients failed: {}", join_failures(.0))]
    AllBackendsFailed(Vec<BackendFailure>),
}

impl SendError {
    /// Per-client messages, empty for precondition failures
    pub fn failures(&self) -> &[BackendFailure] {
        match self {
            SendError::AllBackendsFailed(failures) => failures,
            _ => &[],
        }
    }
}

fn join_failures(failures: &[BackendFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BackendKind;

    #[test]
    fn test_all_backends_failed_message() {
        let err = SendError::AllBackendsFailed(vec![
            BackendFailure {
                backend: BackendKind::Transmission,
                message: "request error: 401".into(),
            },
            BackendFailure {
                backend: BackendKind::QBittorrent,
                message: "failed to authorize: Invalid username or password".into(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "all enabled clients failed: Transmission: request error: 401, \
             qBittorrent: failed to authorize: Invalid username or password"
        );
        assert_eq!(err.failures().len(), 2);
    }

    #[test]
    fn test_transmission_protocol_error_keeps_wording() {
        let err = BackendError::from(TransmissionError::Protocol {
            message: "duplicate torrent".into(),
        });
        let failure = BackendFailure {
            backend: BackendKind::Transmission,
            message: err.to_string(),
        };
        assert_eq!(
            SendError::AllBackendsFailed(vec![failure]).to_string(),
            "all enabled clients failed: Transmission: transmission error: duplicate torrent"
        );
    }

    #[test]
    fn test_qbittorrent_error_mapping() {
        assert!(matches!(
            BackendError::from(QBittorrentError::Forbidden),
            BackendError::Request { status: 403 }
        ));
        assert!(matches!(
            BackendError::from(QBittorrentError::Api {
                status_code: 502,
                message: "bad gateway".into()
            }),
            BackendError::Request { status: 502 }
        ));
    }
}
