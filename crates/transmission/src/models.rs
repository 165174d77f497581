use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Arguments of the `torrent-add` RPC method.
///
/// Exactly one of `filename` (a URL or magnet link the daemon fetches itself)
/// and `metainfo` (base64 encoded `.torrent` content) is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TorrentAddArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metainfo: Option<String>,
    pub paused: bool,
}

impl TorrentAddArgs {
    pub fn with_filename(filename: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
            ..Default::default()
        }
    }

    pub fn with_metainfo(content: &[u8]) -> Self {
        Self {
            metainfo: Some(STANDARD.encode(content)),
            ..Default::default()
        }
    }

    pub fn paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RpcRequest<'a, T> {
    pub method: &'a str,
    pub arguments: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcResponse {
    pub result: String,
}

/// Torrent reported back by `torrent-add`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedTorrent {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub hash_string: Option<String>,
    #[serde(skip)]
    pub duplicate: bool,
}

impl AddedTorrent {
    /// Extract the added (or already present) torrent from a `torrent-add`
    /// response body.
    pub fn from_response(body: &serde_json::Value) -> Option<Self> {
        let arguments = body.get("arguments")?;
        if let Some(added) = arguments.get("torrent-added") {
            return serde_json::from_value(added.clone()).ok();
        }
        let duplicate = arguments.get("torrent-duplicate")?;
        serde_json::from_value::<AddedTorrent>(duplicate.clone())
            .ok()
            .map(|t| AddedTorrent {
                duplicate: true,
                ..t
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_args_serialize_only_one_source() {
        let args = TorrentAddArgs::with_filename("magnet:?xt=urn:btih:abc").paused(true);
        assert_eq!(
            serde_json::to_value(&args).unwrap(),
            json!({"filename": "magnet:?xt=urn:btih:abc", "paused": true})
        );

        let args = TorrentAddArgs::with_metainfo(b"hello");
        assert_eq!(
            serde_json::to_value(&args).unwrap(),
            json!({"metainfo": "aGVsbG8=", "paused": false})
        );
    }

    #[test]
    fn test_added_torrent_from_response() {
        let body = json!({
            "result": "success",
            "arguments": {
                "torrent-added": {"id": 7, "name": "ubuntu.iso", "hashString": "abcdef"}
            }
        });
        let torrent = AddedTorrent::from_response(&body).unwrap();
        assert_eq!(torrent.id, Some(7));
        assert_eq!(torrent.hash_string.as_deref(), Some("abcdef"));
        assert!(!torrent.duplicate);
    }

    #[test]
    fn test_duplicate_torrent_from_response() {
        let body = json!({
            "result": "success",
            "arguments": {"torrent-duplicate": {"id": 3, "name": "dup", "hashString": "123"}}
        });
        let torrent = AddedTorrent::from_response(&body).unwrap();
        assert!(torrent.duplicate);
        assert_eq!(torrent.name.as_deref(), Some("dup"));

        assert!(AddedTorrent::from_response(&json!({"result": "success"})).is_none());
    }
}
