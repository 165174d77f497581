use serde::{Deserialize, Serialize};

use crate::models::BackendKind;

/// Connection settings for one download client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub enabled: bool,
    /// Transmission: full RPC URL. qBittorrent: WebUI base URL.
    pub url: String,
    pub username: String,
    pub password: String,
}

impl BackendConfig {
    /// Enabled client at `url` without credentials
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            enabled: true,
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }
}

/// Options applied to every client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalOptions {
    /// Add torrents in paused state
    pub add_paused: bool,
    /// Download the `.torrent` file and upload its content instead of
    /// passing the link
    pub upload_file: bool,
}

/// Immutable configuration snapshot for one send.
///
/// `backends` is ordered; that order decides which result wins when more
/// than one client accepts the torrent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOptions {
    pub global: GlobalOptions,
    pub backends: Vec<(BackendKind, BackendConfig)>,
}

impl DispatchOptions {
    pub fn new(global: GlobalOptions) -> Self {
        Self {
            global,
            backends: Vec::new(),
        }
    }

    pub fn backend(mut self, kind: BackendKind, config: BackendConfig) -> Self {
        self.backends.push((kind, config));
        self
    }

    /// Enabled backends in configuration order
    pub fn enabled_backends(&self) -> impl Iterator<Item = (BackendKind, &BackendConfig)> {
        self.backends
            .iter()
            .filter(|(_, config)| config.enabled)
            .map(|(kind, config)| (*kind, config))
    }
}

/// Source of configuration snapshots.
///
/// Called once at the start of every send; implementations return a copy
/// that the dispatcher never writes back.
pub trait ConfigProvider: Send + Sync {
    fn snapshot(&self) -> DispatchOptions;
}

impl ConfigProvider for DispatchOptions {
    fn snapshot(&self) -> DispatchOptions {
        self.clone()
    }
}
