use dispatcher::{BackendConfig, BackendKind, DispatchOptions, GlobalOptions};
use serde::{Deserialize, Serialize};

/// Schema version written by this build
pub const CURRENT_VERSION: u32 = 4;

fn current_version() -> u32 {
    CURRENT_VERSION
}

/// Current settings layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "current_version")]
    pub version: u32,
    /// Add torrents in paused state
    #[serde(default)]
    pub add_paused: bool,
    /// Download `.torrent` files and upload their content
    #[serde(default)]
    pub upload_file: bool,
    #[serde(default)]
    pub clients: Clients,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clients {
    #[serde(default = "default_transmission")]
    pub transmission: BackendConfig,
    #[serde(default = "default_qbittorrent")]
    pub qbittorrent: BackendConfig,
}

fn default_transmission() -> BackendConfig {
    BackendConfig {
        enabled: false,
        url: "http://localhost:9091/transmission/rpc".to_string(),
        ..Default::default()
    }
}

fn default_qbittorrent() -> BackendConfig {
    BackendConfig {
        enabled: false,
        url: "http://localhost:8080".to_string(),
        ..Default::default()
    }
}

impl Default for Clients {
    fn default() -> Self {
        Self {
            transmission: default_transmission(),
            qbittorrent: default_qbittorrent(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            add_paused: false,
            upload_file: false,
            clients: Clients::default(),
        }
    }
}

impl Settings {
    pub fn client(&self, kind: BackendKind) -> &BackendConfig {
        match kind {
            BackendKind::Transmission => &self.clients.transmission,
            BackendKind::QBittorrent => &self.clients.qbittorrent,
        }
    }

    pub fn client_mut(&mut self, kind: BackendKind) -> &mut BackendConfig {
        match kind {
            BackendKind::Transmission => &mut self.clients.transmission,
            BackendKind::QBittorrent => &mut self.clients.qbittorrent,
        }
    }
}

/// Dispatch order is Transmission first, then qBittorrent
impl From<&Settings> for DispatchOptions {
    fn from(settings: &Settings) -> Self {
        DispatchOptions::new(GlobalOptions {
            add_paused: settings.add_paused,
            upload_file: settings.upload_file,
        })
        .backend(BackendKind::Transmission, settings.clients.transmission.clone())
        .backend(BackendKind::QBittorrent, settings.clients.qbittorrent.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_nothing_enabled() {
        let options = DispatchOptions::from(&Settings::default());
        assert_eq!(options.enabled_backends().count(), 0);
        assert_eq!(options.backends.len(), 2);
    }

    #[test]
    fn test_dispatch_order_and_globals() {
        let mut settings = Settings {
            add_paused: true,
            ..Default::default()
        };
        settings.client_mut(BackendKind::QBittorrent).enabled = true;
        settings.client_mut(BackendKind::Transmission).enabled = true;

        let options = DispatchOptions::from(&settings);
        let order: Vec<_> = options.enabled_backends().map(|(k, _)| k).collect();
        assert_eq!(order, vec![BackendKind::Transmission, BackendKind::QBittorrent]);
        assert!(options.global.add_paused);
        assert!(!options.global.upload_file);
    }

    #[test]
    fn test_toml_round_trip_of_current_layout() {
        let content = r#"
version = 4
add_paused = true
upload_file = true

[clients.transmission]
enabled = true
url = "http://nas:9091/transmission/rpc"
username = "tr"
password = "secret"

[clients.qbittorrent]
enabled = false
url = "http://nas:8080"
"#;
        let settings: Settings = toml::from_str(content).unwrap();
        assert!(settings.upload_file);
        assert_eq!(settings.clients.transmission.username, "tr");
        assert_eq!(settings.clients.qbittorrent.password, "");

        let written = toml::to_string_pretty(&settings).unwrap();
        let reparsed: Settings = toml::from_str(&written).unwrap();
        assert_eq!(reparsed, settings);
    }

    #[test]
    fn test_partial_client_table() {
        let content = r#"
version = 4

[clients.qbittorrent]
url = "http://nas:8080"
"#;
        let settings: Settings = toml::from_str(content).unwrap();
        assert!(!settings.clients.qbittorrent.enabled);
        assert_eq!(settings.clients.qbittorrent.url, "http://nas:8080");
        assert_eq!(settings.clients.qbittorrent.username, "");
        assert_eq!(settings.clients.transmission, Clients::default().transmission);
    }
}
