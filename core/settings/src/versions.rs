use dispatcher::BackendConfig;
use serde::Deserialize;

use crate::error::SettingsError;
use crate::models::{Clients, Settings, CURRENT_VERSION};

/// Version 1: a single Transmission daemon
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SettingsV1 {
    pub url: String,
    pub username: String,
    pub password: String,
    pub add_paused: bool,
}

/// Version 2: adds upload by file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SettingsV2 {
    pub url: String,
    pub username: String,
    pub password: String,
    pub add_paused: bool,
    pub upload_file: bool,
}

/// Version 3: adds the choice of client
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SettingsV3 {
    pub url: String,
    pub username: String,
    pub password: String,
    pub add_paused: bool,
    pub upload_file: bool,
    pub client: String,
}

/// A settings file of any known schema version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionedSettings {
    V1(SettingsV1),
    V2(SettingsV2),
    V3(SettingsV3),
    V4(Settings),
}

#[derive(Deserialize)]
struct VersionTag {
    version: Option<i64>,
}

impl VersionedSettings {
    /// Parse a settings file, dispatching on its `version` key
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let tag: VersionTag = toml::from_str(content)?;
        match tag.version {
            Some(1) => Ok(Self::V1(toml::from_str(content)?)),
            Some(2) => Ok(Self::V2(toml::from_str(content)?)),
            Some(3) => Ok(Self::V3(toml::from_str(content)?)),
            Some(4) => Ok(Self::V4(toml::from_str(content)?)),
            Some(other) => Err(SettingsError::IncompatibleVersion(other)),
            None => Err(SettingsError::MissingVersion),
        }
    }

    pub fn version(&self) -> u32 {
        match self {
            Self::V1(_) => 1,
            Self::V2(_) => 2,
            Self::V3(_) => 3,
            Self::V4(_) => 4,
        }
    }

    /// Apply every upgrade step up to the current layout
    pub fn into_current(self) -> Settings {
        let mut settings = self;
        loop {
            settings = match settings {
                Self::V1(v1) => Self::V2(upgrade_v1(v1)),
                Self::V2(v2) => Self::V3(upgrade_v2(v2)),
                Self::V3(v3) => Self::V4(upgrade_v3(v3)),
                Self::V4(current) => return current,
            };
        }
    }
}

fn upgrade_v1(v1: SettingsV1) -> SettingsV2 {
    SettingsV2 {
        url: v1.url,
        username: v1.username,
        password: v1.password,
        add_paused: v1.add_paused,
        upload_file: false,
    }
}

fn upgrade_v2(v2: SettingsV2) -> SettingsV3 {
    SettingsV3 {
        url: v2.url,
        username: v2.username,
        password: v2.password,
        add_paused: v2.add_paused,
        upload_file: v2.upload_file,
        client: "transmission".to_string(),
    }
}

/// The single configured client becomes the only enabled entry
fn upgrade_v3(v3: SettingsV3) -> Settings {
    let configured = BackendConfig {
        enabled: !v3.url.is_empty(),
        url: v3.url,
        username: v3.username,
        password: v3.password,
    };

    let mut clients = Clients::default();
    if v3.client.eq_ignore_ascii_case("qbittorrent") {
        clients.qbittorrent = configured;
    } else {
        clients.transmission = configured;
    }

    Settings {
        version: CURRENT_VERSION,
        add_paused: v3.add_paused,
        upload_file: v3.upload_file,
        clients,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v1_upgrades_to_enabled_transmission() {
        let content = r#"
version = 1
url = "http://nas:9091/transmission/rpc"
username = "admin"
password = "secret"
add_paused = true
"#;
        let versioned = VersionedSettings::from_toml(content).unwrap();
        assert_eq!(versioned.version(), 1);

        let settings = versioned.into_current();
        assert_eq!(settings.version, CURRENT_VERSION);
        assert!(settings.add_paused);
        assert!(!settings.upload_file);
        assert!(settings.clients.transmission.enabled);
        assert_eq!(
            settings.clients.transmission.url,
            "http://nas:9091/transmission/rpc"
        );
        assert_eq!(settings.clients.transmission.password, "secret");
        assert!(!settings.clients.qbittorrent.enabled);
    }

    #[test]
    fn test_v2_keeps_upload_file() {
        let content = r#"
version = 2
url = "http://nas:9091/transmission/rpc"
upload_file = true
"#;
        let settings = VersionedSettings::from_toml(content).unwrap().into_current();
        assert!(settings.upload_file);
        assert!(settings.clients.transmission.enabled);
    }

    #[test]
    fn test_v3_qbittorrent_client() {
        let content = r#"
version = 3
client = "qBittorrent"
url = "http://nas:8080"
username = "admin"
password = "adminadmin"
"#;
        let settings = VersionedSettings::from_toml(content).unwrap().into_current();
        assert!(settings.clients.qbittorrent.enabled);
        assert_eq!(settings.clients.qbittorrent.url, "http://nas:8080");
        assert!(!settings.clients.transmission.enabled);
    }

    #[test]
    fn test_empty_url_stays_disabled() {
        let settings = VersionedSettings::V1(SettingsV1::default()).into_current();
        assert!(!settings.clients.transmission.enabled);
    }

    #[test]
    fn test_current_version_is_untouched() {
        let settings = VersionedSettings::from_toml("version = 4\nadd_paused = true\n")
            .unwrap()
            .into_current();
        assert_eq!(
            settings,
            Settings {
                add_paused: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_unknown_and_missing_version() {
        assert!(matches!(
            VersionedSettings::from_toml("version = 9"),
            Err(SettingsError::IncompatibleVersion(9))
        ));
        assert!(matches!(
            VersionedSettings::from_toml("add_paused = true"),
            Err(SettingsError::MissingVersion)
        ));
    }
}
