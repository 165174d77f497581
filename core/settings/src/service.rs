use std::path::{Path, PathBuf};

use dispatcher::{ConfigProvider, DispatchOptions};
use tokio::sync::watch;

use crate::error::SettingsError;
use crate::models::Settings;
use crate::versions::VersionedSettings;

pub struct SettingsService {
    settings_path: PathBuf,
    sender: watch::Sender<Settings>,
    receiver: watch::Receiver<Settings>,
}

impl SettingsService {
    /// Load settings from `path`.
    /// Creates a default settings file if it doesn't exist.
    pub async fn load(path: impl Into<PathBuf>) -> crate::Result<Self> {
        let settings_path = path.into();
        let settings = Self::load_or_create(&settings_path).await?;
        let (sender, receiver) = watch::channel(settings);

        Ok(Self {
            settings_path,
            sender,
            receiver,
        })
    }

    /// Load settings from file, or create with defaults if file doesn't exist.
    /// Files written by an older version are upgraded and written back.
    async fn load_or_create(path: &Path) -> crate::Result<Settings> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                let versioned = VersionedSettings::from_toml(&content)?;
                let from_version = versioned.version();
                let settings = versioned.into_current();
                if from_version != settings.version {
                    tracing::info!(
                        "Upgraded settings from version {} to {}",
                        from_version,
                        settings.version
                    );
                    Self::write_atomically(path, &settings).await?;
                }
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        SettingsError::Io {
                            operation: "Failed to create settings directory",
                            path: parent.display().to_string(),
                            source: e,
                        }
                    })?;
                }

                let default = Settings::default();
                Self::write_atomically(path, &default).await?;
                tracing::info!("Created default settings at {}", path.display());
                Ok(default)
            }
            Err(e) => Err(SettingsError::Io {
                operation: "Failed to read settings file",
                path: path.display().to_string(),
                source: e,
            }),
        }
    }

    /// Write settings to file atomically using temp file + rename pattern.
    async fn write_atomically(path: &Path, settings: &Settings) -> crate::Result<()> {
        let toml_str = toml::to_string_pretty(settings)?;
        let tmp_path = path.with_extension("toml.tmp");
        tokio::fs::write(&tmp_path, &toml_str)
            .await
            .map_err(|e| SettingsError::Io {
                operation: "Failed to write settings temp file",
                path: tmp_path.display().to_string(),
                source: e,
            })?;
        tokio::fs::rename(&tmp_path, path)
            .await
            .map_err(|e| SettingsError::Io {
                operation: "Failed to rename settings file",
                path: path.display().to_string(),
                source: e,
            })?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    /// Get current settings (fast, no I/O).
    pub fn get(&self) -> Settings {
        self.receiver.borrow().clone()
    }

    /// Replace settings, save to file and publish the new value.
    pub async fn update(&self, settings: Settings) -> crate::Result<Settings> {
        Self::write_atomically(&self.settings_path, &settings).await?;
        self.sender.send_replace(settings.clone());
        tracing::debug!("Saved settings to {}", self.settings_path.display());
        Ok(settings)
    }
}

impl ConfigProvider for SettingsService {
    fn snapshot(&self) -> DispatchOptions {
        DispatchOptions::from(&self.get())
    }
}
