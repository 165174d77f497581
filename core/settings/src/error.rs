use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{operation} '{path}': {source}")]
    Io {
        operation: &'static str,
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Settings file has no version")]
    MissingVersion,
    #[error("Incompatible settings version: {0}")]
    IncompatibleVersion(i64),
}
