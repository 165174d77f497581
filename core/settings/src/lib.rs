//! Settings file for send-torrent.
//!
//! Settings live in a TOML file tagged with a schema `version`. Older
//! layouts are upgraded step by step to the current one on load and the
//! upgraded file is written back. The dispatcher only ever sees the
//! resulting [`dispatcher::DispatchOptions`] snapshot.

mod error;
mod models;
mod service;
mod versions;

pub use error::SettingsError;
pub use models::{Clients, Settings, CURRENT_VERSION};
pub use service::SettingsService;
pub use versions::{SettingsV1, SettingsV2, SettingsV3, VersionedSettings};

pub type Result<T> = std::result::Result<T, SettingsError>;
