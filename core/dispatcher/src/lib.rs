//! Send one torrent to every enabled download client.
//!
//! The [`Dispatcher`] reads a configuration snapshot, downloads the
//! `.torrent` file at most once, hands it (or the bare link) to each enabled
//! client concurrently and reduces the outcomes to a single result.

mod client;
mod config;
mod dispatcher;
mod error;
mod impls;
mod models;
mod payload;
mod traits;

pub use client::AdapterClient;
pub use config::{BackendConfig, ConfigProvider, DispatchOptions, GlobalOptions};
pub use dispatcher::Dispatcher;
pub use error::{BackendError, SendError};
pub use impls::{QBittorrentAdapter, TransmissionAdapter};
pub use models::{
    AddRequest, AdapterOutcome, BackendFailure, BackendKind, SendResult, TorrentPayload,
    TorrentReference,
};
pub use payload::PayloadFetcher;
pub use traits::Adapter;

pub use transmission::SessionStore;

pub type Result<T> = std::result::Result<T, SendError>;
