mod client;
mod error;
pub mod models;
mod session;
mod torrents;

pub use client::TransmissionClient;
pub use error::TransmissionError;
pub use models::{AddedTorrent, TorrentAddArgs};
pub use session::{SessionStore, SESSION_ID_HEADER};

pub type Result<T> = std::result::Result<T, TransmissionError>;
