mod qbittorrent;
mod transmission;

pub use self::qbittorrent::QBittorrentAdapter;
pub use self::transmission::TransmissionAdapter;
