use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use dispatcher::BackendKind;
use settings::Settings;

const DEFAULT_CONFIG_PATH: &str = "./send-torrent.toml";
const PASSWORD_MASK: &str = "********";

#[derive(Debug, Parser)]
#[command(
    name = "send-torrent",
    version,
    about = "Send a torrent link to every enabled torrent client"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "SEND_TORRENT_CONFIG",
        default_value = DEFAULT_CONFIG_PATH
    )]
    pub config: PathBuf,
    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "SEND_TORRENT_TIMEOUT")]
    pub timeout: Option<u64>,
    #[command(subcommand)]
    pub command: Option<Command>,
    #[arg(help = "Magnet URI or URL of a .torrent file")]
    pub torrent: Option<String>,
}

impl Cli {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the current settings file
    Show,
    /// Change global options
    Set(GlobalArgs),
    /// Change a torrent client entry
    Client(ClientArgs),
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    #[arg(long)]
    pub add_paused: Option<bool>,
    #[arg(long)]
    pub upload_file: Option<bool>,
}

#[derive(Debug, Args)]
pub struct ClientArgs {
    #[arg(value_enum)]
    pub kind: ClientKind,
    #[arg(long)]
    pub enabled: Option<bool>,
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClientKind {
    Transmission,
    #[value(name = "qbittorrent")]
    QBittorrent,
}

impl From<ClientKind> for BackendKind {
    fn from(kind: ClientKind) -> Self {
        match kind {
            ClientKind::Transmission => BackendKind::Transmission,
            ClientKind::QBittorrent => BackendKind::QBittorrent,
        }
    }
}

impl GlobalArgs {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(add_paused) = self.add_paused {
            settings.add_paused = add_paused;
        }
        if let Some(upload_file) = self.upload_file {
            settings.upload_file = upload_file;
        }
    }
}

impl ClientArgs {
    pub fn apply(&self, settings: &mut Settings) {
        let client = settings.client_mut(self.kind.into());
        if let Some(enabled) = self.enabled {
            client.enabled = enabled;
        }
        if let Some(url) = &self.url {
            client.url = url.clone();
        }
        if let Some(username) = &self.username {
            client.username = username.clone();
        }
        if let Some(password) = &self.password {
            client.password = password.clone();
        }
    }
}

/// Copy of `settings` safe to print: non-empty passwords are masked
pub fn redacted(settings: &Settings) -> Settings {
    let mut shown = settings.clone();
    for client in [
        &mut shown.clients.transmission,
        &mut shown.clients.qbittorrent,
    ] {
        if !client.password.is_empty() {
            client.password = PASSWORD_MASK.to_string();
        }
    }
    shown
}
