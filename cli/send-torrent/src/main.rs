mod cli;

use std::sync::Arc;

use clap::Parser;
use dispatcher::Dispatcher;
use settings::SettingsService;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use transport::ReqwestTransport;

use crate::cli::{redacted, Cli, Command, ConfigCommand};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let service = SettingsService::load(&cli.config).await?;

    match (&cli.command, &cli.torrent) {
        (Some(Command::Config(command)), _) => run_config(&service, command).await,
        (None, Some(torrent)) => {
            let timeout = cli.request_timeout();
            run_send(service, torrent, timeout).await
        }
        (None, None) => Err("missing TORRENT argument (see --help)".into()),
    }
}

async fn run_send(
    service: SettingsService,
    torrent: &str,
    timeout: Option<std::time::Duration>,
) -> Result<(), Box<dyn std::error::Error>> {
    let transport = Arc::new(ReqwestTransport::new()?);
    let dispatcher = Dispatcher::new(Arc::new(service), transport).timeout(timeout);

    let result = dispatcher.send(torrent).await?;
    println!("Done: added to {}", result.backend);
    Ok(())
}

async fn run_config(
    service: &SettingsService,
    command: &ConfigCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = service.get();
    match command {
        ConfigCommand::Show => {
            println!("# {}", service.path().display());
            print!("{}", toml::to_string_pretty(&redacted(&settings))?);
            return Ok(());
        }
        ConfigCommand::Set(args) => args.apply(&mut settings),
        ConfigCommand::Client(args) => args.apply(&mut settings),
    }
    service.update(settings).await?;
    tracing::info!("Settings saved to {}", service.path().display());
    Ok(())
}
