use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use datepoll_core::settings::Settings;

#[derive(Parser)]
#[command(name = "datepoll-server")]
#[command(about = "Serve the datepoll REST API over a JSON document", version)]
pub struct Cli {
    /// Config file to read instead of ~/.config/datepoll/config.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Socket address to listen on (e.g. 127.0.0.1:4096)
    #[arg(short, long)]
    pub address: Option<SocketAddr>,

    /// JSON document holding all events
    #[arg(short, long)]
    pub data_file: Option<PathBuf>,

    /// Log filter (e.g. "info", "datepoll_server=debug"); RUST_LOG wins if set
    #[arg(long)]
    pub log: Option<String>,

    /// Keep events in memory only; nothing is read from or written to disk
    #[arg(long)]
    pub in_memory: bool,

    /// Print the resolved settings as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// Resolve settings from the config layers, then apply flags on top.
    pub fn settings(&self) -> datepoll_core::DatepollResult<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load_from(path)?,
            None => Settings::load()?,
        };

        if let Some(address) = self.address {
            settings.address = address;
        }
        if let Some(data_file) = &self.data_file {
            settings.data_file = data_file.clone();
        }
        if let Some(log) = &self.log {
            settings.log = log.clone();
        }

        Ok(settings)
    }
}
