//! CLI argument parsing with clap

use crate::config::{Config, DirectoryKind};
use clap::Parser;
use std::path::PathBuf;

/// Jumpbox - terminal menu for connecting to network devices
///
/// Browse devices by site, search by name or connect to any address,
/// then hand the terminal to an ssh session and come back to the menu
/// when it ends.
#[derive(Parser, Debug)]
#[command(name = "jumpbox")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (TOML format)
    ///
    /// Defaults to jumpbox.toml next to the executable when present.
    /// CLI arguments override config file settings.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Inventory file with sites and devices
    #[arg(long, conflicts_with = "netbox_url")]
    pub inventory: Option<PathBuf>,

    /// NetBox API base URL, e.g. http://netbox.example.com/api/
    #[arg(long, env = "JUMPBOX_NETBOX_URL")]
    pub netbox_url: Option<String>,

    /// Login name for every session (skips the username prompt)
    #[arg(short, long)]
    pub username: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Output log format as JSON
    #[arg(long)]
    pub json_log: bool,

    /// Write the log here instead of the Log directory next to the executable
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref inventory) = self.inventory {
            config.directory.kind = DirectoryKind::Inventory;
            config.directory.inventory = inventory.clone();
        }
        if let Some(ref url) = self.netbox_url {
            config.directory.kind = DirectoryKind::Netbox;
            config.directory.url = Some(url.clone());
        }
        if let Some(ref username) = self.username {
            config.session.username = Some(username.clone());
        }

        config
    }
}
