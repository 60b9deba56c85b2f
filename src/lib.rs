//! Jumpbox - hierarchical terminal menu for reaching network devices
//!
//! This library provides:
//! - A menu engine: nested menus, keyboard navigation, scrolling and a
//!   handoff protocol that lends the terminal to external programs
//! - Device directories backed by a TOML inventory or NetBox
//! - An ssh session launcher
//! - The bootstrap that turns directory data into the jumpbox menu

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod directory;
pub mod error;
pub mod netbox;
pub mod session;
pub mod tui;

pub use cli::Cli;
pub use config::{Config, ConfigError, DirectoryKind};
pub use error::{Error, Result};
pub use tui::{MenuApp, MenuNode, MenuOption, MenuTree, NodeId};
