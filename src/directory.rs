//! Device directory
//!
//! The menu reads devices and sites through [`Directory`]. Every query
//! returns a well-formed list; sources that fail log and return nothing.

use crate::config::{ConfigError, DirectoryConfig, DirectoryKind};
use crate::error::Result;
use crate::netbox::NetboxDirectory;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;
use tracing::info;

/// A reachable device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Hostname shown in the menu
    pub display_name: String,
    /// Address handed to the session launcher
    pub address: String,
}

/// A site with at least one reachable device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    pub facility: String,
    pub slug: String,
    pub device_count: i64,
}

/// Source of device and site records
pub trait Directory {
    /// Devices, optionally limited to one site slug or matched by `query`
    fn get_devices(&self, site: Option<&str>, query: Option<&str>) -> Vec<Device>;

    /// Sites that have devices
    fn get_sites(&self) -> Vec<Site>;
}

/// One site of an inventory file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InventorySite {
    pub name: String,
    pub facility: String,
    pub slug: String,
    pub devices: Vec<Device>,
}

/// Directory read from a TOML file
///
/// ```toml
/// [[sites]]
/// name = "London"
/// facility = "LD5"
/// slug = "london"
///
/// [[sites.devices]]
/// display_name = "edge-01"
/// address = "10.0.0.1"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Inventory {
    pub sites: Vec<InventorySite>,
}

impl Inventory {
    /// Load an inventory from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

impl Directory for Inventory {
    fn get_devices(&self, site: Option<&str>, query: Option<&str>) -> Vec<Device> {
        let query = query.map(str::to_lowercase);
        self.sites
            .iter()
            .filter(|s| site.is_none_or(|slug| s.slug == slug))
            .flat_map(|s| s.devices.iter())
            .filter(|device| {
                query
                    .as_deref()
                    .is_none_or(|q| device.display_name.to_lowercase().contains(q))
            })
            .cloned()
            .collect()
    }

    fn get_sites(&self) -> Vec<Site> {
        self.sites
            .iter()
            .filter(|site| !site.devices.is_empty())
            .map(|site| Site {
                name: site.name.clone(),
                facility: site.facility.clone(),
                slug: site.slug.clone(),
                device_count: site.devices.len() as i64,
            })
            .collect()
    }
}

/// Open the directory selected by `[directory]`
pub fn open_directory(settings: &DirectoryConfig) -> Result<Rc<dyn Directory>> {
    match settings.kind {
        DirectoryKind::Inventory => {
            info!(inventory = %settings.inventory.display(), "Using inventory file");
            let inventory = Inventory::load_from_file(&settings.inventory)?;
            Ok(Rc::new(inventory))
        }
        DirectoryKind::Netbox => {
            let url = settings.url.clone().ok_or_else(|| {
                ConfigError::Invalid("directory.url is required for a NetBox directory".into())
            })?;
            info!(%url, "Using NetBox directory");
            let directory = NetboxDirectory::new(
                url,
                Duration::from_secs(settings.timeout_secs),
                settings.token.clone(),
            )?;
            Ok(Rc::new(directory))
        }
    }
}
