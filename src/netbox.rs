//! NetBox directory
//!
//! Reads devices and sites from the NetBox REST API. Addresses come back in
//! CIDR form and stacked devices carry a member suffix (`edge-01-2`); both
//! are stripped so every row is a plain hostname and a connectable address.

use crate::directory::{Device, Directory, Site};
use crate::error::Result;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

lazy_static! {
    /// Prefix length of a CIDR address: `/24`
    static ref PREFIX_LENGTH: Regex = Regex::new(r"/\d+$").unwrap();

    /// Member number of a stacked device: `-2`
    static ref MEMBER_SUFFIX: Regex = Regex::new(r"-\d$").unwrap();
}

/// Strip a trailing `/<digits>` prefix length
pub fn strip_prefix_length(address: &str) -> String {
    PREFIX_LENGTH.replace(address, "").into_owned()
}

/// Strip a trailing `-<digit>` member number
pub fn strip_member_suffix(name: &str) -> String {
    MEMBER_SUFFIX.replace(name, "").into_owned()
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct PrimaryIp {
    address: String,
}

#[derive(Debug, Deserialize)]
struct NetboxDevice {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    display: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    primary_ip: Option<PrimaryIp>,
}

impl NetboxDevice {
    fn into_device(self) -> Option<Device> {
        let address = self.primary_ip?.address;
        let name = self.display_name.or(self.display).or(self.name)?;
        Some(Device {
            display_name: strip_member_suffix(&name),
            address: strip_prefix_length(&address),
        })
    }
}

#[derive(Debug, Deserialize)]
struct NetboxSite {
    name: String,
    #[serde(default)]
    facility: String,
    slug: String,
    #[serde(default)]
    count_devices: i64,
}

/// Query parameters of a device listing. A site filter wins over a search.
pub fn device_params(site: Option<&str>, query: Option<&str>) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("limit", "0".to_string()),
        ("has_primary_ip", "True".to_string()),
    ];
    match (site, query) {
        (Some(site), _) => params.push(("site", site.to_string())),
        (None, Some(query)) => params.push(("q", query.to_string())),
        (None, None) => {}
    }
    params
}

/// Directory backed by a NetBox server
#[derive(Debug, Clone)]
pub struct NetboxDirectory {
    base_url: String,
    token: Option<String>,
    client: reqwest::blocking::Client,
}

impl NetboxDirectory {
    /// `base_url` is the API root, e.g. `http://netbox.example.com/api/`
    pub fn new(base_url: impl Into<String>, timeout: Duration, token: Option<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            token,
            client,
        })
    }

    /// Full URL of an API endpoint such as `dcim/sites/`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn fetch<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<Vec<T>> {
        let url = self.endpoint(path);
        debug!(%url, ?params, "NetBox request");

        let mut request = self.client.get(&url).query(params);
        if let Some(token) = self.token.as_deref() {
            request = request.header("Authorization", format!("Token {token}"));
        }
        let body = request.send()?.error_for_status()?.text()?;
        let page: Page<T> = serde_json::from_str(&body)?;
        Ok(page.results)
    }
}

impl Directory for NetboxDirectory {
    fn get_devices(&self, site: Option<&str>, query: Option<&str>) -> Vec<Device> {
        match self.fetch::<NetboxDevice>("dcim/devices/", &device_params(site, query)) {
            Ok(records) => records
                .into_iter()
                .filter_map(NetboxDevice::into_device)
                .collect(),
            Err(e) => {
                warn!(error = %e, ?site, ?query, "Failed to fetch devices from NetBox");
                Vec::new()
            }
        }
    }

    fn get_sites(&self) -> Vec<Site> {
        let params = [("limit", "0".to_string())];
        match self.fetch::<NetboxSite>("dcim/sites/", &params) {
            Ok(records) => records
                .into_iter()
                .filter(|site| site.count_devices > 0)
                .map(|site| Site {
                    name: site.name,
                    facility: site.facility,
                    slug: site.slug,
                    device_count: site.count_devices,
                })
                .collect(),
            Err(e) => {
                warn!(error = %e, "Failed to fetch sites from NetBox");
                Vec::new()
            }
        }
    }
}
