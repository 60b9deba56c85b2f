//! Builds the jumpbox menu tree from directory data
//!
//! ```text
//! Jumpbox Main
//! ├── Search          prompt, then Search Results
//! ├── Sites           Devices by Site → one menu per site
//! ├── Quick Connect   prompt for an address
//! └── All Devices     every device
//! ```

use crate::config::MenuConfig;
use crate::directory::{Device, Directory};
use crate::error::Result;
use crate::session::SessionLauncher;
use crate::tui::state::{ExternalProcess, MenuNode, MenuOption, MenuTree, NodeId, Populate};
use crate::tui::terminal::MenuTerminal;
use std::io;
use std::rc::Rc;
use tracing::info;

const DEVICE_SUBTITLE: &str = "Select a device...";

/// Shared pieces every device row needs
#[derive(Clone)]
pub struct Connector {
    launcher: Rc<dyn SessionLauncher>,
    username: Option<String>,
}

impl Connector {
    pub fn new(launcher: Rc<dyn SessionLauncher>, username: Option<String>) -> Self {
        Self { launcher, username }
    }

    /// Row that connects to one device
    pub fn device_option(&self, device: &Device) -> MenuOption {
        let process = ExternalProcess::new(Rc::clone(&self.launcher))
            .with_target(device.address.clone())
            .with_username(self.username.clone());
        MenuOption::external(device.display_name.clone(), process)
            .with_identifier(device.address.clone())
    }

    /// Row that asks for an address and connects to it
    pub fn quick_connect(&self, text: &str) -> MenuOption {
        let process =
            ExternalProcess::new(Rc::clone(&self.launcher)).with_username(self.username.clone());
        MenuOption::external(text, process)
    }
}

/// Fills the search results menu from a hostname search
pub struct DeviceSearch {
    directory: Rc<dyn Directory>,
    connector: Connector,
}

impl DeviceSearch {
    pub fn new(directory: Rc<dyn Directory>, connector: Connector) -> Self {
        Self {
            directory,
            connector,
        }
    }
}

impl Populate for DeviceSearch {
    fn populate(&mut self, terminal: &mut dyn MenuTerminal) -> io::Result<Vec<MenuOption>> {
        let query = terminal.prompt("Search: ")?;
        let query = query.trim();
        let devices = self
            .directory
            .get_devices(None, (!query.is_empty()).then_some(query));
        info!(query, matches = devices.len(), "Device search");

        Ok(devices
            .iter()
            .map(|device| self.connector.device_option(device))
            .collect())
    }
}

/// Build the full menu and return it with its root
pub fn build_menu(
    directory: Rc<dyn Directory>,
    connector: Connector,
    settings: &MenuConfig,
) -> Result<(MenuTree, NodeId)> {
    let mut tree = MenuTree::new();
    let main = tree.add_node(
        MenuNode::new(settings.title.clone())
            .with_subtitle(settings.subtitle.clone())
            .with_exit(settings.show_exit),
    );

    let search = tree.add_node(MenuNode::new("Search Results").with_subtitle(DEVICE_SUBTITLE));
    tree.append_option(
        main,
        MenuOption::populating(
            "Search",
            search,
            DeviceSearch::new(Rc::clone(&directory), connector.clone()),
        ),
    )?;

    let sites = tree.add_node(MenuNode::new("Devices by Site").with_subtitle("Select a site..."));
    for site in directory.get_sites() {
        let site_menu = tree.add_node(MenuNode::new(site.name.clone()).with_subtitle(DEVICE_SUBTITLE));
        for device in directory.get_devices(Some(&site.slug), None) {
            tree.append_option(site_menu, connector.device_option(&device))?;
        }
        tree.append_option(
            sites,
            MenuOption::submenu(site.name, site_menu).with_identifier(site.facility),
        )?;
    }
    tree.append_option(main, MenuOption::submenu("Sites", sites))?;

    tree.append_option(main, connector.quick_connect("Quick Connect"))?;

    let all = tree.add_node(MenuNode::new("All Devices").with_subtitle(DEVICE_SUBTITLE));
    let devices = directory.get_devices(None, None);
    info!(devices = devices.len(), "Loaded device directory");
    for device in &devices {
        tree.append_option(all, connector.device_option(device))?;
    }
    tree.append_option(main, MenuOption::submenu("All Devices", all))?;

    Ok((tree, main))
}
