//! Selectable menu rows
//!
//! A [`MenuOption`] carries the shared row data (text, identifier, owner,
//! exit flag) and an [`OptionKind`] that decides what happens on
//! selection. The engine always drives a selection through the same
//! sequence: [`MenuOption::setup`], [`MenuOption::action`],
//! [`MenuOption::clean_up`], [`MenuOption::get_return`].

use crate::session::SessionLauncher;
use crate::tui::handoff::Handoff;
use crate::tui::state::node::{MenuTree, NodeId};
use crate::tui::terminal::MenuTerminal;
use std::fmt;
use std::io;
use std::rc::Rc;
use tracing::{info, warn};

/// Exit status recorded when a session could not be launched at all
pub const LAUNCH_FAILED: i32 = -1;

/// Value produced by a selected option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnValue {
    /// Exit status of an external program
    Status(i32),
    /// Free-form value from an in-process action
    Text(String),
}

/// In-process behaviour of an action row
pub type ActionFn = Box<dyn FnMut() -> Option<ReturnValue>>;

/// Produces fresh rows for a submenu right before it is entered
pub trait Populate {
    /// Build the submenu's rows. The terminal is released while this runs,
    /// so implementations may prompt the operator.
    fn populate(&mut self, terminal: &mut dyn MenuTerminal) -> io::Result<Vec<MenuOption>>;
}

/// What the engine does once an option's action has run
#[derive(Debug)]
pub enum Step {
    /// Selection is finished, run the cleanup
    Done,
    /// Suspend the current menu and run this child until it exits
    Enter(NodeId),
    /// Replace the child's rows, then enter it if any were produced
    Populated {
        child: NodeId,
        options: Vec<MenuOption>,
    },
}

/// Opens a child menu
pub struct Submenu {
    child: NodeId,
    populate: Option<Box<dyn Populate>>,
    handoff: Handoff,
}

/// Hands the whole terminal to a remote session
pub struct ExternalProcess {
    target: Option<String>,
    username: Option<String>,
    launcher: Rc<dyn SessionLauncher>,
    handoff: Handoff,
    last_status: Option<i32>,
}

impl ExternalProcess {
    pub fn new(launcher: Rc<dyn SessionLauncher>) -> Self {
        Self {
            target: None,
            username: None,
            launcher,
            handoff: Handoff::default(),
            last_status: None,
        }
    }

    /// Connect to a fixed target instead of prompting for one
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Use this username instead of prompting for one
    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = username;
        self
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Exit status of the most recent launch
    pub fn last_status(&self) -> Option<i32> {
        self.last_status
    }

    fn run(&mut self, terminal: &mut dyn MenuTerminal) {
        let target = match &self.target {
            Some(target) => target.clone(),
            None => match terminal.prompt("Hostname/IP Address: ") {
                Ok(target) => target,
                Err(e) => {
                    warn!(error = %e, "Failed to read target");
                    self.last_status = Some(LAUNCH_FAILED);
                    return;
                }
            },
        };
        let target = target.trim();
        if target.is_empty() {
            info!("No target entered, skipping launch");
            return;
        }

        let username = match &self.username {
            Some(username) => username.clone(),
            None => match terminal.prompt("Username: ") {
                Ok(username) => username.trim().to_string(),
                Err(e) => {
                    warn!(error = %e, "Failed to read username");
                    self.last_status = Some(LAUNCH_FAILED);
                    return;
                }
            },
        };

        info!(target, username = %username, "Launching session");
        let status = match self.launcher.launch(target, &username) {
            Ok(code) => code,
            Err(e) => {
                warn!(target, error = %e, "Session launch failed");
                LAUNCH_FAILED
            }
        };
        info!(target, status, "Session ended");
        self.last_status = Some(status);
    }
}

/// Behaviour attached to a row
pub enum OptionKind {
    /// Arbitrary in-process behaviour, no terminal takeover
    Action {
        run: ActionFn,
        last: Option<ReturnValue>,
    },
    /// Blocking descent into a child menu
    Submenu(Submenu),
    /// Leaves the owning menu
    Exit,
    /// Runs an external interactive program
    External(ExternalProcess),
}

impl fmt::Debug for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKind::Action { last, .. } => f.debug_struct("Action").field("last", last).finish(),
            OptionKind::Submenu(submenu) => f
                .debug_struct("Submenu")
                .field("child", &submenu.child)
                .field("populates", &submenu.populate.is_some())
                .finish(),
            OptionKind::Exit => f.write_str("Exit"),
            OptionKind::External(external) => f
                .debug_struct("External")
                .field("target", &external.target)
                .field("last_status", &external.last_status)
                .finish(),
        }
    }
}

/// One selectable row
#[derive(Debug)]
pub struct MenuOption {
    text: String,
    identifier: Option<String>,
    owner: Option<NodeId>,
    should_exit: bool,
    kind: OptionKind,
}

impl MenuOption {
    fn with_kind(text: impl Into<String>, kind: OptionKind) -> Self {
        Self {
            text: text.into(),
            identifier: None,
            owner: None,
            should_exit: false,
            kind,
        }
    }

    /// Row that runs a closure in-process
    pub fn in_process<F>(text: impl Into<String>, run: F) -> Self
    where
        F: FnMut() -> Option<ReturnValue> + 'static,
    {
        Self::with_kind(
            text,
            OptionKind::Action {
                run: Box::new(run),
                last: None,
            },
        )
    }

    /// Row that opens `child`
    pub fn submenu(text: impl Into<String>, child: NodeId) -> Self {
        Self::with_kind(
            text,
            OptionKind::Submenu(Submenu {
                child,
                populate: None,
                handoff: Handoff::default(),
            }),
        )
    }

    /// Row that refills `child` through `populate` before opening it
    pub fn populating(
        text: impl Into<String>,
        child: NodeId,
        populate: impl Populate + 'static,
    ) -> Self {
        Self::with_kind(
            text,
            OptionKind::Submenu(Submenu {
                child,
                populate: Some(Box::new(populate)),
                handoff: Handoff::default(),
            }),
        )
    }

    /// Row that hands the terminal to an external program
    pub fn external(text: impl Into<String>, process: ExternalProcess) -> Self {
        Self::with_kind(text, OptionKind::External(process))
    }

    /// The exit entry; only [`MenuTree`] creates these
    pub(crate) fn exit() -> Self {
        let mut option = Self::with_kind("Exit", OptionKind::Exit);
        option.should_exit = true;
        option
    }

    /// Show a stable identifier (an address, a facility) next to the text
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Leave the owning menu once this row's selection completes
    pub fn exiting(mut self) -> Self {
        self.should_exit = true;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: NodeId) {
        self.owner = Some(owner);
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub fn kind(&self) -> &OptionKind {
        &self.kind
    }

    pub fn is_exit(&self) -> bool {
        matches!(self.kind, OptionKind::Exit)
    }

    /// Child menu opened by this row
    pub fn child(&self) -> Option<NodeId> {
        match &self.kind {
            OptionKind::Submenu(submenu) => Some(submenu.child),
            _ => None,
        }
    }

    /// Row text as drawn at position `index`
    pub fn render_label(&self, index: usize, tree: &MenuTree) -> String {
        match (&self.kind, self.owner) {
            (OptionKind::Exit, Some(owner)) => format!("{} - {}", index + 1, tree.exit_text(owner)),
            _ => match &self.identifier {
                Some(identifier) => format!("{} - {}: {}", index + 1, self.text, identifier),
                None => format!("{} - {}", index + 1, self.text),
            },
        }
    }

    /// Prepare the terminal before the action runs
    pub fn setup(&mut self, terminal: &mut dyn MenuTerminal) -> io::Result<()> {
        match &mut self.kind {
            OptionKind::Submenu(submenu) if submenu.populate.is_some() => {
                submenu.handoff.acquire(terminal)
            }
            OptionKind::Submenu(submenu) => submenu.handoff.suspend(terminal),
            OptionKind::External(external) => external.handoff.acquire(terminal),
            OptionKind::Action { .. } | OptionKind::Exit => Ok(()),
        }
    }

    /// Run the row's behaviour
    pub fn action(&mut self, terminal: &mut dyn MenuTerminal) -> io::Result<Step> {
        match &mut self.kind {
            OptionKind::Action { run, last } => {
                *last = run();
                Ok(Step::Done)
            }
            OptionKind::Submenu(submenu) => match submenu.populate.as_mut() {
                Some(populate) => {
                    let options = populate.populate(terminal).unwrap_or_else(|e| {
                        warn!(error = %e, "Failed to populate menu");
                        Vec::new()
                    });
                    Ok(Step::Populated {
                        child: submenu.child,
                        options,
                    })
                }
                None => Ok(Step::Enter(submenu.child)),
            },
            OptionKind::Exit => Ok(Step::Done),
            OptionKind::External(external) => {
                external.run(terminal);
                Ok(Step::Done)
            }
        }
    }

    /// Give the screen back to the menu in the middle of a selection, used
    /// when a populated submenu is about to be entered
    pub fn resume(&mut self, terminal: &mut dyn MenuTerminal) -> io::Result<()> {
        match &mut self.kind {
            OptionKind::Submenu(submenu) => submenu.handoff.release(terminal),
            OptionKind::External(external) => external.handoff.release(terminal),
            OptionKind::Action { .. } | OptionKind::Exit => Ok(()),
        }
    }

    /// Restore the terminal after the action
    pub fn clean_up(&mut self, terminal: &mut dyn MenuTerminal) -> io::Result<()> {
        self.resume(terminal)
    }

    /// Value reported to the owning menu once the selection completes
    pub fn get_return(&self, tree: &MenuTree) -> Option<ReturnValue> {
        match &self.kind {
            OptionKind::Action { last, .. } => last.clone(),
            OptionKind::Submenu(submenu) => tree.node(submenu.child).returned().cloned(),
            OptionKind::External(external) => external.last_status.map(ReturnValue::Status),
            OptionKind::Exit => self
                .owner
                .and_then(|owner| tree.node(owner).returned().cloned()),
        }
    }
}
