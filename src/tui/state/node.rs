//! Menu screens and the arena that owns them
//!
//! Every [`MenuNode`] lives in a [`MenuTree`] and is addressed by a
//! [`NodeId`]. Parent links and option owners are plain ids, so the only
//! ownership edges are tree → node → option.

use crate::error::{Error, Result};
use crate::tui::state::option::{MenuOption, ReturnValue};
use crate::tui::state::selection::Selectable;

/// Handle to a node inside a [`MenuTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in its tree
    pub fn index(self) -> usize {
        self.0
    }
}

/// Lifecycle of a menu screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeState {
    /// Built but never started
    #[default]
    Idle,
    /// Reading input and owning the drawing surface
    Active,
    /// An option has taken the terminal
    Suspended,
    /// Its loop has returned
    Terminated,
}

/// One menu screen
#[derive(Debug)]
pub struct MenuNode {
    title: String,
    subtitle: Option<String>,
    options: Vec<MenuOption>,
    cursor: usize,
    selected: Option<usize>,
    returned: Option<ReturnValue>,
    should_exit: bool,
    show_exit: bool,
    parent: Option<NodeId>,
    state: NodeState,
}

impl MenuNode {
    /// Create a menu with the exit entry enabled
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            options: Vec::new(),
            cursor: 0,
            selected: None,
            returned: None,
            should_exit: false,
            show_exit: true,
            parent: None,
            state: NodeState::Idle,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Whether `start` adds the exit entry by default
    pub fn with_exit(mut self, show_exit: bool) -> Self {
        self.show_exit = show_exit;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn options(&self) -> &[MenuOption] {
        &self.options
    }

    pub fn option(&self, index: usize) -> Option<&MenuOption> {
        self.options.get(index)
    }

    pub(crate) fn option_mut(&mut self, index: usize) -> Option<&mut MenuOption> {
        self.options.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// The highlighted option, if any
    pub fn current_option(&self) -> Option<&MenuOption> {
        self.options.get(self.cursor)
    }

    /// Index of the last selected option
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn returned(&self) -> Option<&ReturnValue> {
        self.returned.as_ref()
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub fn shows_exit(&self) -> bool {
        self.show_exit
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: NodeState) {
        self.state = state;
    }

    pub(crate) fn record_selection(&mut self, index: usize) {
        self.selected = Some(index);
    }

    pub(crate) fn record_outcome(&mut self, returned: Option<ReturnValue>, should_exit: bool) {
        self.returned = returned;
        self.should_exit = should_exit;
    }

    /// Move the cursor down one row, wrapping to the top
    pub fn go_down(&mut self) {
        self.next();
    }

    /// Move the cursor up one row, wrapping to the bottom
    pub fn go_up(&mut self) {
        self.prev();
    }

    /// Move the cursor to the 1-based row `digit`.
    ///
    /// Returns `false` and leaves the cursor alone unless
    /// `1 <= digit <= min(9, len)`.
    pub fn jump_to_index(&mut self, digit: usize) -> bool {
        self.jump(digit)
    }

    /// Index of the exit entry, which is always the final row when present
    pub fn exit_index(&self) -> Option<usize> {
        match self.options.last() {
            Some(option) if option.is_exit() => Some(self.options.len() - 1),
            _ => None,
        }
    }

    /// Drop the trailing exit entry. Returns whether one was removed.
    pub fn remove_exit(&mut self) -> bool {
        if self.exit_index().is_none() {
            return false;
        }
        self.options.pop();
        self.clamp_cursor();
        true
    }

    fn clamp_cursor(&mut self) {
        if self.cursor >= self.options.len() {
            self.cursor = self.options.len().saturating_sub(1);
        }
    }
}

impl Selectable for MenuNode {
    fn count(&self) -> usize {
        self.options.len()
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_cursor(&mut self, index: usize) {
        self.cursor = index;
    }
}

/// Arena owning every menu of one process
#[derive(Debug, Default)]
pub struct MenuTree {
    nodes: Vec<MenuNode>,
}

impl MenuTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a node and hand back its id
    pub fn add_node(&mut self, node: MenuNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Checked lookup, for ids that may come from another tree
    pub fn get(&self, id: NodeId) -> Option<&MenuNode> {
        self.nodes.get(id.0)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Fail unless `id` belongs to this tree
    pub fn check(&self, id: NodeId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(Error::UnknownNode(id.0))
        }
    }

    /// Look up a node. Panics on an id this tree never handed out; use
    /// [`MenuTree::get`] for untrusted ids.
    pub fn node(&self, id: NodeId) -> &MenuNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut MenuNode {
        &mut self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Whether `ancestor` sits somewhere above `id`
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.node(id).parent;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.node(parent).parent;
        }
        false
    }

    /// Append an option to a menu, keeping the exit entry last.
    ///
    /// Submenu options adopt their child under `id`. Attaching a child that
    /// already hangs under another menu, or that would close a loop, fails.
    pub fn append_option(&mut self, id: NodeId, mut option: MenuOption) -> Result<()> {
        self.check(id)?;
        if let Some(child) = option.child() {
            self.check(child)?;
            if child == id || self.is_ancestor(child, id) {
                return Err(Error::Cycle {
                    parent: id.0,
                    child: child.0,
                });
            }
            if let Some(parent) = self.node(child).parent {
                if parent != id {
                    return Err(Error::AlreadyAttached {
                        parent: parent.0,
                        child: child.0,
                    });
                }
            }
            self.node_mut(child).parent = Some(id);
        }

        option.set_owner(id);
        let node = self.node_mut(id);
        let removed = node.remove_exit();
        node.options.push(option);
        if removed {
            self.add_exit(id);
        }
        Ok(())
    }

    /// Replace a menu's rows with nothing, ready to be repopulated
    pub fn reset_options(&mut self, id: NodeId) {
        let node = self.node_mut(id);
        node.options.clear();
        node.cursor = 0;
    }

    /// Append the exit entry unless it is already the final row
    pub fn add_exit(&mut self, id: NodeId) -> bool {
        let node = self.node_mut(id);
        if node.exit_index().is_some() {
            return false;
        }
        let mut exit = MenuOption::exit();
        exit.set_owner(id);
        node.options.push(exit);
        true
    }

    /// Reset a menu for a fresh run of its loop
    pub(crate) fn prepare(&mut self, id: NodeId, show_exit: Option<bool>) {
        let node = self.node_mut(id);
        node.cursor = 0;
        node.should_exit = false;
        let show_exit = show_exit.unwrap_or(node.show_exit);
        if show_exit {
            self.add_exit(id);
        } else {
            self.node_mut(id).remove_exit();
        }
    }

    /// Text of a menu's exit entry, derived from its current parent
    pub fn exit_text(&self, id: NodeId) -> String {
        match self.node(id).parent {
            Some(parent) => format!("Return to {} menu", self.node(parent).title),
            None => "Exit".to_string(),
        }
    }

    /// Display text for one row of a menu
    pub fn render_label(&self, id: NodeId, index: usize) -> Option<String> {
        self.node(id)
            .option(index)
            .map(|option| option.render_label(index, self))
    }
}
