//! Menu run loop
//!
//! [`MenuApp`] drives a [`MenuTree`] through an explicit [`ActiveStack`].
//! Entering a submenu pushes a frame and leaves the parent's selection
//! suspended on that frame; when the child exits its frame is popped and
//! the parent's selection is finished (cleanup, return value, exit flag).
//! Only the top frame reads input and draws.

use crate::error::Result;
use crate::tui::event::MenuInput;
use crate::tui::input::{Command, dispatch};
use crate::tui::render::draw_node;
use crate::tui::state::{
    ActiveStack, MenuOption, MenuTree, NodeId, NodeState, ReturnValue, Selectable, Step,
};
use crate::tui::terminal::MenuTerminal;
use ratatui::Frame;
use tracing::{debug, info, warn};

/// Menu engine bound to one terminal
pub struct MenuApp<T: MenuTerminal> {
    terminal: T,
    tree: MenuTree,
    stack: ActiveStack,
}

impl<T: MenuTerminal> MenuApp<T> {
    pub fn new(terminal: T, tree: MenuTree) -> Self {
        Self {
            terminal,
            tree,
            stack: ActiveStack::new(),
        }
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    pub fn stack(&self) -> &ActiveStack {
        &self.stack
    }

    /// Menu currently owning the terminal
    pub fn active(&self) -> Option<NodeId> {
        self.stack.active()
    }

    /// Hand the terminal back to the caller
    pub fn into_terminal(self) -> T {
        self.terminal
    }

    /// Run `root` until its loop returns, then report its last value
    pub fn run(&mut self, root: NodeId) -> Result<Option<ReturnValue>> {
        self.start(root, None)?;
        while self.step()? {}
        Ok(self.tree.node(root).returned().cloned())
    }

    /// Read and apply one input. Returns `false` once no menu is running.
    pub fn step(&mut self) -> Result<bool> {
        if self.stack.is_empty() {
            return Ok(false);
        }
        let input = self.terminal.read_input()?;
        self.handle_input(input)?;
        Ok(!self.stack.is_empty())
    }

    /// Push `id` onto the stack and give it the terminal.
    /// `show_exit` overrides the menu's own exit setting for this run.
    pub fn start(&mut self, id: NodeId, show_exit: Option<bool>) -> Result<()> {
        self.tree.check(id)?;
        self.stack.push(id)?;
        self.tree.prepare(id, show_exit);
        let node = self.tree.node_mut(id);
        node.set_state(NodeState::Active);
        info!(
            menu = node.title(),
            options = node.len(),
            depth = self.stack.depth(),
            "Entering menu"
        );
        self.terminal.clear_surface()?;
        self.redraw()
    }

    /// Apply one input to the active menu
    pub fn handle_input(&mut self, input: MenuInput) -> Result<()> {
        let Some(id) = self.stack.active() else {
            return Ok(());
        };
        match dispatch(self.tree.node_mut(id), input) {
            Command::Redraw => {
                debug!(cursor = self.tree.node(id).cursor(), "Cursor moved");
                self.redraw()
            }
            Command::Select => self.select(id),
            Command::Reinitialize { width, height } => {
                debug!(width, height, "Terminal resized");
                self.terminal.reinitialize(width, height)?;
                self.redraw()
            }
            Command::Ignore => Ok(()),
        }
    }

    /// Append a row to `id`, redrawing if that menu is on screen
    pub fn append_option(&mut self, id: NodeId, option: MenuOption) -> Result<()> {
        self.tree.append_option(id, option)?;
        if self.stack.active() == Some(id) {
            self.redraw()?;
        }
        Ok(())
    }

    /// Empty `id`, redrawing if that menu is on screen
    pub fn reset_options(&mut self, id: NodeId) -> Result<()> {
        self.tree.reset_options(id);
        if self.stack.active() == Some(id) {
            self.redraw()?;
        }
        Ok(())
    }

    /// Draw the top menu
    pub fn redraw(&mut self) -> Result<()> {
        let Some(id) = self.stack.active() else {
            return Ok(());
        };
        let tree = &self.tree;
        self.terminal
            .draw(&mut |frame: &mut Frame<'_>| draw_node(frame, tree, id))?;
        Ok(())
    }

    fn select(&mut self, id: NodeId) -> Result<()> {
        let node = self.tree.node_mut(id);
        let index = node.cursor();
        node.record_selection(index);
        node.set_state(NodeState::Suspended);

        let Some(option) = node.option_mut(index) else {
            node.set_state(NodeState::Active);
            return Ok(());
        };
        debug!(index, option = option.text(), "Selected");
        let outcome = option
            .setup(&mut self.terminal)
            .and_then(|()| option.action(&mut self.terminal));
        let step = match outcome {
            Ok(step) => step,
            Err(e) => {
                // Give the terminal back before reporting
                warn!(index, error = %e, "Selection failed");
                self.finish_selection(id, index)?;
                self.redraw()?;
                return Err(e.into());
            }
        };

        match step {
            Step::Done => self.complete(id, index),
            Step::Enter(child) => self.enter(index, child),
            Step::Populated { child, options } => {
                self.tree.reset_options(child);
                for option in options {
                    self.tree.append_option(child, option)?;
                }
                if self.tree.node(child).is_empty() {
                    info!(menu = self.tree.node(child).title(), "Nothing to show");
                    return self.complete(id, index);
                }
                if let Some(option) = self.tree.node_mut(id).option_mut(index) {
                    option.resume(&mut self.terminal)?;
                }
                self.enter(index, child)
            }
        }
    }

    fn enter(&mut self, index: usize, child: NodeId) -> Result<()> {
        if let Some(frame) = self.stack.top_mut() {
            frame.suspended_on = Some(index);
        }
        self.start(child, None)
    }

    /// Finish the selection of `index` in `id` and redraw or unwind
    fn complete(&mut self, id: NodeId, index: usize) -> Result<()> {
        if self.finish_selection(id, index)? {
            self.unwind()
        } else {
            self.redraw()
        }
    }

    /// Cleanup, capture the return value and exit flag. Returns the flag.
    fn finish_selection(&mut self, id: NodeId, index: usize) -> Result<bool> {
        let should_exit = match self.tree.node_mut(id).option_mut(index) {
            Some(option) => {
                option.clean_up(&mut self.terminal)?;
                option.should_exit()
            }
            None => false,
        };
        let returned = self
            .tree
            .node(id)
            .option(index)
            .and_then(|option| option.get_return(&self.tree));

        let node = self.tree.node_mut(id);
        node.record_outcome(returned, should_exit);
        node.set_state(if should_exit {
            NodeState::Terminated
        } else {
            NodeState::Active
        });
        Ok(should_exit)
    }

    /// Pop exiting frames until a menu stays on screen or the stack is empty
    fn unwind(&mut self) -> Result<()> {
        while let Some(frame) = self.stack.pop() {
            let node = self.tree.node_mut(frame.node);
            node.set_state(NodeState::Terminated);
            info!(menu = node.title(), depth = self.stack.depth(), "Leaving menu");
            self.terminal.clear_surface()?;

            let Some(parent) = self.stack.top_mut() else {
                return Ok(());
            };
            let parent_id = parent.node;
            let Some(index) = parent.suspended_on.take() else {
                self.tree.node_mut(parent_id).set_state(NodeState::Active);
                return self.redraw();
            };
            if !self.finish_selection(parent_id, index)? {
                return self.redraw();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::session::{LaunchError, SessionLauncher};
    use crate::tui::state::{ExternalProcess, MenuNode, Populate};
    use crate::tui::terminal::{MenuTerminal, TerminalMode};
    use crate::tui::testing::{ScriptedTerminal, TermOp};
    use std::io;
    use std::rc::Rc;

    /// Main menu with a device submenu and two actions
    fn tree() -> (MenuTree, NodeId, NodeId) {
        let mut tree = MenuTree::new();
        let main = tree.add_node(MenuNode::new("Main").with_subtitle("Select an option..."));
        let devices = tree.add_node(MenuNode::new("Devices").with_subtitle("Select a device..."));
        for name in ["edge-01", "edge-02", "core-01"] {
            tree.append_option(devices, MenuOption::in_process(name, || None))
                .unwrap();
        }
        tree.append_option(main, MenuOption::submenu("Devices", devices))
            .unwrap();
        tree.append_option(
            main,
            MenuOption::in_process("Status", || Some(ReturnValue::Text("ok".to_string()))),
        )
        .unwrap();
        (tree, main, devices)
    }

    struct Results(Vec<&'static str>);

    impl Populate for Results {
        fn populate(&mut self, terminal: &mut dyn MenuTerminal) -> io::Result<Vec<MenuOption>> {
            let query = terminal.prompt("Search: ")?;
            Ok(self
                .0
                .iter()
                .filter(|name| name.contains(query.trim()))
                .map(|name| MenuOption::in_process(*name, || None))
                .collect())
        }
    }

    #[test]
    fn test_submenu_takes_and_returns_focus() {
        let (tree, main, devices) = tree();
        let mut app = MenuApp::new(ScriptedTerminal::new(40, 16), tree);
        app.start(main, None).unwrap();

        app.handle_input(MenuInput::Enter).unwrap();
        assert_eq!(app.active(), Some(devices));
        assert_eq!(app.tree().node(main).state(), NodeState::Suspended);
        assert_eq!(app.tree().node(devices).state(), NodeState::Active);
        assert!(app.terminal().lines()[2].contains("Devices"));
        assert!(app.terminal().lines()[8].contains("4 - Return to Main menu"));

        app.handle_input(MenuInput::Down).unwrap();
        app.handle_input(MenuInput::Down).unwrap();
        assert_eq!(app.tree().node(devices).cursor(), 2);
        assert_eq!(app.tree().node(main).cursor(), 0);

        app.handle_input(MenuInput::Left).unwrap();
        assert_eq!(app.active(), Some(main));
        assert_eq!(app.stack().depth(), 1);
        assert_eq!(app.tree().node(devices).state(), NodeState::Terminated);
        assert_eq!(app.tree().node(main).state(), NodeState::Active);
        assert_eq!(app.tree().node(main).cursor(), 0);
        assert_eq!(app.tree().node(main).selected(), Some(0));
        assert!(app.terminal().lines()[2].contains("Main"));
    }

    #[test]
    fn test_child_restarts_with_fresh_cursor() {
        let (tree, main, devices) = tree();
        let terminal = ScriptedTerminal::new(40, 16).with_inputs([
            MenuInput::Enter,
            MenuInput::Down,
            MenuInput::Left,
            MenuInput::Enter,
        ]);
        let mut app = MenuApp::new(terminal, tree);
        app.start(main, None).unwrap();
        for _ in 0..4 {
            assert!(app.step().unwrap());
        }
        assert_eq!(app.active(), Some(devices));
        assert_eq!(app.tree().node(devices).cursor(), 0);
    }

    #[test]
    fn test_empty_menu_ignores_navigation() {
        let mut tree = MenuTree::new();
        let root = tree.add_node(MenuNode::new("Empty"));
        let mut app = MenuApp::new(ScriptedTerminal::new(30, 10), tree);
        app.start(root, Some(false)).unwrap();
        let draws = app.terminal().draws();

        for input in [
            MenuInput::Down,
            MenuInput::Up,
            MenuInput::Enter,
            MenuInput::Right,
            MenuInput::Left,
            MenuInput::Digit(1),
        ] {
            app.handle_input(input).unwrap();
        }
        assert_eq!(app.terminal().draws(), draws);
        assert_eq!(app.active(), Some(root));
        assert!(app.tree().node(root).is_empty());
        assert_eq!(app.tree().node(root).selected(), None);
    }

    #[test]
    fn test_resize_reinitializes_and_stays_active() {
        let (tree, main, _) = tree();
        let mut app = MenuApp::new(ScriptedTerminal::new(40, 16), tree);
        app.start(main, None).unwrap();
        app.handle_input(MenuInput::Down).unwrap();
        app.terminal_mut().take_ops();

        app.handle_input(MenuInput::Resize(50, 8)).unwrap();
        assert_eq!(app.terminal().ops(), &[TermOp::Reinitialize(50, 8)]);
        assert_eq!(app.terminal().buffer().area.width, 50);
        assert_eq!(app.tree().node(main).cursor(), 1);
        assert_eq!(app.tree().node(main).state(), NodeState::Active);
    }

    #[test]
    fn test_left_on_root_exits_loop() {
        let (tree, main, _) = tree();
        let terminal = ScriptedTerminal::new(40, 16).with_inputs([MenuInput::Left]);
        let mut app = MenuApp::new(terminal, tree);

        assert_eq!(app.run(main).unwrap(), None);
        assert!(app.stack().is_empty());
        assert_eq!(app.tree().node(main).state(), NodeState::Terminated);
        assert!(app.tree().node(main).should_exit());
    }

    #[test]
    fn test_run_reports_last_value() {
        let (tree, main, _) = tree();
        let terminal = ScriptedTerminal::new(40, 16).with_inputs([
            MenuInput::Digit(2),
            MenuInput::Enter,
            MenuInput::Digit(3),
            MenuInput::Enter,
        ]);
        let mut app = MenuApp::new(terminal, tree);
        assert_eq!(
            app.run(main).unwrap(),
            Some(ReturnValue::Text("ok".to_string()))
        );
    }

    #[test]
    fn test_exiting_action_leaves_menu() {
        let mut tree = MenuTree::new();
        let root = tree.add_node(MenuNode::new("Main"));
        tree.append_option(
            root,
            MenuOption::in_process("Done", || Some(ReturnValue::Text("bye".to_string()))).exiting(),
        )
        .unwrap();
        let terminal = ScriptedTerminal::new(30, 10).with_inputs([MenuInput::Enter]);
        let mut app = MenuApp::new(terminal, tree);

        assert_eq!(
            app.run(root).unwrap(),
            Some(ReturnValue::Text("bye".to_string()))
        );
    }

    #[test]
    fn test_handoff_round_trip_restores_frame() {
        let (tree, main, devices) = tree();
        let mut app = MenuApp::new(ScriptedTerminal::new(40, 16), tree);
        app.start(main, None).unwrap();
        let before = app.terminal().buffer().clone();
        let mode = app.terminal().mode();

        app.handle_input(MenuInput::Enter).unwrap();
        assert_eq!(app.active(), Some(devices));
        app.handle_input(MenuInput::Digit(4)).unwrap();
        app.handle_input(MenuInput::Enter).unwrap();

        assert_eq!(app.active(), Some(main));
        assert_eq!(app.terminal().buffer(), &before);
        assert_eq!(app.terminal().mode(), mode);
        assert!(!app.terminal().cursor_visible());
    }

    #[test]
    fn test_plain_submenu_handoff_sequence() {
        let (tree, main, _) = tree();
        let mut app = MenuApp::new(ScriptedTerminal::new(40, 16), tree);
        app.start(main, None).unwrap();
        let mode = app.terminal().mode();
        app.terminal_mut().take_ops();

        app.handle_input(MenuInput::Enter).unwrap();
        assert_eq!(
            app.terminal_mut().take_ops(),
            vec![TermOp::SaveMode, TermOp::ClearSurface, TermOp::ClearSurface]
        );

        app.handle_input(MenuInput::Left).unwrap();
        assert_eq!(
            app.terminal_mut().take_ops(),
            vec![
                TermOp::ClearSurface,
                TermOp::ClearSurface,
                TermOp::RestoreMode(mode),
                TermOp::ShowCursor,
                TermOp::HideCursor,
            ]
        );
    }

    #[test]
    fn test_search_results_are_entered() {
        let mut tree = MenuTree::new();
        let main = tree.add_node(MenuNode::new("Main"));
        let results = tree.add_node(MenuNode::new("Search Results"));
        tree.append_option(
            main,
            MenuOption::populating(
                "Search",
                results,
                Results(vec!["edge-01", "edge-02", "core-01"]),
            ),
        )
        .unwrap();

        let terminal = ScriptedTerminal::new(40, 16).with_answers(["edge"]);
        let mut app = MenuApp::new(terminal, tree);
        app.start(main, None).unwrap();
        let mode = app.terminal().mode();
        app.terminal_mut().take_ops();

        app.handle_input(MenuInput::Enter).unwrap();
        assert_eq!(app.terminal().prompts(), &["Search: ".to_string()]);
        assert_eq!(
            app.terminal_mut().take_ops(),
            vec![
                TermOp::SaveMode,
                TermOp::ClearPhysical,
                TermOp::ClearSurface,
                TermOp::ClearSurface,
                TermOp::RestoreMode(mode),
                TermOp::ShowCursor,
                TermOp::HideCursor,
                TermOp::ClearSurface,
            ]
        );
        assert_eq!(app.active(), Some(results));
        let labels: Vec<String> = (0..app.tree().node(results).len())
            .filter_map(|index| app.tree().render_label(results, index))
            .collect();
        assert_eq!(
            labels,
            vec!["1 - edge-01", "2 - edge-02", "3 - Return to Main menu"]
        );
    }

    #[test]
    fn test_search_without_results_stays_put() {
        let mut tree = MenuTree::new();
        let main = tree.add_node(MenuNode::new("Main"));
        let results = tree.add_node(MenuNode::new("Search Results"));
        tree.append_option(
            main,
            MenuOption::populating("Search", results, Results(vec!["edge-01"])),
        )
        .unwrap();

        let terminal = ScriptedTerminal::new(40, 16).with_answers(["nothing"]);
        let mut app = MenuApp::new(terminal, tree);
        app.start(main, None).unwrap();
        app.handle_input(MenuInput::Enter).unwrap();

        assert_eq!(app.active(), Some(main));
        assert!(app.tree().node(results).is_empty());
        assert_eq!(app.tree().node(results).state(), NodeState::Idle);
        assert_eq!(
            app.terminal().mode(),
            TerminalMode {
                raw: true,
                alternate_screen: true
            }
        );
    }

    #[test]
    fn test_append_redraws_active_menu() {
        let (tree, main, devices) = tree();
        let mut app = MenuApp::new(ScriptedTerminal::new(40, 16), tree);
        app.start(main, None).unwrap();
        let draws = app.terminal().draws();

        app.append_option(devices, MenuOption::in_process("spare", || None))
            .unwrap();
        assert_eq!(app.terminal().draws(), draws);

        app.append_option(main, MenuOption::in_process("Reload", || None))
            .unwrap();
        assert_eq!(app.terminal().draws(), draws + 1);
        assert!(app.terminal().lines()[7].contains("3 - Reload"));
        assert!(app.terminal().lines()[8].contains("4 - Exit"));
    }

    #[test]
    fn test_running_menu_cannot_start_again() {
        let (tree, main, _) = tree();
        let mut app = MenuApp::new(ScriptedTerminal::new(40, 16), tree);
        app.start(main, None).unwrap();
        assert!(matches!(
            app.start(main, None),
            Err(Error::AlreadyActive(_))
        ));
        assert_eq!(app.stack().depth(), 1);
    }

    struct NoopLauncher;

    impl SessionLauncher for NoopLauncher {
        fn launch(&self, _target: &str, _username: &str) -> std::result::Result<i32, LaunchError> {
            Ok(0)
        }
    }

    #[test]
    fn test_failed_search_prompt_releases_terminal() {
        let mut tree = MenuTree::new();
        let main = tree.add_node(MenuNode::new("Main"));
        let results = tree.add_node(MenuNode::new("Search Results"));
        tree.append_option(
            main,
            MenuOption::populating("Search", results, Results(vec!["edge-01"])),
        )
        .unwrap();

        // No answer queued, so the prompt fails
        let mut app = MenuApp::new(ScriptedTerminal::new(40, 16), tree);
        app.start(main, None).unwrap();
        let mode = app.terminal().mode();
        app.terminal_mut().take_ops();

        app.handle_input(MenuInput::Enter).unwrap();
        assert_eq!(
            app.terminal_mut().take_ops(),
            vec![
                TermOp::SaveMode,
                TermOp::ClearPhysical,
                TermOp::ClearSurface,
                TermOp::ClearSurface,
                TermOp::RestoreMode(mode),
                TermOp::ShowCursor,
                TermOp::HideCursor,
            ]
        );
        assert_eq!(app.terminal().mode(), mode);
        assert_eq!(app.active(), Some(main));
        assert_eq!(app.tree().node(main).state(), NodeState::Active);
        assert_eq!(app.tree().node(results).state(), NodeState::Idle);
    }

    #[test]
    fn test_external_round_trip_restores_frame() {
        let mut tree = MenuTree::new();
        let main = tree.add_node(MenuNode::new("Main").with_subtitle("Select a device..."));
        let process = ExternalProcess::new(Rc::new(NoopLauncher))
            .with_target("10.0.0.1")
            .with_username(Some("ops".to_string()));
        tree.append_option(main, MenuOption::external("edge-01", process))
            .unwrap();

        let mut app = MenuApp::new(ScriptedTerminal::new(40, 16), tree);
        app.start(main, None).unwrap();
        let before = app.terminal().buffer().clone();
        let mode = app.terminal().mode();
        app.terminal_mut().take_ops();

        app.handle_input(MenuInput::Enter).unwrap();
        assert_eq!(
            app.terminal_mut().take_ops(),
            vec![
                TermOp::SaveMode,
                TermOp::ClearPhysical,
                TermOp::ClearSurface,
                TermOp::ClearSurface,
                TermOp::RestoreMode(mode),
                TermOp::ShowCursor,
                TermOp::HideCursor,
            ]
        );
        assert_eq!(app.terminal().buffer(), &before);
        assert_eq!(app.terminal().mode(), mode);
        assert!(!app.terminal().cursor_visible());
        assert_eq!(
            app.tree().node(main).returned(),
            Some(&ReturnValue::Status(0))
        );
    }

    #[test]
    fn test_exit_only_menu_leaves_on_exit() {
        let mut tree = MenuTree::new();
        let root = tree.add_node(MenuNode::new("Empty"));
        let mut app = MenuApp::new(ScriptedTerminal::new(30, 10), tree);
        app.start(root, None).unwrap();
        assert_eq!(app.tree().node(root).len(), 1);

        for input in [
            MenuInput::Down,
            MenuInput::Up,
            MenuInput::Resize(40, 12),
            MenuInput::Digit(2),
        ] {
            app.handle_input(input).unwrap();
            assert_eq!(app.tree().node(root).cursor(), 0);
            assert_eq!(app.active(), Some(root));
        }

        app.handle_input(MenuInput::Enter).unwrap();
        assert!(app.stack().is_empty());
        assert_eq!(app.tree().node(root).state(), NodeState::Terminated);
    }

    #[test]
    fn test_foreign_root_is_rejected() {
        let mut other = MenuTree::new();
        other.add_node(MenuNode::new("One"));
        let foreign = other.add_node(MenuNode::new("Two"));

        let (tree, _, _) = tree();
        let mut app = MenuApp::new(ScriptedTerminal::new(40, 16), tree);
        assert!(matches!(
            app.start(foreign, None),
            Err(Error::UnknownNode(_))
        ));
        assert!(app.stack().is_empty());
    }
}
