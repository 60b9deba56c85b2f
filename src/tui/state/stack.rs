//! Active-node stack
//!
//! Each frame is one running menu loop. Only the top frame reads input and
//! draws; frames beneath it are suspended inside a selection.

use crate::error::{Error, Result};
use crate::tui::state::node::NodeId;

/// One running menu loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunFrame {
    /// Menu driven by this frame
    pub node: NodeId,
    /// Row whose selection is waiting on the frame above
    pub suspended_on: Option<usize>,
}

/// Ordered frames, top of stack owns the terminal
#[derive(Debug, Default)]
pub struct ActiveStack {
    frames: Vec<RunFrame>,
}

impl ActiveStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new frame for `node`. A menu can only run once at a time.
    pub fn push(&mut self, node: NodeId) -> Result<()> {
        if self.contains(node) {
            return Err(Error::AlreadyActive(node.index()));
        }
        self.frames.push(RunFrame {
            node,
            suspended_on: None,
        });
        Ok(())
    }

    pub fn pop(&mut self) -> Option<RunFrame> {
        self.frames.pop()
    }

    pub fn top(&self) -> Option<&RunFrame> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut RunFrame> {
        self.frames.last_mut()
    }

    /// Menu currently reading input
    pub fn active(&self) -> Option<NodeId> {
        self.top().map(|frame| frame.node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.frames.iter().any(|frame| frame.node == node)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Menus from the root to the active one
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.frames.iter().map(|frame| frame.node)
    }
}
