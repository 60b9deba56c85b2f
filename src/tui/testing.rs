//! Scripted terminal for engine tests
//!
//! Draws into a ratatui `TestBackend`, replays queued inputs and prompt
//! answers, and records every handoff primitive it is asked to perform.

use crate::tui::event::MenuInput;
use crate::tui::terminal::{MenuTerminal, TerminalMode};
use ratatui::{Frame, Terminal, backend::TestBackend, buffer::Buffer};
use std::collections::VecDeque;
use std::io;

/// A terminal primitive, in the order it was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermOp {
    Reinitialize(u16, u16),
    ClearSurface,
    SaveMode,
    ClearPhysical,
    RestoreMode(TerminalMode),
    ShowCursor,
    HideCursor,
}

pub struct ScriptedTerminal {
    terminal: Terminal<TestBackend>,
    inputs: VecDeque<MenuInput>,
    answers: VecDeque<String>,
    prompts: Vec<String>,
    ops: Vec<TermOp>,
    mode: TerminalMode,
    cursor_visible: bool,
    draws: usize,
}

impl ScriptedTerminal {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            terminal: Terminal::new(TestBackend::new(width, height)).unwrap(),
            inputs: VecDeque::new(),
            answers: VecDeque::new(),
            prompts: Vec::new(),
            ops: Vec::new(),
            mode: TerminalMode {
                raw: true,
                alternate_screen: true,
            },
            cursor_visible: false,
            draws: 0,
        }
    }

    pub fn with_inputs(mut self, inputs: impl IntoIterator<Item = MenuInput>) -> Self {
        self.inputs.extend(inputs);
        self
    }

    pub fn with_answers<S: Into<String>>(mut self, answers: impl IntoIterator<Item = S>) -> Self {
        self.answers.extend(answers.into_iter().map(Into::into));
        self
    }

    pub fn ops(&self) -> &[TermOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<TermOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn mode(&self) -> TerminalMode {
        self.mode
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn draws(&self) -> usize {
        self.draws
    }

    pub fn buffer(&self) -> &Buffer {
        self.terminal.backend().buffer()
    }

    /// Screen contents, one string per row
    pub fn lines(&self) -> Vec<String> {
        let buffer = self.buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }
}

impl MenuTerminal for ScriptedTerminal {
    fn draw(&mut self, render: &mut dyn FnMut(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(|frame| render(frame)).unwrap();
        self.draws += 1;
        Ok(())
    }

    fn read_input(&mut self) -> io::Result<MenuInput> {
        self.inputs
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted input left"))
    }

    fn reinitialize(&mut self, width: u16, height: u16) -> io::Result<()> {
        self.ops.push(TermOp::Reinitialize(width, height));
        self.terminal.backend_mut().resize(width, height);
        self.terminal.clear().unwrap();
        Ok(())
    }

    fn clear_surface(&mut self) -> io::Result<()> {
        self.ops.push(TermOp::ClearSurface);
        self.terminal.clear().unwrap();
        Ok(())
    }

    fn save_mode(&mut self) -> io::Result<TerminalMode> {
        self.ops.push(TermOp::SaveMode);
        Ok(self.mode)
    }

    fn clear_physical(&mut self) -> io::Result<()> {
        self.ops.push(TermOp::ClearPhysical);
        self.mode = TerminalMode {
            raw: false,
            alternate_screen: false,
        };
        self.cursor_visible = true;
        Ok(())
    }

    fn restore_mode(&mut self, mode: TerminalMode) -> io::Result<()> {
        self.ops.push(TermOp::RestoreMode(mode));
        self.mode = mode;
        self.terminal.clear().unwrap();
        Ok(())
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        self.ops.push(TermOp::ShowCursor);
        self.cursor_visible = true;
        Ok(())
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        self.ops.push(TermOp::HideCursor);
        self.cursor_visible = false;
        Ok(())
    }

    fn prompt(&mut self, label: &str) -> io::Result<String> {
        self.prompts.push(label.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer left"))
    }
}
