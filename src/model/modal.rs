//! Modal stack for managing overlays
//!
//! Only the top modal receives input; modals are drawn bottom to top.

/// A modal overlay drawn on top of the main screen
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Quit confirmation dialog
    QuitConfirm,
    /// Keyboard shortcut reference
    Help { scroll_offset: usize },
    /// Pretty-printed payload of the last snapshot
    RawData { scroll_offset: usize },
}

/// A stack of modal overlays
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    /// Get a reference to the top modal without removing it
    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Modal> {
        self.stack.last_mut()
    }
}
