//! Window stacking order.

use crate::core::shell::window::WindowId;

/// Single flat stacking layer, back to front. The last element is the
/// topmost (most recently activated) window.
#[derive(Debug, Default)]
pub struct StackingLayer {
    pub order: Vec<WindowId>,
}

impl StackingLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new window at the top of the stack.
    pub fn insert(&mut self, window: WindowId) {
        if !self.order.contains(&window) {
            self.order.push(window);
        }
    }

    /// Remove a window from the stack.
    pub fn remove(&mut self, window: WindowId) {
        if let Some(pos) = self.order.iter().position(|&id| id == window) {
            self.order.remove(pos);
        }
    }

    /// Move a window to the top of the stack (remove, reinsert at head).
    pub fn raise(&mut self, window: WindowId) {
        if let Some(pos) = self.order.iter().position(|&id| id == window) {
            let id = self.order.remove(pos);
            self.order.push(id);
        }
    }

    /// Get the topmost window, if any.
    pub fn topmost(&self) -> Option<WindowId> {
        self.order.last().copied()
    }

    pub fn is_topmost(&self, window: WindowId) -> bool {
        self.topmost() == Some(window)
    }
}
