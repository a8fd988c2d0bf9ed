//! Foreign-toplevel bridge.
//!
//! Mirrors window metadata and activation state into handle objects
//! consumed by an external window-list client (taskbar, pager, ...) and
//! relays handle-originated requests back into the shell. The protocol
//! layer drains `ToplevelEvent`s and turns them into wire traffic.

use crate::prelude::*;
use crate::core::shell::window::WindowId;
use crate::core::shell::{ShellEvent, ShellState};
use crate::core::shell::focus::ActivateFlags;

pub type HandleId = u32;

/// Outbound events for the window-list consumer, one handle per window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToplevelEvent {
    /// A handle came into existence
    Created { handle: HandleId },
    /// Title changed
    Title { handle: HandleId, title: String },
    /// Application id changed
    AppId { handle: HandleId, app_id: String },
    /// Activation state changed
    Activated { handle: HandleId, activated: bool },
    /// The handle's window is gone; the handle is dead
    Destroyed { handle: HandleId },
}

/// Handle registry and outbound event queue.
#[derive(Debug, Default)]
pub struct ToplevelBridge {
    next_handle: HandleId,
    /// Live handles and the windows they mirror
    pub handles: HashMap<HandleId, WindowId>,
    pending: Vec<ToplevelEvent>,
}

impl ToplevelBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handle mirroring the given window.
    pub fn create_handle(&mut self, window: WindowId) -> HandleId {
        self.next_handle += 1;
        let handle = self.next_handle;
        self.handles.insert(handle, window);
        self.pending.push(ToplevelEvent::Created { handle });
        tracing::debug!("Created toplevel handle {} for window {}", handle, window);
        handle
    }

    /// Forward a title change. No-op for a dead handle.
    pub fn set_title(&mut self, handle: HandleId, title: &str) {
        if !self.handles.contains_key(&handle) {
            return;
        }
        self.pending.push(ToplevelEvent::Title {
            handle,
            title: title.to_string(),
        });
    }

    /// Forward an app-id change. No-op for a dead handle.
    pub fn set_app_id(&mut self, handle: HandleId, app_id: &str) {
        if !self.handles.contains_key(&handle) {
            return;
        }
        self.pending.push(ToplevelEvent::AppId {
            handle,
            app_id: app_id.to_string(),
        });
    }

    /// Forward an activation change. No-op for a dead handle.
    pub fn set_activated(&mut self, handle: HandleId, activated: bool) {
        if !self.handles.contains_key(&handle) {
            return;
        }
        self.pending.push(ToplevelEvent::Activated { handle, activated });
    }

    /// Destroy a handle. Called while its window still exists, in the
    /// same logical step as the window teardown.
    pub fn destroy_handle(&mut self, handle: HandleId) {
        if self.handles.remove(&handle).is_some() {
            self.pending.push(ToplevelEvent::Destroyed { handle });
            tracing::debug!("Destroyed toplevel handle {}", handle);
        }
    }

    /// Resolve the window a handle mirrors.
    pub fn window_of(&self, handle: HandleId) -> Option<WindowId> {
        self.handles.get(&handle).copied()
    }

    /// Take the queued events for the protocol layer.
    pub fn drain_events(&mut self) -> Vec<ToplevelEvent> {
        std::mem::take(&mut self.pending)
    }
}

impl ShellState {
    /// Handle-originated activation request. Focuses the window on
    /// every seat, or only the first one, per configuration; the window
    /// is raised once.
    pub fn handle_activate_requested(&mut self, handle: HandleId) {
        let Some(window) = self.toplevels.window_of(handle) else {
            tracing::debug!("Activation request for dead handle {}", handle);
            return;
        };

        let seats: Vec<_> = self.seats.keys().copied().collect();
        let Some(&first) = seats.first() else {
            return;
        };
        // The raise goes through activate on the first seat; the
        // remaining seats only move their keyboard focus, since the
        // window is topmost by then.
        self.activate(window, first, ActivateFlags::empty());
        if self.config.activate_all_seats {
            for &seat in &seats[1..] {
                self.focus_window_on_seat(window, seat);
            }
        }
    }

    /// Handle-originated close request: forwarded to the client, no
    /// shell state changes until the surface actually goes away.
    pub fn handle_close_requested(&mut self, handle: HandleId) {
        let Some(window) = self.toplevels.window_of(handle) else {
            tracing::debug!("Close request for dead handle {}", handle);
            return;
        };
        if let Some(w) = self.windows.get(&window) {
            self.events.push(ShellEvent::Close { surface: w.surface });
        }
    }
}
