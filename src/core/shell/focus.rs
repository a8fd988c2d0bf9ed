//! Per-seat focus tracking, activation and stacking.

use bitflags::bitflags;

use crate::core::seat::SeatId;
use crate::core::shell::window::WindowId;
use crate::core::shell::{ShellEvent, ShellState};
use crate::core::surface::SurfaceId;

bitflags! {
    /// How an activation came about.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ActivateFlags: u32 {
        /// Triggered by a pointer click
        const CLICKED = 1;
        /// The client should receive a configure for the state change
        const CONFIGURE = 2;
    }
}

/// Input event codes for the buttons bound to click-to-activate.
pub const BTN_LEFT: u32 = 0x110;
pub const BTN_RIGHT: u32 = 0x111;

/// Keyboard-focus record for one seat, created lazily on the first
/// activation through that seat and destroyed with the seat.
#[derive(Debug, Clone, Default)]
pub struct FocusState {
    /// Surface holding this seat's keyboard focus
    pub keyboard_focus: Option<SurfaceId>,
}

impl ShellState {
    /// Activate a window on a seat: keyboard focus, handle-activation
    /// mirroring, and a raise to the front of the stacking layer.
    ///
    /// Activating the window that is already frontmost is a no-op; no
    /// signals fire.
    pub fn activate(&mut self, window_id: WindowId, seat: SeatId, flags: ActivateFlags) {
        if !self.windows.contains_key(&window_id) {
            tracing::debug!("Activation of unknown window {}", window_id);
            return;
        }
        if self.stacking.is_topmost(window_id) {
            return;
        }

        tracing::debug!(
            "Activating window {} on seat {} (flags {:?})",
            window_id, seat, flags
        );

        self.focus_window_on_seat(window_id, seat);

        let surface = match self.windows.get(&window_id) {
            Some(w) => w.surface,
            None => return,
        };

        // The compositor wants geometry marked dirty around a stacking
        // move, so bracket the raise.
        self.events.push(ShellEvent::ViewDirty { window: window_id });
        self.stacking.raise(window_id);
        self.events.push(ShellEvent::ViewDirty { window: window_id });
        self.events.push(ShellEvent::Damage { surface });
        self.events.push(ShellEvent::StackingChanged);
    }

    /// Point this seat's keyboard focus at the window and mirror the
    /// activation change into the toplevel handles. Shared between
    /// activation and new-window setup.
    pub(crate) fn focus_window_on_seat(&mut self, window_id: WindowId, seat: SeatId) {
        if !self.seats.contains_key(&seat) {
            return;
        }
        let Some(surface) = self.windows.get(&window_id).map(|w| w.surface) else {
            return;
        };

        let focus = self.focus_states.entry(seat).or_default();
        let previous = focus.keyboard_focus;
        if previous == Some(surface) {
            return;
        }
        focus.keyboard_focus = Some(surface);

        // The previously focused window loses its activated bit.
        if let Some(prev_window) = previous.and_then(|s| self.surface_windows.get(&s).copied()) {
            if let Some(w) = self.windows.get_mut(&prev_window) {
                w.activated = false;
                if let Some(handle) = w.handle {
                    self.toplevels.set_activated(handle, false);
                }
            }
        }

        if let Some(w) = self.windows.get_mut(&window_id) {
            w.activated = true;
            if let Some(handle) = w.handle {
                self.toplevels.set_activated(handle, true);
            }
        }

        self.events.push(ShellEvent::KeyboardFocus { seat, surface });
    }

    /// Button binding: clicking a surface that belongs to a managed
    /// window activates it. Clicks on anything else are ignored.
    pub(crate) fn click_to_activate(&mut self, seat: SeatId, button: u32) {
        if button != BTN_LEFT && button != BTN_RIGHT {
            return;
        }
        let Some(focus) = self
            .seats
            .get(&seat)
            .and_then(|s| s.pointer.as_ref())
            .and_then(|p| p.focus)
        else {
            return;
        };
        let Some(window_id) = self.window_for_surface(focus) else {
            return;
        };

        tracing::debug!(
            "Click-to-activate: button {} on window {} (seat {})",
            button, window_id, seat
        );
        self.activate(
            window_id,
            seat,
            ActivateFlags::CLICKED | ActivateFlags::CONFIGURE,
        );
    }
}
