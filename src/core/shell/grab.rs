//! Interactive pointer grabs: move and resize.
//!
//! At most one grab per pointer (seat) and per window at a time. A grab
//! is a logical state, not a blocked thread: motion and button events
//! keep arriving as callbacks while the grab record persists. If the
//! grabbed window dies first, the grab's window reference is cleared
//! and the grab ends normally on the next button release.

use bitflags::bitflags;

use crate::core::errors::ShellError;
use crate::core::seat::SeatId;
use crate::core::shell::window::WindowId;
use crate::core::shell::{ShellEvent, ShellState};
use crate::core::surface::SurfaceId;
use crate::prelude::Result;

bitflags! {
    /// Resize edge mask, following the xdg_toplevel edge convention.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ResizeEdges: u32 {
        const TOP = 1;
        const BOTTOM = 2;
        const LEFT = 4;
        const RIGHT = 8;
    }
}

impl ResizeEdges {
    /// A usable resize direction: at least one edge, no unknown bits,
    /// and never both opposite edges at once.
    pub fn is_valid_direction(self) -> bool {
        !self.is_empty()
            && !self.contains(ResizeEdges::TOP | ResizeEdges::BOTTOM)
            && !self.contains(ResizeEdges::LEFT | ResizeEdges::RIGHT)
    }
}

/// Per-variant grab state, captured at grab start.
#[derive(Debug, Clone, Copy)]
pub enum GrabKind {
    /// Rigid move: window origin minus pointer position at grab start.
    /// The window keeps this vector for the whole grab.
    Move { dx: f64, dy: f64 },
    /// Resize from the start geometry along the given edges.
    Resize {
        edges: ResizeEdges,
        width: i32,
        height: i32,
    },
}

/// One active pointer grab.
#[derive(Debug, Clone)]
pub struct ShellGrab {
    /// Grabbed window; cleared, never dangling, if the window dies first
    pub window: Option<WindowId>,
    /// Pointer (seat) driving the grab
    pub seat: SeatId,
    pub kind: GrabKind,
}

impl ShellState {
    // =========================================================================
    // Grab requests
    // =========================================================================

    /// Client request to start an interactive move.
    pub fn move_requested(&mut self, surface: SurfaceId, seat: SeatId, serial: u32) {
        if let Err(e) = self.try_start_move(surface, seat, serial) {
            tracing::debug!("Move request on surface {} dropped: {}", surface, e);
        }
    }

    /// Client request to start an interactive resize.
    pub fn resize_requested(&mut self, surface: SurfaceId, seat: SeatId, serial: u32, edges: u32) {
        if let Err(e) = self.try_start_resize(surface, seat, serial, edges) {
            tracing::debug!("Resize request on surface {} dropped: {}", surface, e);
        }
    }

    fn try_start_move(&mut self, surface: SurfaceId, seat: SeatId, serial: u32) -> Result<()> {
        let window_id = self
            .window_for_surface(surface)
            .ok_or(ShellError::InvalidSurfaceId(surface))?;
        let window = self
            .windows
            .get(&window_id)
            .ok_or(ShellError::InvalidWindowId(window_id))?;
        if window.grabbed {
            return Err(ShellError::AlreadyGrabbed(window_id));
        }

        let pointer = self.validate_pointer(surface, seat, serial)?;

        // Constant for the whole grab: grab-point-to-origin vector.
        let dx = window.x as f64 - pointer.grab_x;
        let dy = window.y as f64 - pointer.grab_y;

        self.start_grab(
            seat,
            ShellGrab {
                window: Some(window_id),
                seat,
                kind: GrabKind::Move { dx, dy },
            },
        );
        Ok(())
    }

    fn try_start_resize(
        &mut self,
        surface: SurfaceId,
        seat: SeatId,
        serial: u32,
        edges: u32,
    ) -> Result<()> {
        let window_id = self
            .window_for_surface(surface)
            .ok_or(ShellError::InvalidSurfaceId(surface))?;
        {
            let window = self
                .windows
                .get(&window_id)
                .ok_or(ShellError::InvalidWindowId(window_id))?;
            if window.grabbed {
                return Err(ShellError::AlreadyGrabbed(window_id));
            }
        }

        self.validate_pointer(surface, seat, serial)?;

        let edges = ResizeEdges::from_bits(edges).ok_or(ShellError::InvalidResizeEdges(edges))?;
        if !edges.is_valid_direction() {
            return Err(ShellError::InvalidResizeEdges(edges.bits()));
        }

        let (width, height) = {
            let s = self
                .surfaces
                .get(&surface)
                .ok_or(ShellError::InvalidSurfaceId(surface))?;
            let (_, _, w, h) = s.effective_geometry();
            (w, h)
        };

        if let Some(window) = self.windows.get_mut(&window_id) {
            window.resize_edges = edges;
        }
        if let Some(s) = self.surfaces.get_mut(&surface) {
            s.resizing = true;
        }

        self.start_grab(
            seat,
            ShellGrab {
                window: Some(window_id),
                seat,
                kind: GrabKind::Resize { edges, width, height },
            },
        );
        Ok(())
    }

    /// Stale-request filter shared by move and resize: the seat needs a
    /// pointer with a button held whose press serial matches, focused on
    /// the requesting surface.
    fn validate_pointer(
        &self,
        surface: SurfaceId,
        seat: SeatId,
        serial: u32,
    ) -> Result<&crate::core::seat::PointerState> {
        let pointer = self
            .seats
            .get(&seat)
            .ok_or(ShellError::InvalidSeatId(seat))?
            .pointer
            .as_ref()
            .ok_or(ShellError::NoPointer(seat))?;

        if !pointer.has_implicit_grab() {
            return Err(ShellError::NoButtonDown(seat));
        }
        if pointer.grab_serial != serial {
            return Err(ShellError::StaleSerial {
                got: serial,
                expected: pointer.grab_serial,
            });
        }
        if pointer.focus != Some(surface) {
            return Err(ShellError::FocusMismatch(surface));
        }
        Ok(pointer)
    }

    // =========================================================================
    // Grab lifecycle
    // =========================================================================

    /// Only one interactive grab per pointer: break any existing one on
    /// this seat first, then install the new grab.
    fn start_grab(&mut self, seat: SeatId, grab: ShellGrab) {
        self.cancel_grab(seat);

        if let Some(window_id) = grab.window {
            if let Some(window) = self.windows.get_mut(&window_id) {
                window.grabbed = true;
            }
        }
        tracing::debug!("Grab started on seat {}: {:?}", seat, grab.kind);
        self.grabs.insert(seat, grab);
    }

    /// End sequence shared by release and cancel: clear `grabbed`, clear
    /// the resize indicator, free the grab record.
    fn end_grab(&mut self, seat: SeatId) {
        let Some(grab) = self.grabs.remove(&seat) else {
            return;
        };

        if let Some(window_id) = grab.window {
            if let Some(window) = self.windows.get_mut(&window_id) {
                window.grabbed = false;
                let surface = window.surface;
                if matches!(grab.kind, GrabKind::Resize { .. }) {
                    if let Some(s) = self.surfaces.get_mut(&surface) {
                        s.resizing = false;
                    }
                }
            }
        }
        tracing::debug!("Grab ended on seat {}", seat);
    }

    /// Grab pre-empted or the pointer device went away.
    pub fn cancel_grab(&mut self, seat: SeatId) {
        self.end_grab(seat);
    }

    // =========================================================================
    // Pointer entry points
    // =========================================================================

    /// The input layer tells us which surface is under the pointer.
    pub fn pointer_set_focus(&mut self, seat: SeatId, surface: Option<SurfaceId>) {
        if let Some(pointer) = self.seats.get_mut(&seat).and_then(|s| s.pointer.as_mut()) {
            pointer.focus = surface;
        }
    }

    /// Absolute pointer motion. Routed into the active grab, if any.
    pub fn pointer_motion(&mut self, seat: SeatId, x: f64, y: f64) {
        let Some(pointer) = self.seats.get_mut(&seat).and_then(|s| s.pointer.as_mut()) else {
            return;
        };
        pointer.x = x;
        pointer.y = y;

        if self.grabs.contains_key(&seat) {
            self.grab_motion(seat, x, y);
        }
    }

    /// Pointer button. Returns the serial the protocol layer should
    /// attach when delivering the event to clients; grab requests echo
    /// it back.
    pub fn pointer_button(&mut self, seat: SeatId, button: u32, pressed: bool) -> u32 {
        let serial = self.next_serial();

        let Some(pointer) = self.seats.get_mut(&seat).and_then(|s| s.pointer.as_mut()) else {
            return serial;
        };
        pointer.update_button(pressed);

        if pressed && pointer.button_count == 1 {
            pointer.grab_x = pointer.x;
            pointer.grab_y = pointer.y;
            pointer.grab_serial = serial;
        }
        let buttons_left = pointer.button_count;

        if self.grabs.contains_key(&seat) {
            // Grab button semantics: the grab ends when the last button
            // goes up, regardless of which button started it.
            if !pressed && buttons_left == 0 {
                self.end_grab(seat);
            }
            return serial;
        }

        if pressed {
            self.click_to_activate(seat, button);
        }
        serial
    }

    fn grab_motion(&mut self, seat: SeatId, x: f64, y: f64) {
        let Some(grab) = self.grabs.get(&seat) else {
            return;
        };
        // Window destroyed mid-grab: motion becomes a no-op.
        let Some(window_id) = grab.window else {
            return;
        };
        let kind = grab.kind;

        match kind {
            GrabKind::Move { dx, dy } => {
                let (cx, cy) = ((x + dx) as i32, (y + dy) as i32);
                if let Some(window) = self.windows.get_mut(&window_id) {
                    window.set_position(cx, cy);
                }
                self.events.push(ShellEvent::ViewDirty { window: window_id });
                self.events.push(ShellEvent::ScheduleRepaint);
            }
            GrabKind::Resize { edges, width, height } => {
                self.resize_motion(seat, window_id, edges, width, height, x, y);
            }
        }
    }

    fn resize_motion(
        &mut self,
        seat: SeatId,
        window_id: WindowId,
        edges: ResizeEdges,
        start_width: i32,
        start_height: i32,
        x: f64,
        y: f64,
    ) {
        let Some(window) = self.windows.get(&window_id) else {
            return;
        };
        let surface_id = window.surface;

        let (grab_x, grab_y) = match self.seats.get(&seat).and_then(|s| s.pointer.as_ref()) {
            Some(p) => (p.grab_x, p.grab_y),
            None => return,
        };

        // Work in the window's local space: both the grab-start point
        // and the current point, then take the difference.
        let (from_x, from_y) = window.to_local(grab_x, grab_y);
        let (to_x, to_y) = window.to_local(x, y);

        let mut width = start_width;
        if edges.contains(ResizeEdges::LEFT) {
            width += (from_x - to_x) as i32;
        } else if edges.contains(ResizeEdges::RIGHT) {
            width += (to_x - from_x) as i32;
        }

        let mut height = start_height;
        if edges.contains(ResizeEdges::TOP) {
            height += (from_y - to_y) as i32;
        } else if edges.contains(ResizeEdges::BOTTOM) {
            height += (to_y - from_y) as i32;
        }

        let Some(surface) = self.surfaces.get(&surface_id) else {
            return;
        };
        let (min_w, min_h) = surface.min_size();
        let (max_w, max_h) = (surface.max_width, surface.max_height);

        width = width.max(min_w);
        if max_w > 0 {
            width = width.min(max_w);
        }
        height = height.max(min_h);
        if max_h > 0 {
            height = height.min(max_h);
        }

        // The actual geometry changes on the client's next commit.
        self.events.push(ShellEvent::Configure {
            surface: surface_id,
            width,
            height,
        });
    }
}
