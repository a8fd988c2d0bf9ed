//! Shell context and surface lifecycle.
//!
//! `ShellState` holds all window-management state of the shell,
//! separate from Wayland protocol mechanics and rendering. The
//! embedding compositor layer mirrors negotiated surface state into the
//! shell, invokes the lifecycle and input callbacks, and drains the
//! resulting `ShellEvent`s to apply the shell's decisions.
//!
//! Everything runs on the compositor event-loop thread; there is no
//! internal locking and no operation blocks.

pub mod focus;
pub mod grab;
pub mod placement;
pub mod stacking;
pub mod toplevel;
pub mod window;

mod tests;

pub use focus::{ActivateFlags, FocusState};
pub use grab::{GrabKind, ResizeEdges, ShellGrab};
pub use stacking::StackingLayer;
pub use toplevel::{HandleId, ToplevelBridge, ToplevelEvent};
pub use window::{ShellWindow, WindowId};

use crate::prelude::*;

use crate::core::config::ShellConfig;
use crate::core::output::{OutputId, OutputRegistry, OutputState};
use crate::core::seat::{SeatId, SeatState};
use crate::core::surface::{Surface, SurfaceId};

// ============================================================================
// Shell Events
// ============================================================================

/// Decisions emitted by the shell for the compositor layer to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// Ask the client to take a new size (0x0 lets it pick its own)
    Configure {
        surface: SurfaceId,
        width: i32,
        height: i32,
    },
    /// Surface content needs repainting
    Damage { surface: SurfaceId },
    /// Schedule an output repaint
    ScheduleRepaint,
    /// A view's position or stacking changed; its transform is stale
    ViewDirty { window: WindowId },
    /// Stacking order changed; propagate to child views
    StackingChanged,
    /// Give a seat's keyboard focus to a surface
    KeyboardFocus { seat: SeatId, surface: SurfaceId },
    /// Forward a close request to the client owning the surface
    Close { surface: SurfaceId },
}

// ============================================================================
// Shell State
// ============================================================================

/// All window-management state of the shell.
pub struct ShellState {
    /// Shell configuration
    pub config: ShellConfig,
    /// Managed windows by id
    pub windows: HashMap<WindowId, ShellWindow>,
    /// Surface-to-window index
    pub surface_windows: HashMap<SurfaceId, WindowId>,
    /// Mirrored desktop-surface records
    pub surfaces: HashMap<SurfaceId, Surface>,
    /// Known outputs; the first is the compositor default
    pub outputs: OutputRegistry,
    /// Seats by id, ordered for deterministic multi-seat iteration
    pub seats: BTreeMap<SeatId, SeatState>,
    /// Per-seat focus records, created lazily on first activation
    pub focus_states: HashMap<SeatId, FocusState>,
    /// Active pointer grabs, at most one per seat
    pub grabs: HashMap<SeatId, ShellGrab>,
    /// Stacking order, back to front
    pub stacking: StackingLayer,
    /// Foreign-toplevel bridge
    pub toplevels: ToplevelBridge,
    /// Queued outbound events
    pub(crate) events: Vec<ShellEvent>,
    /// Next window id
    next_window_id: WindowId,
    /// Event serial generator
    serial: u32,
}

impl ShellState {
    pub fn new(config: ShellConfig) -> Self {
        Self {
            config,
            windows: HashMap::new(),
            surface_windows: HashMap::new(),
            surfaces: HashMap::new(),
            outputs: OutputRegistry::new(),
            seats: BTreeMap::new(),
            focus_states: HashMap::new(),
            grabs: HashMap::new(),
            stacking: StackingLayer::new(),
            toplevels: ToplevelBridge::new(),
            events: Vec::new(),
            next_window_id: 0,
            serial: 0,
        }
    }

    pub fn new_default() -> Self {
        Self::new(ShellConfig::default())
    }

    /// Next event serial. The protocol layer attaches these to the
    /// input events it delivers; move/resize requests echo them back.
    pub fn next_serial(&mut self) -> u32 {
        self.serial = self.serial.wrapping_add(1);
        self.serial
    }

    /// Take the queued shell events for the compositor layer.
    pub fn drain_events(&mut self) -> Vec<ShellEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn window_for_surface(&self, surface: SurfaceId) -> Option<WindowId> {
        self.surface_windows.get(&surface).copied()
    }

    // =========================================================================
    // Collaborator lifecycle (outputs, seats)
    // =========================================================================

    pub fn output_added(&mut self, output: OutputState) {
        self.outputs.add(output);
    }

    /// An output went away; windows assigned to it fall back to having
    /// no output until the next maximize or restore picks a new one.
    pub fn output_removed(&mut self, id: OutputId) {
        self.outputs.remove(id);
        for window in self.windows.values_mut() {
            if window.output == Some(id) {
                window.output = None;
            }
        }
        for surface in self.surfaces.values_mut() {
            if surface.output == Some(id) {
                surface.output = None;
            }
        }
        tracing::info!("Output {} removed", id);
    }

    pub fn seat_added(&mut self, seat: SeatState) {
        tracing::info!("Seat {} added: {}", seat.id, seat.name);
        self.seats.insert(seat.id, seat);
    }

    /// A seat went away: its focus record dies with it and any grab it
    /// held is cancelled.
    pub fn seat_removed(&mut self, id: SeatId) {
        self.cancel_grab(id);
        self.focus_states.remove(&id);
        self.seats.remove(&id);
        tracing::info!("Seat {} removed", id);
    }

    // =========================================================================
    // Surface state mirroring
    // =========================================================================

    /// Record a committed buffer size, ahead of `surface_committed`.
    pub fn set_surface_size(&mut self, surface: SurfaceId, width: i32, height: i32) {
        if let Some(s) = self.surfaces.get_mut(&surface) {
            s.width = width;
            s.height = height;
        }
    }

    /// Record the client's window geometry (content rect).
    pub fn set_surface_geometry(&mut self, surface: SurfaceId, x: i32, y: i32, width: i32, height: i32) {
        if let Some(s) = self.surfaces.get_mut(&surface) {
            s.geometry = Some((x, y, width, height));
        }
    }

    /// Record min/max size hints (0 = unconstrained).
    pub fn set_surface_size_hints(
        &mut self,
        surface: SurfaceId,
        min_width: i32,
        min_height: i32,
        max_width: i32,
        max_height: i32,
    ) {
        if let Some(s) = self.surfaces.get_mut(&surface) {
            s.min_width = min_width;
            s.min_height = min_height;
            s.max_width = max_width;
            s.max_height = max_height;
        }
    }

    /// Record the maximized state the client acked.
    pub fn set_surface_maximized(&mut self, surface: SurfaceId, maximized: bool) {
        if let Some(s) = self.surfaces.get_mut(&surface) {
            s.maximized = maximized;
        }
    }

    /// Record the output the compositor shows the surface on.
    pub fn set_surface_output(&mut self, surface: SurfaceId, output: Option<OutputId>) {
        if let Some(s) = self.surfaces.get_mut(&surface) {
            s.output = output;
        }
    }

    /// Title change: stored and, once the window is mapped, forwarded to
    /// the mirrored handle.
    pub fn set_surface_title(&mut self, surface: SurfaceId, title: &str) {
        if let Some(s) = self.surfaces.get_mut(&surface) {
            s.title = title.to_string();
        }
        if let Some(&wid) = self.surface_windows.get(&surface) {
            if let Some(w) = self.windows.get(&wid) {
                if w.mapped {
                    if let Some(handle) = w.handle {
                        self.toplevels.set_title(handle, title);
                    }
                }
            }
        }
    }

    /// App-id change, forwarded like the title.
    pub fn set_surface_app_id(&mut self, surface: SurfaceId, app_id: &str) {
        if let Some(s) = self.surfaces.get_mut(&surface) {
            s.app_id = app_id.to_string();
        }
        if let Some(&wid) = self.surface_windows.get(&surface) {
            if let Some(w) = self.windows.get(&wid) {
                if w.mapped {
                    if let Some(handle) = w.handle {
                        self.toplevels.set_app_id(handle, app_id);
                    }
                }
            }
        }
    }

    // =========================================================================
    // Surface lifecycle
    // =========================================================================

    /// A desktop surface appeared: create its window entity, mirrored
    /// handle and stacking entry, and give it keyboard focus everywhere.
    pub fn surface_added(&mut self, surface: Surface) -> WindowId {
        let surface_id = surface.id;

        self.next_window_id += 1;
        let window_id = self.next_window_id;

        let mut window = ShellWindow::new(window_id, surface_id);
        window.output = surface
            .output
            .or_else(|| self.outputs.default_output().map(|o| o.id));
        window.handle = Some(self.toplevels.create_handle(window_id));

        self.surfaces.insert(surface_id, surface);
        self.surface_windows.insert(surface_id, window_id);
        self.windows.insert(window_id, window);
        self.stacking.insert(window_id);

        self.events.push(ShellEvent::Damage { surface: surface_id });
        self.events.push(ShellEvent::ScheduleRepaint);

        // New windows take keyboard focus on every seat.
        let seats: Vec<SeatId> = self.seats.keys().copied().collect();
        for seat in seats {
            self.focus_window_on_seat(window_id, seat);
        }

        tracing::info!("Registered window {} for surface {}", window_id, surface_id);
        window_id
    }

    /// A desktop surface committed. `sx`/`sy` is the client's buffer
    /// attach offset for this commit.
    pub fn surface_committed(&mut self, surface: SurfaceId, sx: i32, sy: i32) {
        let Some(&window_id) = self.surface_windows.get(&surface) else {
            return;
        };
        let (width, height, now_maximized) = match self.surfaces.get(&surface) {
            Some(s) => (s.width, s.height, s.maximized),
            None => return,
        };

        // Surface not ready yet.
        if width == 0 {
            return;
        }

        let (was_maximized, mapped) = match self.windows.get_mut(&window_id) {
            Some(window) => {
                let was = window.maximized;
                window.maximized = now_maximized;
                (was, window.mapped)
            }
            None => return,
        };

        if !mapped {
            self.map_window(window_id);
        }

        // Idempotence guard: nothing changed, nothing to do.
        if let Some(window) = self.windows.get(&window_id) {
            if sx == 0
                && sy == 0
                && window.last_width == width
                && window.last_height == height
                && was_maximized == window.maximized
            {
                return;
            }
        }

        if was_maximized {
            self.unset_maximized(window_id);
        }

        if let Some(window) = self.windows.get_mut(&window_id) {
            if window.maximized && !window.saved_position_valid {
                window.saved_x = window.x;
                window.saved_y = window.y;
                window.saved_position_valid = true;
            }
        }

        if now_maximized {
            self.set_maximized_position(window_id);
            let output = self.windows.get(&window_id).and_then(|w| w.output);
            if let Some(s) = self.surfaces.get_mut(&surface) {
                s.output = output;
            }
        }

        if let Some(window) = self.windows.get_mut(&window_id) {
            window.last_width = width;
            window.last_height = height;
        }

        self.events.push(ShellEvent::ViewDirty { window: window_id });
        self.events.push(ShellEvent::ScheduleRepaint);
    }

    /// First non-zero commit: place the window and mark it mapped.
    fn map_window(&mut self, window_id: WindowId) {
        let maximized = match self.windows.get(&window_id) {
            Some(w) => w.maximized,
            None => return,
        };

        if maximized {
            self.set_maximized_position(window_id);
        } else {
            self.set_initial_position(window_id);
        }

        let (surface_id, handle, output) = match self.windows.get_mut(&window_id) {
            Some(window) => {
                window.mapped = true;
                (window.surface, window.handle, window.output)
            }
            None => return,
        };

        if maximized {
            if let Some(s) = self.surfaces.get_mut(&surface_id) {
                s.output = output;
            }
        }

        // Metadata is first known here; push it to the mirrored handle.
        if let Some(handle) = handle {
            let (title, app_id) = match self.surfaces.get(&surface_id) {
                Some(s) => (s.title.clone(), s.app_id.clone()),
                None => (String::new(), String::new()),
            };
            if !title.is_empty() {
                self.toplevels.set_title(handle, &title);
            }
            if !app_id.is_empty() {
                self.toplevels.set_app_id(handle, &app_id);
            }
        }

        self.events.push(ShellEvent::ViewDirty { window: window_id });
        tracing::debug!("Mapped window {}", window_id);
    }

    /// A desktop surface went away: invalidate every reference to the
    /// window synchronously, then release it.
    pub fn surface_removed(&mut self, surface: SurfaceId) {
        let Some(window_id) = self.surface_windows.remove(&surface) else {
            return;
        };

        // Live grabs drop their window reference but stay active until
        // the pointer releases them.
        for grab in self.grabs.values_mut() {
            if grab.window == Some(window_id) {
                grab.window = None;
            }
        }

        // Focus records pointing here are cleared, with no successor.
        for fs in self.focus_states.values_mut() {
            if fs.keyboard_focus == Some(surface) {
                fs.keyboard_focus = None;
            }
        }

        if let Some(mut window) = self.windows.remove(&window_id) {
            if let Some(handle) = window.handle.take() {
                self.toplevels.destroy_handle(handle);
            }
        }

        // Seat-level pointer focus on the dead surface is stale too.
        for seat in self.seats.values_mut() {
            if let Some(pointer) = seat.pointer.as_mut() {
                if pointer.focus == Some(surface) {
                    pointer.focus = None;
                }
            }
            if seat.touch_focus == Some(surface) {
                seat.touch_focus = None;
            }
        }

        self.stacking.remove(window_id);
        self.surfaces.remove(&surface);
        self.events.push(ShellEvent::ScheduleRepaint);

        tracing::info!("Destroyed window {} (surface {})", window_id, surface);
    }
}
