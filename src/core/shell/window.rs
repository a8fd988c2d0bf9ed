//! The per-window shell entity.

use crate::core::output::OutputId;
use crate::core::shell::grab::ResizeEdges;
use crate::core::shell::toplevel::HandleId;
use crate::core::surface::SurfaceId;

pub type WindowId = u32;

/// Shell record for one managed toplevel window.
///
/// The position is owned by the shell; the size belongs to the client
/// and is mirrored on commit. A window is created when the desktop
/// surface appears and destroyed, together with its mirrored handle,
/// when the surface goes away.
#[derive(Debug, Clone)]
pub struct ShellWindow {
    pub id: WindowId,
    /// Backing desktop surface (owned by the compositor)
    pub surface: SurfaceId,
    /// View position in compositor-global coordinates
    pub x: i32,
    pub y: i32,
    /// Last committed size, for the no-op commit guard
    pub last_width: i32,
    pub last_height: i32,
    /// Position to restore on unmaximize
    pub saved_x: i32,
    pub saved_y: i32,
    /// Set at most once per maximize episode, cleared exactly once on restore
    pub saved_position_valid: bool,
    /// Post-policy maximized state
    pub maximized: bool,
    /// True while a grab references this window
    pub grabbed: bool,
    /// Edge mask of the most recent interactive resize
    pub resize_edges: ResizeEdges,
    /// Output this window is assigned to for maximize
    pub output: Option<OutputId>,
    /// Whether the first non-zero commit has been seen
    pub mapped: bool,
    /// Mirrored foreign-toplevel handle; lives exactly as long as the window
    pub handle: Option<HandleId>,
    /// Activated state, mirrored into the handle
    pub activated: bool,
}

impl ShellWindow {
    pub fn new(id: WindowId, surface: SurfaceId) -> Self {
        Self {
            id,
            surface,
            x: 0,
            y: 0,
            last_width: 0,
            last_height: 0,
            saved_x: 0,
            saved_y: 0,
            saved_position_valid: false,
            maximized: false,
            grabbed: false,
            resize_edges: ResizeEdges::empty(),
            output: None,
            mapped: false,
            handle: None,
            activated: false,
        }
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Transform a global point into window-local coordinates.
    pub fn to_local(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.x as f64, y - self.y as f64)
    }
}
