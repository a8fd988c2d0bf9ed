//! Seat and pointer sub-state.

use crate::core::surface::SurfaceId;

pub type SeatId = u32;

/// Pointer state for one seat.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    /// Absolute position in compositor-global coordinates
    pub x: f64,
    pub y: f64,
    /// Position at the moment the implicit grab began (first button down)
    pub grab_x: f64,
    pub grab_y: f64,
    /// Number of buttons currently pressed
    pub button_count: u32,
    /// Serial of the button press that started the implicit grab
    pub grab_serial: u32,
    /// Surface currently under the pointer
    pub focus: Option<SurfaceId>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track button press/release for the implicit grab.
    pub fn update_button(&mut self, pressed: bool) {
        if pressed {
            self.button_count = self.button_count.saturating_add(1);
        } else {
            self.button_count = self.button_count.saturating_sub(1);
        }
    }

    /// Whether the pointer has an implicit grab (buttons pressed).
    pub fn has_implicit_grab(&self) -> bool {
        self.button_count > 0
    }
}

/// One input focus group. A seat may lack a pointer device entirely.
#[derive(Debug, Clone)]
pub struct SeatState {
    pub id: SeatId,
    pub name: String,
    pub pointer: Option<PointerState>,
    /// Surface holding this seat's touch focus, if a touch device exists
    pub touch_focus: Option<SurfaceId>,
}

impl SeatState {
    pub fn new(id: SeatId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            pointer: Some(PointerState::new()),
            touch_focus: None,
        }
    }

    /// A seat without any pointer device (keyboard- or touch-only).
    pub fn without_pointer(id: SeatId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            pointer: None,
            touch_focus: None,
        }
    }
}
