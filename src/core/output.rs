//! Output (display/monitor) registry.
//!
//! Read-only to the window-management logic: outputs are discovered and
//! torn down by the backend layer, which mirrors them in here.

use crate::util::geometry::Rect;

pub type OutputId = u32;

/// One display output.
#[derive(Debug, Clone)]
pub struct OutputState {
    /// Output identifier
    pub id: OutputId,
    /// Output name (e.g. "DP-1")
    pub name: String,
    /// Position in compositor-global coordinates
    pub x: i32,
    pub y: i32,
    /// Current mode size in pixels
    pub width: u32,
    pub height: u32,
}

impl OutputState {
    pub fn new(id: OutputId, name: impl Into<String>, x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            id,
            name: name.into(),
            x,
            y,
            width,
            height,
        }
    }

    /// The output's region in global coordinates.
    pub fn region(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Usable area for maximized windows. Panels and other exclusive
    /// zones are not modelled here, so this is the full output.
    pub fn work_area(&self) -> Rect {
        self.region()
    }
}

/// Ordered list of the outputs known to the shell. The first entry is
/// the compositor's default output.
#[derive(Debug, Default)]
pub struct OutputRegistry {
    pub outputs: Vec<OutputState>,
}

impl OutputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, output: OutputState) {
        tracing::info!(
            "Output {} added: {} at {},{} ({}x{})",
            output.id, output.name, output.x, output.y, output.width, output.height
        );
        self.outputs.push(output);
    }

    pub fn remove(&mut self, id: OutputId) {
        self.outputs.retain(|o| o.id != id);
    }

    pub fn get(&self, id: OutputId) -> Option<&OutputState> {
        self.outputs.iter().find(|o| o.id == id)
    }

    /// The compositor default output, if any output exists at all.
    pub fn default_output(&self) -> Option<&OutputState> {
        self.outputs.first()
    }

    /// The first output whose region contains the given point.
    pub fn output_at(&self, x: i32, y: i32) -> Option<&OutputState> {
        self.outputs.iter().find(|o| o.region().contains_point(x, y))
    }
}
