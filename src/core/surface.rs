//! Desktop-surface boundary records.
//!
//! The shell does not own client surfaces; the compositor does. A
//! `Surface` is the shell's view of one negotiated desktop surface,
//! updated by the protocol layer before it invokes the lifecycle
//! callbacks on `ShellState`.

use crate::core::output::OutputId;

pub type SurfaceId = u32;

/// Negotiated state of one desktop surface.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    pub id: SurfaceId,
    /// Committed buffer size; zero until the client attaches a buffer
    pub width: i32,
    pub height: i32,
    /// Window geometry set by the client (content rect within the buffer,
    /// e.g. excluding client-side shadows); None means the full buffer
    pub geometry: Option<(i32, i32, i32, i32)>,
    /// Size hints; 0 means unconstrained
    pub min_width: i32,
    pub min_height: i32,
    pub max_width: i32,
    pub max_height: i32,
    pub title: String,
    pub app_id: String,
    /// Maximized state the client has acked; the next commit reports it
    pub maximized: bool,
    /// Interactive resize indicator, sent to the client in configures
    pub resizing: bool,
    /// Output the compositor currently shows this surface on
    pub output: Option<OutputId>,
}

impl Surface {
    pub fn new(id: SurfaceId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Content geometry: the explicit window geometry if the client set
    /// one, otherwise the full committed buffer.
    pub fn effective_geometry(&self) -> (i32, i32, i32, i32) {
        self.geometry
            .unwrap_or((0, 0, self.width, self.height))
    }

    /// Size floor for interactive resizing, never below 1x1.
    pub fn min_size(&self) -> (i32, i32) {
        (self.min_width.max(1), self.min_height.max(1))
    }
}
