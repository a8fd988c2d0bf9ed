// Mariposa
//
// Window-management core for a Wayland desktop shell.
// Consumes surface lifecycle and pointer events from an embedding
// compositor layer and emits placement, stacking, and activation
// decisions plus a mirrored foreign-toplevel view.

pub mod core;
pub mod prelude;
pub mod util;

pub use crate::core::config::ShellConfig;
pub use crate::core::errors::ShellError;
pub use crate::core::shell::toplevel::ToplevelEvent;
pub use crate::core::shell::{ShellEvent, ShellState};
