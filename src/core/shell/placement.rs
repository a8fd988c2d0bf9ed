//! Placement engine: initial position, maximize target geometry and
//! restore geometry.
//!
//! Output policy: initial placement follows the pointer's output,
//! maximize prefers the seat-focused output for unmapped windows and
//! the output currently showing the surface otherwise, restore resets
//! to the default output.

use rand::Rng;

use crate::core::output::OutputId;
use crate::core::shell::window::WindowId;
use crate::core::shell::{ShellEvent, ShellState};
use crate::core::surface::SurfaceId;

impl ShellState {
    /// Choose an initial on-screen position for a window.
    ///
    /// Heuristic: place the window on the output under the first pointer
    /// we find, at a uniformly random position that keeps it fully
    /// on-screen. With no matching output, fall back to a small random
    /// offset from the origin.
    pub(crate) fn set_initial_position(&mut self, window_id: WindowId) {
        let Some(window) = self.windows.get(&window_id) else {
            return;
        };
        let surface_id = window.surface;

        // Reference point: the first seat with a pointer.
        let (ix, iy) = self
            .seats
            .values()
            .find_map(|s| s.pointer.as_ref())
            .map(|p| (p.x as i32, p.y as i32))
            .unwrap_or((0, 0));

        let mut rng = rand::thread_rng();

        let Some(target) = self.outputs.output_at(ix, iy).cloned() else {
            let min = self.config.fallback_placement_offset;
            let range = self.config.fallback_placement_range.max(1);
            let x = min + rng.gen_range(0..range);
            let y = min + rng.gen_range(0..range);
            if let Some(window) = self.windows.get_mut(&window_id) {
                window.set_position(x, y);
            }
            return;
        };

        let (width, height) = self
            .surfaces
            .get(&surface_id)
            .map(|s| (s.width, s.height))
            .unwrap_or((0, 0));

        // Valid range within the output where the window stays fully
        // on-screen. Non-positive means the window is bigger than the
        // output; it then sits at the output origin.
        let range_x = target.width as i32 - width;
        let range_y = target.height as i32 - height;

        let mut x = target.x;
        let mut y = target.y;
        if range_x > 0 {
            x += rng.gen_range(0..range_x);
        }
        if range_y > 0 {
            y += rng.gen_range(0..range_y);
        }

        if let Some(window) = self.windows.get_mut(&window_id) {
            window.set_position(x, y);
        }
    }

    /// Align the window's content origin with its output's top-left,
    /// compensating for the client's window-geometry offset.
    pub(crate) fn set_maximized_position(&mut self, window_id: WindowId) {
        let Some(window) = self.windows.get(&window_id) else {
            return;
        };
        let Some(output) = window
            .output
            .and_then(|id| self.outputs.get(id))
            .or_else(|| self.outputs.default_output())
        else {
            return;
        };

        let area = output.work_area();
        let (geo_x, geo_y) = self
            .surfaces
            .get(&window.surface)
            .map(|s| {
                let (x, y, _, _) = s.effective_geometry();
                (x, y)
            })
            .unwrap_or((0, 0));

        let (x, y) = (area.x - geo_x, area.y - geo_y);
        if let Some(window) = self.windows.get_mut(&window_id) {
            window.set_position(x, y);
        }
    }

    /// Undo maximized state: back to the default output and the saved
    /// position, or a fresh initial position if none was saved.
    pub(crate) fn unset_maximized(&mut self, window_id: WindowId) {
        let default_output = self.outputs.default_output().map(|o| o.id);

        let restore = {
            let Some(window) = self.windows.get_mut(&window_id) else {
                return;
            };
            window.output = default_output;
            window.saved_position_valid.then_some((window.saved_x, window.saved_y))
        };

        match restore {
            Some((x, y)) => {
                if let Some(window) = self.windows.get_mut(&window_id) {
                    window.set_position(x, y);
                }
            }
            None => self.set_initial_position(window_id),
        }

        if let Some(window) = self.windows.get_mut(&window_id) {
            window.saved_position_valid = false;
        }
    }

    /// The output holding any seat's focus: touch focus first, then
    /// pointer, then keyboard.
    pub fn focused_output(&self) -> Option<OutputId> {
        for seat in self.seats.values() {
            let focus_surface = seat
                .touch_focus
                .or_else(|| seat.pointer.as_ref().and_then(|p| p.focus))
                .or_else(|| {
                    self.focus_states
                        .get(&seat.id)
                        .and_then(|fs| fs.keyboard_focus)
                });

            if let Some(output) = focus_surface
                .and_then(|sid| self.surfaces.get(&sid))
                .and_then(|s| s.output)
            {
                return Some(output);
            }
        }
        None
    }

    /// Bind a window to an output: the given one, else the surface's
    /// current output, else the compositor default.
    pub(crate) fn set_window_output(&mut self, window_id: WindowId, output: Option<OutputId>) {
        let surface_output = self
            .windows
            .get(&window_id)
            .and_then(|w| self.surfaces.get(&w.surface))
            .and_then(|s| s.output);
        let default_output = self.outputs.default_output().map(|o| o.id);

        if let Some(window) = self.windows.get_mut(&window_id) {
            window.output = output.or(surface_output).or(default_output);
        }
    }

    /// Client- or shell-initiated maximize toggle. Picks the target
    /// output, then asks the client for the matching size; the geometry
    /// actually changes on the next commit.
    pub fn maximize_requested(&mut self, surface: SurfaceId, maximized: bool) {
        let Some(&window_id) = self.surface_windows.get(&surface) else {
            tracing::debug!("Maximize request for unknown surface {}", surface);
            return;
        };
        self.set_maximized(window_id, maximized);
    }

    pub(crate) fn set_maximized(&mut self, window_id: WindowId, maximized: bool) {
        let Some(window) = self.windows.get(&window_id) else {
            return;
        };
        let surface_id = window.surface;

        let mut width = 0;
        let mut height = 0;

        if maximized {
            // Mapped windows maximize onto the output the compositor is
            // showing their surface on; unmapped ones follow seat focus.
            let target = if !window.mapped {
                self.focused_output()
            } else {
                self.surfaces.get(&surface_id).and_then(|s| s.output)
            };
            self.set_window_output(window_id, target);

            if let Some(output) = self
                .windows
                .get(&window_id)
                .and_then(|w| w.output)
                .and_then(|id| self.outputs.get(id))
            {
                let area = output.work_area();
                width = area.width as i32;
                height = area.height as i32;
            }
        }

        if let Some(s) = self.surfaces.get_mut(&surface_id) {
            s.maximized = maximized;
        }
        self.events.push(ShellEvent::Configure {
            surface: surface_id,
            width,
            height,
        });
        tracing::debug!(
            "Window {} maximize -> {} ({}x{})",
            window_id, maximized, width, height
        );
    }
}
