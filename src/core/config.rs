//! Shell configuration.

/// Configuration for the shell core.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Minimum offset for the fallback placement when no output contains
    /// the reference point.
    pub fallback_placement_offset: i32,
    /// Size of the random range added to the fallback offset.
    pub fallback_placement_range: i32,
    /// Forward foreign-toplevel activation requests to every seat instead
    /// of only the first one.
    pub activate_all_seats: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            fallback_placement_offset: 10,
            fallback_placement_range: 400,
            activate_all_seats: true,
        }
    }
}
