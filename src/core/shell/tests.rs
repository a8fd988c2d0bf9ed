#[cfg(test)]
mod tests {
    use crate::core::output::OutputState;
    use crate::core::seat::SeatState;
    use crate::core::shell::focus::{ActivateFlags, BTN_LEFT};
    use crate::core::shell::grab::GrabKind;
    use crate::core::shell::stacking::StackingLayer;
    use crate::core::shell::toplevel::ToplevelEvent;
    use crate::core::shell::window::WindowId;
    use crate::core::shell::{ResizeEdges, ShellEvent, ShellState};
    use crate::core::surface::{Surface, SurfaceId};

    const SEAT: u32 = 1;

    /// Shell with one 1920x1080 output at the origin and one seat with
    /// a pointer.
    fn shell() -> ShellState {
        let mut shell = ShellState::new_default();
        shell.output_added(OutputState::new(1, "OUT-1", 0, 0, 1920, 1080));
        shell.seat_added(SeatState::new(SEAT, "seat0"));
        shell
    }

    /// Add a surface and run its first commit at the given size.
    fn add_window(shell: &mut ShellState, surface: SurfaceId, w: i32, h: i32) -> WindowId {
        let wid = shell.surface_added(Surface::new(surface));
        shell.set_surface_size(surface, w, h);
        shell.surface_committed(surface, 0, 0);
        wid
    }

    /// Press the left button on a surface and return the grab serial.
    fn press_on(shell: &mut ShellState, surface: SurfaceId) -> u32 {
        shell.pointer_set_focus(SEAT, Some(surface));
        shell.pointer_button(SEAT, BTN_LEFT, true)
    }

    fn last_configure(events: &[ShellEvent], surface: SurfaceId) -> Option<(i32, i32)> {
        events.iter().rev().find_map(|e| match e {
            ShellEvent::Configure { surface: s, width, height } if *s == surface => {
                Some((*width, *height))
            }
            _ => None,
        })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    #[test]
    fn test_zero_size_commit_ignored() {
        let mut shell = shell();
        let wid = shell.surface_added(Surface::new(10));
        shell.surface_committed(10, 0, 0);
        assert!(!shell.windows[&wid].mapped);

        shell.set_surface_size(10, 640, 480);
        shell.surface_committed(10, 0, 0);
        assert!(shell.windows[&wid].mapped);
    }

    #[test]
    fn test_first_commit_places_window_on_output() {
        let mut shell = shell();
        shell.pointer_motion(SEAT, 500.0, 500.0);
        let wid = add_window(&mut shell, 10, 400, 300);

        let w = &shell.windows[&wid];
        assert!(w.x >= 0 && w.x <= 1920 - 400);
        assert!(w.y >= 0 && w.y <= 1080 - 300);
    }

    #[test]
    fn test_placement_fallback_without_output() {
        // No output contains the pointer, so placement falls back to a
        // bounded random offset.
        for _ in 0..16 {
            let mut shell = ShellState::new_default();
            shell.seat_added(SeatState::new(SEAT, "seat0"));
            let wid = add_window(&mut shell, 10, 400, 300);
            let w = &shell.windows[&wid];
            assert!(w.x >= 10 && w.x < 410, "x out of range: {}", w.x);
            assert!(w.y >= 10 && w.y < 410, "y out of range: {}", w.y);
        }
    }

    #[test]
    fn test_oversized_window_sits_at_output_origin() {
        let mut shell = shell();
        shell.pointer_motion(SEAT, 100.0, 100.0);
        let wid = add_window(&mut shell, 10, 4000, 3000);
        let w = &shell.windows[&wid];
        assert_eq!((w.x, w.y), (0, 0));
    }

    #[test]
    fn test_destroy_releases_everything() {
        let mut shell = shell();
        let wid = add_window(&mut shell, 10, 400, 300);
        let handle = shell.windows[&wid].handle.unwrap();

        shell.surface_removed(10);
        assert!(shell.windows.is_empty());
        assert!(shell.stacking.order.is_empty());
        assert!(shell.toplevels.window_of(handle).is_none());
        let events = shell.toplevels.drain_events();
        assert!(events.contains(&ToplevelEvent::Destroyed { handle }));
    }

    // =========================================================================
    // Idempotent commit
    // =========================================================================

    #[test]
    fn test_idempotent_commit() {
        let mut shell = shell();
        let wid = add_window(&mut shell, 10, 400, 300);
        let (x, y) = (shell.windows[&wid].x, shell.windows[&wid].y);
        shell.drain_events();
        shell.toplevels.drain_events();

        shell.surface_committed(10, 0, 0);
        assert!(shell.drain_events().is_empty());
        assert!(shell.toplevels.drain_events().is_empty());
        assert_eq!((shell.windows[&wid].x, shell.windows[&wid].y), (x, y));
    }

    // =========================================================================
    // Move grab
    // =========================================================================

    #[test]
    fn test_move_grab_follows_pointer_rigidly() {
        let mut shell = shell();
        shell.pointer_motion(SEAT, 500.0, 500.0);
        let wid = add_window(&mut shell, 10, 400, 300);
        let (x0, y0) = (shell.windows[&wid].x, shell.windows[&wid].y);

        let serial = press_on(&mut shell, 10);
        shell.move_requested(10, SEAT, serial);
        assert!(shell.windows[&wid].grabbed);

        shell.pointer_motion(SEAT, 620.0, 450.0);
        assert_eq!(shell.windows[&wid].x, x0 + 120);
        assert_eq!(shell.windows[&wid].y, y0 - 50);

        // The offset stays constant: a second motion is still relative
        // to the original grab point, not the previous frame.
        shell.pointer_motion(SEAT, 520.0, 520.0);
        assert_eq!(shell.windows[&wid].x, x0 + 20);
        assert_eq!(shell.windows[&wid].y, y0 + 20);

        shell.pointer_button(SEAT, BTN_LEFT, false);
        assert!(shell.grabs.is_empty());
        assert!(!shell.windows[&wid].grabbed);
    }

    #[test]
    fn test_grab_exclusivity() {
        let mut shell = shell();
        shell.pointer_motion(SEAT, 500.0, 500.0);
        let wid = add_window(&mut shell, 10, 400, 300);

        let serial = press_on(&mut shell, 10);
        shell.move_requested(10, SEAT, serial);
        assert_eq!(shell.grabs.len(), 1);

        // A second grab on the grabbed window is refused outright.
        shell.resize_requested(10, SEAT, serial, ResizeEdges::RIGHT.bits());
        shell.move_requested(10, SEAT, serial);
        assert_eq!(shell.grabs.len(), 1);
        assert!(matches!(shell.grabs[&SEAT].kind, GrabKind::Move { .. }));
    }

    #[test]
    fn test_move_requires_button_down() {
        let mut shell = shell();
        let _wid = add_window(&mut shell, 10, 400, 300);
        shell.pointer_set_focus(SEAT, Some(10));

        shell.move_requested(10, SEAT, 1);
        assert!(shell.grabs.is_empty());
    }

    #[test]
    fn test_move_needs_pointer_device() {
        let mut shell = shell();
        shell.seat_added(SeatState::without_pointer(2, "kbd-seat"));
        let _wid = add_window(&mut shell, 10, 400, 300);

        shell.move_requested(10, 2, 1);
        assert!(shell.grabs.is_empty());
    }

    #[test]
    fn test_stale_serial_rejected() {
        let mut shell = shell();
        let _wid = add_window(&mut shell, 10, 400, 300);
        let serial = press_on(&mut shell, 10);

        shell.move_requested(10, SEAT, serial + 1);
        assert!(shell.grabs.is_empty());
    }

    #[test]
    fn test_destroy_mid_grab() {
        let mut shell = shell();
        shell.pointer_motion(SEAT, 500.0, 500.0);
        let wid = add_window(&mut shell, 10, 400, 300);

        let serial = press_on(&mut shell, 10);
        shell.move_requested(10, SEAT, serial);

        shell.surface_removed(10);
        assert!(!shell.windows.contains_key(&wid));
        assert_eq!(shell.grabs[&SEAT].window, None);

        // Motion is now a no-op; release still ends the grab cleanly.
        shell.pointer_motion(SEAT, 900.0, 900.0);
        shell.pointer_button(SEAT, BTN_LEFT, false);
        assert!(shell.grabs.is_empty());
    }

    // =========================================================================
    // Resize grab
    // =========================================================================

    #[test]
    fn test_resize_grows_along_right_bottom() {
        let mut shell = shell();
        shell.pointer_motion(SEAT, 500.0, 500.0);
        let _wid = add_window(&mut shell, 10, 400, 300);
        shell.drain_events();

        let serial = press_on(&mut shell, 10);
        let edges = ResizeEdges::RIGHT | ResizeEdges::BOTTOM;
        shell.resize_requested(10, SEAT, serial, edges.bits());
        assert!(shell.surfaces[&10].resizing);

        shell.pointer_motion(SEAT, 550.0, 530.0);
        let events = shell.drain_events();
        assert_eq!(last_configure(&events, 10), Some((450, 330)));
    }

    #[test]
    fn test_resize_left_edge_inverts_delta() {
        let mut shell = shell();
        shell.pointer_motion(SEAT, 500.0, 500.0);
        let _wid = add_window(&mut shell, 10, 400, 300);
        shell.drain_events();

        let serial = press_on(&mut shell, 10);
        shell.resize_requested(10, SEAT, serial, ResizeEdges::LEFT.bits());

        // Dragging left grows the window when resizing by its left edge.
        shell.pointer_motion(SEAT, 440.0, 500.0);
        let events = shell.drain_events();
        assert_eq!(last_configure(&events, 10), Some((460, 300)));
    }

    #[test]
    fn test_resize_clamps_to_min_size() {
        let mut shell = shell();
        shell.pointer_motion(SEAT, 500.0, 500.0);
        let _wid = add_window(&mut shell, 10, 400, 300);
        shell.set_surface_size_hints(10, 200, 150, 0, 0);
        shell.drain_events();

        let serial = press_on(&mut shell, 10);
        let edges = ResizeEdges::RIGHT | ResizeEdges::BOTTOM;
        shell.resize_requested(10, SEAT, serial, edges.bits());

        shell.pointer_motion(SEAT, -2000.0, -2000.0);
        let events = shell.drain_events();
        assert_eq!(last_configure(&events, 10), Some((200, 150)));
    }

    #[test]
    fn test_resize_min_floor_is_one_without_hints() {
        let mut shell = shell();
        shell.pointer_motion(SEAT, 500.0, 500.0);
        let _wid = add_window(&mut shell, 10, 400, 300);
        shell.drain_events();

        let serial = press_on(&mut shell, 10);
        let edges = ResizeEdges::RIGHT | ResizeEdges::BOTTOM;
        shell.resize_requested(10, SEAT, serial, edges.bits());

        shell.pointer_motion(SEAT, -5000.0, -5000.0);
        let events = shell.drain_events();
        assert_eq!(last_configure(&events, 10), Some((1, 1)));
    }

    #[test]
    fn test_resize_clamps_to_max_size_independently() {
        let mut shell = shell();
        shell.pointer_motion(SEAT, 500.0, 500.0);
        let _wid = add_window(&mut shell, 10, 400, 300);
        shell.set_surface_size_hints(10, 0, 0, 500, 800);
        shell.drain_events();

        let serial = press_on(&mut shell, 10);
        let edges = ResizeEdges::RIGHT | ResizeEdges::BOTTOM;
        shell.resize_requested(10, SEAT, serial, edges.bits());

        // Width hits its cap; height keeps its own limit.
        shell.pointer_motion(SEAT, 2000.0, 900.0);
        let events = shell.drain_events();
        assert_eq!(last_configure(&events, 10), Some((500, 700)));
    }

    #[test]
    fn test_resize_rejects_opposite_edges() {
        let mut shell = shell();
        let _wid = add_window(&mut shell, 10, 400, 300);
        let serial = press_on(&mut shell, 10);

        for edges in [
            0,
            (ResizeEdges::LEFT | ResizeEdges::RIGHT).bits(),
            (ResizeEdges::TOP | ResizeEdges::BOTTOM).bits(),
            0x10,
            0xff,
        ] {
            shell.resize_requested(10, SEAT, serial, edges);
            assert!(shell.grabs.is_empty(), "edges {:#x} started a grab", edges);
        }
        assert!(!shell.surfaces[&10].resizing);
    }

    #[test]
    fn test_resize_release_clears_resizing() {
        let mut shell = shell();
        shell.pointer_motion(SEAT, 500.0, 500.0);
        let wid = add_window(&mut shell, 10, 400, 300);

        let serial = press_on(&mut shell, 10);
        shell.resize_requested(10, SEAT, serial, ResizeEdges::RIGHT.bits());
        assert!(shell.surfaces[&10].resizing);
        assert_eq!(shell.windows[&wid].resize_edges, ResizeEdges::RIGHT);

        shell.pointer_button(SEAT, BTN_LEFT, false);
        assert!(!shell.surfaces[&10].resizing);
        assert!(shell.grabs.is_empty());
    }

    // =========================================================================
    // Maximize / restore
    // =========================================================================

    #[test]
    fn test_maximize_restore_round_trip() {
        let mut shell = shell();
        shell.pointer_motion(SEAT, 500.0, 500.0);
        let wid = add_window(&mut shell, 10, 400, 300);
        let (x0, y0) = (shell.windows[&wid].x, shell.windows[&wid].y);
        shell.drain_events();

        // Maximize: the client is asked for the full output size.
        shell.maximize_requested(10, true);
        let events = shell.drain_events();
        assert_eq!(last_configure(&events, 10), Some((1920, 1080)));

        // Client acks with a matching commit.
        shell.set_surface_size(10, 1920, 1080);
        shell.surface_committed(10, 0, 0);
        let w = &shell.windows[&wid];
        assert!(w.maximized);
        assert!(w.saved_position_valid);
        assert_eq!((w.x, w.y), (0, 0));

        // Restore: back to the saved position.
        shell.maximize_requested(10, false);
        let events = shell.drain_events();
        assert_eq!(last_configure(&events, 10), Some((0, 0)));

        shell.set_surface_size(10, 400, 300);
        shell.surface_committed(10, 0, 0);
        let w = &shell.windows[&wid];
        assert!(!w.maximized);
        assert!(!w.saved_position_valid);
        assert_eq!((w.x, w.y), (x0, y0));
    }

    #[test]
    fn test_maximized_position_respects_geometry_offset() {
        let mut shell = shell();
        shell.pointer_motion(SEAT, 500.0, 500.0);
        let wid = add_window(&mut shell, 10, 400, 300);

        // Client-side shadows: content starts at (20, 15) in the buffer.
        shell.set_surface_geometry(10, 20, 15, 360, 270);
        shell.maximize_requested(10, true);
        shell.set_surface_size(10, 1960, 1110);
        shell.surface_committed(10, 0, 0);

        let w = &shell.windows[&wid];
        assert_eq!((w.x, w.y), (-20, -15));
    }

    #[test]
    fn test_maximize_binds_window_to_output() {
        let mut shell = shell();
        shell.output_added(OutputState::new(2, "OUT-2", 1920, 0, 1280, 1024));
        shell.pointer_motion(SEAT, 500.0, 500.0);
        let wid = add_window(&mut shell, 10, 400, 300);
        shell.set_surface_output(10, Some(2));
        shell.drain_events();

        // A mapped window maximizes onto the output its surface is
        // currently shown on, not the default one.
        shell.maximize_requested(10, true);
        assert_eq!(shell.windows[&wid].output, Some(2));
        let events = shell.drain_events();
        assert_eq!(last_configure(&events, 10), Some((1280, 1024)));

        shell.set_surface_size(10, 1280, 1024);
        shell.surface_committed(10, 0, 0);
        let w = &shell.windows[&wid];
        assert!(w.maximized);
        assert_eq!((w.x, w.y), (1920, 0));

        // Restore resets to the default output.
        shell.maximize_requested(10, false);
        shell.set_surface_size(10, 400, 300);
        shell.surface_committed(10, 0, 0);
        assert_eq!(shell.windows[&wid].output, Some(1));
        assert!(!shell.windows[&wid].maximized);
    }

    // =========================================================================
    // Activation and stacking
    // =========================================================================

    #[test]
    fn test_activation_ordering() {
        let mut shell = shell();
        let a = add_window(&mut shell, 10, 400, 300);
        let b = add_window(&mut shell, 20, 400, 300);
        let handle_a = shell.windows[&a].handle.unwrap();
        let handle_b = shell.windows[&b].handle.unwrap();
        assert_eq!(shell.stacking.topmost(), Some(b));
        shell.drain_events();
        shell.toplevels.drain_events();

        shell.activate(a, SEAT, ActivateFlags::empty());
        assert_eq!(shell.stacking.topmost(), Some(a));
        assert!(shell.windows[&a].activated);
        assert!(!shell.windows[&b].activated);

        let events = shell.toplevels.drain_events();
        assert!(events.contains(&ToplevelEvent::Activated { handle: handle_b, activated: false }));
        assert!(events.contains(&ToplevelEvent::Activated { handle: handle_a, activated: true }));
        shell.drain_events();

        // Activating the frontmost window again fires nothing.
        shell.activate(a, SEAT, ActivateFlags::empty());
        assert!(shell.drain_events().is_empty());
        assert!(shell.toplevels.drain_events().is_empty());
    }

    #[test]
    fn test_click_to_activate() {
        let mut shell = shell();
        let a = add_window(&mut shell, 10, 400, 300);
        let _b = add_window(&mut shell, 20, 400, 300);

        shell.pointer_set_focus(SEAT, Some(10));
        shell.pointer_button(SEAT, BTN_LEFT, true);
        assert_eq!(shell.stacking.topmost(), Some(a));
        shell.pointer_button(SEAT, BTN_LEFT, false);
    }

    #[test]
    fn test_click_on_foreign_surface_ignored() {
        let mut shell = shell();
        let _a = add_window(&mut shell, 10, 400, 300);
        let b = add_window(&mut shell, 20, 400, 300);
        shell.drain_events();

        // A background or foreign surface owns no window entity.
        shell.pointer_set_focus(SEAT, Some(99));
        shell.pointer_button(SEAT, BTN_LEFT, true);
        assert_eq!(shell.stacking.topmost(), Some(b));
    }

    #[test]
    fn test_new_window_takes_keyboard_focus() {
        let mut shell = shell();
        let _a = add_window(&mut shell, 10, 400, 300);
        assert_eq!(shell.focus_states[&SEAT].keyboard_focus, Some(10));

        let _b = add_window(&mut shell, 20, 400, 300);
        assert_eq!(shell.focus_states[&SEAT].keyboard_focus, Some(20));
    }

    #[test]
    fn test_focus_cleared_on_destroy() {
        let mut shell = shell();
        let _a = add_window(&mut shell, 10, 400, 300);
        shell.surface_removed(10);
        assert_eq!(shell.focus_states[&SEAT].keyboard_focus, None);
    }

    // =========================================================================
    // Toplevel bridge
    // =========================================================================

    #[test]
    fn test_metadata_forwarded_to_handle() {
        let mut shell = shell();
        let wid = shell.surface_added(Surface::new(10));
        let handle = shell.windows[&wid].handle.unwrap();
        shell.set_surface_title(10, "terminal");
        shell.set_surface_app_id(10, "org.example.Terminal");
        shell.toplevels.drain_events();

        // Metadata reaches the handle on map...
        shell.set_surface_size(10, 640, 480);
        shell.surface_committed(10, 0, 0);
        let events = shell.toplevels.drain_events();
        assert!(events.contains(&ToplevelEvent::Title { handle, title: "terminal".into() }));
        assert!(events.contains(&ToplevelEvent::AppId {
            handle,
            app_id: "org.example.Terminal".into()
        }));

        // ...and on every later change.
        shell.set_surface_title(10, "terminal - vim");
        let events = shell.toplevels.drain_events();
        assert!(events.contains(&ToplevelEvent::Title { handle, title: "terminal - vim".into() }));
    }

    #[test]
    fn test_handle_activate_request() {
        let mut shell = shell();
        let a = add_window(&mut shell, 10, 400, 300);
        let _b = add_window(&mut shell, 20, 400, 300);
        let handle_a = shell.windows[&a].handle.unwrap();

        shell.handle_activate_requested(handle_a);
        assert_eq!(shell.stacking.topmost(), Some(a));
        assert_eq!(shell.focus_states[&SEAT].keyboard_focus, Some(10));
    }

    #[test]
    fn test_handle_activate_reaches_every_seat() {
        let mut shell = shell();
        shell.seat_added(SeatState::new(2, "seat1"));
        let a = add_window(&mut shell, 10, 400, 300);
        let _b = add_window(&mut shell, 20, 400, 300);
        let handle_a = shell.windows[&a].handle.unwrap();
        assert_eq!(shell.focus_states[&2].keyboard_focus, Some(20));

        shell.handle_activate_requested(handle_a);
        assert_eq!(shell.stacking.topmost(), Some(a));
        assert_eq!(shell.focus_states[&SEAT].keyboard_focus, Some(10));
        assert_eq!(shell.focus_states[&2].keyboard_focus, Some(10));
    }

    #[test]
    fn test_handle_activate_first_seat_only() {
        let mut shell = shell();
        shell.config.activate_all_seats = false;
        shell.seat_added(SeatState::new(2, "seat1"));
        let a = add_window(&mut shell, 10, 400, 300);
        let _b = add_window(&mut shell, 20, 400, 300);
        let handle_a = shell.windows[&a].handle.unwrap();

        shell.handle_activate_requested(handle_a);
        assert_eq!(shell.focus_states[&SEAT].keyboard_focus, Some(10));
        assert_eq!(shell.focus_states[&2].keyboard_focus, Some(20));
    }

    #[test]
    fn test_handle_close_request() {
        let mut shell = shell();
        let a = add_window(&mut shell, 10, 400, 300);
        let handle = shell.windows[&a].handle.unwrap();
        shell.drain_events();

        shell.handle_close_requested(handle);
        let events = shell.drain_events();
        assert!(events.contains(&ShellEvent::Close { surface: 10 }));
        // Nothing is torn down until the surface actually goes away.
        assert!(shell.windows.contains_key(&a));
    }

    #[test]
    fn test_dead_handle_requests_ignored() {
        let mut shell = shell();
        let a = add_window(&mut shell, 10, 400, 300);
        let handle = shell.windows[&a].handle.unwrap();
        shell.surface_removed(10);
        shell.drain_events();

        shell.handle_activate_requested(handle);
        shell.handle_close_requested(handle);
        assert!(shell.drain_events().is_empty());
    }

    // =========================================================================
    // Collaborator lifecycle
    // =========================================================================

    #[test]
    fn test_seat_removal_cancels_grab() {
        let mut shell = shell();
        shell.pointer_motion(SEAT, 500.0, 500.0);
        let wid = add_window(&mut shell, 10, 400, 300);

        let serial = press_on(&mut shell, 10);
        shell.move_requested(10, SEAT, serial);
        assert!(shell.windows[&wid].grabbed);

        shell.seat_removed(SEAT);
        assert!(shell.grabs.is_empty());
        assert!(!shell.windows[&wid].grabbed);
        assert!(!shell.focus_states.contains_key(&SEAT));
    }

    #[test]
    fn test_output_removal_clears_assignment() {
        let mut shell = shell();
        let wid = add_window(&mut shell, 10, 400, 300);
        assert_eq!(shell.windows[&wid].output, Some(1));

        shell.output_removed(1);
        assert_eq!(shell.windows[&wid].output, None);
    }

    // =========================================================================
    // Stacking layer
    // =========================================================================

    #[test]
    fn test_stacking_layer_operations() {
        let mut layer = StackingLayer::new();
        layer.insert(1);
        layer.insert(2);
        layer.insert(3);
        assert_eq!(layer.order, vec![1, 2, 3]);
        assert_eq!(layer.topmost(), Some(3));

        layer.raise(1);
        assert_eq!(layer.order, vec![2, 3, 1]);
        assert!(layer.is_topmost(1));

        layer.remove(3);
        assert_eq!(layer.order, vec![2, 1]);

        // Inserting an existing window is a no-op.
        layer.insert(2);
        assert_eq!(layer.order, vec![2, 1]);
    }
}
