//! Frame-level window manager behavior on the headless platform

use pretty_assertions::assert_eq;
use tessera_core::{NativeHandle, Rect};
use tessera_platform::{NativeEvent, WindowManager};

#[test]
fn render_order_follows_top_left_corner() {
    let (mut wm, _) = WindowManager::headless();
    wm.create_window("p", "P", 100, 100, 10, 10).unwrap();
    wm.create_window("q", "Q", 500, 50, 10, 10).unwrap();
    wm.create_window("r", "R", 50, 100, 10, 10).unwrap();
    wm.show_all_windows();

    let report = wm.render_all_windows();
    assert_eq!(report.order(), vec!["q", "r", "p"]);
}

#[test]
fn two_windows_overlap_then_stop_overlapping() {
    let (mut wm, _) = WindowManager::headless();
    wm.create_window("first", "First", 0, 0, 400, 300).unwrap();
    wm.create_window("second", "Second", 300, 200, 400, 300).unwrap();
    wm.show_all_windows();

    let report = wm.render_all_windows();
    assert_eq!(report.passes.len(), 2);
    for pass in &report.passes {
        assert_eq!(pass.overlaps.as_slice(), &[Rect::new(300, 200, 100, 100)]);
    }

    assert!(wm.destroy_window("second"));
    let report = wm.render_all_windows();
    assert_eq!(report.order(), vec!["first"]);
    assert!(report.pass("first").unwrap().overlaps.is_empty());
    assert_eq!(report.total_overlaps(), 0);
}

#[test]
fn overlaps_from_several_windows_are_merged() {
    let (mut wm, _) = WindowManager::headless();
    wm.create_window("base", "Base", 0, 0, 100, 100).unwrap();
    wm.create_window("left", "Left", 50, 10, 100, 20).unwrap();
    wm.create_window("lower", "Lower", 60, 20, 100, 20).unwrap();
    wm.create_window("far", "Far", 90, 90, 100, 100).unwrap();
    wm.show_all_windows();

    // merged in painting order: left absorbs lower, far stays apart
    let areas = wm.overlapping_areas("base");
    assert_eq!(
        areas.as_slice(),
        &[Rect::new(50, 10, 50, 30), Rect::new(90, 90, 10, 10)]
    );
    assert!(wm.is_window_overlapping("base"));
    assert_eq!(wm.render_all_windows().pass("base").unwrap().overlaps, areas);
}

#[test]
fn paint_callback_runs_inside_each_pass() {
    let (mut wm, controller) = WindowManager::headless();
    wm.create_window("a", "A", 0, 0, 50, 50).unwrap();
    wm.create_window("b", "B", 25, 25, 50, 50).unwrap();
    wm.show_all_windows();

    let mut seen = Vec::new();
    wm.render_all_windows_with(|pass, window| {
        assert!(window.is_rendering());
        seen.push((pass.name.clone(), pass.overlaps.len()));
    });
    assert_eq!(seen, vec![("a".to_string(), 1), ("b".to_string(), 1)]);

    let handle = wm.get_window("a").unwrap().native_handle();
    assert_eq!(controller.window(handle).unwrap().paints, 1);
}

#[test]
fn native_events_reach_their_windows() {
    let (mut wm, controller) = WindowManager::headless();
    let a = wm.create_window("a", "A", 0, 0, 50, 50).unwrap().native_handle();
    let b = wm.create_window("b", "B", 0, 0, 50, 50).unwrap().native_handle();

    controller.push_event(NativeEvent::Moved { handle: a, x: 70, y: 80 });
    controller.push_event(NativeEvent::Resized {
        handle: a,
        width: 30,
        height: 20,
    });
    controller.push_event(NativeEvent::Moved {
        handle: NativeHandle(9999),
        x: 1,
        y: 1,
    });
    controller.push_event(NativeEvent::CloseRequested { handle: b });
    wm.process_messages();

    assert_eq!(wm.get_window("a").unwrap().bounds(), Rect::new(70, 80, 30, 20));
    assert!(!wm.has_window("b"));
    assert!(wm.is_running());

    controller.push_event(NativeEvent::CloseRequested { handle: a });
    wm.process_messages();
    assert_eq!(wm.window_count(), 0);
    assert!(!wm.is_running());
}

#[test]
fn quit_stops_the_manager() {
    let (mut wm, controller) = WindowManager::headless();
    let a = wm.create_window("a", "A", 0, 0, 50, 50).unwrap().native_handle();
    controller.push_event(NativeEvent::Quit);
    controller.push_event(NativeEvent::CloseRequested { handle: a });

    wm.process_messages();
    assert!(!wm.is_running());
    // events after the quit are not handled
    assert!(wm.has_window("a"));
}

#[test]
fn moved_windows_change_the_next_frame() {
    let (mut wm, _) = WindowManager::headless();
    wm.create_window("a", "A", 0, 0, 100, 100).unwrap();
    wm.create_window("b", "B", 200, 0, 100, 100).unwrap();
    wm.show_all_windows();
    assert_eq!(wm.render_all_windows().total_overlaps(), 0);

    wm.get_window_mut("b").unwrap().set_position(50, 50);
    let report = wm.render_all_windows();
    assert_eq!(
        report.pass("b").unwrap().overlaps.as_slice(),
        &[Rect::new(50, 50, 50, 50)]
    );
}
