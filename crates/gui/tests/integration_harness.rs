//! Integration tests for TestHarness.
//!
//! Tests the headless harness API used to drive sessions without a window.

use flagwave_gui_lib::build::ContourLibrary;
use flagwave_gui_lib::fixtures::{tricolor_description, write_description};
use flagwave_gui_lib::harness::TestHarness;
use flagwave_gui_lib::session::{HostInputs, SessionConfig};

#[test]
fn test_harness_starts_empty_and_running() {
    let mut h = TestHarness::new();
    assert_eq!(h.flag_count(), 0);
    assert!(h.session.driver().is_running());

    let report = h.frame();
    assert!(report.rendered);
    assert_eq!(report.tick.unwrap().frame, 1);
    assert_eq!(h.last_rendered().unwrap().child_count, 4);
}

#[test]
fn test_harness_clock_advances_per_frame() {
    let mut h = TestHarness::new();
    let reports = h.run_frames(3);
    let ticks: Vec<_> = reports.iter().map(|r| r.tick.unwrap()).collect();
    assert!(ticks[0].elapsed < ticks[1].elapsed && ticks[1].elapsed < ticks[2].elapsed);
    assert!((ticks[2].delta - 1.0 / 60.0).abs() < 1e-9);
    assert_eq!(h.frames_rendered(), 3);
}

#[test]
fn test_harness_over_contour_library() {
    let dir = tempfile::tempdir().unwrap();
    write_description(dir.path(), &tricolor_description("fr")).unwrap();

    let config = SessionConfig {
        image_id: Some("fr".into()),
        velocity: 0.01,
        ..Default::default()
    };
    let mut h = TestHarness::with_builder(ContourLibrary::new(dir.path()), &config);
    assert!(h.session.loading());
    h.session.process_pending().unwrap().unwrap();

    assert_eq!(h.flag_count(), 3);
    assert!(h.mesh_errors().is_empty());

    h.run_frames(10);
    let depths = h.depths();
    let expected = [0.15_f32, 0.2, 0.25];
    for (z, e) in depths.iter().zip(expected) {
        assert!((z - e).abs() < 1e-5, "{depths:?}");
    }
}

#[test]
fn test_harness_records_empty_depths_without_group() {
    let mut h = TestHarness::new();
    let _ = h.load("missing");
    h.frame();
    assert!(h.last_rendered().unwrap().depths.is_empty());
    assert!(h.session.last_error().is_some());
}

#[test]
fn test_library_switch_rebuilds_shared_image_id() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    write_description(first.path(), &tricolor_description("fr")).unwrap();
    let mut deeper = tricolor_description("fr");
    for region in &mut deeper.regions {
        region.depth += 0.1;
    }
    write_description(second.path(), &deeper).unwrap();

    let config = SessionConfig {
        image_id: Some("fr".into()),
        ..Default::default()
    };
    let inputs = HostInputs::from(&config);
    let mut h = TestHarness::with_builder(ContourLibrary::new(first.path()), &config);
    h.apply(&inputs);
    assert_eq!(h.original_depths(), vec![0.05, 0.1, 0.15]);

    // Same id in the new folder; the inputs do not change
    assert!(h.session.set_library_dir(second.path()));
    h.apply(&inputs);
    assert_eq!(h.session.graph().rebuild_count(), 2);
    for (z, e) in h.original_depths().iter().zip([0.15_f32, 0.2, 0.25]) {
        assert!((z - e).abs() < 1e-5, "{:?}", h.original_depths());
    }
}
