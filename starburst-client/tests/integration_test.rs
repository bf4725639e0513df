use anyhow::Result;
use starburst_client::config::{apply_overrides, load_settings};
use starburst_client::headless::DrawCall;
use starburst_client::trace::{Click, Simulation, TickRecord};
use starburst_core::{MotionConfig, Position, Scene};
use starburst_shared::Settings;
use std::fs;

/// Scene on a 500x500 surface, shape resting at (250, 250)
fn scene(speed: f32, prevent_slide: bool) -> Scene {
    Scene::new(500.0, 500.0, MotionConfig::new(speed, prevent_slide))
}

fn positions(records: &[TickRecord]) -> Vec<(f32, f32)> {
    records.iter().map(|r| (r.x, r.y)).collect()
}

#[test]
fn test_axis_aligned_click_takes_five_ticks() {
    let mut simulation = Simulation::new(scene(2.0, false), vec![Click::new(260.0, 250.0, 0)]);
    let records = simulation.run(100);

    assert_eq!(
        positions(&records),
        vec![
            (252.0, 250.0),
            (254.0, 250.0),
            (256.0, 250.0),
            (258.0, 250.0),
            (260.0, 250.0),
        ]
    );
    assert!(records.last().unwrap().at_target);
    assert!(records[..4].iter().all(|r| !r.at_target));
    assert!(simulation.finished());
}

#[test]
fn test_no_clicks_means_no_ticks() {
    let mut simulation = Simulation::new(scene(2.0, false), Vec::new());
    assert!(simulation.run(100).is_empty());
    assert_eq!(simulation.ticks(), 0);
}

#[test]
fn test_diagonal_slides_without_prevention() {
    let mut simulation = Simulation::new(scene(2.0, false), vec![Click::new(270.0, 256.0, 0)]);
    let records = simulation.run(100);

    // Both axes move at full speed, so y finishes first and x keeps going alone
    assert_eq!(records[2].y, 256.0);
    assert_eq!(records[2].x, 256.0);
    assert_eq!(records.len(), 10);
}

#[test]
fn test_prevention_approaches_in_a_straight_line() {
    let mut simulation = Simulation::new(scene(2.0, true), vec![Click::new(270.0, 260.0, 0)]);
    let records = simulation.run(100);

    assert_eq!(records.len(), 10);
    for record in &records {
        // Every point stays on the line from (250, 250) to (270, 260)
        assert!(((record.x - 250.0) - 2.0 * (record.y - 250.0)).abs() < 1e-3);
    }
    assert_eq!((records[9].x, records[9].y), (270.0, 260.0));
}

#[test]
fn test_later_click_retargets_mid_flight() {
    let clicks = vec![Click::new(250.0, 240.0, 3), Click::new(300.0, 250.0, 0)];
    let mut simulation = Simulation::new(scene(2.0, false), clicks);
    let records = simulation.run(100);

    assert_eq!(records[0].target_x, 300.0);
    assert_eq!(positions(&records[..3]), vec![(252.0, 250.0), (254.0, 250.0), (256.0, 250.0)]);

    // The second click lands after three ticks and is seen by the fourth
    assert_eq!((records[3].target_x, records[3].target_y), (250.0, 240.0));
    assert_eq!((records[3].x, records[3].y), (254.0, 248.0));

    let last = records.last().unwrap();
    assert_eq!((last.x, last.y), (250.0, 240.0));
    assert!(last.at_target);
}

#[test]
fn test_zero_speed_stops_at_max_ticks() {
    let mut simulation = Simulation::new(scene(0.0, false), vec![Click::new(100.0, 100.0, 0)]);
    let records = simulation.run(50);

    assert_eq!(records.len(), 50);
    assert!(records.iter().all(|r| (r.x, r.y) == (250.0, 250.0)));
    assert!(!simulation.finished());
}

#[test]
fn test_frames_follow_the_shape() {
    let mut simulation =
        Simulation::new(scene(2.0, false), vec![Click::new(254.0, 250.0, 0)]).with_frames(true);
    let records = simulation.run(100);
    assert_eq!(records.len(), 2);

    for record in &records {
        let frame = record.frame.as_ref().expect("frame should be recorded");
        assert_eq!(frame.len(), 2);
        assert!(matches!(frame[0], DrawCall::Clear { .. }));
        match &frame[1] {
            DrawCall::FillFan { vertices, .. } => {
                assert_eq!(vertices.len(), 44);
                assert_eq!((vertices[0], vertices[1]), (record.x, record.y));
                // First perimeter vertex is the top tip
                assert!((vertices[2] - record.x).abs() < 1e-3);
                assert!((vertices[3] - (record.y - 50.0)).abs() < 1e-3);
            }
            other => panic!("expected a fan, got {:?}", other),
        }
    }
}

#[test]
fn test_tick_record_json() -> Result<()> {
    let mut simulation = Simulation::new(scene(2.0, false), vec![Click::new(252.0, 250.0, 0)]);
    let record = simulation.step();

    let json = serde_json::to_value(&record)?;
    assert_eq!(json["tick"], 1);
    assert_eq!(json["x"], 252.0);
    assert_eq!(json["target_y"], 250.0);
    assert_eq!(json["at_target"], true);
    assert!(json.get("frame").is_none());

    Ok(())
}

#[test]
fn test_settings_file_with_overrides() -> Result<()> {
    let path = std::env::temp_dir().join(format!("starburst-settings-{}.json", std::process::id()));
    fs::write(&path, r#"{"speed": 4.0, "prevent_slide": false}"#)?;

    let settings = load_settings(Some(path.as_path()))?;
    assert_eq!(
        settings,
        Settings {
            speed: 4.0,
            prevent_slide: false
        }
    );

    let settings = apply_overrides(settings, None, true);
    let mut simulation = Simulation::new(
        Scene::new(500.0, 500.0, MotionConfig::from(settings)),
        vec![Click::new(290.0, 270.0, 0)],
    );
    let first = simulation.step();
    assert_eq!((first.x, first.y), (254.0, 252.0));

    fs::remove_file(&path)?;
    Ok(())
}

#[test]
fn test_invalid_settings_file_is_rejected() -> Result<()> {
    let path = std::env::temp_dir().join(format!("starburst-bad-{}.json", std::process::id()));
    fs::write(&path, r#"{"speed": -1.0}"#)?;

    let err = load_settings(Some(path.as_path())).unwrap_err();
    assert!(format!("{:#}", err).contains("non-negative"));

    fs::remove_file(&path)?;
    Ok(())
}

#[test]
fn test_scene_reset_after_run() {
    let mut simulation = Simulation::new(scene(5.0, true), vec![Click::new(10.0, 490.0, 0)]);
    simulation.run(1000);
    assert_eq!(simulation.scene().current, Position::new(10.0, 490.0));

    let mut scene = simulation.scene().clone();
    scene.reset();
    assert_eq!(scene.current, Position::new(250.0, 250.0));
    assert!(scene.at_target());
}
