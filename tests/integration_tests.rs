// tests/integration_tests.rs
//! Integration tests for traversal through a stage

use std::sync::{Arc, Mutex};
use std::time::Duration;

use splatshell::config::{ShellConfig, WorldSource};
use splatshell::demos::{self, DemoKind, MountedDemo};
use splatshell::numerics::Vector3;
use splatshell::scene::{Camera, LightingSink, SceneLighting};
use splatshell::world::{
    DrawSuppression, HeadlessSplatWorld, HeadlessState, RenderMode, SplatWorld,
};
use splatshell::{ShellController, ShellGeometry, Stage};

struct Recorder {
    states: Vec<Arc<Mutex<HeadlessState>>>,
}

impl Recorder {
    fn new() -> Self {
        Self { states: Vec::new() }
    }

    fn create(&mut self, source: &WorldSource) -> Box<dyn SplatWorld> {
        let world = HeadlessSplatWorld::new(source.source.clone());
        self.states.push(world.state());
        Box::new(world)
    }
}

fn four_world_config() -> ShellConfig {
    let mut config = ShellConfig::default();
    config.worlds = (0..4)
        .map(|i| WorldSource::new(format!("world {i}"), format!("test://world-{i}")))
        .collect();
    config.traversal.inner_radius = 1.0;
    config.traversal.outer_radius = 8.0;
    config
}

#[test]
fn test_long_flight_keeps_invariants() {
    println!("=== Long Flight Invariants Test ===");

    let mut config = four_world_config();
    config.animation.enabled = true;
    config.animation.linear_speed = 3.0;
    config.animation.angular_speed = 0.5;

    let mut recorder = Recorder::new();
    let mut stage = Stage::default();
    let mounted = demos::mount(DemoKind::Transmission, &mut stage, &config, &mut |source| {
        recorder.create(source)
    })
    .unwrap();
    for capture in stage.take_pending_captures() {
        futures::executor::block_on(capture);
    }

    let MountedDemo::Transmission(controller) = mounted else {
        panic!("expected the transmission demo");
    };

    let mut previous_level = 0;
    for _ in 0..400 {
        stage.render_frame(Duration::from_millis(50));

        let controller = controller.lock().unwrap();
        let snapshot = controller.snapshot();
        assert!(snapshot.inner_surface_distance >= 0.0);
        assert!(snapshot.inner_surface_distance <= 7.0);
        assert!((snapshot.level - previous_level).abs() <= 1);
        previous_level = snapshot.level;

        for (index, state) in recorder.states.iter().enumerate() {
            let state = state.lock().unwrap();
            let is_inner = index == snapshot.inner_index;
            let is_outer = index == snapshot.outer_index;
            assert_eq!(state.in_scene, is_inner || is_outer);
            assert_eq!(state.suppression, DrawSuppression::for_role(is_inner, is_outer));
        }

        let outer_map = controller
            .world(snapshot.outer_index)
            .and_then(|world| world.environment())
            .map(|map| map.id());
        assert_eq!(stage.lighting.applied_environment(), outer_map);
    }

    // 400 frames at 0.15 units each is 60 units: eight full gaps and then some.
    assert_eq!(previous_level, 8);
    println!("Long flight: OK (level {previous_level})");
}

#[test]
fn test_demo_switching_releases_previous_demo() {
    println!("=== Demo Switching Test ===");

    let config = four_world_config();
    let mut recorder = Recorder::new();
    let mut stage = Stage::default();

    demos::mount(DemoKind::Transmission, &mut stage, &config, &mut |source| {
        recorder.create(source)
    })
    .unwrap();
    stage.render_frame(Duration::from_millis(16));
    assert_eq!(recorder.states.len(), 4);

    let mounted = demos::mount(DemoKind::SceneLighting, &mut stage, &config, &mut |source| {
        recorder.create(source)
    })
    .unwrap();
    assert_eq!(mounted.kind(), DemoKind::SceneLighting);

    for state in &recorder.states[..4] {
        assert_eq!(state.lock().unwrap().dispose_count, 1);
    }
    assert_eq!(recorder.states[4].lock().unwrap().dispose_count, 0);
    assert_eq!(stage.callback_count(), 1);
    assert!(stage.panel().bool("traversal", "animate").is_none());
    assert!(stage.panel().float("lighting", "spin_rate").is_some());

    stage.teardown();
    assert_eq!(recorder.states[4].lock().unwrap().dispose_count, 1);
    println!("Demo switching: OK");
}

#[test]
fn test_controller_without_stage() {
    println!("=== Bare Controller Test ===");

    let worlds: Vec<Box<dyn SplatWorld>> = (0..3)
        .map(|i| {
            Box::new(HeadlessSplatWorld::new(format!("test://bare-{i}"))) as Box<dyn SplatWorld>
        })
        .collect();
    let mut controller =
        ShellController::new(ShellGeometry::new(2.0, 6.0).unwrap(), worlds).unwrap();

    let mut camera = Camera::new()
        .with_position(Vector3::new(3.0, 0.0, 4.0))
        .with_near(0.0);
    let mut lighting = SceneLighting::new();

    controller.step(&mut camera, &mut lighting, 0.0);
    assert_eq!(controller.level(), 0);
    assert!((controller.inner_surface_distance() - 3.0).abs() < 1e-9);

    camera.set_distance(6.5);
    controller.step(&mut camera, &mut lighting, 0.0);
    assert_eq!(controller.level(), 1);
    assert!((camera.distance_from_origin() - 2.5).abs() < 1e-9);
    // Direction survives the wrap.
    assert!((camera.position.x / camera.position.z - 0.75).abs() < 1e-9);

    let inner = controller.world(controller.inner_index()).unwrap();
    assert_eq!(inner.render_mode(), Some(RenderMode::HighFidelity));
    assert!((inner.scale() - 2.0 / 6.0).abs() < 1e-12);
    assert!(lighting.applied_environment().is_none());

    controller.dispose();
    controller.dispose();
    assert!(controller.worlds().iter().all(|world| world.is_disposed()));
    println!("Bare controller: OK");
}

#[test]
fn test_config_file_drives_demo() {
    println!("=== Config File Test ===");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("splatshell.toml");
    std::fs::write(
        &path,
        r#"
        [[worlds]]
        label = "only"
        source = "test://only"

        [traversal]
        inner_radius = 0.5
        outer_radius = 2.5

        [camera]
        position = [0.0, 0.0, 1.5]
        near = 0.0
        "#,
    )
    .unwrap();

    let config = ShellConfig::load_from_path(&path).unwrap();
    let mut stage = Stage::default();
    let mut factory = |source: &WorldSource| -> Box<dyn SplatWorld> {
        Box::new(HeadlessSplatWorld::new(source.source.clone()))
    };
    let mounted = demos::mount(DemoKind::Transmission, &mut stage, &config, &mut factory).unwrap();

    stage.render_frame(Duration::from_millis(16));
    let MountedDemo::Transmission(controller) = mounted else {
        panic!("expected the transmission demo");
    };
    let controller = controller.lock().unwrap();
    assert_eq!(controller.world_count(), 1);
    assert_eq!(controller.inner_index(), 0);
    assert_eq!(controller.outer_index(), 0);
    assert!((controller.inner_surface_distance() - 1.0).abs() < 1e-9);
    println!("Config file: OK");
}
