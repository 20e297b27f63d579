//! Infinite transmission: the shell controller over every configured world.

use std::sync::{Arc, Mutex};

use tracing::info;

use super::WorldFactory;
use crate::config::ShellConfig;
use crate::controller::ShellController;
use crate::error::ShellError;
use crate::scene::Camera;
use crate::stage::Stage;

pub fn mount(
    stage: &mut Stage,
    config: &ShellConfig,
    factory: &mut WorldFactory<'_>,
) -> Result<Arc<Mutex<ShellController>>, ShellError> {
    stage.camera = Camera::new()
        .with_position(config.camera.position)
        .with_near(config.camera.near)
        .with_fov(config.camera.fov);

    let worlds = config.worlds.iter().map(|source| factory(source)).collect();
    let mut controller = ShellController::from_config(config, worlds)?;

    controller.register_parameters(stage.panel_mut());
    stage.queue_captures(controller.begin_captures());
    info!(
        "transmission demo over {} worlds",
        controller.world_count()
    );

    let controller = Arc::new(Mutex::new(controller));
    stage.register(Box::new(Arc::clone(&controller)));
    stage.adopt(Box::new(Arc::clone(&controller)));
    Ok(controller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldSource;
    use crate::controller::TRAVERSAL_FOLDER;
    use crate::scene::LightingSink;
    use crate::world::{HeadlessSplatWorld, SplatWorld};
    use std::time::Duration;

    fn headless(source: &WorldSource) -> Box<dyn SplatWorld> {
        Box::new(HeadlessSplatWorld::new(source.source.clone()))
    }

    #[test]
    fn test_mount_wires_stage() {
        let mut stage = Stage::default();
        let config = ShellConfig::default();
        let controller = mount(&mut stage, &config, &mut headless).unwrap();

        assert_eq!(stage.callback_count(), 1);
        assert_eq!(stage.resource_count(), 1);
        assert_eq!(stage.panel().bool(TRAVERSAL_FOLDER, "animate"), Some(false));
        assert_eq!(stage.take_pending_captures().len(), 2);
        assert_eq!(controller.lock().unwrap().world_count(), 2);
    }

    #[test]
    fn test_panel_animation_drives_traversal() {
        let mut stage = Stage::default();
        let config = ShellConfig::default();
        let controller = mount(&mut stage, &config, &mut headless).unwrap();
        for capture in stage.take_pending_captures() {
            futures::executor::block_on(capture);
        }

        stage.panel_mut().set_bool(TRAVERSAL_FOLDER, "animate", true);
        stage.panel_mut().set_float(TRAVERSAL_FOLDER, "linear_speed", 5.0);
        for _ in 0..20 {
            stage.render_frame(Duration::from_millis(100));
        }

        // 20 frames at 0.5 units each carry the camera across the 9 unit gap.
        let controller = controller.lock().unwrap();
        assert_eq!(controller.level(), 1);
        assert!(stage.lighting.applied_environment().is_some());
    }

    #[test]
    fn test_teardown_disposes_controller() {
        let mut stage = Stage::default();
        let config = ShellConfig::default();
        let controller = mount(&mut stage, &config, &mut headless).unwrap();

        stage.teardown();
        assert!(controller.lock().unwrap().is_disposed());
    }
}
