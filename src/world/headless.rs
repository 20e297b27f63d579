//! Headless reference backend.
//!
//! Records every call the controller makes and captures a uniformly
//! coloured environment derived from the source string. Used by the
//! `shellwalk` driver and by tests.

use std::sync::{Arc, Mutex};
#[cfg(feature = "tokio-support")]
use std::time::Duration;

use async_trait::async_trait;

use super::{DrawSuppression, EnvironmentCapture, RenderMode, SplatWorld};
use crate::error::WorldError;
use crate::scene::EnvironmentMap;

const HEADLESS_FACE_SIZE: u32 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessState {
    pub loaded: bool,
    pub dispose_count: u32,
    pub in_scene: bool,
    pub scene_toggles: u32,
    pub scale: f64,
    pub scale_updates: u32,
    pub render_mode: Option<RenderMode>,
    pub suppression: DrawSuppression,
    pub captures: u32,
}

impl Default for HeadlessState {
    fn default() -> Self {
        Self {
            loaded: false,
            dispose_count: 0,
            in_scene: false,
            scene_toggles: 0,
            scale: 1.0,
            scale_updates: 0,
            render_mode: None,
            suppression: DrawSuppression::None,
            captures: 0,
        }
    }
}

pub struct HeadlessSplatWorld {
    source: String,
    state: Arc<Mutex<HeadlessState>>,
    capture: Arc<HeadlessCapture>,
    fail_load: bool,
}

impl HeadlessSplatWorld {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let state = Arc::new(Mutex::new(HeadlessState::default()));
        let capture = Arc::new(HeadlessCapture {
            source: source.clone(),
            state: Arc::clone(&state),
            fail: false,
            #[cfg(feature = "tokio-support")]
            latency: None,
        });
        Self {
            source,
            state,
            capture,
            fail_load: false,
        }
    }

    /// Loading this world will fail.
    pub fn failing_load(mut self) -> Self {
        self.fail_load = true;
        self
    }

    /// Capturing this world's environment will fail.
    pub fn failing_capture(mut self) -> Self {
        self.rebuild_capture(|capture| capture.fail = true);
        self
    }

    /// Delay each capture, simulating asset download and cube map rendering.
    #[cfg(feature = "tokio-support")]
    pub fn with_capture_latency(mut self, latency: Duration) -> Self {
        self.rebuild_capture(|capture| capture.latency = Some(latency));
        self
    }

    /// Shared view of the recorded state; stays valid after the world is boxed.
    pub fn state(&self) -> Arc<Mutex<HeadlessState>> {
        Arc::clone(&self.state)
    }

    fn rebuild_capture(&mut self, edit: impl FnOnce(&mut HeadlessCapture)) {
        let mut capture = HeadlessCapture {
            source: self.source.clone(),
            state: Arc::clone(&self.state),
            fail: self.capture.fail,
            #[cfg(feature = "tokio-support")]
            latency: self.capture.latency,
        };
        edit(&mut capture);
        self.capture = Arc::new(capture);
    }

    fn with_state(&self, edit: impl FnOnce(&mut HeadlessState)) {
        match self.state.lock() {
            Ok(mut state) => edit(&mut state),
            Err(poisoned) => edit(&mut poisoned.into_inner()),
        }
    }
}

impl SplatWorld for HeadlessSplatWorld {
    fn source(&self) -> &str {
        &self.source
    }

    fn load(&mut self) -> Result<(), WorldError> {
        if self.fail_load {
            return Err(WorldError::LoadFailed {
                source_id: self.source.clone(),
                reason: "headless load configured to fail".into(),
            });
        }
        self.with_state(|state| state.loaded = true);
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.state.lock().map(|state| state.loaded).unwrap_or(false)
    }

    fn dispose(&mut self) {
        self.with_state(|state| {
            state.dispose_count += 1;
            state.loaded = false;
            state.in_scene = false;
        });
    }

    fn set_in_scene(&mut self, in_scene: bool) {
        self.with_state(|state| {
            state.in_scene = in_scene;
            state.scene_toggles += 1;
        });
    }

    fn set_scale(&mut self, scale: f64) {
        self.with_state(|state| {
            state.scale = scale;
            state.scale_updates += 1;
        });
    }

    fn set_render_mode(&mut self, mode: RenderMode) {
        self.with_state(|state| state.render_mode = Some(mode));
    }

    fn set_draw_suppression(&mut self, suppression: DrawSuppression) {
        self.with_state(|state| state.suppression = suppression);
    }

    fn capture_handle(&self) -> Arc<dyn EnvironmentCapture> {
        self.capture.clone()
    }
}

struct HeadlessCapture {
    source: String,
    state: Arc<Mutex<HeadlessState>>,
    fail: bool,
    #[cfg(feature = "tokio-support")]
    latency: Option<Duration>,
}

#[async_trait]
impl EnvironmentCapture for HeadlessCapture {
    async fn capture(&self) -> Result<Option<EnvironmentMap>, WorldError> {
        #[cfg(feature = "tokio-support")]
        {
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
        }

        if self.fail {
            return Err(WorldError::CaptureFailed {
                source_id: self.source.clone(),
                reason: "headless capture configured to fail".into(),
            });
        }

        let loaded = match self.state.lock() {
            Ok(mut state) => {
                state.captures += 1;
                state.loaded
            }
            Err(_) => false,
        };
        if !loaded {
            return Ok(None);
        }

        EnvironmentMap::solid(HEADLESS_FACE_SIZE, source_color(&self.source))
            .map(Some)
            .map_err(|e| WorldError::CaptureFailed {
                source_id: self.source.clone(),
                reason: e.to_string(),
            })
    }
}

/// Stable colour for a source string (FNV-1a over the bytes).
fn source_color(source: &str) -> [f32; 4] {
    let hash = source
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325u64, |hash, byte| {
            (hash ^ byte as u64).wrapping_mul(0x0000_0100_0000_01b3)
        });
    let channel = |shift: u32| ((hash >> shift) & 0xff) as f32 / 255.0;
    [channel(0), channel(8), channel(16), 1.0]
}
