pub mod config;
pub mod controller;
pub mod demos;
pub mod error;
pub mod frame;
pub mod numerics;
pub mod panel;
pub mod resources;
pub mod scene;
pub mod stage;
pub mod world;

pub use controller::{ShellController, ShellGeometry, TraversalSnapshot};
pub use error::{ConfigError, EnvironmentError, ShellError, WorldError};
pub use stage::Stage;
