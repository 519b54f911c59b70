//! Tunable parameters for the controller, the standing monitor and the scene.

mod controller;
mod scene;
mod standing;

pub use controller::ControllerConfig;
pub use scene::SceneConfig;
pub use standing::StandingConfig;
