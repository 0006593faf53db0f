pub mod camera;
pub mod cli;
pub mod core;
pub mod frame;
pub mod march;
pub mod math;
pub mod scene;
pub mod sdf;
pub mod shading;

pub use camera::{ray_for, Camera, MovementState};
pub use crate::core::{FrameScheduler, SceneRenderer, Surface};
pub use scene::demo::create_demo_scene;
pub use scene::{validate_materials, Scene, SceneDescription};
