pub mod controller;
pub mod renderer;
pub mod scheduler;
pub mod semaphore;
pub mod surface;

pub use controller::{Button, Controller, ScriptedController, UnknownKey};
pub use renderer::SceneRenderer;
pub use scheduler::{FrameParams, FrameReport, FrameScheduler, RowRenderer, SchedulerError};
pub use semaphore::Semaphore;
pub use surface::{PixelFormat, Surface, SurfaceDescriptor, SurfaceError};
