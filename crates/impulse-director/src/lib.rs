pub mod config;
pub mod director;
pub mod target;

pub use config::DirectorConfig;
pub use director::{ShakeCallback, ShakeDirector, ShakeId};
pub use target::{ShakeTarget, Transform2D, Transform3D, euler_to_quat};
