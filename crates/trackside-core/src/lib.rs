pub mod animation;
pub mod calendar;
pub mod constants;
pub mod error;
pub mod events;
pub mod holidays;
pub mod lifecycle;
pub mod mesh;
pub mod scene;
pub mod schedule;
pub mod state;
pub mod transition;
pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

pub use animation::*;
pub use calendar::*;
pub use error::*;
pub use events::*;
pub use holidays::*;
pub use lifecycle::*;
pub use scene::*;
pub use state::*;
pub use transition::*;
