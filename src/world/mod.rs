pub mod camera;
pub mod map;
pub mod ray;
pub mod sprite;
pub mod texture;

pub use camera::Camera;
pub use map::{CellKind, Map, MapError};
pub use ray::{Side, WallHit, cast_ray};
pub use sprite::{GuardSheet, PistolSheet, Pose, Sprite};
pub use texture::{Texture, TextureBank, TextureError, TextureId};
