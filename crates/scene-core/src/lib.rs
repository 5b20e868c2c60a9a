pub mod constants;
pub mod expression;
pub mod face_geometry;
pub mod formation;
pub mod gesture;
pub mod mesh;
pub mod rig;
pub mod sampling;
pub mod store;

pub use expression::*;
pub use face_geometry::*;
pub use formation::*;
pub use gesture::*;
pub use mesh::*;
pub use rig::*;
pub use sampling::*;
pub use store::*;

// Shaders bundled as string constants
pub static FOLIAGE_WGSL: &str = include_str!("../shaders/foliage.wgsl");
pub static ORNAMENTS_WGSL: &str = include_str!("../shaders/ornaments.wgsl");
pub static AURORA_WGSL: &str = include_str!("../shaders/aurora.wgsl");
pub static TUBE_WGSL: &str = include_str!("../shaders/tube.wgsl");
pub static DUST_WGSL: &str = include_str!("../shaders/dust.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");
