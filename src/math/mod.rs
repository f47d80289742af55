mod mat4;
mod vec2;
mod vec3;

pub use mat4::Mat4;
pub use vec2::Vec2;
pub use vec3::{abs_cos_theta, cos_theta, local_to_world, orthonormal_basis, world_to_local, Vec3};

/// Ray-triangle intersection tolerance. Below this the Moeller-Trumbore
/// determinant is treated as degenerate (ray parallel to the triangle plane).
pub const EPS: f64 = 1e-20;
