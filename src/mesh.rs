use crate::bvh::Bvh;
use crate::geometry::{Triangle, Vertex};
use crate::material::Material;
use crate::math::Mat4;

/// One placed copy of a triangle mesh: its local-space BVH plus the
/// transform taking local space to world space (and its inverse).
pub struct MeshInstance {
    pub bvh: Bvh,
    pub forward: Mat4,
    pub inverse: Mat4,
    pub material: Material,
    pub active: bool,
}

impl MeshInstance {
    pub fn new(vertices: Vec<Vertex>, triangles: &[Triangle], forward: Mat4, inverse: Mat4, material: Material) -> MeshInstance {
        MeshInstance { bvh: Bvh::build(vertices, triangles), forward, inverse, material, active: true }
    }
}
